mod cli;

use clap::Parser;
use cli::Cli;
use colored::Colorize;
use stride_driver::{Conf, Driver, Io, UnboundPolicy};

fn main() {
    let cli = Cli::parse();
    let level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
    if let Err(err) = run(cli) {
        eprintln!("{} {}", "error:".red().bold(), err);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> stride_driver::Result<()> {
    let Cli { file, trace, permissive, check, test, config, verbose: _ } = cli;
    let mut conf = Conf::locate(config.as_deref())?;
    if trace {
        conf.trace = true;
    }
    if permissive {
        conf.unbound = UnboundPolicy::Permissive;
    }
    let driver = Driver::new(conf);
    if check {
        driver.check_file(&file)?;
        log::info!("`{}` parsed", file.display());
        return Ok(());
    }
    if test {
        let mut report = std::io::stdout().lock();
        return driver.test_file(&file, Some(&mut report as &mut dyn std::io::Write));
    }
    let mut input = std::io::stdin().lock();
    let mut output = std::io::stdout().lock();
    let mut trace = std::io::stderr().lock();
    driver.run_file(&file, Io { input: &mut input, output: &mut output, trace: &mut trace })?;
    Ok(())
}
