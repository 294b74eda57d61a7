//! Runs stride programs: configuration, file loading, and the lex, parse
//! and reduce pipeline.

pub mod conf;
pub mod err;
pub mod loader;


pub use conf::Conf;
pub use err::*;
pub use loader::FileLoader;
pub use stride_dynamics::UnboundPolicy;

use std::{
    io::{BufRead, Write},
    path::{Path, PathBuf},
};
use stride_dynamics::Runtime;
use stride_syntax::Term;

/// The streams a run reads from and writes to.
pub struct Io<'a> {
    pub input: &'a mut dyn BufRead,
    pub output: &'a mut dyn Write,
    /// receives trace lines when tracing is on
    pub trace: &'a mut dyn Write,
}

pub struct Driver {
    pub conf: Conf,
    /// directory imports are resolved against
    pub base: PathBuf,
}

impl Driver {
    pub fn new(conf: Conf) -> Self {
        Driver { conf, base: PathBuf::from(".") }
    }
    pub fn with_base(mut self, base: impl Into<PathBuf>) -> Self {
        self.base = base.into();
        self
    }

    pub fn read(path: &Path) -> Result<String> {
        std::fs::read_to_string(path).map_err(|e| DriverError::SrcFileUnreadable(path.into(), e))
    }

    /// Lexes and parses `path` without running it.
    pub fn check_file(&self, path: &Path) -> Result<Term> {
        let source = Self::read(path)?;
        Ok(stride_surface::parse_source(&source, Some(path.into()))?)
    }

    pub fn run_file(&self, path: &Path, io: Io<'_>) -> Result<Term> {
        log::info!("running `{}`", path.display());
        let source = Self::read(path)?;
        self.run_source(&source, Some(path.into()), io)
    }

    pub fn run_source(&self, source: &str, path: Option<PathBuf>, io: Io<'_>) -> Result<Term> {
        let program = stride_surface::parse_source(source, path)?;
        let loader = FileLoader::new(self.base.clone());
        let Io { input, output, trace } = io;
        let mut runtime = Runtime::new(input, output, &loader).with_options(self.conf.options());
        if self.conf.trace {
            runtime = runtime.with_trace(trace);
        }
        let halted = runtime.run(program)?;
        runtime.output.flush()?;
        Ok(halted)
    }

    /// Runs `path` with empty input and compares what it prints with the
    /// sibling file `<path>.out`. A passing test is reported to `report`.
    pub fn test_file(&self, path: &Path, report: Option<&mut dyn Write>) -> Result<()> {
        let expected = Self::read(&path.with_extension("out"))?;
        let mut input = std::io::empty();
        let mut output = Vec::new();
        let mut trace = std::io::sink();
        self.run_file(path, Io { input: &mut input, output: &mut output, trace: &mut trace })?;
        let found = String::from_utf8_lossy(&output);
        if found != expected {
            let err = format!("{}: expected output\n{}\nbut found\n{}", path.display(), expected, found);
            Err(DriverError::TestFailed(err))?
        }
        if let Some(out) = report {
            use colored::Colorize;
            writeln!(out, "test {} ... {}", path.display(), "ok".green())?;
        }
        Ok(())
    }
}
