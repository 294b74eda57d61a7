use crate::{env::Environment, err::Result};
use serde::{Deserialize, Serialize};
use std::io::{BufRead, Write};
use stride_syntax::{EnvDisplay, Term};

/// What a lookup of an unbound name does.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnboundPolicy {
    /// fail with `UnboundName`
    #[default]
    Strict,
    /// reduce to `null` and log a warning
    Permissive,
}

#[derive(Clone, Copy, Debug, Default)]
pub struct Options {
    pub unbound: UnboundPolicy,
}

/// Resolves the path of an `import` to a parsed program.
pub trait Loader {
    fn load(&self, path: &str) -> Result<Term>;
}

pub struct Runtime<'rt> {
    pub input: &'rt mut dyn BufRead,
    pub output: &'rt mut dyn Write,
    pub trace: Option<&'rt mut dyn Write>,
    pub loader: &'rt dyn Loader,
    pub options: Options,
    pub env: Environment,
    /// paths of the imports currently running, outermost first
    pub imports: Vec<String>,
}

impl<'rt> Runtime<'rt> {
    pub fn new(
        input: &'rt mut dyn BufRead, output: &'rt mut dyn Write, loader: &'rt dyn Loader,
    ) -> Self {
        Runtime {
            input,
            output,
            trace: None,
            loader,
            options: Options::default(),
            env: Environment::new(),
            imports: Vec::new(),
        }
    }
    pub fn with_trace(mut self, sink: &'rt mut dyn Write) -> Self {
        self.trace = Some(sink);
        self
    }
    pub fn with_options(mut self, options: Options) -> Self {
        self.options = options;
        self
    }

    /// Writes one trace line for `term` against the current environment.
    pub fn trace_step(&mut self, term: &Term) -> Result<()> {
        if self.trace.is_none() && !log::log_enabled!(log::Level::Trace) {
            return Ok(());
        }
        let line = format!("{} {}", term, EnvDisplay(&self.env.flatten()));
        log::trace!("{}", line);
        if let Some(sink) = self.trace.as_mut() {
            writeln!(sink, "{}", line)?;
        }
        Ok(())
    }
}
