use crate::err::{DriverError, Result};
use sculptor::{AppAuthor, FileIO, ProjectInfo, impl_serde_str_toml};
use serde::{Deserialize, Serialize};
use std::{
    io,
    path::{Path, PathBuf},
};
use stride_dynamics::{Options, UnboundPolicy};

/// Name of the configuration file looked up in the working directory and in
/// the user configuration directory.
pub const CONF_FILE: &str = "stride.toml";

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct Conf {
    /// what looking up an unbound name does
    pub unbound: UnboundPolicy,
    /// echo every rewrite step
    pub trace: bool,
}

impl_serde_str_toml!(Conf);

impl AppAuthor for Conf {
    fn app_name() -> &'static str {
        "Stride"
    }

    fn author() -> &'static str {
        "The Stride Project Developers"
    }
}

impl Conf {
    pub fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        FileIO::new(path.clone()).load().map_err(|e| match e.kind() {
            | io::ErrorKind::NotFound => DriverError::ConfNotFound(path),
            | _ => DriverError::ConfInvalid(path, e),
        })
    }
    /// `explicit` if given, else the first `stride.toml` found in the working
    /// directory or the user configuration directory, else the defaults.
    pub fn locate(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        for path in [PathBuf::from(CONF_FILE), Conf::config_dir().join(CONF_FILE)] {
            if path.exists() {
                log::debug!("configuration from `{}`", path.display());
                return Self::load(path);
            }
        }
        log::debug!("no `{}` found; using the default configuration", CONF_FILE);
        Ok(Conf::default())
    }
    pub fn options(&self) -> Options {
        Options { unbound: self.unbound }
    }
}
