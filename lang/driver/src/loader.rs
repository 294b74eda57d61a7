use std::path::{Path, PathBuf};
use stride_dynamics::{EvalError, Loader};
use stride_syntax::Term;

/// Reads imported files from disk, relative to `base`.
pub struct FileLoader {
    pub base: PathBuf,
}

impl FileLoader {
    pub fn new(base: impl Into<PathBuf>) -> Self {
        FileLoader { base: base.into() }
    }
    pub fn resolve(&self, path: &str) -> PathBuf {
        self.base.join(Path::new(path))
    }
}

impl Loader for FileLoader {
    fn load(&self, path: &str) -> stride_dynamics::Result<Term> {
        let import_err = |reason: String| EvalError::Import { path: path.to_string(), reason };
        let file = self.resolve(path);
        log::debug!("importing `{}`", file.display());
        let source = std::fs::read_to_string(&file).map_err(|e| import_err(e.to_string()))?;
        stride_surface::parse_source(&source, Some(file)).map_err(|e| import_err(e.to_string()))
    }
}
