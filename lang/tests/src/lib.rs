pub mod utils {
    use std::path::PathBuf;
    use stride_driver::{Conf, Driver};

    /// Runs `<dir>/<name>.sd` and checks its output against `<dir>/<name>.out`.
    pub fn wrapper_prog(dir: impl Into<PathBuf>, name: &str) {
        let dir = dir.into();
        let driver = Driver::new(Conf::default()).with_base(&dir);
        match driver.test_file(&dir.join(format!("{}.sd", name)), None) {
            | Ok(()) => {}
            | Err(err) => {
                eprintln!("{}", err);
                panic!("Error running program");
            }
        }
    }
}

#[macro_export]
macro_rules! lib_prog {
    ($name:ident) => {
        $crate::lib_prog!($name, stringify!($name));
    };
    ($name:ident, $file:expr) => {
        #[test]
        fn $name() {
            let dir = std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../lib");
            ::stride_tests::utils::wrapper_prog(dir, $file);
        }
    };
}
