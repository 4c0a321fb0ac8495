use crate::error::{Error, Result};
use crate::model::Executable;
use log::{debug, info};

pub trait Source {
    fn name(&self) -> &'static str;
    fn resolve(&self) -> Result<Executable>;
}

pub mod flatpak;
pub mod plain;
pub mod snap;

use flatpak::FlatpakSource;
use plain::PlainSource;

/// Default lookup order. Plain comes first since snap shims sit on PATH like
/// any other binary and are told apart only by their symlink target.
pub fn default_chain(exec_path: &str, exec_args: &[String]) -> Vec<Box<dyn Source>> {
    vec![
        Box::new(PlainSource::new(exec_path, exec_args.to_vec())),
        Box::new(FlatpakSource::default()),
    ]
}

/// Returns the first executable any source can find, or `NotFound` listing every failure.
pub fn resolve(sources: &[Box<dyn Source>]) -> Result<Executable> {
    let mut failures = Vec::new();
    for source in sources {
        match source.resolve() {
            Ok(exe) => {
                info!("{}: found {} ({})", source.name(), exe.describe(), exe.kind);
                return Ok(exe);
            }
            Err(e) => {
                debug!("{}: {}", source.name(), e);
                failures.push(format!("{}: {}", source.name(), e));
            }
        }
    }
    Err(Error::NotFound(failures.join("; ")))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::model::InstallKind;
    use std::cell::Cell;
    use std::fs;
    use std::os::unix::fs::PermissionsExt;
    use std::path::{Path, PathBuf};
    use std::rc::Rc;

    /// Writes an executable `#!/bin/sh` script.
    pub(crate) fn write_script(path: &Path, body: &str) -> PathBuf {
        fs::write(path, format!("#!/bin/sh\n{body}\n")).unwrap();
        fs::set_permissions(path, fs::Permissions::from_mode(0o755)).unwrap();
        path.to_path_buf()
    }

    struct Fake {
        result: Option<InstallKind>,
        calls: Rc<Cell<usize>>,
    }

    impl Source for Fake {
        fn name(&self) -> &'static str {
            "fake"
        }

        fn resolve(&self) -> Result<Executable> {
            self.calls.set(self.calls.get() + 1);
            match self.result {
                Some(kind) => Ok(Executable {
                    invocation: kind.to_string(),
                    full_path: PathBuf::from("/bin").join(kind.to_string()),
                    real_path: PathBuf::from("/bin").join(kind.to_string()),
                    args_prefix: vec![],
                    kind,
                }),
                None => Err(Error::NotFound("nope".into())),
            }
        }
    }

    fn fake(result: Option<InstallKind>) -> Box<Fake> {
        Box::new(Fake {
            result,
            calls: Rc::default(),
        })
    }

    #[test]
    fn first_success_wins() {
        let chain: Vec<Box<dyn Source>> = vec![
            fake(None),
            fake(Some(InstallKind::Flatpak)),
            fake(Some(InstallKind::Plain)),
        ];
        let exe = resolve(&chain).unwrap();
        assert_eq!(exe.kind, InstallKind::Flatpak);
    }

    #[test]
    fn later_sources_are_not_tried_after_success() {
        let first = fake(Some(InstallKind::Snap));
        let second = fake(Some(InstallKind::Flatpak));
        let (first_calls, second_calls) = (first.calls.clone(), second.calls.clone());
        let chain: Vec<Box<dyn Source>> = vec![first, second];

        assert_eq!(resolve(&chain).unwrap().kind, InstallKind::Snap);
        assert_eq!(first_calls.get(), 1);
        assert_eq!(second_calls.get(), 0);
    }

    #[test]
    fn exhausted_chain_is_not_found() {
        let chain: Vec<Box<dyn Source>> = vec![fake(None), fake(None)];
        let err = resolve(&chain).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(err.to_string().matches("fake:").count(), 2);
    }
}
