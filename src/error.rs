use std::io;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Tag used by callers to branch on a failure without matching variant payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidName,
    AlreadyExists,
    IsAFile,
    NotExist,
    Filesystem,
    NotFound,
    ToolNotFound,
    AppNotInstalled,
    Launch,
    Config,
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("invalid profile name: {0:?}")]
    InvalidName(String),

    #[error("{}: already exists", .0.display())]
    AlreadyExists(PathBuf),

    #[error("{}: is a file", .0.display())]
    IsAFile(PathBuf),

    #[error("{}: does not exist", .0.display())]
    NotExist(PathBuf),

    #[error("{}: {source}", path.display())]
    Filesystem {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("executable not found: {0}")]
    NotFound(String),

    #[error("{0} executable not found")]
    ToolNotFound(String),

    #[error("{0} flatpak app not found")]
    AppNotInstalled(String),

    #[error("failed to launch {program}: {reason}")]
    Launch {
        program: String,
        reason: String,
        #[source]
        source: Option<io::Error>,
    },

    #[error("{0}")]
    Config(String),
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::InvalidName(_) => ErrorKind::InvalidName,
            Error::AlreadyExists(_) => ErrorKind::AlreadyExists,
            Error::IsAFile(_) => ErrorKind::IsAFile,
            Error::NotExist(_) => ErrorKind::NotExist,
            Error::Filesystem { .. } => ErrorKind::Filesystem,
            Error::NotFound(_) => ErrorKind::NotFound,
            Error::ToolNotFound(_) => ErrorKind::ToolNotFound,
            Error::AppNotInstalled(_) => ErrorKind::AppNotInstalled,
            Error::Launch { .. } => ErrorKind::Launch,
            Error::Config(_) => ErrorKind::Config,
        }
    }

    pub(crate) fn fs(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Error::Filesystem {
            path: path.into(),
            source,
        }
    }

    /// Maps an `io::Error` from a stat-like call, turning "not found" into `NotExist`.
    pub(crate) fn from_stat(path: impl Into<PathBuf>, source: io::Error) -> Self {
        let path = path.into();
        if source.kind() == io::ErrorKind::NotFound {
            Error::NotExist(path)
        } else {
            Error::fs(path, source)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stat_not_found_becomes_not_exist() {
        let err = Error::from_stat("/x", io::Error::from(io::ErrorKind::NotFound));
        assert_eq!(err.kind(), ErrorKind::NotExist);

        let err = Error::from_stat("/x", io::Error::from(io::ErrorKind::PermissionDenied));
        assert_eq!(err.kind(), ErrorKind::Filesystem);
        assert!(std::error::Error::source(&err).is_some());
    }
}
