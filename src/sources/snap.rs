use crate::error::{Error, Result};
use std::path::{Path, PathBuf};

pub const SNAP_NAME: &str = "telegram-desktop";

/// XDG_DATA_HOME as seen from inside the snap. Confined snaps can't reach
/// arbitrary dot-directories, so this has to exist rather than be assumed.
pub fn data_home(home: &Path) -> Result<PathBuf> {
    let path = home
        .join("snap")
        .join(SNAP_NAME)
        .join("current")
        .join(".local")
        .join("share");
    if !path.is_dir() {
        return Err(Error::NotFound(path.display().to_string()));
    }
    Ok(path)
}
