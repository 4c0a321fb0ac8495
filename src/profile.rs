use crate::error::{Error, Result};
use crate::model::Profile;
use log::{debug, info};
use regex::Regex;
use std::fs::{self, DirBuilder};
use std::io;
use std::os::unix::fs::DirBuilderExt;
use std::path::Path;
use std::sync::LazyLock;

static NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9_]*$").expect("valid profile name regex"));

/// A profile name starts with an ASCII letter followed by letters, digits or underscores.
pub fn is_valid_name(name: &str) -> bool {
    NAME_RE.is_match(name)
}

fn validate(name: &str) -> Result<()> {
    if is_valid_name(name) {
        Ok(())
    } else {
        Err(Error::InvalidName(name.to_string()))
    }
}

/// Profiles live as plain directories under `root`; there is no other bookkeeping.
pub struct ProfileStore<'a> {
    root: &'a Path,
}

impl<'a> ProfileStore<'a> {
    pub fn new(root: &'a Path) -> Self {
        Self { root }
    }

    pub fn create(&self, name: &str) -> Result<Profile> {
        validate(name)?;
        let profile = Profile::new(self.root, name);
        match fs::metadata(&profile.path) {
            Ok(meta) if meta.is_dir() => return Err(Error::AlreadyExists(profile.path)),
            Ok(_) => return Err(Error::IsAFile(profile.path)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(Error::fs(profile.path, e)),
        }

        DirBuilder::new()
            .recursive(true)
            .mode(0o755)
            .create(self.root)
            .map_err(|e| Error::fs(self.root, e))?;

        // The final component is created non-recursively so a concurrent
        // creator gets EEXIST instead of a silent success.
        match DirBuilder::new().mode(0o755).create(&profile.path) {
            Ok(()) => {
                info!("Created profile {:?} at {:?}", profile.name, profile.path);
                Ok(profile)
            }
            // Only a real directory counts as a claimed profile; anything else
            // (a file, a dangling symlink) has to be cleared by hand.
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => match fs::metadata(&profile.path) {
                Ok(meta) if meta.is_dir() => Err(Error::AlreadyExists(profile.path)),
                _ => Err(Error::IsAFile(profile.path)),
            },
            Err(e) => Err(Error::fs(profile.path, e)),
        }
    }

    pub fn read(&self, name: &str) -> Result<Profile> {
        validate(name)?;
        let profile = Profile::new(self.root, name);
        let meta = fs::metadata(&profile.path).map_err(|e| Error::from_stat(&profile.path, e))?;
        if !meta.is_dir() {
            return Err(Error::IsAFile(profile.path));
        }
        debug!("Read profile {:?} under {:?}", profile.name, profile.root_dir);
        Ok(profile)
    }

    pub fn delete(&self, name: &str) -> Result<()> {
        let profile = self.read(name)?;
        fs::remove_dir_all(&profile.path).map_err(|e| Error::fs(&profile.path, e))?;
        info!("Removed profile {:?} at {:?}", profile.name, profile.path);
        Ok(())
    }
}

/// Checks the configured profile root: missing is `false`, a directory is `true`,
/// a regular file is an error.
pub fn root_state(path: &str) -> Result<bool> {
    let path = path.trim();
    if path.is_empty() {
        return Err(Error::Config("profile directory path is empty".to_string()));
    }
    match fs::metadata(path) {
        Ok(meta) if meta.is_dir() => Ok(true),
        Ok(_) => Err(Error::IsAFile(path.into())),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(Error::fs(path, e)),
    }
}
