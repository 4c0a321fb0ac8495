use crate::error::{Error, Result};
use crate::model::{Executable, InstallKind};
use crate::sources::Source;
use log::debug;
use std::env;
use std::ffi::{OsStr, OsString};
use std::fs;

pub struct PlainSource {
    locator: String,
    args: Vec<String>,
}

impl PlainSource {
    pub fn new(locator: &str, args: Vec<String>) -> Self {
        Self {
            locator: locator.to_string(),
            args,
        }
    }
}

impl Source for PlainSource {
    fn name(&self) -> &'static str {
        "plain"
    }

    fn resolve(&self) -> Result<Executable> {
        resolve_plain(&self.locator, &self.args)
    }
}

/// Looks `locator` up on `$PATH` (or takes it as a path when it has a separator).
pub fn resolve_plain(locator: &str, args: &[String]) -> Result<Executable> {
    resolve_plain_in(locator, args, env::var_os("PATH"))
}

pub fn resolve_plain_in(
    locator: &str,
    args: &[String],
    search_path: Option<OsString>,
) -> Result<Executable> {
    let cwd = env::current_dir().map_err(|e| Error::fs(".", e))?;
    let full_path = which::which_in(locator, search_path, cwd)
        .map_err(|e| Error::NotFound(format!("{locator}: {e}")))?;
    let real_path = fs::canonicalize(&full_path).map_err(|e| Error::fs(&full_path, e))?;

    // Every snap command is a symlink to /usr/bin/snap.
    let kind = if real_path.file_name() == Some(OsStr::new("snap")) {
        InstallKind::Snap
    } else {
        InstallKind::Plain
    };
    debug!("Resolved {:?} to {:?} -> {:?}", locator, full_path, real_path);

    Ok(Executable {
        invocation: locator.to_string(),
        full_path,
        real_path,
        args_prefix: args.to_vec(),
        kind,
    })
}
