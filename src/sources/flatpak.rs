use crate::error::{Error, Result};
use crate::model::{Executable, InstallKind};
use crate::sources::Source;
use crate::sources::plain::resolve_plain;
use log::debug;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

pub const LAUNCHER: &str = "flatpak";
pub const APP_ID: &str = "org.telegram.desktop";

pub struct FlatpakSource {
    launcher: String,
    app_id: String,
}

impl Default for FlatpakSource {
    fn default() -> Self {
        Self::new(LAUNCHER, APP_ID)
    }
}

impl FlatpakSource {
    pub fn new(launcher: &str, app_id: &str) -> Self {
        Self {
            launcher: launcher.to_string(),
            app_id: app_id.to_string(),
        }
    }

    fn probe(&self, launcher: &Path, args: &[&str]) -> bool {
        let status = Command::new(launcher)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status();
        debug!("Probe {:?} {:?}: {:?}", launcher, args, status);
        status.map(|s| s.success()).unwrap_or(false)
    }
}

impl Source for FlatpakSource {
    fn name(&self) -> &'static str {
        "flatpak"
    }

    fn resolve(&self) -> Result<Executable> {
        let tool = resolve_plain(&self.launcher, &[])
            .map_err(|_| Error::ToolNotFound(self.launcher.clone()))?;

        // A user install keeps its data under $HOME, so it wins over a system one.
        let prefix = if self.probe(&tool.full_path, &["--user", "info", self.app_id.as_str()]) {
            vec!["run", "--user", self.app_id.as_str()]
        } else if self.probe(&tool.full_path, &["info", self.app_id.as_str()]) {
            vec!["run", self.app_id.as_str()]
        } else {
            return Err(Error::AppNotInstalled(self.app_id.clone()));
        };

        let args: Vec<String> = prefix.into_iter().map(String::from).collect();
        let mut exe = resolve_plain(&self.launcher, &args)?;
        exe.kind = InstallKind::Flatpak;
        Ok(exe)
    }
}

/// Flatpak apps get their own XDG_DATA_HOME under `~/.var/app`.
pub fn data_home(home: &Path) -> Result<PathBuf> {
    let path = home.join(".var").join("app").join(APP_ID).join("data");
    if !path.is_dir() {
        return Err(Error::NotFound(path.display().to_string()));
    }
    Ok(path)
}
