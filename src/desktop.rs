use crate::error::{Error, Result};
use log::{info, warn};
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

pub const APP_LABEL: &str = "Telegram Desktop";

fn render(profile: &str, try_exec: &str, exec: &str) -> String {
    format!(
        "[Desktop Entry]
Version=1.1
Type=Application
Name={APP_LABEL} – {profile}
Icon=telegram
TryExec={try_exec}
Exec={exec}
Terminal=false
Categories=Chat;Network;InstantMessaging;Qt;
Keywords=tg;chat;im;messaging;messenger;sms;tdesktop;
StartupWMClass=TelegramDesktop
X-GNOME-UsesNotifications=true
"
    )
}

/// `<dir>/telegramdesktop.<profile>.desktop`
pub fn entry_path(dir: &Path, profile: &str) -> PathBuf {
    dir.join(format!("telegramdesktop.{profile}.desktop"))
}

pub fn exists(dir: &Path, profile: &str) -> Result<bool> {
    let path = entry_path(dir, profile);
    match fs::symlink_metadata(&path) {
        Ok(_) => Ok(true),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(Error::fs(path, e)),
    }
}

/// Writes a new entry; an existing one is never overwritten.
pub fn create(dir: &Path, profile: &str, try_exec: &str, exec: &str) -> Result<PathBuf> {
    let path = entry_path(dir, profile);
    fs::create_dir_all(dir).map_err(|e| Error::fs(dir, e))?;

    let file = match OpenOptions::new().write(true).create_new(true).open(&path) {
        Ok(file) => file,
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => return Err(Error::AlreadyExists(path)),
        Err(e) => return Err(Error::fs(path, e)),
    };
    write_or_discard(&path, file, render(profile, try_exec, exec).as_bytes())?;

    info!("Created desktop entry {:?}", path);
    Ok(path)
}

/// Fills a freshly created entry; a half-written file would block every later
/// `create`, so it is deleted on failure.
fn write_or_discard(path: &Path, mut file: impl Write, content: &[u8]) -> Result<()> {
    if let Err(e) = file.write_all(content).and_then(|()| file.flush()) {
        if let Err(rm) = fs::remove_file(path) {
            warn!("Cannot remove partial desktop entry {:?}: {}", path, rm);
        }
        return Err(Error::fs(path, e));
    }
    Ok(())
}

pub fn remove(dir: &Path, profile: &str) -> Result<()> {
    let path = entry_path(dir, profile);
    fs::remove_file(&path).map_err(|e| Error::from_stat(&path, e))?;
    info!("Removed desktop entry {:?}", path);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use tempfile::tempdir;

    const EXPECTED: &str = "[Desktop Entry]
Version=1.1
Type=Application
Name=Telegram Desktop – work
Icon=telegram
TryExec=manygram
Exec=manygram run work
Terminal=false
Categories=Chat;Network;InstantMessaging;Qt;
Keywords=tg;chat;im;messaging;messenger;sms;tdesktop;
StartupWMClass=TelegramDesktop
X-GNOME-UsesNotifications=true
";

    #[test]
    fn path_layout() {
        assert_eq!(
            entry_path(Path::new("/home/u/.local/share/applications"), "work"),
            PathBuf::from("/home/u/.local/share/applications/telegramdesktop.work.desktop")
        );
    }

    #[test]
    fn create_writes_exact_template() -> anyhow::Result<()> {
        let dir = tempdir()?;
        assert!(!exists(dir.path(), "work")?);

        let path = create(dir.path(), "work", "manygram", "manygram run work")?;
        assert_eq!(path, dir.path().join("telegramdesktop.work.desktop"));
        assert_eq!(fs::read_to_string(&path)?, EXPECTED);
        assert!(exists(dir.path(), "work")?);
        Ok(())
    }

    #[test]
    fn create_twice_keeps_first() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let path = create(dir.path(), "work", "manygram", "manygram run work")?;

        let err = create(dir.path(), "work", "other", "other run work").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::AlreadyExists);
        assert_eq!(fs::read_to_string(&path)?, EXPECTED);
        Ok(())
    }

    #[test]
    fn create_makes_applications_dir() -> anyhow::Result<()> {
        let tmp = tempdir()?;
        let dir = tmp.path().join("share").join("applications");
        create(&dir, "home", "manygram", "manygram run home")?;
        assert!(exists(&dir, "home")?);
        Ok(())
    }

    struct FullDisk;

    impl Write for FullDisk {
        fn write(&mut self, _: &[u8]) -> io::Result<usize> {
            Err(io::Error::from_raw_os_error(28))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn failed_write_leaves_no_entry_behind() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let path = entry_path(dir.path(), "work");
        fs::write(&path, "")?;

        let err = write_or_discard(&path, FullDisk, EXPECTED.as_bytes()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Filesystem);
        assert!(!exists(dir.path(), "work")?);

        create(dir.path(), "work", "manygram", "manygram run work")?;
        assert_eq!(fs::read_to_string(&path)?, EXPECTED);
        Ok(())
    }

    #[test]
    fn remove_distinguishes_absent() -> anyhow::Result<()> {
        let dir = tempdir()?;
        assert_eq!(remove(dir.path(), "work").unwrap_err().kind(), ErrorKind::NotExist);

        create(dir.path(), "work", "manygram", "manygram run work")?;
        remove(dir.path(), "work")?;
        assert!(!exists(dir.path(), "work")?);
        assert_eq!(remove(dir.path(), "work").unwrap_err().kind(), ErrorKind::NotExist);
        Ok(())
    }

    #[test]
    fn entries_are_per_profile() -> anyhow::Result<()> {
        let dir = tempdir()?;
        create(dir.path(), "work", "manygram", "manygram run work")?;
        create(dir.path(), "home", "manygram", "manygram run home")?;
        remove(dir.path(), "work")?;
        assert!(exists(dir.path(), "home")?);
        assert!(fs::read_to_string(entry_path(dir.path(), "home"))?.contains("Exec=manygram run home\n"));
        Ok(())
    }
}
