use std::path::{Path, PathBuf};

/// One isolated working directory under the profile root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    pub root_dir: PathBuf,
    pub name: String,
    pub path: PathBuf,
}

impl Profile {
    pub(crate) fn new(root_dir: &Path, name: &str) -> Self {
        Self {
            root_dir: root_dir.to_path_buf(),
            name: name.to_string(),
            path: root_dir.join(name),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallKind {
    Plain,
    Snap,
    Flatpak,
}

impl std::fmt::Display for InstallKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            InstallKind::Plain => "plain",
            InstallKind::Snap => "snap",
            InstallKind::Flatpak => "flatpak",
        };
        f.write_str(s)
    }
}

/// A located, runnable application binary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Executable {
    pub invocation: String,    // What gets spawned (bare name or path)
    pub full_path: PathBuf,    // After PATH lookup
    pub real_path: PathBuf,    // After resolving symlinks
    pub args_prefix: Vec<String>,
    pub kind: InstallKind,
}

impl Executable {
    pub fn is_snap(&self) -> bool {
        self.kind == InstallKind::Snap
    }

    /// `invocation -> full path -> real path`, skipping links that don't change anything.
    pub fn describe(&self) -> String {
        let mut parts = vec![self.invocation.clone()];
        let full = self.full_path.display().to_string();
        if full != self.invocation {
            parts.push(full);
        }
        if self.real_path != self.full_path {
            parts.push(self.real_path.display().to_string());
        }
        parts.join(" -> ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_path_is_root_joined_with_name() {
        let p = Profile::new(Path::new("/tmp/profiles"), "work");
        assert_eq!(p.path, PathBuf::from("/tmp/profiles/work"));
        assert_eq!(p.root_dir, PathBuf::from("/tmp/profiles"));
    }

    #[test]
    fn describe_collapses_equal_links() {
        let exe = Executable {
            invocation: "telegram-desktop".into(),
            full_path: "/usr/bin/telegram-desktop".into(),
            real_path: "/usr/bin/telegram-desktop".into(),
            args_prefix: vec![],
            kind: InstallKind::Plain,
        };
        assert_eq!(exe.describe(), "telegram-desktop -> /usr/bin/telegram-desktop");

        let exe = Executable {
            invocation: "/snap/bin/telegram-desktop".into(),
            full_path: "/snap/bin/telegram-desktop".into(),
            real_path: "/usr/bin/snap".into(),
            args_prefix: vec![],
            kind: InstallKind::Snap,
        };
        assert_eq!(exe.describe(), "/snap/bin/telegram-desktop -> /usr/bin/snap");
        assert!(exe.is_snap());
    }
}
