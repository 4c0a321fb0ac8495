use crate::config::{self, APP_NAME, Config, DEFAULT_EXEC_PATH, Dirs, config_exists, load_config};
use crate::desktop;
use crate::error::{Error, ErrorKind};
use crate::executor;
use crate::model::Executable;
use crate::profile::{self, ProfileStore};
use crate::sources::{self, Source, flatpak, flatpak::FlatpakSource, plain::PlainSource, snap};
use anyhow::{Context as _, Result, anyhow, bail};
use log::{debug, warn};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

pub struct Context {
    pub dirs: Dirs,
}

impl Context {
    pub fn new(dirs: Dirs) -> Self {
        Self { dirs }
    }

    fn config(&self) -> Result<Config> {
        let path = &self.dirs.config_file;
        load_config(path).map_err(|e| match e.kind() {
            ErrorKind::NotExist => anyhow!(
                "Config {} not found. Run `{APP_NAME} config create` to create a new one.",
                path.display()
            ),
            _ => anyhow::Error::new(e).context(format!("Failed to read config {}", path.display())),
        })
    }

    fn resolve_executable(&self, config: &Config) -> Result<Executable> {
        let chain = sources::default_chain(&config.exec_path, &config.exec_args);
        sources::resolve(&chain).map_err(|e| {
            anyhow::Error::new(e).context(format!(
                "Telegram Desktop executable not found. Check `exec-path` in {}.",
                self.dirs.config_file.display()
            ))
        })
    }
}

/// Attaches remediation text to a profile store failure.
fn profile_error(err: Error, name: &str, action: &str) -> anyhow::Error {
    match err.kind() {
        ErrorKind::InvalidName => anyhow!(
            "Invalid profile name '{name}'. The name must start with a letter \
             and contain only letters, digits and underscores."
        ),
        ErrorKind::NotExist => anyhow!(
            "Profile '{name}' does not exist. Use `{APP_NAME} create {name}` to create a new one."
        ),
        ErrorKind::AlreadyExists => anyhow!(
            "Profile '{name}' already exists. Use `{APP_NAME} remove {name}` first \
             if you want to recreate the profile."
        ),
        ErrorKind::IsAFile => anyhow::Error::new(err)
            .context(format!("Profile '{name}' is blocked by a file. Remove the file manually.")),
        _ => anyhow::Error::new(err).context(format!("Failed to {action} profile '{name}'.")),
    }
}

pub fn create(ctx: &Context, name: &str, with_desktop: bool) -> Result<()> {
    let config = ctx.config()?;
    ProfileStore::new(config.profile_dir())
        .create(name)
        .map_err(|e| profile_error(e, name, "create"))?;
    println!("Profile '{name}' has been created.");
    if with_desktop {
        desktop_create(ctx, name)?;
    }
    Ok(())
}

pub fn run(ctx: &Context, name: &str, new: bool, wait: bool, extra: &[String]) -> Result<()> {
    let config = ctx.config()?;
    let exe = ctx.resolve_executable(&config)?;
    let store = ProfileStore::new(config.profile_dir());
    let profile = if new {
        let profile = store.create(name).map_err(|e| profile_error(e, name, "create"))?;
        println!("Profile '{name}' has been created.");
        profile
    } else {
        store.read(name).map_err(|e| profile_error(e, name, "read"))?
    };
    executor::execute(&exe, &profile.path, extra, wait)
        .with_context(|| format!("Failed to run Telegram Desktop with profile '{name}'."))
}

fn confirm(prompt: &str) -> Result<bool> {
    print!("{prompt} [y/N] ");
    io::stdout().flush()?;
    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}

pub fn remove(ctx: &Context, name: &str, yes: bool) -> Result<()> {
    let config = ctx.config()?;
    let store = ProfileStore::new(config.profile_dir());
    let profile = store.read(name).map_err(|e| profile_error(e, name, "remove"))?;

    let prompt = format!(
        "Profile '{name}' ({}) and all its data will be removed. Continue?",
        profile.path.display()
    );
    if !yes && !confirm(&prompt)? {
        println!("Cancelled.");
        return Ok(());
    }

    store.delete(name).map_err(|e| profile_error(e, name, "remove"))?;
    println!("Profile '{name}' has been removed.");

    let apps = ctx.dirs.applications_dir();
    match desktop::exists(&apps, name) {
        Ok(true) => {
            desktop::remove(&apps, name)
                .with_context(|| format!("Failed to remove desktop entry for profile '{name}'."))?;
            println!("Desktop entry for profile '{name}' has been removed.");
        }
        Ok(false) => debug!("No desktop entry for profile {:?}", name),
        Err(e) => warn!("Cannot check desktop entry for profile {:?}: {}", name, e),
    }
    Ok(())
}

/// Entry file names are built from the profile name, so it goes through the same gate.
fn check_name(name: &str) -> Result<()> {
    if profile::is_valid_name(name) {
        return Ok(());
    }
    Err(profile_error(Error::InvalidName(name.to_string()), name, "use"))
}

pub fn desktop_create(ctx: &Context, name: &str) -> Result<()> {
    check_name(name)?;
    let apps = ctx.dirs.applications_dir();
    if desktop::exists(&apps, name)? {
        bail!("Desktop entry for profile '{name}' already exists.");
    }
    let config = ctx.config()?;
    ProfileStore::new(config.profile_dir())
        .read(name)
        .map_err(|e| profile_error(e, name, "read"))?;

    desktop::create(&apps, name, APP_NAME, &format!("{APP_NAME} run {name}")).map_err(|e| {
        match e.kind() {
            ErrorKind::AlreadyExists => anyhow!("Desktop entry for profile '{name}' already exists."),
            _ => anyhow::Error::new(e)
                .context(format!("Failed to create desktop entry for profile '{name}'.")),
        }
    })?;
    println!("Desktop entry for profile '{name}' has been created.");
    Ok(())
}

pub fn desktop_remove(ctx: &Context, name: &str) -> Result<()> {
    check_name(name)?;
    desktop::remove(&ctx.dirs.applications_dir(), name).map_err(|e| match e.kind() {
        ErrorKind::NotExist => anyhow!("Desktop entry for profile '{name}' does not exist."),
        _ => anyhow::Error::new(e)
            .context(format!("Failed to remove desktop entry for profile '{name}'.")),
    })?;
    println!("Desktop entry for profile '{name}' has been removed.");
    Ok(())
}

pub fn config_create(ctx: &Context, force: bool) -> Result<()> {
    let plain = PlainSource::new(DEFAULT_EXEC_PATH, Vec::new());
    config_create_with(ctx, force, &plain, &FlatpakSource::default())
}

fn config_create_with(
    ctx: &Context,
    force: bool,
    plain: &dyn Source,
    flatpak_source: &dyn Source,
) -> Result<()> {
    let path = &ctx.dirs.config_file;
    if !config_exists(path)? {
        println!("Config {} is not found. Creating a new one.", path.display());
    } else if force {
        println!("Config {} has been found. Recreating.", path.display());
    } else {
        bail!("Config {} already exists.", path.display());
    }

    let data_dir = detect_data_dir(ctx, plain, flatpak_source);
    let profile_dir = config::default_profile_dir(&data_dir);
    println!("Profile directory: {}", profile_dir.display());

    Config::new(DEFAULT_EXEC_PATH, &profile_dir)
        .write(path)
        .context("Failed to write config.")?;
    println!("Done.");
    Ok(())
}

/// Picks the data directory new profiles should live under, based on how
/// Telegram Desktop is installed.
fn detect_data_dir(ctx: &Context, plain: &dyn Source, flatpak_source: &dyn Source) -> PathBuf {
    let fallback = || ctx.dirs.home_dir.clone();
    match plain.resolve() {
        Ok(exe) => {
            println!("Telegram Desktop executable: {}", exe.describe());
            if !exe.is_snap() {
                return ctx.dirs.data_dir.clone();
            }
            println!("Telegram Desktop seems installed via snap.");
            snap::data_home(&ctx.dirs.home_dir).unwrap_or_else(|_| {
                println!("Cannot find snap data directory, use fallback data location.");
                fallback()
            })
        }
        Err(e) => {
            debug!("plain lookup failed: {}", e);
            match flatpak_source.resolve() {
                Ok(exe) => {
                    println!("Telegram Desktop seems installed via Flatpak: {}", exe.describe());
                    flatpak::data_home(&ctx.dirs.home_dir).unwrap_or_else(|_| {
                        println!("Cannot find Flatpak data directory, use fallback data location.");
                        fallback()
                    })
                }
                Err(e) => {
                    debug!("flatpak lookup failed: {}", e);
                    println!("Telegram Desktop executable not found.");
                    ctx.dirs.data_dir.clone()
                }
            }
        }
    }
}

pub fn config_check(ctx: &Context) -> Result<()> {
    let config = ctx.config()?;
    println!("Config {} found. Checking.", ctx.dirs.config_file.display());

    let exe = ctx.resolve_executable(&config).context("Check error: `exec-path`")?;
    println!("Telegram Desktop executable: {} ({})", exe.describe(), exe.kind);

    let exists = profile::root_state(&config.profile_dir).context("Check error: `profile-dir`")?;
    println!("Profile directory: {}", config.profile_dir);
    if !exists {
        println!("Profile directory does not exist.");
    }
    println!("OK. Check passed.");
    Ok(())
}

pub fn version() {
    println!("{APP_NAME} {}", env!("CARGO_PKG_VERSION"));
}
