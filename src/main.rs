mod cli;
mod config;
mod desktop;
mod error;
mod executor;
mod model;
mod profile;
mod sources;

use crate::cli::Context;
use crate::config::Dirs;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(author, version, about = "Run multiple Telegram Desktop profiles side by side", long_about = None)]
struct Args {
    /// Use this config file instead of the default one
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create a new profile
    Create {
        profile: String,
        /// Also create a desktop entry for the profile
        #[arg(long)]
        desktop: bool,
    },
    /// Run Telegram Desktop with the profile; arguments after `--` are passed through
    Run {
        profile: String,
        /// Create the profile first
        #[arg(short, long)]
        new: bool,
        /// Wait for Telegram Desktop to exit
        #[arg(short, long)]
        wait: bool,
        #[arg(last = true)]
        args: Vec<String>,
    },
    /// Remove the profile and all its data
    Remove {
        profile: String,
        /// Don't ask for confirmation
        #[arg(short, long)]
        yes: bool,
    },
    /// Desktop entry subcommands
    #[command(subcommand)]
    Desktop(DesktopCommand),
    /// Config subcommands
    #[command(subcommand)]
    Config(ConfigCommand),
    /// Print version
    Version,
}

#[derive(Subcommand, Debug)]
enum DesktopCommand {
    /// Create a desktop entry for the profile
    Create { profile: String },
    /// Remove the profile's desktop entry
    Remove { profile: String },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Create the config
    Create {
        /// Rewrite the existing config
        #[arg(short, long)]
        force: bool,
    },
    /// Check the config
    Check,
}

fn dispatch(args: Args) -> anyhow::Result<()> {
    let config = args.config;
    let ctx = || Dirs::from_env(config.clone()).map(Context::new);
    match args.command {
        Command::Create { profile, desktop } => cli::create(&ctx()?, &profile, desktop),
        Command::Run { profile, new, wait, args } => cli::run(&ctx()?, &profile, new, wait, &args),
        Command::Remove { profile, yes } => cli::remove(&ctx()?, &profile, yes),
        Command::Desktop(DesktopCommand::Create { profile }) => cli::desktop_create(&ctx()?, &profile),
        Command::Desktop(DesktopCommand::Remove { profile }) => cli::desktop_remove(&ctx()?, &profile),
        Command::Config(ConfigCommand::Create { force }) => cli::config_create(&ctx()?, force),
        Command::Config(ConfigCommand::Check) => cli::config_check(&ctx()?),
        Command::Version => {
            cli::version();
            Ok(())
        }
    }
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    match dispatch(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err:#}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_is_well_formed() {
        Args::command().debug_assert();
    }

    #[test]
    fn run_passthrough_after_double_dash() {
        let args = Args::parse_from(["manygram", "run", "-w", "work", "--", "-startintray", "tg://x"]);
        match args.command {
            Command::Run { profile, new, wait, args } => {
                assert_eq!(profile, "work");
                assert!(!new);
                assert!(wait);
                assert_eq!(args, ["-startintray", "tg://x"]);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn desktop_subcommand() {
        let args = Args::parse_from(["manygram", "--config", "/tmp/c.toml", "desktop", "remove", "home"]);
        assert_eq!(args.config, Some(PathBuf::from("/tmp/c.toml")));
        assert!(matches!(
            args.command,
            Command::Desktop(DesktopCommand::Remove { ref profile }) if profile == "home"
        ));
    }
}
