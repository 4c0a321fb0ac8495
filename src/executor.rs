use crate::error::{Error, Result};
use crate::model::Executable;
use log::info;
use std::ffi::OsString;
use std::os::unix::process::CommandExt;
use std::path::Path;
use std::process::{Command, Stdio};

// Flag names are fixed by Telegram Desktop itself.
pub const MANY_FLAG: &str = "-many";
pub const WORKDIR_FLAG: &str = "-workdir";

/// `<prefix...> -many -workdir <workdir> <extra...>`
pub fn build_args(exe: &Executable, workdir: &Path, extra: &[String]) -> Vec<OsString> {
    let mut args: Vec<OsString> = Vec::with_capacity(exe.args_prefix.len() + extra.len() + 3);
    args.extend(exe.args_prefix.iter().map(OsString::from));
    args.push(MANY_FLAG.into());
    args.push(WORKDIR_FLAG.into());
    args.push(workdir.into());
    args.extend(extra.iter().map(OsString::from));
    args
}

/// Starts the application on `workdir`. With `wait` the child shares our
/// stdout/stderr and its exit status is checked; otherwise it is detached and
/// only a failure to start is reported.
pub fn execute(exe: &Executable, workdir: &Path, extra: &[String], wait: bool) -> Result<()> {
    let mut command = Command::new(&exe.invocation);
    command.args(build_args(exe, workdir, extra));
    info!("Launching {} {:?}", exe.invocation, command.get_args().collect::<Vec<_>>());

    let launch_err = |reason: String, source: Option<std::io::Error>| Error::Launch {
        program: exe.invocation.clone(),
        reason,
        source,
    };

    if wait {
        let status = command
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .map_err(|e| launch_err(e.to_string(), Some(e)))?;
        if !status.success() {
            return Err(launch_err(format!("exited with {status}"), None));
        }
        return Ok(());
    }

    // Own process group so a Ctrl-C aimed at us doesn't reach the child.
    command
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .process_group(0)
        .spawn()
        .map_err(|e| launch_err(e.to_string(), Some(e)))?;

    Ok(())
}
