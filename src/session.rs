//! Session bootstrap
//!
//! Everything that has to happen between argument parsing and the first
//! event: locating the config directory, importing the session environment,
//! advertising our pid, resource limits and startup commands.

use anyhow::{bail, Context, Result};
use log::{debug, error, info, warn};
use std::fs;
use std::path::{Path, PathBuf};
use tokio::process::{Child, Command};

use crate::config::{expand_home, CONFIG_FILE_NAME};

/// Environment variable carrying the compositor's pid
pub const PID_ENV: &str = "PERCH_PID";

const CONFIG_SUBDIR: &str = "perch";
const ENVIRONMENT_FILE: &str = "environment";
const AUTOSTART_FILE: &str = "autostart";

/// Resolve the configuration directory.
///
/// An explicit directory wins, then `$XDG_CONFIG_HOME/perch`, then
/// `$HOME/.config/perch`.
pub fn config_dir(explicit: Option<&Path>) -> Result<PathBuf> {
    if let Some(dir) = explicit {
        return expand_home(dir);
    }
    if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME").filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(xdg).join(CONFIG_SUBDIR));
    }
    let home = std::env::var_os("HOME").context("Neither XDG_CONFIG_HOME nor HOME is set")?;
    Ok(PathBuf::from(home).join(".config").join(CONFIG_SUBDIR))
}

/// Path of the main configuration file inside `dir`
pub fn config_file(dir: &Path) -> PathBuf {
    dir.join(CONFIG_FILE_NAME)
}

/// Parse `KEY=VALUE` lines. Blank lines and `#` comments are skipped.
pub fn parse_environment(contents: &str) -> Vec<(String, String)> {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| {
            let (key, value) = line.split_once('=')?;
            let key = key.trim();
            if key.is_empty() {
                return None;
            }
            Some((key.to_string(), value.trim().to_string()))
        })
        .collect()
}

/// Import `<dir>/environment` into the process environment.
///
/// Returns how many variables were set; a missing file is not an error.
pub fn load_environment(dir: &Path) -> Result<usize> {
    let path = dir.join(ENVIRONMENT_FILE);
    if !path.exists() {
        debug!("No environment file at {}", path.display());
        return Ok(0);
    }

    let contents = fs::read_to_string(&path)
        .with_context(|| format!("Failed to read environment file: {}", path.display()))?;
    let vars = parse_environment(&contents);
    for (key, value) in &vars {
        debug!("env: {}={}", key, value);
        std::env::set_var(key, value);
    }
    Ok(vars.len())
}

/// Export our pid so signals can target this instance
pub fn export_pid() -> u32 {
    let pid = std::process::id();
    std::env::set_var(PID_ENV, pid.to_string());
    debug!("{}={}", PID_ENV, pid);
    pid
}

/// Wayland needs a runtime directory for its socket
pub fn runtime_dir() -> Result<PathBuf> {
    match std::env::var_os("XDG_RUNTIME_DIR") {
        Some(dir) if !dir.is_empty() => Ok(PathBuf::from(dir)),
        _ => bail!("XDG_RUNTIME_DIR is unset"),
    }
}

/// Raise the soft open-file limit to the hard limit
pub fn increase_nofile_limit() -> Result<u64> {
    let mut limit = libc::rlimit {
        rlim_cur: 0,
        rlim_max: 0,
    };
    // SAFETY: `limit` is a valid, writable rlimit for the duration of the call
    if unsafe { libc::getrlimit(libc::RLIMIT_NOFILE, &mut limit) } != 0 {
        bail!("getrlimit failed: {}", std::io::Error::last_os_error());
    }

    if limit.rlim_cur < limit.rlim_max {
        let raised = libc::rlimit {
            rlim_cur: limit.rlim_max,
            rlim_max: limit.rlim_max,
        };
        // SAFETY: `raised` is a valid rlimit
        if unsafe { libc::setrlimit(libc::RLIMIT_NOFILE, &raised) } != 0 {
            bail!("setrlimit failed: {}", std::io::Error::last_os_error());
        }
        debug!("Raised RLIMIT_NOFILE from {} to {}", limit.rlim_cur, limit.rlim_max);
        return Ok(limit.rlim_max as u64);
    }

    Ok(limit.rlim_cur as u64)
}

/// Split a command line into program and arguments using shell quoting
/// rules. Nothing is expanded; no shell is involved.
pub fn split_command(command: &str) -> Result<(String, Vec<String>)> {
    let mut parts = shell_words::split(command)
        .with_context(|| format!("Failed to parse command: {}", command))?
        .into_iter();
    let program = parts.next().context("Empty command")?;
    Ok((program, parts.collect()))
}

/// Spawn the `--startup` command directly, not through a shell
pub fn spawn_startup_command(command: &str) -> Result<Child> {
    let (program, args) = split_command(command)?;
    info!("🚀 Spawning startup command: {}", command);
    Command::new(&program)
        .args(&args)
        .kill_on_drop(false)
        .spawn()
        .with_context(|| format!("Failed to spawn startup command: {}", program))
}

/// Run `<dir>/autostart` with `sh` if it exists
pub fn spawn_autostart(dir: &Path) -> Result<Option<Child>> {
    let script = dir.join(AUTOSTART_FILE);
    if !script.is_file() {
        debug!("No autostart script at {}", script.display());
        return Ok(None);
    }

    info!("🚀 Running autostart script {}", script.display());
    let child = Command::new("sh")
        .arg(&script)
        .spawn()
        .with_context(|| format!("Failed to run autostart: {}", script.display()))?;
    Ok(Some(child))
}

/// Best-effort bootstrap steps that only warn on failure
pub fn prepare_session(config_dir: &Path) {
    match load_environment(config_dir) {
        Ok(count) if count > 0 => info!("🌱 Imported {} session variables", count),
        Ok(_) => {}
        Err(e) => warn!("⚠️ {:#}", e),
    }
    export_pid();
    if let Err(e) = increase_nofile_limit() {
        error!("❌ Unable to raise open file limit: {:#}", e);
    }
}
