//! External programs: viewer, editor, shell and the desktop opener.
//!
//! Discovery looks at the config first, then the environment, then a
//! fixed list of well-known programs found on `PATH`. Running a program
//! suspends the TUI for its whole lifetime.

use std::env;
use std::io;
use std::path::Path;
use std::process::ExitStatus;

use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use duet_core::config::settings::ProgramsConfig;
use ratatui::{backend::CrosstermBackend, Terminal};

/// A discovered program and its leading arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Program {
    argv: Vec<String>,
}

impl Program {
    /// Splits a configured command line on whitespace.
    pub fn parse(command_line: &str) -> Option<Self> {
        let argv: Vec<String> = command_line.split_whitespace().map(str::to_string).collect();
        if argv.is_empty() {
            None
        } else {
            Some(Self { argv })
        }
    }

    pub fn name(&self) -> &str {
        &self.argv[0]
    }

    fn command(&self) -> std::process::Command {
        let mut cmd = std::process::Command::new(&self.argv[0]);
        cmd.args(&self.argv[1..]);
        cmd
    }
}

/// `[programs].editor`, then `$EDITOR`, then `vi`, `nano`.
pub fn editor(config: &ProgramsConfig) -> Option<Program> {
    configured(config.editor.as_deref())
        .or_else(|| {
            env::var("EDITOR")
                .ok()
                .and_then(|e| Program::parse(&e))
                .filter(|p| command_in_path(p.name()))
        })
        .or_else(|| first_in_path(&["vi", "nano"]))
}

/// `[programs].viewer`, then `less`, `more`, then the editor.
pub fn viewer(config: &ProgramsConfig) -> Option<Program> {
    configured(config.viewer.as_deref())
        .or_else(|| first_in_path(&["less", "more"]))
        .or_else(|| editor(config))
}

/// `[programs].shell`, then the first of `zsh`, `fish`, `bash`, `sh`.
pub fn shell(config: &ProgramsConfig) -> Option<Program> {
    configured(config.shell.as_deref()).or_else(|| first_in_path(&["zsh", "fish", "bash", "sh"]))
}

/// The platform's "open with default application" command.
pub fn native_open() -> Option<Program> {
    if cfg!(target_os = "macos") {
        first_in_path(&["open"])
    } else {
        first_in_path(&["xdg-open"])
    }
}

fn configured(command_line: Option<&str>) -> Option<Program> {
    command_line.and_then(Program::parse)
}

fn first_in_path(candidates: &[&str]) -> Option<Program> {
    candidates
        .iter()
        .find(|name| command_in_path(name))
        .and_then(|name| Program::parse(name))
}

/// Whether `binary` resolves to an executable file.
pub fn command_in_path(binary: &str) -> bool {
    if binary.contains(std::path::MAIN_SEPARATOR) {
        return is_executable_file(Path::new(binary));
    }
    let Some(path_var) = env::var_os("PATH") else {
        return false;
    };
    env::split_paths(&path_var).any(|dir| is_executable_file(&dir.join(binary)))
}

fn is_executable_file(path: &Path) -> bool {
    if !path.is_file() {
        return false;
    }
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        path.metadata()
            .map(|m| m.permissions().mode() & 0o111 != 0)
            .unwrap_or(false)
    }
    #[cfg(not(unix))]
    {
        true
    }
}

/// How the program is started.
pub enum Launch<'a> {
    /// `program <path>`
    WithPath(&'a Path),
    /// `program` with the working directory set.
    InDir(&'a Path),
}

/// Leaves the alternate screen, runs `program` to completion and restores
/// the TUI whatever the outcome.
pub fn run_suspended(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    program: &Program,
    launch: Launch<'_>,
) -> anyhow::Result<ExitStatus> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    let mut cmd = program.command();
    match launch {
        Launch::WithPath(path) => {
            cmd.arg(path);
        }
        Launch::InDir(dir) => {
            cmd.current_dir(dir);
        }
    }
    tracing::debug!(program = program.name(), "suspending for external program");
    let status = cmd.status();

    execute!(terminal.backend_mut(), EnterAlternateScreen)?;
    enable_raw_mode()?;
    terminal.hide_cursor()?;
    terminal.clear()?;

    status.map_err(|e| anyhow::anyhow!("failed to launch {}: {e}", program.name()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_splits_arguments() {
        let program = Program::parse("code --wait").unwrap();
        assert_eq!(program.name(), "code");
        assert_eq!(program.argv, vec!["code", "--wait"]);
    }

    #[test]
    fn parse_rejects_blank() {
        assert!(Program::parse("").is_none());
        assert!(Program::parse("   ").is_none());
    }

    #[test]
    fn configured_program_wins() {
        let config = ProgramsConfig {
            editor: Some("my-editor -x".to_string()),
            viewer: None,
            shell: Some("my-shell".to_string()),
        };
        assert_eq!(editor(&config).unwrap().name(), "my-editor");
        assert_eq!(shell(&config).unwrap().name(), "my-shell");
    }

    #[test]
    fn viewer_falls_back_to_configured_editor() {
        let config = ProgramsConfig {
            editor: Some("my-editor".to_string()),
            ..ProgramsConfig::default()
        };
        let viewer = viewer(&config).unwrap();
        assert!(["less", "more", "my-editor"].contains(&viewer.name()));
    }

    #[cfg(unix)]
    #[test]
    fn executable_bit_is_required() {
        use std::os::unix::fs::PermissionsExt;

        let tmp = tempfile::TempDir::new().unwrap();
        let script = tmp.path().join("tool");
        std::fs::write(&script, "#!/bin/sh\n").unwrap();
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o644)).unwrap();
        assert!(!command_in_path(&script.to_string_lossy()));

        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();
        assert!(command_in_path(&script.to_string_lossy()));
    }

    #[test]
    fn missing_binary_is_not_found() {
        assert!(!command_in_path("definitely-not-a-real-binary-4711"));
    }
}
