//! Angular CLI knowledge — binary resolution, command descriptors, and the
//! error pattern that identifies a sandboxed port-bind failure.
//!
//! Everything `ng`-specific lives here so the runner and orchestrator stay
//! generic over "a command and its args".

use std::path::{Path, PathBuf};

/// Executable name inside `node_modules/.bin/`.
#[cfg(windows)]
const LOCAL_BIN: &str = "ng.cmd";
#[cfg(not(windows))]
const LOCAL_BIN: &str = "ng";

/// Substring `ng serve` logs when the sandbox denies the listen syscall.
const EPERM_PATTERN: &str = "listen EPERM: operation not permitted";

/// Generic access-denied marker, also seen on denied binds.
const EACCES_PATTERN: &str = "EACCES";

/// A command descriptor: the program plus its ordered arguments.
///
/// Built once per invocation and owned by the orchestrator; never mutated
/// after construction.
#[derive(Debug, Clone)]
pub struct NgCommand {
    pub program: PathBuf,
    pub args: Vec<String>,
}

impl NgCommand {
    /// The live dev-server invocation: `ng serve --hmr [extra...]`.
    pub fn serve(program: &Path, extra: &[String]) -> Self {
        let mut args = vec!["serve".to_string(), "--hmr".to_string()];
        args.extend(extra.iter().cloned());
        Self {
            program: program.to_path_buf(),
            args,
        }
    }

    /// The one-off compile invocation:
    /// `ng build --configuration development [extra...]`.
    pub fn build(program: &Path, extra: &[String]) -> Self {
        let mut args = vec![
            "build".to_string(),
            "--configuration".to_string(),
            "development".to_string(),
        ];
        args.extend(extra.iter().cloned());
        Self {
            program: program.to_path_buf(),
            args,
        }
    }

    /// Program name for error messages.
    pub fn program_name(&self) -> String {
        self.program.display().to_string()
    }
}

/// Locate the Angular CLI binary.
///
/// A project-local install at `node_modules/.bin/ng` wins; otherwise the
/// bare name is returned and PATH resolution is left to the OS. Never
/// fails — a missing binary surfaces later as a spawn error.
pub fn resolve_bin(cwd: &Path) -> PathBuf {
    let local = cwd.join("node_modules").join(".bin").join(LOCAL_BIN);
    if local.exists() {
        return local;
    }

    if which::which("ng").is_err() {
        tracing::warn!("`ng` not found in node_modules/.bin or on PATH; the launch will fail");
    }

    PathBuf::from("ng")
}

/// True when the diagnostic output says the serve failed because this
/// environment forbids opening a listening socket.
///
/// Anything else (compile errors, missing deps) must not match — the
/// fallback trades live reload for a plain build, which only makes sense
/// when serving is impossible.
pub fn is_sandbox_denied(output: &str) -> bool {
    output.contains(EPERM_PATTERN) || output.contains(EACCES_PATTERN)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serve_command_prepends_hmr_flag() {
        let extra = vec!["--port".to_string(), "4300".to_string()];
        let cmd = NgCommand::serve(Path::new("ng"), &extra);
        assert_eq!(cmd.args, ["serve", "--hmr", "--port", "4300"]);
    }

    #[test]
    fn build_command_uses_development_configuration() {
        let cmd = NgCommand::build(Path::new("ng"), &[]);
        assert_eq!(cmd.args, ["build", "--configuration", "development"]);
    }

    #[test]
    fn passthrough_args_are_appended_verbatim() {
        let extra = vec!["--open".to_string()];
        let cmd = NgCommand::build(Path::new("ng"), &extra);
        assert_eq!(cmd.args.last().map(String::as_str), Some("--open"));
    }

    #[test]
    fn resolver_prefers_local_install() {
        let dir = tempfile::tempdir().unwrap();
        let bin_dir = dir.path().join("node_modules").join(".bin");
        std::fs::create_dir_all(&bin_dir).unwrap();
        std::fs::write(bin_dir.join(LOCAL_BIN), "#!/bin/sh\n").unwrap();

        let resolved = resolve_bin(dir.path());
        assert_eq!(resolved, bin_dir.join(LOCAL_BIN));
    }

    #[test]
    fn resolver_falls_back_to_bare_name() {
        let dir = tempfile::tempdir().unwrap();
        let resolved = resolve_bin(dir.path());
        assert_eq!(resolved, PathBuf::from("ng"));
    }

    #[test]
    fn eperm_listen_error_is_sandbox_denial() {
        let log = "Error: listen EPERM: operation not permitted 127.0.0.1:4200";
        assert!(is_sandbox_denied(log));
    }

    #[test]
    fn eacces_error_is_sandbox_denial() {
        assert!(is_sandbox_denied("Error: EACCES: permission denied"));
    }

    #[test]
    fn compile_errors_do_not_trigger_fallback() {
        assert!(!is_sandbox_denied(
            "Error: src/app/app.ts:3:1 - Unexpected token"
        ));
        assert!(!is_sandbox_denied(""));
    }
}
