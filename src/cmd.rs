//! Child-process plumbing for the wrapper.
//!
//! Children run with inherited stdio — the whole point is full passthrough
//! of the Angular CLI's output. Spawn errors name the binary so "No such
//! file or directory" always says *which* file was missing.

use anyhow::Context;
use std::process::Stdio;
use tokio::process::Command;

use crate::ng::NgCommand;

/// Spawn `cmd` with inherited stdio and wait for it.
///
/// Returns the child's exit code, or 1 when it was killed by a signal and
/// no code exists. A spawn failure (binary missing, not executable) is an
/// `Err` whose message names the program.
pub async fn wait_inherited(cmd: &NgCommand) -> anyhow::Result<i32> {
    let prog = cmd.program_name();

    let mut child = Command::new(&cmd.program)
        .args(&cmd.args)
        .stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .spawn()
        .map_err(|e| anyhow::anyhow!("failed to execute `{prog}`: {e}"))?;

    let status = child
        .wait()
        .await
        .with_context(|| format!("waiting for `{prog}`"))?;

    Ok(status.code().unwrap_or(1))
}

/// Terminal runner for the fallback path: run `cmd` to completion and
/// collapse every failure to an exit code. A spawn error is printed to
/// stderr and becomes code 1 — there is no further fallback.
pub async fn run_to_exit_code(cmd: &NgCommand) -> i32 {
    match wait_inherited(cmd).await {
        Ok(code) => code,
        Err(err) => {
            eprintln!("{err:#}");
            1
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn sh(script: &str) -> NgCommand {
        NgCommand {
            program: Path::new("sh").to_path_buf(),
            args: vec!["-c".to_string(), script.to_string()],
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn forwards_child_exit_code() {
        let code = wait_inherited(&sh("exit 5")).await.unwrap();
        assert_eq!(code, 5);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn success_is_code_zero() {
        let code = wait_inherited(&sh("exit 0")).await.unwrap();
        assert_eq!(code, 0);
    }

    #[tokio::test]
    async fn spawn_error_names_the_binary() {
        let cmd = NgCommand {
            program: Path::new("/definitely/not/a/real/binary").to_path_buf(),
            args: vec![],
        };
        let err = wait_inherited(&cmd).await.unwrap_err();
        assert!(err.to_string().contains("/definitely/not/a/real/binary"));
    }

    #[tokio::test]
    async fn run_to_exit_code_collapses_spawn_error_to_one() {
        let cmd = NgCommand {
            program: Path::new("/definitely/not/a/real/binary").to_path_buf(),
            args: vec![],
        };
        assert_eq!(run_to_exit_code(&cmd).await, 1);
    }
}
