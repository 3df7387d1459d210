// Helper functions for subprocess backends

use std::process::Stdio;
use tokio::io::AsyncReadExt;
use tokio::process::Command as TokioCommand;
use tokio::time::{timeout, Duration};

/// Run a command to completion, capturing stdout and stderr.
///
/// With `timeout_secs` set the child is killed once the limit passes; with
/// `None` the call blocks until the process exits on its own.
pub async fn run_output(
    program: &str,
    args: Vec<String>,
    timeout_secs: Option<u64>,
) -> Result<std::process::Output, String> {
    let mut child = TokioCommand::new(program)
        .args(&args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(|e| format!("Failed to start {}: {}", program, e))?;

    let mut stdout_pipe = child
        .stdout
        .take()
        .ok_or_else(|| format!("Failed to capture stdout from {}", program))?;
    let mut stderr_pipe = child
        .stderr
        .take()
        .ok_or_else(|| format!("Failed to capture stderr from {}", program))?;

    let stdout_task = tokio::spawn(async move {
        let mut buf = Vec::new();
        stdout_pipe
            .read_to_end(&mut buf)
            .await
            .map_err(|e| format!("Failed to read stdout: {}", e))?;
        Ok::<Vec<u8>, String>(buf)
    });
    let stderr_task = tokio::spawn(async move {
        let mut buf = Vec::new();
        stderr_pipe
            .read_to_end(&mut buf)
            .await
            .map_err(|e| format!("Failed to read stderr: {}", e))?;
        Ok::<Vec<u8>, String>(buf)
    });

    let status = match timeout_secs {
        Some(secs) => match timeout(Duration::from_secs(secs), child.wait()).await {
            Ok(status_res) => status_res,
            Err(_) => {
                let _ = child.kill().await;
                stdout_task.abort();
                stderr_task.abort();
                return Err(format!("Timed out after {}s", secs));
            }
        },
        None => child.wait().await,
    }
    .map_err(|e| format!("Failed to wait for {}: {}", program, e))?;

    let stdout = stdout_task
        .await
        .map_err(|e| format!("stdout task failed: {}", e))??;
    let stderr = stderr_task
        .await
        .map_err(|e| format!("stderr task failed: {}", e))??;

    Ok(std::process::Output {
        status,
        stdout,
        stderr,
    })
}

/// Last non-empty stderr line, for compact log output
pub fn last_line(stderr: &[u8]) -> String {
    String::from_utf8_lossy(stderr)
        .lines()
        .rev()
        .find(|l| !l.trim().is_empty())
        .unwrap_or("")
        .trim()
        .to_string()
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_run_output_captures_streams() {
        let out = run_output(
            "sh",
            vec!["-c".to_string(), "echo out; echo err >&2; exit 3".to_string()],
            None,
        )
        .await
        .unwrap();

        assert_eq!(out.status.code(), Some(3));
        assert_eq!(String::from_utf8_lossy(&out.stdout).trim(), "out");
        assert_eq!(last_line(&out.stderr), "err");
    }

    #[tokio::test]
    async fn test_run_output_timeout() {
        let res = run_output("sh", vec!["-c".to_string(), "sleep 5".to_string()], Some(1)).await;
        assert_eq!(res.unwrap_err(), "Timed out after 1s");
    }

    #[tokio::test]
    async fn test_run_output_missing_program() {
        let res = run_output("definitely-not-a-real-binary-xyz", Vec::new(), None).await;
        assert!(res.unwrap_err().starts_with("Failed to start"));
    }
}
