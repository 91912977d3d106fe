// src/exec/command.rs

use std::process::Stdio;

use anyhow::{Context, Result};
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::exec::BuildOutcome;

/// Run `command` through the platform shell and wait for it.
///
/// stdout and stderr are read concurrently and appended to one buffer in the
/// order chunks arrive. stdin is `/dev/null`, so the child never competes
/// with the stdin trigger loop for input.
pub async fn run_shell(command: &str) -> Result<BuildOutcome> {
    info!(cmd = %command, "starting build process");

    let mut cmd = shell_command(command);
    cmd.stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let mut child = cmd
        .spawn()
        .with_context(|| format!("spawning shell for command '{command}'"))?;

    let (chunk_tx, mut chunk_rx) = mpsc::unbounded_channel::<Vec<u8>>();
    if let Some(stdout) = child.stdout.take() {
        tokio::spawn(forward_chunks(stdout, chunk_tx.clone()));
    }
    if let Some(stderr) = child.stderr.take() {
        tokio::spawn(forward_chunks(stderr, chunk_tx.clone()));
    }
    drop(chunk_tx);

    let collect = async {
        let mut output = Vec::new();
        while let Some(chunk) = chunk_rx.recv().await {
            output.extend_from_slice(&chunk);
        }
        output
    };

    let (status, output) = tokio::join!(child.wait(), collect);
    let status =
        status.with_context(|| format!("waiting for shell running command '{command}'"))?;

    let code = status.code();
    info!(
        exit_code = ?code,
        success = status.success(),
        output_bytes = output.len(),
        "build process exited"
    );

    Ok(if status.success() {
        BuildOutcome::succeeded(output)
    } else {
        BuildOutcome::failed(code, output)
    })
}

/// Build a shell command appropriate for the platform.
fn shell_command(command: &str) -> Command {
    if cfg!(windows) {
        let mut c = Command::new("cmd");
        c.arg("/C").arg(command);
        c
    } else {
        let mut c = Command::new("sh");
        c.arg("-c").arg(command);
        c
    }
}

async fn forward_chunks<R>(mut reader: R, tx: mpsc::UnboundedSender<Vec<u8>>)
where
    R: AsyncRead + Unpin,
{
    let mut buf = [0u8; 8192];
    loop {
        match reader.read(&mut buf).await {
            Ok(0) => break,
            Ok(n) => {
                if tx.send(buf[..n].to_vec()).is_err() {
                    break;
                }
            }
            Err(err) => {
                debug!(error = %err, "reading build output failed");
                break;
            }
        }
    }
}
