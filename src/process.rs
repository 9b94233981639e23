//! Running external delegates with piped stdin.

use std::io;
use std::process::{Output, Stdio};

use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use crate::config::CommandSpec;

/// Runs `spec`, feeding `input` on stdin while collecting stdout and stderr.
///
/// Stdin is written concurrently with reading the output so a delegate that
/// streams results before consuming all input cannot deadlock. A failed write
/// is only reported when the process itself exited successfully; otherwise
/// the exit status and stderr carry the real cause. The child is killed if
/// the returned future is dropped.
pub(crate) async fn run_with_input(
    spec: &CommandSpec,
    envs: &[(&str, String)],
    input: Vec<u8>,
) -> io::Result<Output> {
    let mut child = Command::new(&spec.program)
        .args(&spec.args)
        .envs(envs.iter().map(|(key, value)| (*key, value.as_str())))
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()?;

    let mut stdin = child
        .stdin
        .take()
        .ok_or_else(|| io::Error::other("child has no stdin"))?;
    let feed = async move {
        let written = stdin.write_all(&input).await;
        drop(stdin);
        written
    };

    let (written, output) = tokio::join!(feed, child.wait_with_output());
    let output = output?;
    if output.status.success() {
        written?;
    }
    Ok(output)
}
