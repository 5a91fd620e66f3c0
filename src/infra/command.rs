//! # Shell Command Module / Shell 命令模块
//!
//! Runs the shell-level side effects of a test body (creating files, invoking
//! the tool under test) and captures what they print.
//!
//! 运行测试体中的 shell 级副作用（创建文件、调用被测工具），并捕获其输出。

use std::collections::BTreeMap;
use std::path::Path;
use std::process::Stdio;
use tokio::io::AsyncReadExt;
use tracing::debug;

/// What a finished command left behind.
/// 命令结束后留下的内容。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Standard output with every trailing newline removed, as `$(...)` would.
    /// 去掉所有结尾换行符的标准输出，与 `$(...)` 的行为一致。
    pub stdout: String,
    pub stderr: String,
    /// Exit code; 128 + signal number when killed by a signal.
    /// 退出码；被信号终止时为 128 + 信号编号。
    pub status: i32,
}

/// Runs `script` through `sh -c` inside `workdir` and waits for it.
///
/// The child is killed if the returned future is dropped, which is how unit
/// timeouts and Ctrl-C reach running commands.
///
/// # Arguments
/// * `script` - The shell command line
/// * `workdir` - Working directory for the child
/// * `envs` - Extra environment variables for the child
///
/// # Returns
/// The captured output, or the I/O error that prevented the spawn.
pub async fn run_shell(
    script: &str,
    workdir: &Path,
    envs: &BTreeMap<String, String>,
) -> std::io::Result<CommandOutput> {
    let mut cmd = tokio::process::Command::new("sh");
    cmd.arg("-c")
        .arg(script)
        .current_dir(workdir)
        .envs(envs)
        .stdin(Stdio::null())
        .kill_on_drop(true);

    debug!(command = script, workdir = %workdir.display(), "spawning shell command");
    spawn_and_capture(cmd).await
}

/// Spawns a command and captures stdout and stderr separately.
/// Both streams are drained concurrently so neither pipe can fill up and stall
/// the child.
///
/// 派生一个命令并分别捕获 stdout 和 stderr。
/// 两个流被并发读取，因此任何一个管道都不会被写满而阻塞子进程。
pub async fn spawn_and_capture(
    mut cmd: tokio::process::Command,
) -> std::io::Result<CommandOutput> {
    let mut child = cmd
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()?;

    let mut stdout = child
        .stdout
        .take()
        .ok_or_else(|| std::io::Error::other("failed to capture stdout"))?;
    let mut stderr = child
        .stderr
        .take()
        .ok_or_else(|| std::io::Error::other("failed to capture stderr"))?;

    let mut out_buf = Vec::new();
    let mut err_buf = Vec::new();
    let (out_res, err_res) = tokio::join!(
        stdout.read_to_end(&mut out_buf),
        stderr.read_to_end(&mut err_buf)
    );
    out_res?;
    err_res?;

    let status = child.wait().await?;

    let mut stdout = String::from_utf8_lossy(&out_buf).into_owned();
    stdout.truncate(stdout.trim_end_matches('\n').len());

    Ok(CommandOutput {
        stdout,
        stderr: String::from_utf8_lossy(&err_buf).into_owned(),
        status: exit_code(status),
    })
}

#[cfg(unix)]
fn exit_code(status: std::process::ExitStatus) -> i32 {
    use std::os::unix::process::ExitStatusExt;
    status
        .code()
        .or_else(|| status.signal().map(|sig| 128 + sig))
        .unwrap_or(-1)
}

#[cfg(not(unix))]
fn exit_code(status: std::process::ExitStatus) -> i32 {
    status.code().unwrap_or(-1)
}
