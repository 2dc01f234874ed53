// SSH command channel (system ssh client)
// reason: tokio::process for async child management, no ssh library in the stack
use async_trait::async_trait;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::{debug, info, warn};

use rebound_core::domain::Credential;
use rebound_core::port::command_channel::{ChannelError, CommandChannel};

/// ssh exits with 255 when the connection itself failed or was dropped
const SSH_CONNECTION_EXIT_CODE: i32 = 255;

/// Default bound on a foreground command (log retrieval)
pub const DEFAULT_COMMAND_TIMEOUT: Duration = Duration::from_secs(60);

/// Default bound on a background (disruptive) command before giving up on it
pub const DEFAULT_BACKGROUND_TIMEOUT: Duration = Duration::from_secs(15);

/// Default ssh connect timeout (seconds)
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Remote command channel over the system `ssh` binary
///
/// Password credentials go through `sshpass -e` (password passed in the
/// `SSHPASS` environment variable, never on the command line). Credentials
/// without a password use key-based auth in batch mode.
pub struct SshCommandChannel {
    port: u16,
    connect_timeout_secs: u64,
    command_timeout: Duration,
    background_timeout: Duration,
    strict_host_key_checking: bool,
}

impl SshCommandChannel {
    /// Create a channel with default timeouts on `port`
    ///
    /// # Example
    /// ```ignore
    /// let channel = SshCommandChannel::new(22).with_command_timeout(Duration::from_secs(30));
    /// ```
    pub fn new(port: u16) -> Self {
        Self {
            port,
            connect_timeout_secs: DEFAULT_CONNECT_TIMEOUT_SECS,
            command_timeout: DEFAULT_COMMAND_TIMEOUT,
            background_timeout: DEFAULT_BACKGROUND_TIMEOUT,
            strict_host_key_checking: false,
        }
    }

    pub fn with_command_timeout(mut self, command_timeout: Duration) -> Self {
        self.command_timeout = command_timeout;
        self
    }

    pub fn with_connect_timeout(mut self, secs: u64) -> Self {
        self.connect_timeout_secs = secs;
        self
    }

    /// Lab devices are re-imaged often; host keys are not checked by default
    pub fn with_strict_host_key_checking(mut self, strict: bool) -> Self {
        self.strict_host_key_checking = strict;
        self
    }

    /// Build the argument list for `ssh` (without the program name)
    fn ssh_args(&self, address: &str, credential: &Credential, command: &str) -> Vec<String> {
        let mut args = vec![
            "-p".to_string(),
            self.port.to_string(),
            "-o".to_string(),
            format!("ConnectTimeout={}", self.connect_timeout_secs),
            "-o".to_string(),
            format!(
                "StrictHostKeyChecking={}",
                if self.strict_host_key_checking { "yes" } else { "no" }
            ),
        ];

        if credential.password.is_none() {
            args.push("-o".to_string());
            args.push("BatchMode=yes".to_string());
        } else {
            args.push("-o".to_string());
            args.push("PubkeyAuthentication=no".to_string());
        }

        args.push(format!("{}@{}", credential.username, address));
        args.push(command.to_string());
        args
    }

    fn build_command(&self, address: &str, credential: &Credential, command: &str) -> Command {
        let ssh_args = self.ssh_args(address, credential, command);

        let mut cmd = match &credential.password {
            Some(password) => {
                let mut cmd = Command::new("sshpass");
                cmd.arg("-e").arg("ssh").args(&ssh_args);
                cmd.env("SSHPASS", password);
                cmd
            }
            None => {
                let mut cmd = Command::new("ssh");
                cmd.args(&ssh_args);
                cmd
            }
        };

        cmd.stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        cmd
    }

    /// Spawn ssh and wait for output, mapping failures to channel errors
    async fn run(
        &self,
        address: &str,
        credential: &Credential,
        command: &str,
        limit: Duration,
    ) -> Result<String, ChannelError> {
        debug!(
            address = %address,
            user = %credential.username,
            command = %command,
            "Running remote command"
        );

        let child = self
            .build_command(address, credential, command)
            .spawn()
            .map_err(|e| ChannelError::Spawn(e.to_string()))?;

        let output = match timeout(limit, child.wait_with_output()).await {
            Ok(Ok(output)) => output,
            Ok(Err(e)) => return Err(ChannelError::Disconnected(e.to_string())),
            Err(_) => return Err(ChannelError::Timeout(limit.as_millis() as u64)),
        };

        map_output(output)
    }
}

impl Default for SshCommandChannel {
    fn default() -> Self {
        Self::new(22)
    }
}

/// Classify a finished ssh process
fn map_output(output: std::process::Output) -> Result<String, ChannelError> {
    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();

    if output.status.success() {
        return Ok(stdout);
    }

    match output.status.code() {
        Some(SSH_CONNECTION_EXIT_CODE) | None => Err(ChannelError::Disconnected(stderr)),
        exit_code => Err(ChannelError::CommandFailed { exit_code, stderr }),
    }
}

#[async_trait]
impl CommandChannel for SshCommandChannel {
    async fn run_background(
        &self,
        address: &str,
        credential: &Credential,
        command: &str,
    ) -> Result<String, ChannelError> {
        let result = self
            .run(address, credential, command, self.background_timeout)
            .await;

        match &result {
            Ok(_) => info!(address = %address, command = %command, "Background command started"),
            Err(e) => warn!(address = %address, error = %e, "Background command lost its channel"),
        }
        result
    }

    async fn run_foreground(
        &self,
        address: &str,
        credential: &Credential,
        command: &str,
    ) -> Result<String, ChannelError> {
        let output = self
            .run(address, credential, command, self.command_timeout)
            .await?;

        info!(
            address = %address,
            user = %credential.username,
            bytes = output.len(),
            "Remote command completed"
        );
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_for_key_based_auth() {
        let channel = SshCommandChannel::new(2222);
        let args = channel.ssh_args("10.0.0.1", &Credential::key_based("root"), "reboot &");

        assert_eq!(&args[0..2], &["-p".to_string(), "2222".to_string()]);
        assert!(args.contains(&"BatchMode=yes".to_string()));
        assert!(args.contains(&"StrictHostKeyChecking=no".to_string()));
        assert_eq!(args[args.len() - 2], "root@10.0.0.1");
        assert_eq!(args[args.len() - 1], "reboot &");
    }

    #[test]
    fn test_password_never_in_args() {
        let channel = SshCommandChannel::default().with_strict_host_key_checking(true);
        let args = channel.ssh_args(
            "10.0.0.1",
            &Credential::with_password("admin", "s3cret"),
            "show monitor logs devicelog all",
        );

        assert!(args.iter().all(|a| !a.contains("s3cret")));
        assert!(args.contains(&"PubkeyAuthentication=no".to_string()));
        assert!(args.contains(&"StrictHostKeyChecking=yes".to_string()));
        assert!(!args.contains(&"BatchMode=yes".to_string()));
    }

    #[cfg(unix)]
    #[test]
    fn test_exit_code_mapping() {
        use std::os::unix::process::ExitStatusExt;

        let output = |code: i32, stderr: &str| std::process::Output {
            status: std::process::ExitStatus::from_raw(code << 8),
            stdout: b"out".to_vec(),
            stderr: stderr.as_bytes().to_vec(),
        };

        assert_eq!(map_output(output(0, "")).unwrap(), "out");
        assert!(matches!(
            map_output(output(255, "Connection closed by remote host")),
            Err(ChannelError::Disconnected(_))
        ));
        assert_eq!(
            map_output(output(1, "no such command\n")),
            Err(ChannelError::CommandFailed {
                exit_code: Some(1),
                stderr: "no such command".to_string(),
            })
        );
    }
}
