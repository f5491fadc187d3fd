/// Reusable operation and sensor leaves
///
/// Shared building blocks for the built-in workflow catalog: shell
/// commands, the terminal bell, and the remote-state probes the sensors
/// are made of. Everything here is an ordinary opaque operation or sensor
/// to the engine.

use crate::workflow::types::{sensor, Operation, Sensor};
use anyhow::Context;
use serde_json::json;
use tokio::process::Command;

/// Operation running a shell command, producing its exit code as the
/// single output value.
pub fn shell_command(name: &str, command: &str) -> Operation {
    let command = command.to_string();
    Operation::single(name, 0, move |_args| {
        let command = command.clone();
        async move {
            tracing::debug!(%command, "running shell command");
            let status = Command::new("sh")
                .arg("-c")
                .arg(&command)
                .status()
                .await
                .with_context(|| format!("failed to spawn '{command}'"))?;
            tracing::debug!(%command, code = ?status.code(), "shell command finished");
            Ok(json!(status.code()))
        }
    })
}

/// Operation ringing the terminal bell.
pub fn terminal_bell() -> Operation {
    shell_command("terminal_bell", "tput bel")
}

/// Sensor firing when `command` exits successfully.
pub fn shell_probe(command: &str) -> Sensor {
    let command = command.to_string();
    sensor(move || {
        let command = command.clone();
        async move {
            let status = Command::new("sh")
                .arg("-c")
                .arg(&command)
                .status()
                .await
                .with_context(|| format!("failed to spawn probe '{command}'"))?;
            Ok(status.success())
        }
    })
}

/// Sensor firing when `url` is NOT reachable through the SOCKS5 proxy at
/// `socks5_hostname`, the signal that the tunnel behind the proxy needs
/// to be restored.
pub fn proxy_down(socks5_hostname: &str, url: &str) -> Sensor {
    let proxy = format!("socks5h://{socks5_hostname}");
    let url = url.to_string();
    sensor(move || {
        let proxy = proxy.clone();
        let url = url.clone();
        async move {
            let client = reqwest::Client::builder()
                .proxy(reqwest::Proxy::all(&proxy)?)
                .build()?;
            match client.get(&url).send().await {
                Ok(_) => Ok(false),
                Err(err) => {
                    tracing::debug!(%url, error = %err, "probe through proxy failed");
                    Ok(true)
                }
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn shell_command_reports_exit_code() {
        let op = shell_command("exit_three", "exit 3");
        let values = op.call(Vec::new()).await.unwrap();
        assert_eq!(values, vec![json!(3)]);
    }

    #[tokio::test]
    async fn shell_probe_follows_exit_status() {
        let up = shell_probe("true");
        let down = shell_probe("false");
        assert!((*up)().await.unwrap());
        assert!(!(*down)().await.unwrap());
    }
}
