/// SSH tunnel keeper workflow
///
/// Keeps a SOCKS5 tunnel alive: the sensor probes a URL through the local
/// proxy, and when the probe fails the workflow re-establishes the tunnel
/// and rings the terminal bell so an operator nearby notices.

use crate::ops;
use crate::workflow::error::GraphError;
use crate::workflow::types::{Edge, Workflow};
use serde_json::json;

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Build the `EnsureSshTunnel` definition from `FLOWLINE_TUNNEL_*` env vars.
pub fn workflow() -> Result<Workflow, GraphError> {
    let socks5_hostname = env_or("FLOWLINE_TUNNEL_SOCKS5_HOSTNAME", "127.0.0.1:8888");
    let ssh_dest_server = env_or("FLOWLINE_TUNNEL_SSH_DEST_SERVER", "mail");
    let probe_url = env_or("FLOWLINE_TUNNEL_PROBE_URL", "https://example.com");

    let trigger_tunnel = ops::shell_command(
        "trigger_ssh_tunnel",
        &format!("ssh -fNTD {socks5_hostname} {ssh_dest_server}"),
    );

    let edges = vec![
        Edge::new(trigger_tunnel, &[], &["tunnel_status"])?,
        Edge::new(ops::terminal_bell(), &[], &["bell_status"])?,
    ];

    let tunnel_down = ops::proxy_down(&socks5_hostname, &probe_url);

    Workflow::new(
        "EnsureSshTunnel",
        edges,
        Some(tunnel_down),
        json!({
            "socks5_hostname": socks5_hostname,
            "ssh_dest_server": ssh_dest_server,
            "probe_url": probe_url,
        }),
    )
}
