/// Remote path watcher workflow
///
/// Watches for an HDFS path to appear on a remote host: the sensor lists
/// the path over ssh, and once the listing succeeds the workflow rings the
/// terminal bell.

use crate::ops;
use crate::workflow::error::GraphError;
use crate::workflow::types::{Edge, Workflow};
use serde_json::json;

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Build the `WatchRemotePath` definition from `FLOWLINE_WATCH_*` env vars.
pub fn workflow() -> Result<Workflow, GraphError> {
    let ssh_dest_server = env_or("FLOWLINE_WATCH_SSH_DEST_SERVER", "binks1");
    let hdfs_path = env_or(
        "FLOWLINE_WATCH_HDFS_PATH",
        "/bigdatahdfs/datalake/publish/rwds/Membership",
    );

    let edges = vec![Edge::new(ops::terminal_bell(), &[], &["bell_status"])?];

    let path_exists = ops::shell_probe(&format!("ssh {ssh_dest_server} hdfs dfs -ls {hdfs_path}"));

    Workflow::new(
        "WatchRemotePath",
        edges,
        Some(path_exists),
        json!({
            "ssh_dest_server": ssh_dest_server,
            "hdfs_path": hdfs_path,
        }),
    )
}
