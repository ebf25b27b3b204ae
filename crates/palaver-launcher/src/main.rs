//! Starts the whole stack — mDNS advertiser, chat server, QR gateway — as
//! sibling processes and tears the rest down when any of them stops.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::process::{Child, Command};
use tracing::{info, warn};

use palaver_discovery::local_ip;

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "palaver_launcher=info".into()),
        )
        .init();

    let name = std::env::var("PALAVER_MDNS_NAME").unwrap_or_else(|_| "palaver".into());
    let port = std::env::var("PALAVER_PORT").unwrap_or_else(|_| "5000".into());
    let gateway_port = std::env::var("PALAVER_GATEWAY_PORT").unwrap_or_else(|_| "5001".into());

    let ip = local_ip();
    info!("LAN address: {ip}");
    info!("chat:       http://{name}.local:{port}  /  http://{ip}:{port}");
    info!("QR gateway: http://{ip}:{gateway_port}");

    info!("starting mDNS advertiser ({name}.local)");
    let mut mdns = spawn_sibling("palaver-mdns")?;
    tokio::time::sleep(Duration::from_secs(1)).await;

    info!("starting chat server on port {port}");
    let mut server = spawn_sibling("palaver")?;
    tokio::time::sleep(Duration::from_secs(1)).await;

    info!("starting QR gateway on port {gateway_port}");
    let mut gateway = spawn_sibling("palaver-gateway")?;

    info!("everything is up; Ctrl-C stops all three");

    tokio::select! {
        _ = tokio::signal::ctrl_c() => info!("interrupted, stopping children"),
        status = server.wait() => warn!("chat server exited ({status:?}), stopping the rest"),
        status = mdns.wait() => warn!("mDNS advertiser exited ({status:?}), stopping the rest"),
        status = gateway.wait() => warn!("QR gateway exited ({status:?}), stopping the rest"),
    }

    for child in [&mut server, &mut mdns, &mut gateway] {
        // already-dead children make start_kill fail; nothing to do then
        let _ = child.start_kill();
    }
    for child in [&mut server, &mut mdns, &mut gateway] {
        let _ = child.wait().await;
    }

    Ok(())
}

/// Spawn a binary that lives next to this executable.
fn spawn_sibling(name: &str) -> Result<Child> {
    let path = sibling_path(name)?;
    Command::new(&path)
        .kill_on_drop(true)
        .spawn()
        .with_context(|| format!("failed to start {}", path.display()))
}

fn sibling_path(name: &str) -> Result<PathBuf> {
    let mut path = std::env::current_exe().context("cannot locate own executable")?;
    path.pop();
    path.push(name);
    Ok(path)
}
