//! Advertises the chat server on the local network as `<name>.local`,
//! so phones on the same WiFi reach it without typing an IP.

use tracing::info;

use palaver_discovery::{advertise, local_ip};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "palaver_mdns=info,mdns_sd=warn".into()),
        )
        .init();

    let name = std::env::var("PALAVER_MDNS_NAME").unwrap_or_else(|_| "palaver".into());
    let port: u16 = std::env::var("PALAVER_PORT")
        .unwrap_or_else(|_| "5000".into())
        .parse()?;

    let ip = local_ip();
    let advertisement = advertise(&name, ip, port)?;

    info!("chat reachable at http://{name}.local:{port} and http://{ip}:{port}");
    info!("press Ctrl-C to stop advertising");

    tokio::signal::ctrl_c().await?;

    info!("unregistering {name}.local");
    advertisement.shutdown()?;

    Ok(())
}
