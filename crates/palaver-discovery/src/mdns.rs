use std::net::IpAddr;

use anyhow::Result;
use mdns_sd::{ServiceDaemon, ServiceInfo};
use tracing::info;

pub const SERVICE_TYPE: &str = "_http._tcp.local.";

/// A live mDNS registration. Dropping it without calling
/// [`Advertisement::shutdown`] leaves deregistration to the daemon's
/// goodbye packets on process exit.
pub struct Advertisement {
    daemon: ServiceDaemon,
    fullname: String,
}

/// Advertise the chat service as `<instance>.local` pointing at `ip:port`.
pub fn advertise(instance: &str, ip: IpAddr, port: u16) -> Result<Advertisement> {
    let daemon = ServiceDaemon::new()?;

    let hostname = format!("{instance}.local.");
    let service = ServiceInfo::new(
        SERVICE_TYPE,
        instance,
        &hostname,
        ip,
        port,
        &[("path", "/")][..],
    )?;
    let fullname = service.get_fullname().to_string();

    daemon.register(service)?;
    info!("advertising {fullname} -> {ip}:{port}");

    Ok(Advertisement { daemon, fullname })
}

impl Advertisement {
    /// Unregister the service and stop the daemon.
    pub fn shutdown(self) -> Result<()> {
        self.daemon.unregister(&self.fullname)?.recv()?;
        let _ = self.daemon.shutdown()?;
        Ok(())
    }
}
