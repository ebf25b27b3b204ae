use std::io;
use std::net::{IpAddr, Ipv4Addr, UdpSocket};

use tracing::warn;

/// Best-effort LAN address of this machine.
///
/// Connecting a UDP socket to a public address sends no packets but makes
/// the OS pick the outbound interface; its address is what peers on the
/// same network can reach. Falls back to loopback when there is no route.
pub fn local_ip() -> IpAddr {
    match probe() {
        Ok(ip) => ip,
        Err(e) => {
            warn!("could not detect LAN address ({e}), falling back to loopback");
            IpAddr::V4(Ipv4Addr::LOCALHOST)
        }
    }
}

fn probe() -> io::Result<IpAddr> {
    let socket = UdpSocket::bind("0.0.0.0:0")?;
    socket.connect("8.8.8.8:80")?;
    Ok(socket.local_addr()?.ip())
}

#[cfg(test)]
mod tests {
    use super::local_ip;

    #[test]
    fn local_ip_never_panics_and_is_ipv4_or_loopback() {
        // On machines with no route this returns 127.0.0.1; either way it
        // must produce something usable in a URL.
        let ip = local_ip();
        assert!(!ip.to_string().is_empty());
    }
}
