//! Helpers that make the chat server reachable on a LAN without typing an
//! IP address: local-address detection, mDNS advertisement, QR rendering.

pub mod mdns;
pub mod net;
pub mod qr;

pub use mdns::{Advertisement, advertise};
pub use net::local_ip;
pub use qr::qr_png_data_uri;
