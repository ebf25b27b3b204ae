//! QR landing page: phones scan a code instead of typing the server's IP.
//!
//! `/` shows the QR code, which encodes `/chat` on this gateway; `/chat`
//! probes the mDNS hostname from the phone's side and falls back to the
//! raw LAN IP when the name does not resolve.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::State;
use axum::response::Html;
use axum::{Router, routing::get};
use tracing::info;

use palaver_discovery::{local_ip, qr_png_data_uri};

struct GatewayState {
    /// `http://<name>.local:<chat_port>` — works when mDNS resolves
    domain_url: String,
    /// `http://<lan_ip>:<chat_port>` — always works on the same network
    ip_url: String,
    /// data-URI PNG encoding this gateway's /chat redirect page
    qr: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "palaver_gateway=info".into()),
        )
        .init();

    let name = std::env::var("PALAVER_MDNS_NAME").unwrap_or_else(|_| "palaver".into());
    let chat_port: u16 = std::env::var("PALAVER_PORT")
        .unwrap_or_else(|_| "5000".into())
        .parse()?;
    let gateway_port: u16 = std::env::var("PALAVER_GATEWAY_PORT")
        .unwrap_or_else(|_| "5001".into())
        .parse()?;

    let ip = local_ip();
    let state = Arc::new(GatewayState {
        domain_url: format!("http://{name}.local:{chat_port}"),
        ip_url: format!("http://{ip}:{chat_port}"),
        qr: qr_png_data_uri(&format!("http://{ip}:{gateway_port}/chat"))?,
    });

    let app = Router::new()
        .route("/", get(landing))
        .route("/chat", get(redirect_to_chat))
        .with_state(state);

    let addr: SocketAddr = format!("0.0.0.0:{gateway_port}").parse()?;
    info!("QR gateway listening on {addr} (chat at {ip}:{chat_port})");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn landing(State(state): State<Arc<GatewayState>>) -> Html<String> {
    Html(format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>Palaver — connect</title>
<style>
  body {{ font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, sans-serif;
          background: #f0f2f5; display: flex; justify-content: center; align-items: center;
          min-height: 100vh; margin: 0; }}
  .card {{ background: #fff; border-radius: 12px; padding: 32px; text-align: center;
           box-shadow: 0 4px 20px rgba(0,0,0,.12); max-width: 420px; }}
  img {{ width: 300px; height: 300px; image-rendering: pixelated; }}
  .url {{ background: #f0f2f5; padding: 10px; border-radius: 8px; word-break: break-all;
          margin: 16px 0; color: #4a69bd; font-weight: 600; }}
  a.go {{ display: inline-block; background: #4a69bd; color: #fff; padding: 12px 28px;
          border-radius: 8px; text-decoration: none; }}
  p.hint {{ color: #666; font-size: 14px; margin-top: 16px; }}
</style>
</head>
<body>
<div class="card">
  <h1>Palaver</h1>
  <p>Scan from your phone to join the chat</p>
  <img src="{qr}" alt="QR code">
  <div class="url">{ip_url}</div>
  <a class="go" href="{ip_url}">Open chat &rarr;</a>
  <p class="hint">Your phone must be on the same WiFi. The name
  <strong>{domain_url}</strong> also works where mDNS is supported.</p>
</div>
</body>
</html>"#,
        qr = state.qr,
        ip_url = state.ip_url,
        domain_url = state.domain_url,
    ))
}

/// Try the friendly hostname first; if the favicon probe fails or times
/// out, fall back to the raw IP.
async fn redirect_to_chat(State(state): State<Arc<GatewayState>>) -> Html<String> {
    Html(format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>Connecting&hellip;</title>
<style>body {{ font-family: sans-serif; text-align: center; padding: 40px; }}</style>
</head>
<body>
<h2>Connecting to chat&hellip;</h2>
<p>Trying <strong>{domain_url}</strong>, falling back to the IP address.</p>
<p><a href="{ip_url}">Click here if nothing happens</a></p>
<script>
(function() {{
  var domain = '{domain_url}';
  var ip = '{ip_url}';
  var img = new Image();
  img.onload = function() {{ window.location.href = domain; }};
  img.onerror = function() {{ window.location.href = ip; }};
  img.src = domain + '/favicon.ico?rnd=' + Math.random();
  setTimeout(function() {{ window.location.href = ip; }}, 2000);
}})();
</script>
</body>
</html>"#,
        domain_url = state.domain_url,
        ip_url = state.ip_url,
    ))
}
