//! # Print Status Demo
//!
//! Runs a status blob through [`PonyTownClient`] using an in-process transport
//! and prints the decoded server list. Pass a base64 blob captured from the
//! status endpoint to decode it instead of the built-in sample, and
//! `--legacy` to decode it with the legacy revision's masks.
//!
//! ## Running
//!
//! ```sh
//! cargo run --example print_status
//! cargo run --example print_status -- --legacy lgAC...
//! ```

use async_trait::async_trait;
use ponytown_client::{
    ClientConfig, HttpRequest, HttpResponse, PonyTownClient, PonyTownError, ProtocolScope,
    Transport,
};

/// Two servers, an event and a dismissible message, current revision.
const SAMPLE_BODY: &str = "lgACBG1haW7RC8IDaGkhBHNhZmXWssMDbm1tA2JyYgDxU2U=";

// ─────────────────────────────────────────────────────────────────────
// Step 1: A transport that always answers with the same body
// ─────────────────────────────────────────────────────────────────────

struct CannedTransport {
    body: String,
}

#[async_trait]
impl Transport for CannedTransport {
    async fn get(&self, request: HttpRequest) -> Result<HttpResponse, PonyTownError> {
        tracing::info!("GET {}", request.url);
        Ok(HttpResponse::new(200, self.body.clone()))
    }
}

// ─────────────────────────────────────────────────────────────────────
// Step 2: Decode through the client and print
// ─────────────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let mut scope = ProtocolScope::current();
    let mut body = SAMPLE_BODY.to_string();
    for arg in std::env::args().skip(1) {
        if arg == "--legacy" {
            scope = ProtocolScope::legacy();
        } else {
            body = arg;
        }
    }

    let config = ClientConfig::new().with_scope(scope);
    let client = PonyTownClient::new(CannedTransport { body }, config);
    let status = client.status().await?;

    println!("{status}");
    println!("total online: {}", status.total_online());
    if let Some(info) = &status.info_message_dismissible {
        println!("notice: {} (at {})", info.message, info.time_epoch_seconds);
    }
    println!("{}", serde_json::to_string_pretty(&status)?);
    Ok(())
}
