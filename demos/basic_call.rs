//! Basic example demonstrating configured services and plain client calls.
//!
//! This example shows how to:
//! - Configure an engine with a host, a transport and an API key
//! - Fetch tenants through the tenant service
//! - Handle a result through callbacks instead of the return value
//!
//! Set `BSH_HOST` and `BSH_API_KEY`, then run with:
//! `cargo run --example basic_call`

use bshengine::auth::StaticAuth;
use bshengine::config::ServiceConfig;
use bshengine::services::{ListParams, Tenant};
use bshengine::transport::ReqwestTransport;
use bshengine::{BshEngine, CallOptions, Envelope, Error, RequestOptions};
use serde_json::Value;
use std::time::Duration;

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter("bshengine=debug,basic_call=info")
        .init();

    let host = std::env::var("BSH_HOST").unwrap_or_else(|_| "http://localhost:3000".to_string());
    let api_key = std::env::var("BSH_API_KEY").unwrap_or_default();

    let transport = ReqwestTransport::builder()
        .timeout(Duration::from_secs(10))
        .build()?;
    let engine = BshEngine::new(
        ServiceConfig::new()
            .host(host)
            .transport(transport)
            .auth(StaticAuth::api_key(api_key)),
    )?;

    println!("=== Listing tenants ===");
    let page = engine
        .tenants()?
        .list::<Tenant>(
            ListParams {
                page: Some(1),
                size: Some(5),
                ..ListParams::default()
            },
            CallOptions::new(),
        )
        .await?;
    if let Some(envelope) = page {
        for tenant in &envelope.data {
            println!("- {} ({})", tenant.name, tenant.object.persistence_id);
        }
        if let Some(pagination) = envelope.pagination {
            println!("page {} of {}", pagination.current, pagination.pages);
        }
    }

    println!("\n=== Engine version via callbacks ===");
    engine
        .utils()?
        .version::<Value>(
            CallOptions::new()
                .on_success(|envelope: Envelope| println!("version: {:?}", envelope.first()))
                .on_error(|e| eprintln!("version lookup failed: {}", e)),
        )
        .await?;

    println!("\n=== Raw client call ===");
    match engine
        .client()?
        .get::<Value>("/api/tenants/unknown", RequestOptions::new(), CallOptions::new())
        .await
    {
        Ok(envelope) => println!("found: {:?}", envelope),
        Err(Error::Http {
            status, response, ..
        }) => {
            println!("HTTP {}", status);
            if let Some(response) = response {
                println!("  server said: {}", response.error);
            }
        }
        Err(e) if e.is_transport_exception() => println!("transport failed: {}", e),
        Err(e) => return Err(e),
    }

    Ok(())
}
