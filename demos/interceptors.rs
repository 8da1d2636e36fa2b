//! Example demonstrating the interceptor chains and per-call bypass.
//!
//! Runs against an in-process transport so it needs no server:
//! `cargo run --example interceptors`

use bshengine::auth::StaticAuth;
use bshengine::config::ServiceConfig;
use bshengine::transport::TransportResponse;
use bshengine::{
    BshEngine, CallOptions, Envelope, Error, RequestDescriptor, RequestOptions,
};
use http::StatusCode;
use serde_json::{json, Value};

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter("bshengine=trace,interceptors=info")
        .init();

    let engine = BshEngine::new(
        ServiceConfig::new()
            .host("http://localhost:3000")
            .auth(StaticAuth::jwt("demo-token"))
            .transport(|request: RequestDescriptor| async move {
                let body = if request.path.ends_with("/missing") {
                    (
                        StatusCode::NOT_FOUND,
                        json!({"data": [], "code": 404, "status": "Not Found", "error": "no such thing"}),
                    )
                } else {
                    (
                        StatusCode::OK,
                        json!({"data": [{"path": request.path}], "code": 200, "status": "OK", "error": ""}),
                    )
                };
                TransportResponse::json_body(body.0, &body.1)
            }),
    )?;

    engine
        .pre_interceptor(|mut request: RequestDescriptor| async move {
            request
                .options
                .headers
                .insert("X-Request-Source".into(), "demo".into());
            println!("-> {} {}", request.method(), request.path);
            Ok(request)
        })
        .post_interceptor(|envelope: Envelope<Value>| async move {
            println!("<- {} {}", envelope.code, envelope.status);
            Ok(envelope)
        })
        .error_interceptor(|error: Error| async move {
            println!("!! {}", error);
            Ok(error)
        });

    let client = engine.client()?;

    println!("=== Through every chain ===");
    client
        .get::<Value>("/api/things", RequestOptions::new(), CallOptions::new())
        .await?;

    println!("\n=== Pre chain bypassed ===");
    client
        .get::<Value>(
            "/api/things",
            RequestOptions::new(),
            CallOptions::new().bypass_pre(),
        )
        .await?;

    println!("\n=== Error chain then on_error ===");
    client
        .get::<Value>(
            "/api/missing",
            RequestOptions::new(),
            CallOptions::new().on_error(|e| println!("handled: {:?}", e.response().map(|r| &r.error))),
        )
        .await?;

    Ok(())
}
