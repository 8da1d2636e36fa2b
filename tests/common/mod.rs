//! A recording in-process transport for driving the pipeline in tests.

#![allow(dead_code)]

use async_trait::async_trait;
use bshengine::transport::{Transport, TransportResponse};
use bshengine::{Client, RequestDescriptor, Result};
use http::StatusCode;
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};

type Responder = Box<dyn Fn(&RequestDescriptor) -> Result<TransportResponse> + Send + Sync>;

pub struct MockTransport {
    requests: Mutex<Vec<RequestDescriptor>>,
    respond: Responder,
}

impl MockTransport {
    pub fn new(
        respond: impl Fn(&RequestDescriptor) -> Result<TransportResponse> + Send + Sync + 'static,
    ) -> Arc<Self> {
        Arc::new(Self {
            requests: Mutex::new(Vec::new()),
            respond: Box::new(respond),
        })
    }

    /// Always answers with `status` and a JSON `body`.
    pub fn json(status: u16, body: Value) -> Arc<Self> {
        let status = StatusCode::from_u16(status).unwrap();
        Self::new(move |_| TransportResponse::json_body(status, &body))
    }

    /// Always answers with a standard envelope for `status`.
    pub fn envelope(status: u16, status_text: &str, error: &str) -> Arc<Self> {
        Self::json(status, envelope(status, status_text, error))
    }

    pub fn requests(&self) -> Vec<RequestDescriptor> {
        self.requests.lock().unwrap().clone()
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn last(&self) -> RequestDescriptor {
        self.requests
            .lock()
            .unwrap()
            .last()
            .cloned()
            .expect("transport was not called")
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, request: RequestDescriptor) -> Result<TransportResponse> {
        let response = (self.respond)(&request);
        self.requests.lock().unwrap().push(request);
        response
    }
}

pub fn envelope(code: u16, status: &str, error: &str) -> Value {
    json!({"data": [], "code": code, "status": status, "error": error})
}

pub fn ok_envelope(data: Value) -> Value {
    json!({"data": data, "code": 200, "status": "OK", "error": ""})
}

pub fn client(transport: &Arc<MockTransport>) -> Client {
    Client::builder()
        .host("http://h")
        .shared_transport(transport.clone())
        .build()
        .unwrap()
}
