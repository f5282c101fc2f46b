//! gRPC-web style unary framing over HTTP.
//!
//! Each message travels in a frame: one flag byte (`0x00` data, `0x80`
//! trailers), a big-endian `u32` length, then the payload. The response body
//! holds a data frame followed by a trailer frame carrying `grpc-status`.
//! Servers may also answer trailers-only, with `grpc-status` in the headers.

use std::sync::Arc;
use std::time::Duration;

use futures::FutureExt;
use futures::future::BoxFuture;

use super::{Channel, Transport};
use crate::error::TransportError;
use crate::schema::RpcMethod;
use crate::types::Endpoint;

const FLAG_DATA: u8 = 0x00;
const FLAG_TRAILER: u8 = 0x80;
const FRAME_HEADER_LEN: usize = 5;
const CONTENT_TYPE: &str = "application/grpc-web+proto";

/// Default transport: HTTP/1.1 POST per call, one shared connection pool.
#[derive(Clone, Debug)]
pub struct GrpcWebTransport {
    client: reqwest::Client,
}

impl GrpcWebTransport {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    /// Use a preconfigured `reqwest` client (proxies, TLS roots).
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl Default for GrpcWebTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for GrpcWebTransport {
    fn connect(&self, endpoint: &Endpoint) -> Result<Arc<dyn Channel>, TransportError> {
        Ok(Arc::new(GrpcWebChannel {
            client: self.client.clone(),
            base_url: endpoint.base_url(),
            address: endpoint.to_string(),
        }))
    }
}

#[derive(Debug)]
struct GrpcWebChannel {
    client: reqwest::Client,
    base_url: String,
    address: String,
}

impl GrpcWebChannel {
    async fn call(
        &self,
        method: RpcMethod,
        request: Vec<u8>,
        deadline: Duration,
    ) -> Result<Vec<u8>, TransportError> {
        let url = format!("{}{}", self.base_url, method.path());
        let response = self
            .client
            .post(&url)
            .header("Content-Type", CONTENT_TYPE)
            .header("X-Grpc-Web", "1")
            .header("grpc-timeout", format!("{}m", deadline.as_millis()))
            .timeout(deadline)
            .body(encode_frame(FLAG_DATA, &request))
            .send()
            .await
            .map_err(|e| self.request_error(e, deadline))?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Request {
                address: self.address.clone(),
                message: format!("HTTP {}", status),
            });
        }

        // Trailers-only response
        if let Some(code) = response
            .headers()
            .get("grpc-status")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<u32>().ok())
            && code != 0
        {
            let message = response
                .headers()
                .get("grpc-message")
                .and_then(|v| v.to_str().ok())
                .unwrap_or_default()
                .to_string();
            return Err(TransportError::GrpcStatus {
                address: self.address.clone(),
                code,
                message,
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| self.request_error(e, deadline))?;
        decode_body(&self.address, &body)
    }

    fn request_error(&self, err: reqwest::Error, deadline: Duration) -> TransportError {
        if err.is_timeout() {
            TransportError::DeadlineExceeded {
                address: self.address.clone(),
                deadline,
            }
        } else if err.is_connect() {
            TransportError::Connect {
                address: self.address.clone(),
                message: err.to_string(),
            }
        } else {
            TransportError::Request {
                address: self.address.clone(),
                message: err.to_string(),
            }
        }
    }
}

impl Channel for GrpcWebChannel {
    fn unary(
        &self,
        method: RpcMethod,
        request: Vec<u8>,
        deadline: Duration,
    ) -> BoxFuture<'_, Result<Vec<u8>, TransportError>> {
        self.call(method, request, deadline).boxed()
    }
}

fn encode_frame(flag: u8, payload: &[u8]) -> Vec<u8> {
    let mut frame = Vec::with_capacity(FRAME_HEADER_LEN + payload.len());
    frame.push(flag);
    frame.extend_from_slice(&(payload.len() as u32).to_be_bytes());
    frame.extend_from_slice(payload);
    frame
}

/// Split a response body into its message and trailer frames.
fn decode_body(address: &str, mut body: &[u8]) -> Result<Vec<u8>, TransportError> {
    let frame_error = |message: &str| TransportError::Frame {
        address: address.to_string(),
        message: message.to_string(),
    };

    let mut message = None;
    let mut status = None;

    while !body.is_empty() {
        if body.len() < FRAME_HEADER_LEN {
            return Err(frame_error("truncated frame header"));
        }
        let flag = body[0];
        let len = u32::from_be_bytes([body[1], body[2], body[3], body[4]]) as usize;
        let rest = &body[FRAME_HEADER_LEN..];
        if rest.len() < len {
            return Err(frame_error("truncated frame payload"));
        }
        let (payload, remaining) = rest.split_at(len);

        if flag & FLAG_TRAILER != 0 {
            status = Some(parse_trailers(payload));
        } else if message.is_none() {
            message = Some(payload.to_vec());
        } else {
            return Err(frame_error("more than one message in a unary response"));
        }
        body = remaining;
    }

    if let Some((code, text)) = status
        && code != 0
    {
        return Err(TransportError::GrpcStatus {
            address: address.to_string(),
            code,
            message: text,
        });
    }

    message.ok_or_else(|| frame_error("response carried no message"))
}

/// Parse `grpc-status` and `grpc-message` out of a trailer block.
fn parse_trailers(payload: &[u8]) -> (u32, String) {
    let text = String::from_utf8_lossy(payload);
    let mut code = 0;
    let mut message = String::new();
    for line in text.split("\r\n") {
        let Some((name, value)) = line.split_once(':') else {
            continue;
        };
        match name.trim().to_ascii_lowercase().as_str() {
            "grpc-status" => code = value.trim().parse().unwrap_or(2),
            "grpc-message" => message = value.trim().to_string(),
            _ => {}
        }
    }
    (code, message)
}
