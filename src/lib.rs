//! Typed Rust client for the SMS Gateway for Android 3rd-party HTTP API.
//!
//! The crate has three layers: a domain layer of wire DTOs with local validation, a
//! transport layer for paths and query strings, and a client layer that authenticates,
//! performs one HTTP exchange per call and classifies failures.
//!
//! ```rust,no_run
//! use smsgate::{Config, Message, SendOptions, SmsGatewayClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), smsgate::SmsGatewayError> {
//!     let client = SmsGatewayClient::new(Config::new().with_basic_auth("user", "pass"))?;
//!     let message = Message::text("hello", ["+79251234567"])?;
//!     let state = client.send(&message, SendOptions::default()).await?;
//!     println!("{} is {}", state.id, state.state);
//!     Ok(())
//! }
//! ```
#![forbid(unsafe_code)]

pub mod client;
pub mod domain;
mod transport;

pub use client::{
    ApiError, ApiErrorKind, Auth, Config, DEFAULT_BASE_URL, HttpTransport, ReqwestTransport,
    SmsGatewayClient, SmsGatewayError, TransportError,
};
pub use domain::{
    DataMessage, Device, DeviceSettings, HealthResponse, LogEntry, Message, MessagePriority,
    MessageState, MessagesExportRequest, PhoneNumber, ProcessingState, RecipientState,
    SendOptions, TextMessage, TokenRequest, TokenResponse, ValidationError, Webhook, WebhookEvent,
};
