//! LINE Messaging API integration for pipesage.
//!
//! Covers the three surfaces the relay needs: webhook signature
//! verification, the inbound webhook payload model, and an outbound client
//! for replies, pushes, and message content downloads.

pub mod client;
pub mod config;
pub mod error;
pub mod signature;
pub mod webhook;

pub use {
    client::LineClient,
    config::LineConfig,
    error::{Error, Result},
    signature::SIGNATURE_HEADER,
    webhook::{InboundEvent, WebhookPayload, inbound_events},
};
