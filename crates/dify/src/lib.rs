//! Dify workflow client for pipesage.
//!
//! Uploads a drawing image to a Dify workflow over multipart HTTP and folds
//! the streamed answer frames into one final text, with fixed fallbacks for
//! empty and failed runs.

pub mod client;
pub mod config;
pub mod error;
pub mod stream;

pub use {
    client::{DifyClient, UPSTREAM_ERROR_PREFIX},
    config::DifyConfig,
    error::{Error, Result},
    stream::{AnswerAggregator, EMPTY_ANSWER_FALLBACK},
};
