//! Gemini `generateContent` client.
//!
//! Sends the instruction and the inline base64 image as a single user turn
//! and retries rate-limited or failed-to-connect attempts with exponential
//! backoff (see `crate::retry`). The API key travels in the `key` query
//! parameter and is stripped from everything that gets logged.

mod client;
pub mod types;

pub use client::GeminiClient;
