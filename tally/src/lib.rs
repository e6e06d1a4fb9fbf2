pub mod api;
pub mod config;
pub mod error;
pub mod extraction;
pub mod gemini;
pub mod retry;
