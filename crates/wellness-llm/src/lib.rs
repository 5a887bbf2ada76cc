//! LLM-backed supplement recommender.
//!
//! This crate asks a chat-completions model to pick supplements from the
//! catalog and plugs the answer into `wellness-core` as an
//! [`ExternalRecommender`](wellness_core::ExternalRecommender). Anything that
//! goes wrong is reported as unavailable so the core falls back to its
//! deterministic ranking.

pub mod client;
pub mod extraction;
pub mod prompts;
pub mod recommender;

pub use client::*;
pub use extraction::*;
pub use prompts::*;
pub use recommender::*;
