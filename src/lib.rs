//! Inbox Agent: prompt assembly and keyword enrichment for an email inbox.

pub mod agent;
pub mod api;
pub mod config;
pub mod error;
pub mod llm;
pub mod pipeline;
pub mod store;
