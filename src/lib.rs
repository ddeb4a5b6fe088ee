//! reelsplice - manifest-driven movie splitting, lossless rejoining and
//! subtitle timeline conversion.
//!
//! This library crate exposes the core functionality for integration testing.

pub mod config;
pub mod extract;
pub mod manifest;
pub mod partition;
pub mod pipeline;
pub mod project;
pub mod reassemble;
pub mod subtitle;
