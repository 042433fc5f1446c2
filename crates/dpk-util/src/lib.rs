//! Shared utilities for the dpk package tool.
//!
//! This crate provides cross-cutting concerns used by all other dpk crates:
//! the unified error type, filesystem helpers, hashing, and terminal
//! status and progress indicators.

pub mod errors;
pub mod fs;
pub mod hash;
pub mod progress;
