//! Core data types for the dpk package tool.
//!
//! This crate defines the APK version grammar and its comparison rules,
//! dependency requirements and provided capabilities, package records and the
//! plain-text `APKINDEX` format they are read from, repository naming, and the
//! user configuration.
//!
//! This crate is intentionally free of async code and network I/O.

pub mod config;
pub mod digest;
pub mod index;
pub mod package;
pub mod raw_index;
pub mod repository;
pub mod requirement;
pub mod version;
pub mod version_reader;
