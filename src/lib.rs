//! Streamforge - HLS and DASH manifest parsing
//!
//! This library crate backs the `streamforge` binary: configuration loading,
//! format detection and summary rendering. The parsers themselves live in
//! `streamforge-hls` and `streamforge-dash`.

pub mod config;
pub mod manifest;
pub mod summary;
