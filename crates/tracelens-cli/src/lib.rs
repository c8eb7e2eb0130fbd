//! # Tracelens CLI
//!
//! Command-line tool for the Tracelens release-tracking API.
//!
//! This crate provides:
//! - **release**: register a release version
//! - **upload**: discover build artifacts and upload them for a release
//!
//! The binary in `main.rs` only parses flags and dispatches; the subcommand
//! logic lives here so it stays testable against a mock API.

pub mod commands;
pub mod discover;
