//! Storage infrastructure: settings file persistence.
//!
//! A thin adapter between the engine and the file system. The
//! `settings` sub-module handles:
//!
//! - Reading the TOML settings file from the platform-appropriate
//!   directory.
//! - Writing changes back to disk when the user adjusts a setting
//!   (movement scale, enable gate, surface dimensions).
//! - Providing sensible defaults when the file does not exist yet.
//!
//! Loaded threshold values are handed to the engine unvalidated; the
//! caller decides how to react to an out-of-range file (the runner logs
//! and falls back to defaults rather than refusing to start).

pub mod settings;
