//! Infrastructure layer for the translation engine.
//!
//! Contains the process-facing adapters: touch sample sources, gesture
//! sink back-ends, display geometry lookup, and settings storage.
//!
//! **Dependency rule**: this layer may depend on `application` and
//! `touchbridge_core`, but MUST NOT be imported by the `application` or
//! domain layers.

pub mod display_directory;
pub mod gesture_sink;
pub mod storage;
pub mod touch_source;
