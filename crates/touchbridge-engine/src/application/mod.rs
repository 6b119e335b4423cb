//! Application layer use cases for the translation engine.
//!
//! # What is the "application" layer? (for beginners)
//!
//! In Clean Architecture the *application* layer sits between the domain
//! (pure business rules) and the infrastructure (input devices, injection
//! back-ends, storage).
//!
//! Use cases in this layer:
//!
//! - **Orchestrate** domain objects to fulfil a user goal (e.g., "turn this
//!   burst of touch samples into exactly the right synthetic strokes").
//! - **Depend on abstractions** (traits) rather than concrete implementations,
//!   so the stroke back-end can be swapped without changing this code.
//! - **Contain no OS calls, no network I/O, no file system access**.
//!
//! # Sub-modules
//!
//! - **`translate_touch`**  – Receives raw touch samples and drives the
//!   gesture classifier and the stroke dispatcher behind a single lock.
//!   This is the most critical use case; it runs on every finger movement.
//!
//! - **`dispatch_strokes`** – Enforces the at-most-one-stroke-in-flight rule,
//!   coalesces movement requests while the injector is busy, and tracks the
//!   virtual cursor on the target surface.
//!
//! - **`update_settings`**  – Validates and applies threshold changes coming
//!   from the settings surface, staging them for the next interaction.

pub mod dispatch_strokes;
pub mod translate_touch;
pub mod update_settings;
