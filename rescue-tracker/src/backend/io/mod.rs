//! # IO Module
//!
//! The operator-facing surface. Everything here talks to a terminal and
//! delegates the actual work to the domain services in [`AppState`].
//!
//! [`AppState`]: crate::backend::AppState

pub mod console;

pub use console::*;
