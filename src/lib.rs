// ABOUTME: Library crate for screen-manager
//
// Exposes the session logic, host capabilities and configuration so the
// binary and integration tests share one implementation.

#![allow(missing_docs)]

pub mod cli;
pub mod config;
pub mod host;
pub mod screen;
