//! Shared library surface for feed server internals and tests.

pub mod config;
pub mod loops;
pub mod net;
pub mod state;
