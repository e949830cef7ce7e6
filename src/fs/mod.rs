//! Filesystem utilities for aladin.
//!
//! Run artifacts (prompt, sections) and the config file are written
//! atomically so an interrupted run never leaves a half-written file behind.

pub mod atomic;

pub use atomic::{atomic_write, atomic_write_file};
