//! # Domain Models
//!
//! Launcher settings and the names shared by every launcher crate.
//! Keep it lean: no I/O, process spawning, or YAML handling here.

pub mod config;
pub mod constants;
