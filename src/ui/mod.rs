//! ui
//!
//! User-facing output utilities.
//!
//! # Design
//!
//! All progress and diagnostic output goes through this module so the
//! `--quiet` and `--debug` flags behave the same everywhere. Progress goes
//! to stdout, diagnostics to stderr.

pub mod output;
