//! # dev-space-audit
//!
//! Audit the disk space taken by developer tool caches under your home
//! directory, and clean the ones you pick.
//!
//! - **Scanner**: sizes every catalog target (plain paths and glob patterns)
//!   without following symlinks and without giving up on unreadable subtrees
//! - **Report**: per-category totals, a grand total and a largest-first ranking
//! - **Cleaner**: deletes selected targets, re-checking for every single path
//!   that it lies inside the home directory

pub mod cleaner;
pub mod cli;
pub mod common;
pub mod scanner;
