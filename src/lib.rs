//! Migrate F-Spot photo tags into darktable XMP sidecar files.
//!
//! For every photo in an F-Spot library that exists on disk and has no
//! sidecar yet, an `.xmp` file is written next to it. Tags attached through a
//! category are exported with their full path (`Places|Europe|Germany`) as
//! `lr:hierarchicalSubject`, all other tags as plain `dc:subject` entries.

pub mod config;
pub mod db;
pub mod error;
pub mod hierarchy;
pub mod logging;
pub mod migrate;
pub mod paths;
pub mod sidecar;

pub use config::{Config, RunOptions};
pub use migrate::{Migrator, Summary};
