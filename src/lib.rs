//! Pixelsummon - turn pixel art into Minecraft `block_display` summon commands
//!
//! This library provides functionality to:
//! - Classify image pixels against a palette of block labels
//! - Merge same-label cells into disjoint axis-aligned rectangles
//! - Build, rotate and serialize one display transformation per rectangle
//! - Pack the results into length-bounded summon commands

pub mod cli;
pub mod color;
pub mod command;
pub mod config;
pub mod error;
pub mod format;
pub mod grid;
pub mod merge;
pub mod output;
pub mod palette;
pub mod pipeline;
pub mod transform;
