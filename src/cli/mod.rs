//! CLI module for the countdown timer.
//!
//! This module provides the terminal front-end:
//! - `commands`: Command definitions using clap derive and keyboard input parsing
//! - `display`: Output formatting and display logic
//! - `app`: Explicit wiring and the single-threaded UI loop

pub mod app;
pub mod commands;
pub mod display;

pub use app::{App, OutputMode};
pub use commands::{parse_input, Cli, Commands, InputCommand, StartArgs};
pub use display::Display;
