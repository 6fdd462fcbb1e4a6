#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Headless driver for Maze Hunt: session loop, configuration and text output.

pub mod ascii;
pub mod autopilot;
pub mod config;
pub mod session;

pub use autopilot::Autopilot;
pub use session::Session;
