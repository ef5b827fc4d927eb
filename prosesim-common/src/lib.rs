//! Common types and utilities for prosesim
//!
//! This crate provides shared types, the simulation clock, and utilities
//! used across all prosesim crates.

pub mod error;
pub mod logging;
pub mod sim_clock;
pub mod subframe;

pub use error::Error;
pub use logging::{
    format_hex_compact, format_hex_dump, init_logging, init_logging_with_filter,
    log_pc5_message, log_protocol_message, Direction, HexDump, LogLevel,
};
pub use sim_clock::{SimulationClock, SimulationTick};
pub use subframe::{SubframeInfo, FRAMES_PER_HYPERFRAME, HYPERFRAME_SUBFRAMES, SUBFRAMES_PER_FRAME};
