//! Integration test framework for prosesim
#![allow(missing_docs)]
//!
//! This crate provides test fixtures and cross-crate scenario tests for the
//! prosesim sidelink simulator.
//!
//! # Components
//!
//! - [`test_utils`] - Logging setup and host-stack fixtures
//!
//! # Test Categories
//!
//! 1. **Link Establishment Tests** - Full one-to-one link setup between a
//!    remote UE and a relay UE, driven through both state machines and both
//!    link controllers
//! 2. **Pool Scheduling Tests** - Resource pool grants evaluated against the
//!    simulation clock

pub mod link_establishment;
pub mod pool_scheduling;
pub mod test_utils;

pub use test_utils::{init_test_logging, HostAddressing, HostNas};
