//! Sidelink resource-pool engine
//!
//! This crate turns an installed pool configuration into the concrete
//! (subframe, resource block) coordinates a MAC scheduler transmits on:
//! control-channel (PSCCH) opportunity enumeration, data-channel (PSSCH)
//! repetition patterns with frequency hopping, and discovery-channel (PSDCH)
//! indexing. All queries are pure over geometry cached at construction.

pub mod comm;
pub mod config;
pub mod disc;
mod period;
pub mod trp;

pub use comm::{CommResourcePool, PoolType, SlTransmissionInfo, TxCommResourcePool};
pub use config::{
    CommPoolConfig, CyclicPrefix, DiscPeriod, DiscPoolConfig, DiscTxParameters, HoppingConfig,
    HoppingInfo, PreconfigCommPool, PreconfigDiscPool, SlPeriod, SubframeBitmap,
    TfResourceConfig, TrptSubset, TxProbability, UeSelectedConfig,
};
pub use disc::{DiscResourcePool, TxDiscResourcePool};
