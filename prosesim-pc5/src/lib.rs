//! PC5 signalling for one-to-one sidelink links
//!
//! This crate carries the direct-link control plane between a remote UE and a
//! relay UE: the signalling message set and its wire codec, the sidelink PDCP
//! header, the per-link timers, and the one-to-one connection state machine
//! driving setup, keepalive and release on both ends of a link.

pub mod codec;
pub mod context;
pub mod header;
pub mod message;
pub mod o2o;
pub mod timer;

pub use codec::Pc5CodecError;
pub use context::{
    LinkContext, O2oConfig, O2oRole, O2oState, Pc5ContextId, SecurityModeState,
};
pub use header::SlPdcpHeader;
pub use message::{MessageType, Pc5SignallingMessage, RejectReason, ReleaseReason};
pub use o2o::{AbortCause, O2oIndication, O2oStateMachine};
pub use timer::LinkTimer;
