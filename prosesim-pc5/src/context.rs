//! Per-link connection context
//!
//! State kept by one end of a one-to-one link: role, protocol state,
//! security sub-state, the link timers, retry counters and copies of the
//! messages retained for retransmission.

use serde::{Deserialize, Serialize};

use crate::message::Pc5SignallingMessage;
use crate::timer::LinkTimer;

/// Identifies one link context: the peer plus the sequence number of the
/// connection request that opened it. Ordered by peer, then context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Pc5ContextId {
    /// Layer 2 identifier of the peer
    pub peer_l2_id: u32,
    /// Sequence number of the connection request
    pub context_id: u32,
}

/// Which end of the link this context is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum O2oRole {
    /// Relay UE, answering link requests
    Relay,
    /// Remote UE, initiating links
    Remote,
}

/// Protocol state of one end of a link
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum O2oState {
    /// Relay: no link
    RelayIdle,
    /// Relay: request received, security exchange running
    RelaySetupRequest,
    /// Relay: link established and secured
    RelaySecureEstablished,
    /// Relay: release sent, waiting for the accept
    RelayInitRelease,
    /// Remote: no link
    RemoteIdle,
    /// Remote: request sent, waiting for security and accept
    RemoteInitSetup,
    /// Remote: link established and secured
    RemoteSecureEstablished,
    /// Remote: release sent, waiting for the accept
    RemoteInitRelease,
}

/// Security sub-state of a link
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SecurityModeState {
    /// No security exchange yet
    #[default]
    Empty,
    /// Security mode command sent or received
    Commanded,
    /// Security mode complete sent or received
    Completed,
}

/// Timer durations and retry maxima for the one-to-one link protocol.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct O2oConfig {
    /// Relay: security mode command retransmission interval (T4111)
    pub relay_t4111_ms: u64,
    /// Relay: release retransmission interval (T4103)
    pub relay_t4103_ms: u64,
    /// Relay: keepalive supervision interval (T4108)
    pub relay_t4108_ms: u64,
    /// Relay: remote UE info request retransmission interval (T_RUIR)
    pub relay_truir_ms: u64,
    /// Remote: connection request retransmission interval (T4100)
    pub remote_t4100_ms: u64,
    /// Remote: keepalive retransmission interval (T4101)
    pub remote_t4101_ms: u64,
    /// Remote: keepalive period (T4102)
    pub remote_t4102_ms: u64,
    /// Remote: release retransmission interval (T4103)
    pub remote_t4103_ms: u64,

    /// Relay: maximum security mode command retransmissions
    pub relay_dsmcm_max: u32,
    /// Relay: maximum release retransmissions
    pub relay_dcr_max: u32,
    /// Relay: maximum remote UE info request retransmissions
    pub relay_ruir_max: u32,
    /// Remote: maximum connection request retransmissions
    pub remote_dcrq_max: u32,
    /// Remote: maximum release retransmissions
    pub remote_dcr_max: u32,
    /// Remote: maximum keepalive retransmissions per cycle
    pub remote_dck_max: u32,
    /// Remote: maximum unanswered keepalive cycles
    pub remote_ka_max: u32,
}

impl Default for O2oConfig {
    fn default() -> Self {
        Self {
            relay_t4111_ms: 200,
            relay_t4103_ms: 100,
            relay_t4108_ms: 2000,
            relay_truir_ms: 100,
            remote_t4100_ms: 400,
            remote_t4101_ms: 100,
            remote_t4102_ms: 1000,
            remote_t4103_ms: 100,
            relay_dsmcm_max: 3,
            relay_dcr_max: 3,
            relay_ruir_max: 3,
            remote_dcrq_max: 3,
            remote_dcr_max: 3,
            remote_dck_max: 3,
            remote_ka_max: 3,
        }
    }
}

/// One end of a one-to-one link.
#[derive(Debug, Clone)]
pub struct LinkContext {
    /// Context identifier
    pub id: Pc5ContextId,
    /// Which end of the link this is
    pub role: O2oRole,
    /// Protocol state
    pub state: O2oState,
    /// Security sub-state
    pub security: SecurityModeState,
    /// Identifier of the pending or completed security exchange
    pub security_mode_id: u8,

    /// Connection request retransmission (remote)
    pub t4100: LinkTimer,
    /// Keepalive retransmission (remote)
    pub t4101: LinkTimer,
    /// Keepalive period (remote)
    pub t4102: LinkTimer,
    /// Release retransmission (both roles)
    pub t4103: LinkTimer,
    /// Keepalive supervision (relay)
    pub t4108: LinkTimer,
    /// Security mode command retransmission (relay)
    pub t4111: LinkTimer,
    /// Remote UE info request retransmission (relay)
    pub t_ruir: LinkTimer,

    /// Connection request retransmissions so far
    pub dcrq_count: u32,
    /// Release retransmissions so far
    pub dcr_count: u32,
    /// Keepalive retransmissions in the current cycle
    pub dck_count: u32,
    /// Unanswered keepalive cycles so far
    pub ka_count: u32,
    /// Remote UE info request retransmissions so far
    pub ruir_count: u32,

    /// Retained connection request (remote)
    pub dcrq_retrans: Option<Pc5SignallingMessage>,
    /// Retained release (both roles)
    pub dcr_retrans: Option<Pc5SignallingMessage>,
    /// Retained keepalive (remote)
    pub dck_retrans: Option<Pc5SignallingMessage>,
    /// Retained remote UE info request (relay)
    pub ruirq_retrans: Option<Pc5SignallingMessage>,
    /// Retained security mode command (relay)
    pub dsmcm_retrans: Option<Pc5SignallingMessage>,
}

impl LinkContext {
    /// Creates an idle context for the given role.
    pub fn new(id: Pc5ContextId, role: O2oRole, config: &O2oConfig) -> Self {
        let (state, t4103_ms) = match role {
            O2oRole::Relay => (O2oState::RelayIdle, config.relay_t4103_ms),
            O2oRole::Remote => (O2oState::RemoteIdle, config.remote_t4103_ms),
        };
        Self {
            id,
            role,
            state,
            security: SecurityModeState::Empty,
            security_mode_id: 0,
            t4100: LinkTimer::new("T4100", config.remote_t4100_ms),
            t4101: LinkTimer::new("T4101", config.remote_t4101_ms),
            t4102: LinkTimer::new("T4102", config.remote_t4102_ms),
            t4103: LinkTimer::new("T4103", t4103_ms),
            t4108: LinkTimer::new("T4108", config.relay_t4108_ms),
            t4111: LinkTimer::new("T4111", config.relay_t4111_ms),
            t_ruir: LinkTimer::new("T_RUIR", config.relay_truir_ms),
            dcrq_count: 0,
            dcr_count: 0,
            dck_count: 0,
            ka_count: 0,
            ruir_count: 0,
            dcrq_retrans: None,
            dcr_retrans: None,
            dck_retrans: None,
            ruirq_retrans: None,
            dsmcm_retrans: None,
        }
    }

    /// True once the link is established and secured.
    pub fn is_established(&self) -> bool {
        matches!(
            self.state,
            O2oState::RelaySecureEstablished | O2oState::RemoteSecureEstablished
        )
    }

    /// Stops every link timer.
    pub fn clear_timers(&mut self) {
        self.t4100.stop(true);
        self.t4101.stop(true);
        self.t4102.stop(true);
        self.t4103.stop(true);
        self.t4108.stop(true);
        self.t4111.stop(true);
        self.t_ruir.stop(true);
    }
}
