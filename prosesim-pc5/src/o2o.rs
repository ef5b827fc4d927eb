//! One-to-one link state machine
//!
//! Drives both ends of a direct link: the remote UE initiates setup,
//! keepalive and release towards a relay UE, and the relay answers requests,
//! runs the security exchange and supervises liveness. The machine is
//! message and timer driven; every entry point returns the indications the
//! caller must act on, including messages to send to the peer.

use std::collections::BTreeMap;

use tracing::{debug, info, warn};

use crate::context::{
    LinkContext, O2oConfig, O2oRole, O2oState, Pc5ContextId, SecurityModeState,
};
use crate::message::{Pc5SignallingMessage, RejectReason, ReleaseReason};

/// Why a link under setup was abandoned
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AbortCause {
    /// Setup retransmissions exhausted without an answer
    SetupTimeout,
    /// The peer rejected the request
    Rejected(RejectReason),
}

/// Output of the state machine towards its user
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum O2oIndication {
    /// A signalling message to deliver to the peer
    SendMessage {
        /// Layer 2 identifier of the peer
        peer_l2_id: u32,
        /// The message to send
        message: Pc5SignallingMessage,
    },
    /// The link is established and secured
    SecuredEstablished {
        /// Layer 2 identifier of the peer
        peer_l2_id: u32,
        /// Which end of the link this machine is
        role: O2oRole,
    },
    /// An established link was torn down
    ConnectionTerminated {
        /// Layer 2 identifier of the peer
        peer_l2_id: u32,
    },
    /// A link under setup was abandoned
    ConnectionAborted {
        /// Layer 2 identifier of the peer
        peer_l2_id: u32,
        /// Why setup failed
        cause: AbortCause,
    },
    /// The relay learned the remote UE identity
    RemoteUeReport {
        /// Layer 2 identifier of the peer
        peer_l2_id: u32,
        /// IMSI reported by the remote UE
        imsi: u64,
    },
}

/// One-to-one link state machine for a single UE, covering every link the
/// UE participates in, in either role.
#[derive(Debug)]
pub struct O2oStateMachine {
    self_l2_id: u32,
    imsi: u64,
    config: O2oConfig,
    contexts: BTreeMap<Pc5ContextId, LinkContext>,
    next_sequence_number: u32,
    next_security_mode_id: u8,
}

impl O2oStateMachine {
    /// Creates a machine with no links.
    pub fn new(self_l2_id: u32, imsi: u64, config: O2oConfig) -> Self {
        Self {
            self_l2_id,
            imsi,
            config,
            contexts: BTreeMap::new(),
            next_sequence_number: 0,
            next_security_mode_id: 1,
        }
    }

    /// Layer 2 identifier of this UE
    pub fn self_l2_id(&self) -> u32 {
        self.self_l2_id
    }

    /// Number of link contexts currently held
    pub fn context_count(&self) -> usize {
        self.contexts.len()
    }

    /// Protocol state of the link towards `peer_l2_id`, if any.
    pub fn peer_state(&self, peer_l2_id: u32) -> Option<O2oState> {
        self.peer_context_id(peer_l2_id)
            .map(|id| self.contexts[&id].state)
    }

    fn peer_context_id(&self, peer_l2_id: u32) -> Option<Pc5ContextId> {
        let low = Pc5ContextId {
            peer_l2_id,
            context_id: 0,
        };
        let high = Pc5ContextId {
            peer_l2_id,
            context_id: u32::MAX,
        };
        self.contexts.range(low..=high).next().map(|(id, _)| *id)
    }

    fn alloc_sequence_number(&mut self) -> u32 {
        let sn = self.next_sequence_number;
        self.next_sequence_number = self.next_sequence_number.wrapping_add(1);
        sn
    }

    fn teardown(&mut self, id: Pc5ContextId) {
        if let Some(mut ctx) = self.contexts.remove(&id) {
            ctx.clear_timers();
            info!(peer = id.peer_l2_id, context = id.context_id, "link context removed");
        }
    }

    /// Opens a link towards `peer_l2_id`, acting as the remote UE.
    ///
    /// An existing link towards the same peer is torn down first.
    pub fn start_connection(&mut self, peer_l2_id: u32, now_ms: u64) -> Vec<O2oIndication> {
        let mut out = Vec::new();
        if let Some(old) = self.peer_context_id(peer_l2_id) {
            warn!(peer = peer_l2_id, "new connection replaces existing link");
            self.teardown(old);
            out.push(O2oIndication::ConnectionTerminated { peer_l2_id });
        }

        let sn = self.alloc_sequence_number();
        let id = Pc5ContextId {
            peer_l2_id,
            context_id: sn,
        };
        let mut ctx = LinkContext::new(id, O2oRole::Remote, &self.config);
        ctx.state = O2oState::RemoteInitSetup;
        let request = Pc5SignallingMessage::DirectCommunicationRequest {
            sequence_number: sn,
        };
        ctx.dcrq_retrans = Some(request.clone());
        ctx.t4100.start(now_ms, true);
        self.contexts.insert(id, ctx);

        info!(peer = peer_l2_id, sn, "starting one-to-one connection");
        out.push(O2oIndication::SendMessage {
            peer_l2_id,
            message: request,
        });
        out
    }

    /// Releases the link towards `peer_l2_id` with the given reason.
    pub fn start_release(
        &mut self,
        peer_l2_id: u32,
        reason: ReleaseReason,
        now_ms: u64,
    ) -> Vec<O2oIndication> {
        let mut out = Vec::new();
        match self.peer_context_id(peer_l2_id) {
            Some(id) => {
                let state = self.contexts[&id].state;
                if matches!(state, O2oState::RelayInitRelease | O2oState::RemoteInitRelease) {
                    debug!(peer = peer_l2_id, "release already in progress");
                } else {
                    self.begin_release(id, reason, now_ms, &mut out);
                }
            }
            None => warn!(peer = peer_l2_id, "release requested for unknown link"),
        }
        out
    }

    fn begin_release(
        &mut self,
        id: Pc5ContextId,
        reason: ReleaseReason,
        now_ms: u64,
        out: &mut Vec<O2oIndication>,
    ) {
        let sn = self.next_sequence_number;
        self.next_sequence_number = self.next_sequence_number.wrapping_add(1);

        let Some(ctx) = self.contexts.get_mut(&id) else {
            return;
        };
        ctx.t4100.stop(true);
        ctx.t4101.stop(true);
        ctx.t4102.stop(true);
        ctx.t4108.stop(true);
        ctx.t4111.stop(true);
        ctx.t_ruir.stop(true);
        ctx.state = match ctx.role {
            O2oRole::Relay => O2oState::RelayInitRelease,
            O2oRole::Remote => O2oState::RemoteInitRelease,
        };
        ctx.dcr_count = 0;
        let release = Pc5SignallingMessage::DirectCommunicationRelease {
            sequence_number: sn,
            reason,
        };
        ctx.dcr_retrans = Some(release.clone());
        ctx.t4103.start(now_ms, true);

        info!(peer = id.peer_l2_id, ?reason, "releasing one-to-one link");
        out.push(O2oIndication::SendMessage {
            peer_l2_id: id.peer_l2_id,
            message: release,
        });
    }

    /// Feeds a received signalling message into the machine.
    pub fn recv(
        &mut self,
        peer_l2_id: u32,
        msg: &Pc5SignallingMessage,
        now_ms: u64,
    ) -> Vec<O2oIndication> {
        let mut out = Vec::new();
        debug!(peer = peer_l2_id, %msg, "rx PC5 signalling");
        match msg {
            Pc5SignallingMessage::DirectCommunicationRequest { sequence_number } => {
                self.on_connection_request(peer_l2_id, *sequence_number, now_ms, &mut out);
            }
            Pc5SignallingMessage::DirectCommunicationAccept { .. } => {
                self.on_accept(peer_l2_id, now_ms, &mut out);
            }
            Pc5SignallingMessage::DirectCommunicationReject { reason, .. } => {
                self.on_reject(peer_l2_id, *reason, &mut out);
            }
            Pc5SignallingMessage::DirectCommunicationKeepalive { sequence_number } => {
                self.on_keepalive(peer_l2_id, *sequence_number, now_ms, &mut out);
            }
            Pc5SignallingMessage::DirectCommunicationKeepaliveAck { .. } => {
                self.on_keepalive_ack(peer_l2_id, now_ms);
            }
            Pc5SignallingMessage::DirectCommunicationRelease { sequence_number, .. } => {
                self.on_release(peer_l2_id, *sequence_number, &mut out);
            }
            Pc5SignallingMessage::DirectCommunicationReleaseAccept { .. } => {
                self.on_release_accept(peer_l2_id, &mut out);
            }
            Pc5SignallingMessage::DirectSecurityModeCommand {
                sequence_number,
                security_mode_id,
            } => {
                self.on_security_mode_command(
                    peer_l2_id,
                    *sequence_number,
                    *security_mode_id,
                    &mut out,
                );
            }
            Pc5SignallingMessage::DirectSecurityModeComplete {
                security_mode_id, ..
            } => {
                self.on_security_mode_complete(peer_l2_id, *security_mode_id, now_ms, &mut out);
            }
            Pc5SignallingMessage::RemoteUeInfoRequest { sequence_number } => {
                self.on_remote_ue_info_request(peer_l2_id, *sequence_number, &mut out);
            }
            Pc5SignallingMessage::RemoteUeInfoResponse { imsi, .. } => {
                self.on_remote_ue_info_response(peer_l2_id, *imsi, &mut out);
            }
        }
        out
    }

    fn on_connection_request(
        &mut self,
        peer_l2_id: u32,
        sn: u32,
        now_ms: u64,
        out: &mut Vec<O2oIndication>,
    ) {
        if let Some(id) = self.peer_context_id(peer_l2_id) {
            let ctx = &self.contexts[&id];
            if id.context_id == sn && ctx.state == O2oState::RelaySetupRequest {
                // retransmitted request, answer with the retained command
                if let Some(command) = ctx.dsmcm_retrans.clone() {
                    out.push(O2oIndication::SendMessage {
                        peer_l2_id,
                        message: command,
                    });
                }
                return;
            }
            if matches!(
                ctx.state,
                O2oState::RelayInitRelease | O2oState::RemoteInitRelease
            ) {
                // a release towards this peer is still pending
                out.push(O2oIndication::SendMessage {
                    peer_l2_id,
                    message: Pc5SignallingMessage::DirectCommunicationReject {
                        sequence_number: sn,
                        reason: RejectReason::OtherErrors,
                    },
                });
                return;
            }
            // a new request wins over the existing link
            info!(peer = peer_l2_id, "new connection request replaces existing link");
            self.teardown(id);
            out.push(O2oIndication::ConnectionTerminated { peer_l2_id });
        }

        let command_sn = self.alloc_sequence_number();
        let security_mode_id = self.next_security_mode_id;
        self.next_security_mode_id = self.next_security_mode_id.wrapping_add(1);

        let id = Pc5ContextId {
            peer_l2_id,
            context_id: sn,
        };
        let mut ctx = LinkContext::new(id, O2oRole::Relay, &self.config);
        ctx.state = O2oState::RelaySetupRequest;
        ctx.security = SecurityModeState::Commanded;
        ctx.security_mode_id = security_mode_id;
        let command = Pc5SignallingMessage::DirectSecurityModeCommand {
            sequence_number: command_sn,
            security_mode_id,
        };
        ctx.dsmcm_retrans = Some(command.clone());
        ctx.t4111.start(now_ms, true);
        self.contexts.insert(id, ctx);

        info!(peer = peer_l2_id, sn, "accepting connection, starting security exchange");
        out.push(O2oIndication::SendMessage {
            peer_l2_id,
            message: command,
        });
    }

    fn on_security_mode_command(
        &mut self,
        peer_l2_id: u32,
        sn: u32,
        security_mode_id: u8,
        out: &mut Vec<O2oIndication>,
    ) {
        let Some(id) = self.peer_context_id(peer_l2_id) else {
            warn!(peer = peer_l2_id, "security mode command without a link");
            return;
        };
        let Some(ctx) = self.contexts.get_mut(&id) else {
            return;
        };
        if ctx.role != O2oRole::Remote || ctx.state != O2oState::RemoteInitSetup {
            debug!(peer = peer_l2_id, "ignoring security mode command in {:?}", ctx.state);
            return;
        }
        ctx.security_mode_id = security_mode_id;
        ctx.security = SecurityModeState::Completed;
        out.push(O2oIndication::SendMessage {
            peer_l2_id,
            message: Pc5SignallingMessage::DirectSecurityModeComplete {
                sequence_number: sn,
                security_mode_id,
            },
        });
    }

    fn on_security_mode_complete(
        &mut self,
        peer_l2_id: u32,
        security_mode_id: u8,
        now_ms: u64,
        out: &mut Vec<O2oIndication>,
    ) {
        let Some(id) = self.peer_context_id(peer_l2_id) else {
            warn!(peer = peer_l2_id, "security mode complete without a link");
            return;
        };
        {
            let ctx = &self.contexts[&id];
            if ctx.role != O2oRole::Relay || ctx.state != O2oState::RelaySetupRequest {
                debug!(peer = peer_l2_id, "ignoring security mode complete in {:?}", ctx.state);
                return;
            }
            if ctx.security_mode_id != security_mode_id {
                warn!(
                    peer = peer_l2_id,
                    expected = ctx.security_mode_id,
                    got = security_mode_id,
                    "security mode identifier mismatch, discarding"
                );
                return;
            }
        }

        let info_sn = self.alloc_sequence_number();
        let Some(ctx) = self.contexts.get_mut(&id) else {
            return;
        };
        ctx.t4111.stop(true);
        ctx.dsmcm_retrans = None;
        ctx.security = SecurityModeState::Completed;
        ctx.state = O2oState::RelaySecureEstablished;
        ctx.t4108.start(now_ms, true);

        let info_request = Pc5SignallingMessage::RemoteUeInfoRequest {
            sequence_number: info_sn,
        };
        ctx.ruirq_retrans = Some(info_request.clone());
        ctx.ruir_count = 0;
        ctx.t_ruir.start(now_ms, true);

        info!(peer = peer_l2_id, "one-to-one link secured (relay)");
        out.push(O2oIndication::SendMessage {
            peer_l2_id,
            message: Pc5SignallingMessage::DirectCommunicationAccept {
                sequence_number: id.context_id,
            },
        });
        out.push(O2oIndication::SecuredEstablished {
            peer_l2_id,
            role: O2oRole::Relay,
        });
        out.push(O2oIndication::SendMessage {
            peer_l2_id,
            message: info_request,
        });
    }

    fn on_accept(&mut self, peer_l2_id: u32, now_ms: u64, out: &mut Vec<O2oIndication>) {
        let Some(id) = self.peer_context_id(peer_l2_id) else {
            warn!(peer = peer_l2_id, "accept without a link");
            return;
        };
        let Some(ctx) = self.contexts.get_mut(&id) else {
            return;
        };
        if ctx.role != O2oRole::Remote || ctx.state != O2oState::RemoteInitSetup {
            debug!(peer = peer_l2_id, "ignoring accept in {:?}", ctx.state);
            return;
        }
        ctx.t4100.stop(true);
        ctx.dcrq_retrans = None;
        ctx.dcrq_count = 0;
        ctx.state = O2oState::RemoteSecureEstablished;
        ctx.t4102.start(now_ms, true);

        info!(peer = peer_l2_id, "one-to-one link secured (remote)");
        out.push(O2oIndication::SecuredEstablished {
            peer_l2_id,
            role: O2oRole::Remote,
        });
    }

    fn on_reject(&mut self, peer_l2_id: u32, reason: RejectReason, out: &mut Vec<O2oIndication>) {
        let Some(id) = self.peer_context_id(peer_l2_id) else {
            return;
        };
        if self.contexts[&id].state != O2oState::RemoteInitSetup {
            return;
        }
        warn!(peer = peer_l2_id, ?reason, "connection rejected");
        self.teardown(id);
        out.push(O2oIndication::ConnectionAborted {
            peer_l2_id,
            cause: AbortCause::Rejected(reason),
        });
    }

    fn on_keepalive(
        &mut self,
        peer_l2_id: u32,
        sn: u32,
        now_ms: u64,
        out: &mut Vec<O2oIndication>,
    ) {
        let Some(id) = self.peer_context_id(peer_l2_id) else {
            return;
        };
        let Some(ctx) = self.contexts.get_mut(&id) else {
            return;
        };
        if ctx.state != O2oState::RelaySecureEstablished {
            debug!(peer = peer_l2_id, "ignoring keepalive in {:?}", ctx.state);
            return;
        }
        ctx.t4108.start(now_ms, true);
        out.push(O2oIndication::SendMessage {
            peer_l2_id,
            message: Pc5SignallingMessage::DirectCommunicationKeepaliveAck {
                sequence_number: sn,
            },
        });
    }

    fn on_keepalive_ack(&mut self, peer_l2_id: u32, now_ms: u64) {
        let Some(id) = self.peer_context_id(peer_l2_id) else {
            return;
        };
        let Some(ctx) = self.contexts.get_mut(&id) else {
            return;
        };
        if ctx.state != O2oState::RemoteSecureEstablished {
            return;
        }
        ctx.t4101.stop(true);
        ctx.dck_retrans = None;
        ctx.dck_count = 0;
        ctx.ka_count = 0;
        ctx.t4102.start(now_ms, true);
    }

    fn on_release(&mut self, peer_l2_id: u32, sn: u32, out: &mut Vec<O2oIndication>) {
        out.push(O2oIndication::SendMessage {
            peer_l2_id,
            message: Pc5SignallingMessage::DirectCommunicationReleaseAccept {
                sequence_number: sn,
            },
        });
        if let Some(id) = self.peer_context_id(peer_l2_id) {
            self.teardown(id);
            out.push(O2oIndication::ConnectionTerminated { peer_l2_id });
        }
    }

    fn on_release_accept(&mut self, peer_l2_id: u32, out: &mut Vec<O2oIndication>) {
        let Some(id) = self.peer_context_id(peer_l2_id) else {
            return;
        };
        if !matches!(
            self.contexts[&id].state,
            O2oState::RelayInitRelease | O2oState::RemoteInitRelease
        ) {
            return;
        }
        self.teardown(id);
        out.push(O2oIndication::ConnectionTerminated { peer_l2_id });
    }

    fn on_remote_ue_info_request(
        &mut self,
        peer_l2_id: u32,
        sn: u32,
        out: &mut Vec<O2oIndication>,
    ) {
        let Some(id) = self.peer_context_id(peer_l2_id) else {
            return;
        };
        if self.contexts[&id].role != O2oRole::Remote {
            return;
        }
        out.push(O2oIndication::SendMessage {
            peer_l2_id,
            message: Pc5SignallingMessage::RemoteUeInfoResponse {
                sequence_number: sn,
                imsi: self.imsi,
            },
        });
    }

    fn on_remote_ue_info_response(
        &mut self,
        peer_l2_id: u32,
        imsi: u64,
        out: &mut Vec<O2oIndication>,
    ) {
        let Some(id) = self.peer_context_id(peer_l2_id) else {
            return;
        };
        let Some(ctx) = self.contexts.get_mut(&id) else {
            return;
        };
        if ctx.role != O2oRole::Relay || ctx.state != O2oState::RelaySecureEstablished {
            return;
        }
        ctx.t_ruir.stop(true);
        ctx.ruirq_retrans = None;
        info!(peer = peer_l2_id, imsi, "remote UE identity learned");
        out.push(O2oIndication::RemoteUeReport { peer_l2_id, imsi });
    }

    /// Advances every link timer to `now_ms`.
    pub fn tick(&mut self, now_ms: u64) -> Vec<O2oIndication> {
        let mut out = Vec::new();
        let ids: Vec<Pc5ContextId> = self.contexts.keys().copied().collect();
        for id in ids {
            self.tick_context(id, now_ms, &mut out);
        }
        out
    }

    fn tick_context(&mut self, id: Pc5ContextId, now_ms: u64, out: &mut Vec<O2oIndication>) {
        let peer_l2_id = id.peer_l2_id;

        // T4100: connection request retransmission (remote)
        let mut abort_setup = false;
        if let Some(ctx) = self.contexts.get_mut(&id) {
            if ctx.t4100.perform_tick(now_ms) {
                if ctx.dcrq_count < self.config.remote_dcrq_max {
                    ctx.dcrq_count += 1;
                    debug!(peer = peer_l2_id, attempt = ctx.dcrq_count, "retransmitting connection request");
                    if let Some(request) = ctx.dcrq_retrans.clone() {
                        out.push(O2oIndication::SendMessage {
                            peer_l2_id,
                            message: request,
                        });
                    }
                    ctx.t4100.start(now_ms, false);
                } else {
                    abort_setup = true;
                }
            }
        }

        // T4111: security mode command retransmission (relay)
        if let Some(ctx) = self.contexts.get_mut(&id) {
            if ctx.t4111.perform_tick(now_ms) {
                if ctx.t4111.expiry_count() <= self.config.relay_dsmcm_max {
                    debug!(peer = peer_l2_id, "retransmitting security mode command");
                    if let Some(command) = ctx.dsmcm_retrans.clone() {
                        out.push(O2oIndication::SendMessage {
                            peer_l2_id,
                            message: command,
                        });
                    }
                    ctx.t4111.start(now_ms, false);
                } else {
                    abort_setup = true;
                }
            }
        }

        if abort_setup {
            warn!(peer = peer_l2_id, "link setup abandoned after retries");
            self.teardown(id);
            out.push(O2oIndication::ConnectionAborted {
                peer_l2_id,
                cause: AbortCause::SetupTimeout,
            });
            return;
        }

        // T4102: keepalive period (remote)
        let keepalive_sn = self.next_sequence_number;
        if let Some(ctx) = self.contexts.get_mut(&id) {
            if ctx.t4102.perform_tick(now_ms) {
                self.next_sequence_number = self.next_sequence_number.wrapping_add(1);
                let keepalive = Pc5SignallingMessage::DirectCommunicationKeepalive {
                    sequence_number: keepalive_sn,
                };
                ctx.dck_retrans = Some(keepalive.clone());
                ctx.dck_count = 0;
                ctx.t4101.start(now_ms, true);
                out.push(O2oIndication::SendMessage {
                    peer_l2_id,
                    message: keepalive,
                });
            }
        }

        // T4101: keepalive retransmission (remote)
        let mut keepalive_failed = false;
        if let Some(ctx) = self.contexts.get_mut(&id) {
            if ctx.t4101.perform_tick(now_ms) {
                if ctx.dck_count < self.config.remote_dck_max {
                    ctx.dck_count += 1;
                    debug!(peer = peer_l2_id, attempt = ctx.dck_count, "retransmitting keepalive");
                    if let Some(keepalive) = ctx.dck_retrans.clone() {
                        out.push(O2oIndication::SendMessage {
                            peer_l2_id,
                            message: keepalive,
                        });
                    }
                    ctx.t4101.start(now_ms, false);
                } else {
                    ctx.ka_count += 1;
                    if ctx.ka_count >= self.config.remote_ka_max {
                        keepalive_failed = true;
                    } else {
                        debug!(peer = peer_l2_id, cycles = ctx.ka_count, "keepalive cycle unanswered");
                        ctx.dck_count = 0;
                        ctx.dck_retrans = None;
                        ctx.t4102.start(now_ms, true);
                    }
                }
            }
        }
        if keepalive_failed {
            warn!(peer = peer_l2_id, "peer unreachable, releasing link");
            self.begin_release(id, ReleaseReason::CommNoLongerAvailable, now_ms, out);
        }

        // T4108: keepalive supervision (relay)
        let mut supervision_expired = false;
        if let Some(ctx) = self.contexts.get_mut(&id) {
            if ctx.t4108.perform_tick(now_ms) {
                supervision_expired = true;
            }
        }
        if supervision_expired {
            warn!(peer = peer_l2_id, "no keepalive from remote, releasing link");
            self.begin_release(id, ReleaseReason::CommNoLongerAvailable, now_ms, out);
        }

        // T4103: release retransmission (both roles)
        let mut release_failed = false;
        if let Some(ctx) = self.contexts.get_mut(&id) {
            if ctx.t4103.perform_tick(now_ms) {
                let max = match ctx.role {
                    O2oRole::Relay => self.config.relay_dcr_max,
                    O2oRole::Remote => self.config.remote_dcr_max,
                };
                if ctx.dcr_count < max {
                    ctx.dcr_count += 1;
                    debug!(peer = peer_l2_id, attempt = ctx.dcr_count, "retransmitting release");
                    if let Some(release) = ctx.dcr_retrans.clone() {
                        out.push(O2oIndication::SendMessage {
                            peer_l2_id,
                            message: release,
                        });
                    }
                    ctx.t4103.start(now_ms, false);
                } else {
                    release_failed = true;
                }
            }
        }
        if release_failed {
            // give up waiting for the accept, drop the link locally
            self.teardown(id);
            out.push(O2oIndication::ConnectionTerminated { peer_l2_id });
        }

        // T_RUIR: remote UE info request retransmission (relay)
        if let Some(ctx) = self.contexts.get_mut(&id) {
            if ctx.t_ruir.perform_tick(now_ms) {
                if ctx.ruir_count < self.config.relay_ruir_max {
                    ctx.ruir_count += 1;
                    if let Some(request) = ctx.ruirq_retrans.clone() {
                        out.push(O2oIndication::SendMessage {
                            peer_l2_id,
                            message: request,
                        });
                    }
                    ctx.t_ruir.start(now_ms, false);
                } else {
                    // stop asking, the link itself stays up
                    debug!(peer = peer_l2_id, "remote UE identity not reported, giving up");
                    ctx.ruirq_retrans = None;
                }
            }
        }
    }
}
