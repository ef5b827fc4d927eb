//! End to end one-to-one link scenarios
//!
//! Each test wires two full UE stacks together: an O2O state machine plus a
//! basic link controller per side, with signalling carried through the PC5
//! wire codec. The relay side is UE 1 (imsi 111), the remote side UE 2
//! (imsi 222).

#![allow(unused_imports)]

use std::net::Ipv6Addr;

use prosesim_pc5::codec;
use prosesim_pc5::{
    O2oConfig, O2oIndication, O2oRole, O2oState, O2oStateMachine, Pc5SignallingMessage,
    ReleaseReason,
};
use prosesim_ue::{
    BasicController, BasicControllerConfig, FilterScope, SidelinkController,
};

use crate::test_utils::{init_test_logging, HostAddressing, HostNas};

const RELAY_L2: u32 = 1;
const RELAY_IMSI: u64 = 111;
const REMOTE_L2: u32 = 2;
const REMOTE_IMSI: u64 = 222;

/// One complete UE side: signalling machine plus link controller.
struct Ue {
    machine: O2oStateMachine,
    controller: BasicController<HostAddressing, HostNas>,
}

impl Ue {
    fn new(l2_id: u32, imsi: u64) -> Self {
        let config = BasicControllerConfig {
            connect_probability: 100,
            rng_seed: l2_id as u64,
        };
        Self {
            machine: O2oStateMachine::new(l2_id, imsi, O2oConfig::default()),
            controller: BasicController::new(HostAddressing::default(), HostNas::default(), config),
        }
    }

    /// Applies local indications and returns the messages bound for the air.
    fn absorb(&mut self, indications: Vec<O2oIndication>) -> Vec<(u32, Vec<u8>)> {
        let mut outbound = Vec::new();
        for indication in indications {
            match indication {
                O2oIndication::SendMessage { peer_l2_id, message } => {
                    outbound.push((peer_l2_id, codec::encode(&message).to_vec()));
                }
                O2oIndication::SecuredEstablished { peer_l2_id, role } => {
                    self.controller.connection_established(peer_l2_id, role);
                }
                O2oIndication::ConnectionTerminated { peer_l2_id } => {
                    self.controller.connection_terminated(peer_l2_id);
                }
                O2oIndication::ConnectionAborted { peer_l2_id, .. } => {
                    self.controller.connection_aborted(peer_l2_id);
                }
                O2oIndication::RemoteUeReport { peer_l2_id, imsi } => {
                    self.controller.remote_ue_report(peer_l2_id, imsi);
                }
            }
        }
        outbound
    }
}

/// Delivers pending messages back and forth until the air goes quiet.
fn pump(relay: &mut Ue, remote: &mut Ue, now_ms: u64, mut pending: Vec<(u32, Vec<u8>)>) {
    while !pending.is_empty() {
        let mut next = Vec::new();
        for (dest, frame) in pending {
            let msg = codec::decode(&frame).expect("undecodable frame on the air");
            let (ue, source) = if dest == RELAY_L2 {
                (&mut *relay, REMOTE_L2)
            } else {
                (&mut *remote, RELAY_L2)
            };
            let indications = ue.machine.recv(source, &msg, now_ms);
            next.extend(ue.absorb(indications));
        }
        pending = next;
    }
}

fn establish(relay: &mut Ue, remote: &mut Ue) {
    assert_eq!(
        remote.controller.recv_relay_service_discovery(RELAY_L2),
        Some(RELAY_L2)
    );
    let out = remote.machine.start_connection(RELAY_L2, 0);
    let pending = remote.absorb(out);
    pump(relay, remote, 0, pending);
}

#[test]
fn test_e2e_link_setup() {
    init_test_logging();
    tracing::info!("E2E Test: one-to-one link setup");
    let mut relay = Ue::new(RELAY_L2, RELAY_IMSI);
    let mut remote = Ue::new(REMOTE_L2, REMOTE_IMSI);

    establish(&mut relay, &mut remote);

    assert_eq!(
        relay.machine.peer_state(REMOTE_L2),
        Some(O2oState::RelaySecureEstablished)
    );
    assert_eq!(
        remote.machine.peer_state(RELAY_L2),
        Some(O2oState::RemoteSecureEstablished)
    );

    // remote side: device up, addressed, default route through the relay
    let device = remote.controller.device(RELAY_L2).expect("no remote device");
    assert!(device.up);
    assert_eq!(device.role, O2oRole::Remote);
    assert!(device.address.is_some());

    let device = remote.controller.device(RELAY_L2).expect("no remote device");
    assert_eq!(
        remote.controller.addressing().default_route,
        Some(device.ifindex)
    );

    // relay side: device up, forwarding towards upstream, /64 filter installed
    let device = relay.controller.device(REMOTE_L2).expect("no relay device");
    assert_eq!(device.role, O2oRole::Relay);
    assert_eq!(relay.controller.nas().forwarding, [(device.ifindex, 0)]);
    assert_eq!(relay.controller.nas().active_bearers, [REMOTE_L2]);
    let filter = &relay.controller.nas().filters[0];
    assert_eq!(filter.scope, FilterScope::Remote);
    assert_eq!(filter.prefix_len, Some(64));
}

#[test]
fn test_e2e_remote_identity_reaches_relay_host() {
    init_test_logging();
    let mut relay = Ue::new(RELAY_L2, RELAY_IMSI);
    let mut remote = Ue::new(REMOTE_L2, REMOTE_IMSI);

    establish(&mut relay, &mut remote);

    // the remote UE info exchange ran inside the handshake and the relay
    // controller pushed the identity, keyed by the delegated /64, to its
    // addressing layer
    let ifindex = relay
        .controller
        .device(REMOTE_L2)
        .expect("no relay device")
        .ifindex;
    assert_eq!(
        relay.controller.addressing().reported,
        [(
            Ipv6Addr::new(0xfd00, 0xcafe, ifindex as u16, 0, 0, 0, 0, 0),
            REMOTE_IMSI
        )]
    );
}

#[test]
fn test_e2e_release_tears_both_sides_down() {
    init_test_logging();
    let mut relay = Ue::new(RELAY_L2, RELAY_IMSI);
    let mut remote = Ue::new(REMOTE_L2, REMOTE_IMSI);

    establish(&mut relay, &mut remote);

    let out = remote
        .machine
        .start_release(RELAY_L2, ReleaseReason::CommNoLongerNeeded, 5000);
    let pending = remote.absorb(out);
    pump(&mut relay, &mut remote, 5000, pending);

    assert_eq!(relay.machine.peer_state(REMOTE_L2), None);
    assert_eq!(remote.machine.peer_state(RELAY_L2), None);
    assert_eq!(relay.controller.device_count(), 0);
    assert_eq!(remote.controller.device_count(), 0);
}

#[test]
fn test_e2e_setup_timeout_frees_the_controller() {
    init_test_logging();
    let mut remote = Ue::new(REMOTE_L2, REMOTE_IMSI);

    assert_eq!(
        remote.controller.recv_relay_service_discovery(RELAY_L2),
        Some(RELAY_L2)
    );
    // the request never reaches anyone, discard the outbound frames
    let out = remote.machine.start_connection(RELAY_L2, 0);
    let _ = remote.absorb(out);

    // three retransmissions on T4100 expiry, then the attempt is abandoned
    for now in [400, 800, 1200, 1600] {
        let out = remote.machine.tick(now);
        let _ = remote.absorb(out);
    }
    assert_eq!(remote.machine.peer_state(RELAY_L2), None);

    // the controller cleared its pending attempt and can pick a new relay
    assert_eq!(remote.controller.recv_relay_service_discovery(3), Some(3));
}
