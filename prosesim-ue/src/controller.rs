//! Sidelink link controller
//!
//! Reacts to relay discovery and to link lifecycle events from the PC5
//! state machine. The basic controller connects to at most one relay at a
//! time, picked probabilistically among discovered candidates, and applies
//! the host-stack side effects of each link: virtual device, addressing,
//! default route or forwarding, traffic filters and sidelink bearers.

use std::collections::BTreeMap;
use std::net::Ipv6Addr;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use prosesim_pc5::O2oRole;

use crate::filter::{FilterDirection, FilterScope, TrafficFilter};
use crate::net_device::SlNetDevice;

/// Interface index of the upstream (network-facing) interface on a relay.
pub const UPSTREAM_IFINDEX: u32 = 0;

/// Host addressing operations the controller drives.
pub trait AddressingProvider {
    /// Assigns an address to a sidelink interface and returns it.
    fn assign_address(&mut self, ifindex: u32, role: O2oRole) -> Ipv6Addr;

    /// Removes the address from a sidelink interface.
    fn remove_address(&mut self, ifindex: u32);

    /// The /64 prefix delegated to the peer behind a relay-side interface.
    fn interface_prefix(&self, ifindex: u32) -> Option<Ipv6Addr>;

    /// Points the default route at a sidelink interface.
    fn set_default_route(&mut self, ifindex: u32);

    /// Reports a connected remote UE identity and its delegated /64 prefix
    /// upstream.
    fn report_remote_ue(&mut self, prefix: Ipv6Addr, imsi: u64);
}

/// Bearer and filter operations the controller drives.
pub trait NasGateway {
    /// Installs a traffic filter.
    fn install_filter(&mut self, filter: TrafficFilter);

    /// Removes every filter towards a peer.
    fn remove_filters(&mut self, peer_l2_id: u32);

    /// Activates the sidelink bearer towards a peer.
    fn activate_sidelink_bearer(&mut self, peer_l2_id: u32);

    /// Deactivates the sidelink bearer towards a peer.
    fn deactivate_sidelink_bearer(&mut self, peer_l2_id: u32);

    /// Enables or disables forwarding between a sidelink interface and the
    /// upstream interface.
    fn set_forwarding(&mut self, sidelink_ifindex: u32, upstream_ifindex: u32, enabled: bool);
}

/// Entry points the PC5 layer drives on a link controller.
pub trait SidelinkController {
    /// A relay announcement was received; returns the relay to connect to,
    /// if the controller decides to connect now.
    fn recv_relay_service_discovery(&mut self, relay_l2_id: u32) -> Option<u32>;

    /// A one-to-one link towards `peer_l2_id` is established and secured.
    fn connection_established(&mut self, peer_l2_id: u32, role: O2oRole);

    /// The link towards `peer_l2_id` was torn down.
    fn connection_terminated(&mut self, peer_l2_id: u32);

    /// Link setup towards `peer_l2_id` was abandoned.
    fn connection_aborted(&mut self, peer_l2_id: u32);

    /// The relay learned the identity of the remote UE behind a link.
    fn remote_ue_report(&mut self, peer_l2_id: u32, imsi: u64);
}

/// Basic controller configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BasicControllerConfig {
    /// Probability, in percent, of connecting to a discovered relay
    pub connect_probability: u32,
    /// Seed for the relay selection draw
    pub rng_seed: u64,
}

impl Default for BasicControllerConfig {
    fn default() -> Self {
        Self {
            connect_probability: 100,
            rng_seed: 0,
        }
    }
}

/// The basic link controller.
#[derive(Debug)]
pub struct BasicController<A, N> {
    addressing: A,
    nas: N,
    config: BasicControllerConfig,
    rng: StdRng,
    /// Relay a connection attempt is running towards, if any
    connecting_relay: Option<u32>,
    /// One device per established link, keyed by peer
    devices: BTreeMap<u32, SlNetDevice>,
    next_ifindex: u32,
}

impl<A: AddressingProvider, N: NasGateway> BasicController<A, N> {
    /// Creates a controller with no links.
    pub fn new(addressing: A, nas: N, config: BasicControllerConfig) -> Self {
        let rng = StdRng::seed_from_u64(config.rng_seed);
        Self {
            addressing,
            nas,
            config,
            rng,
            connecting_relay: None,
            // ifindex 0 is the upstream interface
            devices: BTreeMap::new(),
            next_ifindex: UPSTREAM_IFINDEX + 1,
        }
    }

    /// Device serving the link towards `peer_l2_id`, if established.
    pub fn device(&self, peer_l2_id: u32) -> Option<&SlNetDevice> {
        self.devices.get(&peer_l2_id)
    }

    /// Number of established links
    pub fn device_count(&self) -> usize {
        self.devices.len()
    }

    /// Relay a connection attempt is running towards, if any.
    pub fn connecting_relay(&self) -> Option<u32> {
        self.connecting_relay
    }

    /// The addressing backend.
    pub fn addressing(&self) -> &A {
        &self.addressing
    }

    /// The bearer and filter backend.
    pub fn nas(&self) -> &N {
        &self.nas
    }

    fn teardown_device(&mut self, peer_l2_id: u32) {
        let Some(mut device) = self.devices.remove(&peer_l2_id) else {
            panic!("teardown for unknown peer {peer_l2_id}");
        };
        device.up = false;
        self.nas.remove_filters(peer_l2_id);
        self.nas.deactivate_sidelink_bearer(peer_l2_id);
        if device.role == O2oRole::Relay {
            self.nas
                .set_forwarding(device.ifindex, UPSTREAM_IFINDEX, false);
        }
        self.addressing.remove_address(device.ifindex);
        info!(peer = peer_l2_id, ifindex = device.ifindex, "sidelink device removed");
    }
}

impl<A: AddressingProvider, N: NasGateway> SidelinkController for BasicController<A, N> {
    fn recv_relay_service_discovery(&mut self, relay_l2_id: u32) -> Option<u32> {
        if self.connecting_relay.is_some() || !self.devices.is_empty() {
            return None;
        }
        if self.rng.gen_range(0..100) < self.config.connect_probability {
            info!(relay = relay_l2_id, "connecting to discovered relay");
            self.connecting_relay = Some(relay_l2_id);
            Some(relay_l2_id)
        } else {
            debug!(relay = relay_l2_id, "skipping discovered relay");
            None
        }
    }

    fn connection_established(&mut self, peer_l2_id: u32, role: O2oRole) {
        if self.connecting_relay == Some(peer_l2_id) {
            self.connecting_relay = None;
        }
        if self.devices.contains_key(&peer_l2_id) {
            // a re-established link replaces the old device entirely
            warn!(peer = peer_l2_id, "link re-established, tearing old device down");
            self.teardown_device(peer_l2_id);
        }

        let ifindex = self.next_ifindex;
        self.next_ifindex += 1;
        let mut device = SlNetDevice::new(peer_l2_id, ifindex, role);
        let address = self.addressing.assign_address(ifindex, role);
        device.address = Some(address);

        match role {
            O2oRole::Remote => {
                // all traffic leaves through the relay
                self.addressing.set_default_route(ifindex);
                self.nas.install_filter(TrafficFilter {
                    direction: FilterDirection::Receive,
                    scope: FilterScope::Local,
                    address,
                    prefix_len: None,
                    peer_l2_id,
                });
            }
            O2oRole::Relay => {
                self.nas.set_forwarding(ifindex, UPSTREAM_IFINDEX, true);
                let prefix = match self.addressing.interface_prefix(ifindex) {
                    Some(prefix) => prefix,
                    None => panic!("no prefix delegated for relay interface {ifindex}"),
                };
                self.nas.install_filter(TrafficFilter {
                    direction: FilterDirection::Bidirectional,
                    scope: FilterScope::Remote,
                    address: prefix,
                    prefix_len: Some(64),
                    peer_l2_id,
                });
            }
        }
        self.nas.activate_sidelink_bearer(peer_l2_id);

        info!(peer = peer_l2_id, ifindex, ?role, %address, "sidelink device up");
        self.devices.insert(peer_l2_id, device);
    }

    fn connection_terminated(&mut self, peer_l2_id: u32) {
        self.teardown_device(peer_l2_id);
    }

    fn connection_aborted(&mut self, peer_l2_id: u32) {
        if self.connecting_relay == Some(peer_l2_id) {
            info!(relay = peer_l2_id, "connection attempt abandoned");
            self.connecting_relay = None;
        } else {
            debug!(peer = peer_l2_id, "setup abandoned for a link we were not initiating");
        }
    }

    fn remote_ue_report(&mut self, peer_l2_id: u32, imsi: u64) {
        let Some(device) = self.devices.get(&peer_l2_id) else {
            panic!("remote UE report for unknown peer {peer_l2_id}");
        };
        let prefix = match self.addressing.interface_prefix(device.ifindex) {
            Some(prefix) => prefix,
            None => panic!("no prefix delegated for relay interface {}", device.ifindex),
        };
        info!(peer = peer_l2_id, imsi, %prefix, "reporting remote UE upstream");
        self.addressing.report_remote_ue(prefix, imsi);
    }
}

/// Counters collected by the campaign controller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CampaignStats {
    /// Relay announcements seen
    pub discoveries: u32,
    /// Connection attempts started
    pub attempts: u32,
    /// Links established
    pub established: u32,
    /// Links torn down
    pub terminated: u32,
    /// Setups abandoned
    pub aborted: u32,
}

/// A basic controller that also counts link lifecycle events, for
/// measurement campaigns.
#[derive(Debug)]
pub struct CampaignController<A, N> {
    inner: BasicController<A, N>,
    stats: CampaignStats,
}

impl<A: AddressingProvider, N: NasGateway> CampaignController<A, N> {
    /// Wraps a basic controller with zeroed counters.
    pub fn new(addressing: A, nas: N, config: BasicControllerConfig) -> Self {
        Self {
            inner: BasicController::new(addressing, nas, config),
            stats: CampaignStats::default(),
        }
    }

    /// Counters collected so far
    pub fn stats(&self) -> CampaignStats {
        self.stats
    }

    /// The wrapped controller
    pub fn inner(&self) -> &BasicController<A, N> {
        &self.inner
    }
}

impl<A: AddressingProvider, N: NasGateway> SidelinkController for CampaignController<A, N> {
    fn recv_relay_service_discovery(&mut self, relay_l2_id: u32) -> Option<u32> {
        self.stats.discoveries += 1;
        let picked = self.inner.recv_relay_service_discovery(relay_l2_id);
        if picked.is_some() {
            self.stats.attempts += 1;
        }
        picked
    }

    fn connection_established(&mut self, peer_l2_id: u32, role: O2oRole) {
        self.stats.established += 1;
        self.inner.connection_established(peer_l2_id, role);
    }

    fn connection_terminated(&mut self, peer_l2_id: u32) {
        self.stats.terminated += 1;
        self.inner.connection_terminated(peer_l2_id);
    }

    fn connection_aborted(&mut self, peer_l2_id: u32) {
        self.stats.aborted += 1;
        self.inner.connection_aborted(peer_l2_id);
    }

    fn remote_ue_report(&mut self, peer_l2_id: u32, imsi: u64) {
        self.inner.remote_ue_report(peer_l2_id, imsi);
    }
}
