//! Shared fixtures for the integration tests

use std::net::Ipv6Addr;

use prosesim_pc5::O2oRole;
use prosesim_ue::{AddressingProvider, NasGateway, TrafficFilter};

/// Initializes tracing for a test. Safe to call from every test, only the
/// first call installs the subscriber.
pub fn init_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("debug")),
        )
        .with_test_writer()
        .try_init();
}

/// An addressing provider backed by plain vectors, deterministic enough for
/// end to end assertions.
#[derive(Debug, Default)]
pub struct HostAddressing {
    /// Interfaces currently holding an address
    pub addressed: Vec<u32>,
    /// Interface the default route points at, if any
    pub default_route: Option<u32>,
    /// (delegated prefix, imsi) pairs reported upstream
    pub reported: Vec<(Ipv6Addr, u64)>,
}

impl AddressingProvider for HostAddressing {
    fn assign_address(&mut self, ifindex: u32, _role: O2oRole) -> Ipv6Addr {
        self.addressed.push(ifindex);
        Ipv6Addr::new(0xfd00, 0, 0, ifindex as u16, 0, 0, 0, 1)
    }

    fn remove_address(&mut self, ifindex: u32) {
        self.addressed.retain(|&i| i != ifindex);
        if self.default_route == Some(ifindex) {
            self.default_route = None;
        }
    }

    fn interface_prefix(&self, ifindex: u32) -> Option<Ipv6Addr> {
        Some(Ipv6Addr::new(0xfd00, 0xcafe, ifindex as u16, 0, 0, 0, 0, 0))
    }

    fn set_default_route(&mut self, ifindex: u32) {
        self.default_route = Some(ifindex);
    }

    fn report_remote_ue(&mut self, prefix: Ipv6Addr, imsi: u64) {
        self.reported.push((prefix, imsi));
    }
}

/// A bearer and filter backend backed by plain vectors.
#[derive(Debug, Default)]
pub struct HostNas {
    /// Filters currently installed
    pub filters: Vec<TrafficFilter>,
    /// Peers with an active sidelink bearer
    pub active_bearers: Vec<u32>,
    /// (sidelink ifindex, upstream ifindex) pairs with forwarding enabled
    pub forwarding: Vec<(u32, u32)>,
}

impl NasGateway for HostNas {
    fn install_filter(&mut self, filter: TrafficFilter) {
        self.filters.push(filter);
    }

    fn remove_filters(&mut self, peer_l2_id: u32) {
        self.filters.retain(|f| f.peer_l2_id != peer_l2_id);
    }

    fn activate_sidelink_bearer(&mut self, peer_l2_id: u32) {
        self.active_bearers.push(peer_l2_id);
    }

    fn deactivate_sidelink_bearer(&mut self, peer_l2_id: u32) {
        self.active_bearers.retain(|&p| p != peer_l2_id);
    }

    fn set_forwarding(&mut self, sidelink_ifindex: u32, upstream_ifindex: u32, enabled: bool) {
        if enabled {
            self.forwarding.push((sidelink_ifindex, upstream_ifindex));
        } else {
            self.forwarding
                .retain(|&pair| pair != (sidelink_ifindex, upstream_ifindex));
        }
    }
}
