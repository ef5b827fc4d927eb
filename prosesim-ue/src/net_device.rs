//! Virtual sidelink network device
//!
//! One device is created per established one-to-one link and carries the IP
//! traffic exchanged with that peer.

use std::net::Ipv6Addr;

use prosesim_pc5::O2oRole;

/// A virtual network device bound to one sidelink peer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlNetDevice {
    /// Layer 2 identifier of the peer behind this device
    pub peer_l2_id: u32,
    /// Interface index on the host
    pub ifindex: u32,
    /// Which end of the link this device serves
    pub role: O2oRole,
    /// Address assigned to the interface, once addressing completes
    pub address: Option<Ipv6Addr>,
    /// Administrative state
    pub up: bool,
}

impl SlNetDevice {
    /// Creates a device in the up state with no address yet.
    pub fn new(peer_l2_id: u32, ifindex: u32, role: O2oRole) -> Self {
        Self {
            peer_l2_id,
            ifindex,
            role,
            address: None,
            up: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_device() {
        let dev = SlNetDevice::new(7, 3, O2oRole::Remote);
        assert_eq!(dev.peer_l2_id, 7);
        assert_eq!(dev.ifindex, 3);
        assert!(dev.up);
        assert!(dev.address.is_none());
    }
}
