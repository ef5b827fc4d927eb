//! Traffic filters steering IP traffic onto sidelink bearers.

use std::net::Ipv6Addr;

/// Which direction a filter applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterDirection {
    /// Incoming traffic only
    Receive,
    /// Both directions
    Bidirectional,
}

/// Whose address the filter matches on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterScope {
    /// Traffic to or from this UE's own sidelink address
    Local,
    /// Traffic to or from the peer's delegated prefix
    Remote,
}

/// One traffic filter towards a sidelink peer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrafficFilter {
    /// Direction the filter applies to
    pub direction: FilterDirection,
    /// Whose address the filter matches on
    pub scope: FilterScope,
    /// Matched address or prefix base
    pub address: Ipv6Addr,
    /// Prefix length when matching a whole prefix; `None` matches the host
    pub prefix_len: Option<u8>,
    /// Peer whose bearer the matched traffic uses
    pub peer_l2_id: u32,
}
