//! UE-side sidelink link control
//!
//! The link controller sits between the PC5 state machine and the host
//! stack: it decides when to connect to a discovered relay, creates a
//! virtual network device per established link, and drives addressing,
//! traffic filters and sidelink bearers as links come and go.

pub mod controller;
pub mod filter;
pub mod net_device;

pub use controller::{
    AddressingProvider, BasicController, BasicControllerConfig, CampaignController,
    CampaignStats, NasGateway, SidelinkController, UPSTREAM_IFINDEX,
};
pub use filter::{FilterDirection, FilterScope, TrafficFilter};
pub use net_device::SlNetDevice;
