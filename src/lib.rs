//! A two-way collection protocol for multi-hop, low-power wireless networks.
//!
//! Nodes form a tree rooted at a single designated sink. Upward traffic (many-to-one) is
//! forwarded hop-by-hop along parent pointers learned from periodic beacons; downward traffic
//! (one-to-many) is source-routed using paths the sink reconstructs from a routing table it
//! builds by observing upward packets.
//!
//! ## Layering
//!
//! [`wire`] holds the on-air formats (the packet-id envelope and the three typed headers) as
//! plain encode/decode pairs with no protocol logic. [`protocol`] holds the state machine:
//! beacon-driven topology maintenance ([`protocol::Protocol::on_beacon_timer`],
//! [`protocol::Protocol::on_broadcast_receive`], [`protocol::Protocol::on_topology_timer`]) and
//! the data plane ([`protocol::Protocol::send_sink`], [`protocol::Protocol::send_node`],
//! [`protocol::Protocol::on_unicast_receive`]). Neither module touches a radio, a clock, or an
//! allocator-backed packet pool directly; both are generic over the [`nic`] traits, which a
//! host implements once per deployment.
//!
//! ## No radio, no clock
//!
//! This crate does not own an event loop. A host's link-layer receive handler calls
//! [`protocol::Protocol::on_broadcast_receive`] or [`protocol::Protocol::on_unicast_receive`]
//! directly when a frame arrives; its timer facility calls
//! [`protocol::Protocol::on_beacon_timer`] or [`protocol::Protocol::on_topology_timer`] when a
//! [`nic::Timer`] fires. All of protocol state is mutated only from within these calls, which
//! the host is expected to serialize (§5): there is no internal locking.
#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(feature = "alloc")]
extern crate alloc;

pub mod addr;
pub mod constants;
pub mod nic;
pub mod wire;

#[cfg(feature = "alloc")]
pub mod buffer;

#[cfg(feature = "alloc")]
pub mod routing;

#[cfg(feature = "alloc")]
pub mod protocol;

pub use addr::NodeAddr;
