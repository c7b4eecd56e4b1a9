//! Wire formats: the packet-id envelope and the three typed headers that ride inside it.
//!
//! `header` only ever touches a single discriminant byte through the `nic::PacketBuffer`
//! trait and needs nothing beyond `core`. `beacon`, `piggyback` and `source_route` all encode
//! through [`crate::buffer::WriteBuffer`] and decode through [`crate::buffer::ReadBuffer`], so
//! all three need `alloc`.

pub mod header;
#[cfg(feature = "alloc")]
pub mod beacon;
#[cfg(feature = "alloc")]
pub mod piggyback;
#[cfg(feature = "alloc")]
pub mod source_route;

pub use header::PacketId;
#[cfg(feature = "alloc")]
pub use beacon::BeaconMessage;
#[cfg(feature = "alloc")]
pub use piggyback::PiggybackHeader;
#[cfg(feature = "alloc")]
pub use source_route::SourceRouteHeader;
