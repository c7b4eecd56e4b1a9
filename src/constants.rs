//! Protocol constants.
//!
//! Values per the reference deployment's `params.h`. These are fixed by the protocol, not
//! host-tunable; a host that wants accelerated timing (e.g. in tests) should scale its own
//! [`crate::nic::Timer`] implementation rather than override these.

use core::time::Duration;

/// Beacons with a weaker RSSI than this are rejected outright, regardless of metric.
pub const RSSI_THRESHOLD: i16 = -95;

/// Period at which the sink re-emits its beacon.
pub const BEACON_PERIOD: Duration = Duration::from_secs(30);

/// Delay before the sink's very first beacon emission after `open`.
pub const INIT_BEACON_DELAY: Duration = Duration::from_secs(5);

/// Delay after accepting a new parent before emitting a dedicated reverse-path update,
/// measured from the moment the triggering beacon was accepted (on top of `FORWARD_DELAY`).
pub const TOPOLOGY_UPDATE_DELAY: Duration = Duration::from_secs(BEACON_PERIOD.as_secs() / 6);

/// Upper (exclusive) bound of the random re-broadcast jitter window.
pub const FORWARD_DELAY_BOUND: Duration = Duration::from_secs(1);
