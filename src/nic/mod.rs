//! Host collaborator traits.
//!
//! The protocol core never touches a radio, an allocator-backed packet pool, or a scheduler
//! directly; it is generic over a small set of traits a host implements once. This mirrors
//! `ethox`'s own `layer::eth::{Recv, Send}` split: narrow, direction-specific traits owned by
//! the host, rather than a single monolithic device object.

use crate::addr::NodeAddr;
use core::time::Duration;

#[cfg(feature = "alloc")]
pub mod external;

/// A single packet's backing storage: a byte region that headers can be prepended to and
/// stripped from at the front, in either direction.
///
/// This generalizes the reference deployment's packet-buffer primitives (`hdralloc`,
/// `hdrptr`, `hdrreduce`, `dataptr`/`datalen`) into a prepend/strip pair over a flat byte
/// slice; nothing below the protocol core needs to distinguish "header" from "payload" bytes
/// other than by how many have been consumed so far.
pub trait PacketBuffer {
    /// Discard all contents.
    fn clear(&mut self);

    /// Replace the entire contents with `bytes` (used to seed the application payload before
    /// headers are prepended for a send).
    fn set_payload(&mut self, bytes: &[u8]);

    /// Prepend `bytes` to the front of the buffer. Returns `false` (performing no mutation) if
    /// the backing region has no room left for the additional bytes.
    fn prepend(&mut self, bytes: &[u8]) -> bool;

    /// Strip `n` bytes from the front of the buffer. `n` must not exceed `self.len()`.
    fn strip(&mut self, n: usize);

    /// The buffer's current contents.
    fn as_slice(&self) -> &[u8];

    fn len(&self) -> usize {
        self.as_slice().len()
    }

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// The broadcast (one-to-all) send primitive of the link layer.
pub trait Broadcast<B: PacketBuffer> {
    fn send(&mut self, buf: &B);
}

/// The unicast (one-to-one) send primitive of the link layer.
pub trait Unicast<B: PacketBuffer> {
    /// Send `buf` to `dest`, returning the link layer's raw result code (non-negative on
    /// success, per the reference deployment's `unicast_send` convention).
    fn send(&mut self, buf: &B, dest: NodeAddr) -> i32;
}

/// A one-shot, overwritable delay timer.
///
/// Arming an already-armed timer replaces the pending fire, exactly as the reference
/// deployment's `ctimer_set` does.
pub trait Timer {
    fn arm(&mut self, delay: Duration);
}

/// The node's source of randomness, used only to pick the re-broadcast jitter.
pub trait Random {
    /// A uniformly distributed delay in `[0, FORWARD_DELAY_BOUND)`.
    fn forward_delay(&mut self) -> Duration;
}

/// Bundles one node's concrete collaborator types.
///
/// A host implements this once per deployment (e.g. once for its real radio stack, once for
/// an in-memory test harness — see [`external`]) and instantiates [`crate::protocol::Protocol`]
/// over it.
pub trait Platform {
    type Buffer: PacketBuffer;
    type Broadcast: Broadcast<Self::Buffer>;
    type Unicast: Unicast<Self::Buffer>;
    type Timer: Timer;
    type Random: Random;
}
