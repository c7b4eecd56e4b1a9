//! A reference [`Platform`](super::Platform) backed by plain heap buffers and, under the
//! `std` feature, an in-process broadcast medium.
//!
//! Grounded in `ethox`'s own `nic::external::External` test device: a NIC implementation that
//! exists purely so the crate's own test suite and demo do not need a real radio.

use crate::addr::NodeAddr;
use crate::alloc::vec::Vec;
use crate::nic::PacketBuffer;

/// A fixed-capacity, heap-backed packet buffer.
pub struct Buffer {
    data: Vec<u8>,
    capacity: usize,
}

impl Buffer {
    pub fn new(capacity: usize) -> Self {
        Buffer {
            data: Vec::with_capacity(capacity),
            capacity,
        }
    }
}

impl PacketBuffer for Buffer {
    fn clear(&mut self) {
        self.data.clear();
    }

    fn set_payload(&mut self, bytes: &[u8]) {
        self.data.clear();
        self.data.extend_from_slice(bytes);
    }

    fn prepend(&mut self, bytes: &[u8]) -> bool {
        if self.data.len() + bytes.len() > self.capacity {
            return false;
        }
        let mut next = Vec::with_capacity(self.capacity);
        next.extend_from_slice(bytes);
        next.extend_from_slice(&self.data);
        self.data = next;
        true
    }

    fn strip(&mut self, n: usize) {
        self.data.drain(0..n);
    }

    fn as_slice(&self) -> &[u8] {
        &self.data
    }
}

/// An in-process broadcast/unicast medium and per-node timer/random facilities, for tests and
/// the demo binary only.
#[cfg(feature = "std")]
pub mod network {
    use super::*;
    use crate::nic::{Broadcast, Random, Timer, Unicast};
    use std::cell::RefCell;
    use std::collections::VecDeque;
    use std::rc::Rc;
    use std::time::Duration;
    use rand::Rng;

    /// A received frame queued for later delivery.
    pub struct Delivery {
        pub from: NodeAddr,
        pub rssi: i16,
        pub data: Vec<u8>,
    }

    /// Shared in-memory medium: every node's outgoing broadcast/unicast lands in every other
    /// node's inbox, annotated with a caller-supplied RSSI table. No actual scheduling happens
    /// here; a test or demo drains inboxes explicitly between simulated time steps.
    pub struct Medium {
        inboxes: std::collections::HashMap<NodeAddr, VecDeque<Delivery>>,
        rssi: std::collections::HashMap<(NodeAddr, NodeAddr), i16>,
        default_rssi: i16,
    }

    impl Medium {
        pub fn new(default_rssi: i16) -> Rc<RefCell<Self>> {
            Rc::new(RefCell::new(Medium {
                inboxes: std::collections::HashMap::new(),
                rssi: std::collections::HashMap::new(),
                default_rssi,
            }))
        }

        pub fn register(&mut self, node: NodeAddr) {
            self.inboxes.entry(node).or_insert_with(VecDeque::new);
        }

        /// Fix the simulated RSSI observed by `to` when hearing `from`.
        pub fn set_link_rssi(&mut self, from: NodeAddr, to: NodeAddr, rssi: i16) {
            self.rssi.insert((from, to), rssi);
        }

        fn rssi_of(&self, from: NodeAddr, to: NodeAddr) -> i16 {
            *self.rssi.get(&(from, to)).unwrap_or(&self.default_rssi)
        }

        pub fn pop(&mut self, node: NodeAddr) -> Option<Delivery> {
            self.inboxes.get_mut(&node).and_then(|q| q.pop_front())
        }
    }

    /// A [`Broadcast`] endpoint sending into a shared [`Medium`].
    pub struct MediumBroadcast {
        pub medium: Rc<RefCell<Medium>>,
        pub source: NodeAddr,
    }

    impl Broadcast<Buffer> for MediumBroadcast {
        fn send(&mut self, buf: &Buffer) {
            let mut medium = self.medium.borrow_mut();
            let targets: Vec<NodeAddr> = medium.inboxes.keys().cloned().collect();
            for target in targets {
                if target == self.source {
                    continue;
                }
                let rssi = medium.rssi_of(self.source, target);
                medium.inboxes.get_mut(&target).unwrap().push_back(Delivery {
                    from: self.source,
                    rssi,
                    data: buf.as_slice().to_vec(),
                });
            }
        }
    }

    /// A [`Unicast`] endpoint sending into a shared [`Medium`].
    pub struct MediumUnicast {
        pub medium: Rc<RefCell<Medium>>,
        pub source: NodeAddr,
    }

    impl Unicast<Buffer> for MediumUnicast {
        fn send(&mut self, buf: &Buffer, dest: NodeAddr) -> i32 {
            let mut medium = self.medium.borrow_mut();
            if !medium.inboxes.contains_key(&dest) {
                return -1;
            }
            let rssi = medium.rssi_of(self.source, dest);
            medium.inboxes.get_mut(&dest).unwrap().push_back(Delivery {
                from: self.source,
                rssi,
                data: buf.as_slice().to_vec(),
            });
            0
        }
    }

    /// A timer that records its most recently armed deadline; a test or demo drives time by
    /// polling [`ManualTimer::due`] against its own clock rather than by real sleeping.
    #[derive(Default)]
    pub struct ManualTimer {
        pub deadline: Option<Duration>,
    }

    impl Timer for ManualTimer {
        fn arm(&mut self, delay: Duration) {
            self.deadline = Some(delay);
        }
    }

    /// A [`Random`] backed by `rand`'s thread-local generator.
    pub struct ThreadRandom;

    impl Random for ThreadRandom {
        fn forward_delay(&mut self) -> Duration {
            let millis = rand::thread_rng().gen_range(0..1000);
            Duration::from_millis(millis)
        }
    }
}
