//! The protocol core: per-instance state, the public `open`/`close`/`send_*` surface, and the
//! `Callbacks` trait applications implement to receive data.

mod topology;
mod data;
#[cfg(all(test, feature = "std"))]
mod tests;

use crate::addr::NodeAddr;
use crate::nic::{Platform, Timer};
use crate::routing::RoutingTable;

/// Failure modes surfaced by [`Protocol::send_sink`]/[`Protocol::send_node`] (§7). None of
/// these are fatal: the instance's state is left unmutated whenever one is returned.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SendError {
    /// `send_sink` called with no parent known yet.
    NoParent,
    /// `send_node` called on a non-sink instance.
    NotSink,
    /// `send_node` found no sink-reachable path to the destination, or detected a routing loop.
    NoRoute,
}

/// Application hooks invoked on packet delivery. Both methods default to doing nothing, so an
/// application that only originates traffic in one direction need not implement the other.
pub trait Callbacks {
    /// Called at the sink when an upward data packet carrying a non-empty payload arrives.
    /// `originator` is the node the payload was sent from; `hops` is the number of unicast
    /// forwards it traversed.
    fn sink_recv(&mut self, _originator: NodeAddr, _hops: u8, _payload: &[u8]) {}

    /// Called at a node when a source-routed downward packet reaches it. `hops` is the number
    /// of unicast forwards traversed from the sink.
    fn node_recv(&mut self, _hops: u8, _payload: &[u8]) {}
}

/// Per-node protocol state (§3).
pub struct Protocol<P: Platform, C: Callbacks> {
    self_addr: NodeAddr,
    is_sink: bool,

    parent: NodeAddr,
    hop_to_sink: u16,
    parent_rssi: i16,
    beacon_seqn: u16,

    topology_dirty: bool,
    topology_refreshed: bool,

    routing_table: Option<RoutingTable>,
    callbacks: C,

    broadcast: P::Broadcast,
    unicast: P::Unicast,
    beacon_timer: P::Timer,
    topology_timer: P::Timer,
    random: P::Random,
}

impl<P: Platform, C: Callbacks> Protocol<P, C> {
    /// Open a protocol instance. At the sink, arms the initial beacon timer and allocates a
    /// routing table of capacity `nodes` with growth enabled; on a node, `nodes` is unused.
    pub fn open(
        self_addr: NodeAddr,
        is_sink: bool,
        nodes: usize,
        broadcast: P::Broadcast,
        unicast: P::Unicast,
        mut beacon_timer: P::Timer,
        topology_timer: P::Timer,
        random: P::Random,
        callbacks: C,
    ) -> Self {
        let mut proto = Protocol {
            self_addr,
            is_sink,
            parent: NodeAddr::NULL,
            hop_to_sink: if is_sink { 0 } else { u16::MAX },
            parent_rssi: if is_sink { 0 } else { i16::MIN },
            // The sink's first emitted beacon carries `seqn = 1` (§8 scenario 1); the original
            // `open_protocol` sets `conn->beacon_seqn = 1` at the sink for the same reason.
            beacon_seqn: if is_sink { 1 } else { 0 },
            topology_dirty: false,
            topology_refreshed: false,
            routing_table: if is_sink {
                Some(RoutingTable::new(nodes, true))
            } else {
                None
            },
            callbacks,
            broadcast,
            unicast,
            beacon_timer,
            topology_timer,
            random,
        };
        if is_sink {
            proto.beacon_timer.arm(crate::constants::INIT_BEACON_DELAY);
        }
        log::debug!("opened protocol instance {} (is_sink={})", self_addr, is_sink);
        proto
    }

    /// Tear down the instance, releasing the routing table. Dropping `self` already does this;
    /// `close` exists so callers have an explicit counterpart to `open`.
    pub fn close(self) {}

    pub fn self_addr(&self) -> NodeAddr {
        self.self_addr
    }

    pub fn is_sink(&self) -> bool {
        self.is_sink
    }

    pub fn parent(&self) -> NodeAddr {
        self.parent
    }

    pub fn hop_to_sink(&self) -> u16 {
        self.hop_to_sink
    }

    pub fn beacon_seqn(&self) -> u16 {
        self.beacon_seqn
    }

    pub fn topology_dirty(&self) -> bool {
        self.topology_dirty
    }

    pub fn topology_refreshed(&self) -> bool {
        self.topology_refreshed
    }

    pub fn routing_table(&self) -> Option<&RoutingTable> {
        self.routing_table.as_ref()
    }

    /// Mutable routing-table access, for scenario tests that need to seed a table directly
    /// instead of growing it through observed upward traffic.
    #[cfg(test)]
    pub(crate) fn routing_table_mut_for_test(&mut self) -> &mut RoutingTable {
        self.routing_table.as_mut().expect("sink instances always carry a routing table")
    }

    pub fn callbacks(&self) -> &C {
        &self.callbacks
    }

    pub fn callbacks_mut(&mut self) -> &mut C {
        &mut self.callbacks
    }
}
