//! Beacon emission, reception, and the topology-update timer (§4.4).

use super::{Callbacks, Protocol};
use crate::addr::NodeAddr;
use crate::constants::{BEACON_PERIOD, RSSI_THRESHOLD, TOPOLOGY_UPDATE_DELAY};
use crate::nic::{Broadcast, PacketBuffer, Platform, Random, Timer};
use crate::wire::beacon::BeaconMessage;

impl<P: Platform, C: Callbacks> Protocol<P, C> {
    /// Build and broadcast a beacon advertising the instance's current `beacon_seqn` and
    /// `hop_to_sink`.
    fn send_beacon(&mut self, buf: &mut P::Buffer) {
        let msg = BeaconMessage {
            seqn: self.beacon_seqn,
            hop_to_sink: self.hop_to_sink,
        };
        let bytes = msg.encode();
        buf.clear();
        buf.set_payload(&bytes);
        self.broadcast.send(buf);
    }

    /// Drive `beacon_timer` expiry: at the sink this is the periodic beacon emission; at a
    /// node this is the delayed re-broadcast of an accepted beacon.
    pub fn on_beacon_timer(&mut self, buf: &mut P::Buffer) {
        self.send_beacon(buf);
        if self.is_sink {
            self.beacon_seqn = self.beacon_seqn.wrapping_add(1);
            self.beacon_timer.arm(BEACON_PERIOD);
        }
    }

    /// Process a received beacon broadcast. No-op on a sink (sinks ignore beacons). `sender`
    /// is the broadcasting node's address; `rssi` is the link-layer's reported signal strength
    /// for this reception.
    pub fn on_broadcast_receive(&mut self, buf: &P::Buffer, sender: NodeAddr, rssi: i16) {
        if self.is_sink {
            return;
        }
        let msg = match BeaconMessage::decode(buf.as_slice()) {
            Some(m) => m,
            None => {
                log::trace!("dropped undersized beacon broadcast");
                return;
            }
        };

        if rssi < RSSI_THRESHOLD {
            log::debug!("rejected beacon from {}: rssi {} below threshold", sender, rssi);
            return;
        }
        if msg.seqn < self.beacon_seqn {
            log::trace!(
                "rejected stale beacon from {}: seqn {} < current {}",
                sender, msg.seqn, self.beacon_seqn
            );
            return;
        }
        if msg.seqn == self.beacon_seqn {
            if msg.hop_to_sink.saturating_add(1) > self.hop_to_sink {
                log::trace!("rejected beacon from {}: no hop-count improvement", sender);
                return;
            }
            if rssi <= self.parent_rssi {
                log::trace!("rejected beacon from {}: rssi tie-break favors current parent", sender);
                return;
            }
        }

        let old_parent = self.parent;
        self.parent = sender;
        self.hop_to_sink = msg.hop_to_sink.saturating_add(1);
        self.parent_rssi = rssi;
        self.beacon_seqn = msg.seqn;

        let forward_delay = self.random.forward_delay();
        self.beacon_timer.arm(forward_delay);

        if self.parent != old_parent {
            log::debug!("parent changed from {} to {} (hop_to_sink={})", old_parent, self.parent, self.hop_to_sink);
            self.topology_dirty = true;
            self.topology_refreshed = false;
            self.topology_timer.arm(TOPOLOGY_UPDATE_DELAY + forward_delay);
        }
    }

    /// Drive the dedicated reverse-path update. The host calls this when `topology_timer`
    /// fires. Emits an empty-payload upward packet if a parent change has not yet been
    /// piggybacked onto real traffic.
    pub fn on_topology_timer(&mut self, buf: &mut P::Buffer) {
        if self.topology_dirty && !self.topology_refreshed {
            let _ = self.send_sink(buf, &[]);
            self.topology_dirty = false;
            self.topology_refreshed = false;
        }
    }
}
