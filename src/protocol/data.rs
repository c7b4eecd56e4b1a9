//! Upward unicast delivery, sink-side route learning, and downward source routing (§4.5).

use super::{Callbacks, Protocol, SendError};
use crate::addr::NodeAddr;
use crate::alloc::vec::Vec;
use crate::nic::{PacketBuffer, Platform, Unicast};
use crate::routing::RoutingEntry;
use crate::wire::header::{read_packet_id, write_packet_header, PacketId};
use crate::wire::piggyback::{self, PiggybackHeader};
use crate::wire::source_route::SourceRouteHeader;

impl<P: Platform, C: Callbacks> Protocol<P, C> {
    /// Send `payload` upward toward the sink (§4.5.1). Fails with [`SendError::NoParent`] if
    /// no parent has been learned yet.
    pub fn send_sink(&mut self, buf: &mut P::Buffer, payload: &[u8]) -> Result<i32, SendError> {
        if self.parent.is_null() {
            return Err(SendError::NoParent);
        }

        let header = PiggybackHeader {
            source: self.self_addr,
            parent: self.parent,
            hops: 0,
        };

        // This outgoing packet becomes the reverse-path carrier for a pending parent change,
        // if any; a dedicated update is then no longer needed.
        if self.topology_dirty && !self.topology_refreshed {
            self.topology_refreshed = true;
            self.topology_dirty = false;
        }

        buf.clear();
        buf.set_payload(payload);
        let bytes = header.encode();
        write_packet_header(buf, PacketId::Data, &bytes);

        let parent = self.parent;
        Ok(self.unicast.send(buf, parent))
    }

    /// Dispatch an inbound unicast packet by its envelope id (§4.2, §4.5.2, §4.5.4).
    pub fn on_unicast_receive(&mut self, buf: &mut P::Buffer) {
        match read_packet_id(buf) {
            Some(PacketId::Data) => self.handle_data(buf),
            Some(PacketId::SourceRoute) => self.handle_source_route(buf),
            None => {
                log::trace!("dropped unicast packet with missing or unrecognized packet id");
            }
        }
    }

    fn handle_data(&mut self, buf: &mut P::Buffer) {
        let header = match PiggybackHeader::decode(buf.as_slice()) {
            Some(header) => header,
            None => {
                log::trace!("dropped malformed data packet");
                return;
            }
        };
        buf.strip(piggyback::SIZE);
        let hops = header.hops.saturating_add(1);

        if self.is_sink {
            let source = header.source;
            let parent = header.parent;
            {
                let table = self
                    .routing_table
                    .as_mut()
                    .expect("sink instances always carry a routing table");
                match table.get(source) {
                    None => {
                        table.add(RoutingEntry { child: source, parent });
                    }
                    Some((_, entry)) => {
                        if entry.parent != parent {
                            table.update(RoutingEntry { child: source, parent });
                        }
                    }
                }
            }
            if !buf.is_empty() {
                self.callbacks.sink_recv(source, hops, buf.as_slice());
            }
        } else {
            let forwarded = PiggybackHeader {
                source: header.source,
                parent: header.parent,
                hops,
            };
            let bytes = forwarded.encode();
            write_packet_header(buf, PacketId::Data, &bytes);
            let parent = self.parent;
            let _ = self.unicast.send(buf, parent);
        }
    }

    fn handle_source_route(&mut self, buf: &mut P::Buffer) {
        let (header, consumed) = match SourceRouteHeader::decode(buf.as_slice()) {
            Some(decoded) => decoded,
            None => {
                log::trace!("dropped malformed source-route packet");
                return;
            }
        };
        buf.strip(consumed);
        let hops = header.hops.saturating_add(1);

        if header.path.is_empty() {
            self.callbacks.node_recv(hops, buf.as_slice());
        } else {
            let next_hop = header.path[0];
            let remainder = SourceRouteHeader {
                hops,
                path: header.path[1..].to_vec(),
            };
            let bytes = remainder.encode();
            write_packet_header(buf, PacketId::SourceRoute, &bytes);
            let _ = self.unicast.send(buf, next_hop);
        }
    }

    /// Send `payload` downward to `dest` via a freshly constructed source route (§4.5.3).
    /// Fails with [`SendError::NotSink`] off the sink, or [`SendError::NoRoute`] if no
    /// sink-reachable path exists or a loop is detected.
    pub fn send_node(
        &mut self,
        buf: &mut P::Buffer,
        dest: NodeAddr,
        payload: &[u8],
    ) -> Result<i32, SendError> {
        if !self.is_sink {
            return Err(SendError::NotSink);
        }

        let path = self.build_route(dest)?;
        let first_hop = path[0];
        let header = SourceRouteHeader {
            hops: 0,
            path: path[1..].to_vec(),
        };

        buf.clear();
        buf.set_payload(payload);
        let bytes = header.encode();
        write_packet_header(buf, PacketId::SourceRoute, &bytes);

        Ok(self.unicast.send(buf, first_hop))
    }

    /// Walk the routing table from `dest` up to the sink, bounded by the table's capacity so a
    /// cycle (no sink-reachable path) is detected rather than looped forever (§4.5.3, §9).
    fn build_route(&self, dest: NodeAddr) -> Result<Vec<NodeAddr>, SendError> {
        let table = self
            .routing_table
            .as_ref()
            .expect("sink instances always carry a routing table");

        let mut lookup = Vec::new();
        lookup.push(dest);
        let mut current = dest;
        let mut reached_sink = false;
        let bound = table.capacity().max(1);

        loop {
            let (_, entry) = table.get(current).ok_or(SendError::NoRoute)?;
            current = entry.parent;
            if current == self.self_addr {
                reached_sink = true;
                break;
            }
            if !current.is_null() {
                lookup.push(current);
            }
            if lookup.len() >= bound {
                break;
            }
        }

        if !reached_sink {
            return Err(SendError::NoRoute);
        }

        lookup.reverse();
        Ok(lookup)
    }
}
