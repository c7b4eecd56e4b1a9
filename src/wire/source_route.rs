//! The downward source-route header: `{ length: u8, hops: u8, path: addr × length }`.
//!
//! `path` lists the hops remaining *after* the next hop; the next hop itself travels only as
//! the unicast destination, never inside the header (§3, §4.5.3).

use crate::addr::{NodeAddr, ADDR_SIZE};
use crate::alloc::vec::Vec;
use crate::buffer::{ReadBuffer, WriteBuffer};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SourceRouteHeader {
    pub hops: u8,
    pub path: Vec<NodeAddr>,
}

impl SourceRouteHeader {
    /// Serialize as `length, hops, path[...]`. `length` is `path.len()` truncated to `u8`,
    /// matching the reference deployment's `u8` hop-count fields.
    pub fn encode(&self) -> Vec<u8> {
        let mut out = WriteBuffer::new(2 + self.path.len() * ADDR_SIZE);
        out.write(&[self.path.len() as u8]);
        out.write(&[self.hops]);
        for addr in &self.path {
            out.write(addr.as_bytes());
        }
        out.into_vec()
    }

    /// Decode a header from the front of `data`. Returns the header and the number of bytes
    /// consumed. `None` if `data` is shorter than two bytes, or shorter than the declared
    /// `length * addr_size` tail (malformed inbound packet, §7).
    pub fn decode(data: &[u8]) -> Option<(Self, usize)> {
        let mut cursor = ReadBuffer::new(data);
        let length = cursor.read(1)?[0] as usize;
        let hops = cursor.read(1)?[0];

        let mut path = Vec::with_capacity(length);
        for _ in 0..length {
            let addr_bytes = cursor.read(ADDR_SIZE)?;
            let mut addr = [0u8; ADDR_SIZE];
            addr.copy_from_slice(addr_bytes);
            path.push(NodeAddr(addr));
        }
        let consumed = data.len() - cursor.remaining();
        Some((SourceRouteHeader { hops, path }, consumed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips() {
        let header = SourceRouteHeader {
            hops: 1,
            path: Vec::from([NodeAddr::new(0, 3), NodeAddr::new(0, 4)]),
        };
        let bytes = header.encode();
        let (decoded, consumed) = SourceRouteHeader::decode(&bytes).unwrap();
        assert_eq!(decoded, header);
        assert_eq!(consumed, bytes.len());
    }

    #[test]
    fn decode_rejects_truncated_path() {
        // Declares two hops but only supplies one address's worth of bytes.
        let bytes = [2u8, 0, 0, 3];
        assert_eq!(SourceRouteHeader::decode(&bytes), None);
    }

    #[test]
    fn empty_path_decodes_to_delivery() {
        let header = SourceRouteHeader { hops: 3, path: Vec::new() };
        let bytes = header.encode();
        let (decoded, consumed) = SourceRouteHeader::decode(&bytes).unwrap();
        assert!(decoded.path.is_empty());
        assert_eq!(consumed, 2);
    }
}
