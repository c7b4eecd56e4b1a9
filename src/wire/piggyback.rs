//! The reverse-path header piggybacked on every upward `DATA` packet:
//! `{ source: addr, parent: addr, hops: u8 }`.

use crate::addr::{NodeAddr, ADDR_SIZE};
use crate::alloc::vec::Vec;
use crate::buffer::{ReadBuffer, WriteBuffer};

/// Size in bytes of an encoded [`PiggybackHeader`].
pub const SIZE: usize = 2 * ADDR_SIZE + 1;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PiggybackHeader {
    pub source: NodeAddr,
    pub parent: NodeAddr,
    pub hops: u8,
}

impl PiggybackHeader {
    pub fn encode(&self) -> Vec<u8> {
        let mut out = WriteBuffer::new(SIZE);
        out.write(self.source.as_bytes());
        out.write(self.parent.as_bytes());
        out.write(&[self.hops]);
        out.into_vec()
    }

    /// Decode a header from the front of `data`. `None` if fewer than [`SIZE`] bytes remain.
    pub fn decode(data: &[u8]) -> Option<Self> {
        let mut cursor = ReadBuffer::new(data);
        let source = cursor.read(ADDR_SIZE)?;
        let parent = cursor.read(ADDR_SIZE)?;
        let hops = cursor.read(1)?;

        let mut source_bytes = [0u8; ADDR_SIZE];
        let mut parent_bytes = [0u8; ADDR_SIZE];
        source_bytes.copy_from_slice(source);
        parent_bytes.copy_from_slice(parent);
        Some(PiggybackHeader {
            source: NodeAddr(source_bytes),
            parent: NodeAddr(parent_bytes),
            hops: hops[0],
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips() {
        let header = PiggybackHeader {
            source: NodeAddr::new(0, 4),
            parent: NodeAddr::new(0, 3),
            hops: 2,
        };
        let bytes = header.encode();
        assert_eq!(PiggybackHeader::decode(&bytes), Some(header));
    }

    #[test]
    fn decode_rejects_short_input() {
        assert_eq!(PiggybackHeader::decode(&[0u8; SIZE - 1]), None);
    }
}
