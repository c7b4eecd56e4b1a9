//! The broadcast beacon payload: `{ seqn: u16, hop_to_sink: u16 }`.

use byteorder::{ByteOrder, NativeEndian};

use crate::alloc::vec::Vec;
use crate::buffer::{ReadBuffer, WriteBuffer};

/// Size in bytes of an encoded [`BeaconMessage`].
pub const SIZE: usize = 4;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BeaconMessage {
    pub seqn: u16,
    pub hop_to_sink: u16,
}

impl BeaconMessage {
    pub fn encode(&self) -> Vec<u8> {
        let mut seqn = [0u8; 2];
        let mut hop_to_sink = [0u8; 2];
        NativeEndian::write_u16(&mut seqn, self.seqn);
        NativeEndian::write_u16(&mut hop_to_sink, self.hop_to_sink);

        let mut out = WriteBuffer::new(SIZE);
        out.write(&seqn);
        out.write(&hop_to_sink);
        out.into_vec()
    }

    /// Decode a beacon from the front of `data`. `None` if fewer than [`SIZE`] bytes remain.
    pub fn decode(data: &[u8]) -> Option<Self> {
        let mut cursor = ReadBuffer::new(data);
        let seqn = cursor.read(2)?;
        let hop_to_sink = cursor.read(2)?;
        Some(BeaconMessage {
            seqn: NativeEndian::read_u16(seqn),
            hop_to_sink: NativeEndian::read_u16(hop_to_sink),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips() {
        let msg = BeaconMessage { seqn: 7, hop_to_sink: 3 };
        let bytes = msg.encode();
        assert_eq!(BeaconMessage::decode(&bytes), Some(msg));
    }

    #[test]
    fn decode_rejects_short_input() {
        assert_eq!(BeaconMessage::decode(&[0u8; 3]), None);
    }
}
