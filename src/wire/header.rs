//! The one-byte packet-id envelope every unicast packet is prefixed with.

use crate::nic::PacketBuffer;

/// The type-specific header that follows the envelope byte.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PacketId {
    /// Source-routed downward traffic. Numeric value `0`, matching the reference deployment.
    SourceRoute = 0,
    /// Upward traffic carrying a piggybacked reverse-path header. Numeric value `1`.
    Data = 1,
}

impl PacketId {
    fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            0 => Some(PacketId::SourceRoute),
            1 => Some(PacketId::Data),
            _ => None,
        }
    }
}

/// Prepend `id` followed by `header_bytes` to `buf`. A no-op (including not writing `id`) if
/// the link layer reports no room for the combined header.
pub fn write_packet_header<B: PacketBuffer>(buf: &mut B, id: PacketId, header_bytes: &[u8]) {
    if !buf.prepend(header_bytes) {
        return;
    }
    // `prepend` cannot partially fail: if the single envelope byte did not fit either, undo
    // the header bytes we just committed so the buffer is left exactly as found.
    if !buf.prepend(&[id as u8]) {
        buf.strip(header_bytes.len());
    }
}

/// Read and strip the leading envelope byte. Returns `None` (leaving the buffer untouched) if
/// the buffer holds fewer than one byte, or if the byte is not a recognized [`PacketId`] —
/// callers still get the raw byte stripped in the recognized case only, per the reference
/// deployment's `read_packet_id`, which strips unconditionally once a byte is present.
pub fn read_packet_id<B: PacketBuffer>(buf: &mut B) -> Option<PacketId> {
    if buf.is_empty() {
        return None;
    }
    let byte = buf.as_slice()[0];
    buf.strip(1);
    PacketId::from_byte(byte)
}
