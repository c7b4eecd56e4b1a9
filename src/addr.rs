//! Node addressing.

use core::fmt;

/// Size in bytes of a [`NodeAddr`] on the wire.
pub const ADDR_SIZE: usize = 2;

/// An opaque, fixed-width node identifier.
///
/// Mirrors the 2-byte link-layer addresses of the reference deployment. Only equality and a
/// distinguished null value are meaningful to the protocol core; byte layout beyond that is an
/// implementation detail of whatever link layer a [`crate::nic::Platform`] wraps.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct NodeAddr(pub [u8; ADDR_SIZE]);

impl NodeAddr {
    /// The distinguished "no address" value.
    pub const NULL: NodeAddr = NodeAddr([0, 0]);

    /// Build an address from its two wire bytes.
    pub const fn new(hi: u8, lo: u8) -> Self {
        NodeAddr([hi, lo])
    }

    /// `true` if this is [`NodeAddr::NULL`].
    pub fn is_null(&self) -> bool {
        *self == NodeAddr::NULL
    }

    pub fn as_bytes(&self) -> &[u8; ADDR_SIZE] {
        &self.0
    }
}

impl From<[u8; ADDR_SIZE]> for NodeAddr {
    fn from(bytes: [u8; ADDR_SIZE]) -> Self {
        NodeAddr(bytes)
    }
}

impl fmt::Debug for NodeAddr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:02x}:{:02x}", self.0[0], self.0[1])
    }
}

impl fmt::Display for NodeAddr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_is_distinguished() {
        assert!(NodeAddr::NULL.is_null());
        assert!(!NodeAddr::new(0, 1).is_null());
    }

    #[test]
    fn equality_is_byte_equality() {
        assert_eq!(NodeAddr::new(1, 2), NodeAddr::new(1, 2));
        assert_ne!(NodeAddr::new(1, 2), NodeAddr::new(2, 1));
    }
}
