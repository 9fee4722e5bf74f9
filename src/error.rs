//! Error types for the RTP packetization library.

/// Errors surfaced at the configuration boundary.
///
/// Packetization itself is infallible (see [`Packetizer::packetize`](crate::Packetizer::packetize));
/// every range rule is enforced while a stream's
/// [`RtpPacketizationConfig`](crate::RtpPacketizationConfig) is being built,
/// so a bad identifier or oversized extension value fails loudly at setup
/// time instead of producing a silently malformed packet on the wire.
///
/// - **Stream identity**: [`InvalidPayloadType`](Self::InvalidPayloadType).
/// - **Extension ids**: [`ExtensionIdOutOfRange`](Self::ExtensionIdOutOfRange) —
///   one-byte header ids live in 1..=14; 15 is the RFC 5285 escape to
///   two-byte headers, which this library does not emit.
/// - **Extension values**: [`ExtensionValueLength`](Self::ExtensionValueLength),
///   [`PlayoutDelayOutOfRange`](Self::PlayoutDelayOutOfRange),
///   [`PlayoutDelayInverted`](Self::PlayoutDelayInverted).
#[derive(Debug, thiserror::Error)]
pub enum RtpError {
    /// RTP payload type is 7 bits (RFC 3550 §5.1).
    #[error("invalid payload type {0}: must be 0..=127")]
    InvalidPayloadType(u8),

    /// One-byte extension identifiers are valid in 1..=14 (RFC 5285 §4.2).
    #[error("{name} extension id {id} out of range: one-byte header ids are 1..=14")]
    ExtensionIdOutOfRange { name: &'static str, id: u8 },

    /// The 4-bit length nibble encodes `len - 1`, so a one-byte extension
    /// carries between 1 and 16 data bytes.
    #[error("{name} extension value is {len} bytes: one-byte headers carry 1..=16")]
    ExtensionValueLength { name: &'static str, len: usize },

    /// Playout delay bounds are 12-bit unsigned values.
    #[error("playout delay {0} exceeds 12 bits (max 4095)")]
    PlayoutDelayOutOfRange(u16),

    /// Playout delay minimum must not exceed the maximum.
    #[error("playout delay min {min} exceeds max {max}")]
    PlayoutDelayInverted { min: u16, max: u16 },
}

/// Convenience alias for `Result<T, RtpError>`.
pub type Result<T> = std::result::Result<T, RtpError>;
