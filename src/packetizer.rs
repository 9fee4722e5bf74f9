//! The packetize/outgoing transformation contract and its generic
//! implementation.

use crate::config::SharedConfig;
use crate::extension::{ActiveExtensions, write_extension_block};
use crate::header::{FIXED_HEADER_LEN, write_fixed_header};

/// RTP packetizer capability.
///
/// One required operation — [`packetize`](Self::packetize), turning a
/// single payload buffer into a wire-ready RTP packet — and one
/// overridable default, [`outgoing`](Self::outgoing), the batch seam a
/// codec-specific packetizer overrides to set the marker bit on
/// access-unit boundaries and to fragment oversized payloads per its
/// payload format RFC (e.g. FU-A for H.264, RFC 6184 §5.8).
///
/// Codec variants compose the shared `packetize` primitive — call it
/// once per fragment with the right marker — rather than re-deriving
/// header or extension encoding.
pub trait Packetizer: Send {
    /// Produce one RTP packet from `payload`, appended verbatim after
    /// the fixed header and any negotiated extension block.
    ///
    /// `marker` flags the last packet of an access unit (RFC 3550 §5.1).
    ///
    /// Side effect: the stream's sequence number advances by exactly
    /// one (mod 2^16), marker or not. Never fails under normal inputs;
    /// every range rule was enforced at the configuration boundary.
    fn packetize(&mut self, payload: &[u8], marker: bool) -> Vec<u8>;

    /// Transform a batch of payload buffers into RTP packets.
    ///
    /// Default behavior: replace each buffer in place, in order, with
    /// `packetize(buffer, false)` — correct only for payload formats
    /// where one buffer maps to exactly one packet and the marker is
    /// never set. `_emit` is the downstream sink an override uses when
    /// fragmentation yields more packets than inputs; the default never
    /// calls it.
    fn outgoing(&mut self, messages: &mut Vec<Vec<u8>>, _emit: &mut dyn FnMut(Vec<u8>)) {
        for message in messages.iter_mut() {
            let payload = std::mem::take(message);
            *message = self.packetize(&payload, false);
        }
    }
}

/// Generic RTP packetizer: one payload in, one packet out.
///
/// Holds a [`SharedConfig`] jointly with the outer media-send pipeline
/// (and any sibling components re-emitting under the same stream
/// identity). The mutex serializes access to the sequence counter, but
/// calls for one stream are expected to come from a single media-send
/// thread — there is no other internal synchronization.
pub struct RtpPacketizer {
    config: SharedConfig,
}

impl RtpPacketizer {
    /// Create a packetizer over a shared per-stream config.
    pub fn new(config: SharedConfig) -> Self {
        Self { config }
    }

    /// The shared config, for sibling components of the same stream.
    pub fn config(&self) -> SharedConfig {
        self.config.clone()
    }
}

impl Packetizer for RtpPacketizer {
    fn packetize(&mut self, payload: &[u8], marker: bool) -> Vec<u8> {
        let mut config = self.config.lock();

        let active = ActiveExtensions::resolve(&config, marker);
        let extension_size = active.block_size(&config);
        let total = FIXED_HEADER_LEN + extension_size + payload.len();

        // Single exact allocation; zeroes double as extension padding.
        let mut packet = vec![0u8; total];

        let sequence_number = config.next_sequence_number();
        write_fixed_header(
            &mut packet,
            marker,
            extension_size != 0,
            config.payload_type,
            sequence_number,
            config.timestamp,
            config.ssrc,
        );

        if extension_size != 0 {
            write_extension_block(
                &mut packet[FIXED_HEADER_LEN..FIXED_HEADER_LEN + extension_size],
                &config,
                &active,
            );
        }

        packet[FIXED_HEADER_LEN + extension_size..].copy_from_slice(payload);

        tracing::trace!(
            seq = sequence_number,
            ts = config.timestamp,
            marker,
            extension_size,
            payload_len = payload.len(),
            "payload packetized"
        );

        packet
    }
}
