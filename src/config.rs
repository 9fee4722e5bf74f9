//! Per-stream packetization state and its configuration boundary.
//!
//! [`RtpPacketizationConfig`] holds everything one RTP stream needs at
//! packetization time: stream identity (SSRC, payload type), the media
//! clock position (timestamp, set by the caller per access unit), the
//! auto-incrementing sequence number, and the negotiated RFC 5285
//! one-byte header extensions.
//!
//! All range validation lives here, before the per-packet hot path:
//! extension ids must be 1..=14, MID/RID values 1..=16 bytes, playout
//! delay bounds 12-bit. An id of 0 means "extension not active". The
//! packetizer itself never validates — a config that passed this
//! boundary cannot produce a malformed extension block.
//!
//! ## Sharing
//!
//! The config is shared by ownership reference between the packetizer
//! and other stream components (e.g. a retransmission packetizer
//! re-emitting under the same stream identity), so the crate exposes it
//! as [`SharedConfig`] — `Arc<Mutex<_>>`. The mutex serializes access,
//! but the design contract is still **single writer**: packetize calls
//! for one stream belong to one media-send thread.

use std::sync::Arc;

use parking_lot::Mutex;
use rand::RngExt;

use crate::error::{Result, RtpError};

/// Shared, reference-counted packetization config for one RTP stream.
pub type SharedConfig = Arc<Mutex<RtpPacketizationConfig>>;

/// Check a one-byte extension identifier (RFC 5285 §4.2).
///
/// 0 disables the extension; 15 is reserved as the escape to two-byte
/// headers, which this library does not emit.
pub(crate) fn one_byte_id_active(id: u8) -> bool {
    (1..=14).contains(&id)
}

fn check_extension_id(name: &'static str, id: u8) -> Result<()> {
    if one_byte_id_active(id) {
        Ok(())
    } else {
        Err(RtpError::ExtensionIdOutOfRange { name, id })
    }
}

fn check_extension_value(name: &'static str, value: &str) -> Result<()> {
    // The 4-bit length nibble encodes len - 1.
    if value.is_empty() || value.len() > 16 {
        return Err(RtpError::ExtensionValueLength {
            name,
            len: value.len(),
        });
    }
    Ok(())
}

/// Negotiated stream metadata, produced by session/description
/// negotiation outside this crate.
///
/// Consulted exactly once, at stream setup, by
/// [`RtpPacketizationConfig::from_description`]. `None` (or an absent
/// id) leaves the corresponding extension inactive for the stream's
/// lifetime.
#[derive(Debug, Clone, Default)]
pub struct MediaDescription {
    /// RTP payload type (7-bit, RFC 3551).
    pub payload_type: u8,
    /// RTP media clock rate in Hz (90000 for video per RFC 3551 §4).
    pub clock_rate: u32,
    /// Media identifier and its negotiated extension id (BUNDLE demux).
    pub mid: Option<(u8, String)>,
    /// RTP stream identifier and its negotiated extension id (simulcast).
    pub rid: Option<(u8, String)>,
    /// Extension id for coordination of video orientation (CVO).
    pub video_orientation_id: Option<u8>,
    /// Extension id for the absolute send time extension.
    pub abs_send_time_id: Option<u8>,
    /// Extension id for the playout delay hint, with (min, max) bounds
    /// in 10 ms units, each 12-bit.
    pub playout_delay: Option<(u8, u16, u16)>,
}

/// Mutable per-stream RTP packetization state.
///
/// Owned jointly (via [`SharedConfig`]) by the packetizer and the outer
/// media-send pipeline for the stream's lifetime. The packetizer reads
/// every field and mutates exactly one: `sequence_number`, incremented
/// modulo 2^16 on each successful packetize call.
#[derive(Debug, Clone)]
pub struct RtpPacketizationConfig {
    /// Synchronization source identifier (RFC 3550 §8.1). Constant per stream.
    pub ssrc: u32,
    /// RTP payload type (7-bit, RFC 3551). Constant per stream.
    pub payload_type: u8,
    /// Media clock rate in Hz. Used only by the seconds/timestamp
    /// conversion helpers, never on the packetization hot path.
    pub clock_rate: u32,
    /// Current RTP timestamp. The caller sets it to the sample time of
    /// the payload before each packetize call; this crate never
    /// advances it.
    pub timestamp: u32,
    /// Next sequence number to be written. Incremented (wrapping) by
    /// every packetize call, regardless of the marker flag.
    pub sequence_number: u16,

    /// CVO extension id; 0 when inactive.
    pub video_orientation_id: u8,
    /// CVO camera/rotation/flip bitfield. Only emitted on marker
    /// packets, and only when nonzero.
    pub video_orientation: u8,
    /// Absolute send time extension id; 0 when inactive.
    pub abs_send_time_id: u8,
    /// MID extension id; meaningful only when `mid` is set.
    pub mid_id: u8,
    /// Media identifier, emitted verbatim when set.
    pub mid: Option<String>,
    /// RID extension id; meaningful only when `rid` is set.
    pub rid_id: u8,
    /// RTP stream identifier, emitted verbatim when set.
    pub rid: Option<String>,
    /// Playout delay extension id; 0 when inactive.
    pub playout_delay_id: u8,
    /// Minimum playout delay hint, 12-bit, in 10 ms units.
    pub playout_delay_min: u16,
    /// Maximum playout delay hint, 12-bit, in 10 ms units.
    pub playout_delay_max: u16,
}

impl RtpPacketizationConfig {
    /// Create a config with explicit stream identity and all extensions
    /// inactive. Sequence number and timestamp start at 0.
    pub fn new(ssrc: u32, payload_type: u8, clock_rate: u32) -> Result<Self> {
        if payload_type > 0x7F {
            return Err(RtpError::InvalidPayloadType(payload_type));
        }
        tracing::debug!(
            ssrc = format_args!("{:#010X}", ssrc),
            payload_type,
            clock_rate,
            "RTP packetization config created"
        );
        Ok(Self {
            ssrc,
            payload_type,
            clock_rate,
            timestamp: 0,
            sequence_number: 0,
            video_orientation_id: 0,
            video_orientation: 0,
            abs_send_time_id: 0,
            mid_id: 0,
            mid: None,
            rid_id: 0,
            rid: None,
            playout_delay_id: 0,
            playout_delay_min: 0,
            playout_delay_max: 0,
        })
    }

    /// Create a config with random SSRC, initial sequence number, and
    /// initial timestamp, per RFC 3550 §8.1 (random SSRC to avoid
    /// collisions) and §5.1 (random initial sequence/timestamp).
    pub fn with_random_state(payload_type: u8, clock_rate: u32) -> Result<Self> {
        let mut rng = rand::rng();
        let mut config = Self::new(rng.random::<u32>(), payload_type, clock_rate)?;
        config.sequence_number = rng.random::<u16>();
        config.timestamp = rng.random::<u32>();
        Ok(config)
    }

    /// Build a validated config from a negotiated [`MediaDescription`].
    ///
    /// This is the configuration boundary: every extension id and value
    /// is range-checked here so that misconfiguration surfaces as an
    /// [`RtpError`](crate::RtpError) at stream setup instead of a
    /// silently corrupt packet on the wire.
    pub fn from_description(ssrc: u32, description: &MediaDescription) -> Result<Self> {
        let mut config = Self::new(ssrc, description.payload_type, description.clock_rate)?;
        if let Some((id, mid)) = &description.mid {
            config.set_mid(*id, mid)?;
        }
        if let Some((id, rid)) = &description.rid {
            config.set_rid(*id, rid)?;
        }
        if let Some(id) = description.video_orientation_id {
            config.set_video_orientation(id, 0)?;
        }
        if let Some(id) = description.abs_send_time_id {
            config.set_abs_send_time_id(id)?;
        }
        if let Some((id, min, max)) = description.playout_delay {
            config.set_playout_delay(id, min, max)?;
        }
        Ok(config)
    }

    /// Enable the CVO extension. The orientation bitfield may be 0 here
    /// and updated later (e.g. on device rotation); it is only emitted
    /// on marker packets while nonzero.
    pub fn set_video_orientation(&mut self, id: u8, orientation: u8) -> Result<()> {
        check_extension_id("video orientation", id)?;
        self.video_orientation_id = id;
        self.video_orientation = orientation;
        Ok(())
    }

    /// Enable the absolute send time extension.
    pub fn set_abs_send_time_id(&mut self, id: u8) -> Result<()> {
        check_extension_id("abs send time", id)?;
        self.abs_send_time_id = id;
        Ok(())
    }

    /// Enable the MID extension with the negotiated media identifier.
    pub fn set_mid(&mut self, id: u8, mid: &str) -> Result<()> {
        check_extension_id("mid", id)?;
        check_extension_value("mid", mid)?;
        self.mid_id = id;
        self.mid = Some(mid.to_string());
        Ok(())
    }

    /// Enable the RID extension with the negotiated stream identifier.
    pub fn set_rid(&mut self, id: u8, rid: &str) -> Result<()> {
        check_extension_id("rid", id)?;
        check_extension_value("rid", rid)?;
        self.rid_id = id;
        self.rid = Some(rid.to_string());
        Ok(())
    }

    /// Enable the playout delay extension with (min, max) bounds in
    /// 10 ms units. Both values are 12-bit unsigned.
    pub fn set_playout_delay(&mut self, id: u8, min: u16, max: u16) -> Result<()> {
        check_extension_id("playout delay", id)?;
        for value in [min, max] {
            if value > 0xFFF {
                return Err(RtpError::PlayoutDelayOutOfRange(value));
            }
        }
        if min > max {
            return Err(RtpError::PlayoutDelayInverted { min, max });
        }
        self.playout_delay_id = id;
        self.playout_delay_min = min;
        self.playout_delay_max = max;
        Ok(())
    }

    /// Return the current sequence number and advance it by one,
    /// wrapping at 2^16. The one shared-state mutation of the
    /// packetization hot path.
    pub fn next_sequence_number(&mut self) -> u16 {
        let current = self.sequence_number;
        self.sequence_number = current.wrapping_add(1);
        current
    }

    /// Convert a duration in seconds to RTP timestamp units at this
    /// stream's clock rate.
    pub fn seconds_to_timestamp(&self, seconds: f64) -> u32 {
        (seconds * f64::from(self.clock_rate)) as u32
    }

    /// Convert an RTP timestamp to seconds at this stream's clock rate.
    pub fn timestamp_to_seconds(&self, timestamp: u32) -> f64 {
        f64::from(timestamp) / f64::from(self.clock_rate)
    }

    /// Wrap a config for sharing between stream components.
    pub fn into_shared(self) -> SharedConfig {
        Arc::new(Mutex::new(self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_config() -> RtpPacketizationConfig {
        RtpPacketizationConfig::new(0xAABBCCDD, 96, 90000).unwrap()
    }

    #[test]
    fn payload_type_range_checked() {
        assert!(RtpPacketizationConfig::new(1, 127, 90000).is_ok());
        assert!(matches!(
            RtpPacketizationConfig::new(1, 128, 90000),
            Err(RtpError::InvalidPayloadType(128))
        ));
    }

    #[test]
    fn extension_id_bounds() {
        let mut config = make_config();
        assert!(config.set_abs_send_time_id(0).is_err());
        assert!(config.set_abs_send_time_id(15).is_err());
        assert!(config.set_abs_send_time_id(1).is_ok());
        assert!(config.set_video_orientation(14, 3).is_ok());
    }

    #[test]
    fn mid_length_bounds() {
        let mut config = make_config();
        assert!(config.set_mid(3, "").is_err());
        assert!(config.set_mid(3, &"a".repeat(17)).is_err());
        assert!(config.set_mid(3, &"a".repeat(16)).is_ok());
    }

    #[test]
    fn playout_delay_bounds() {
        let mut config = make_config();
        assert!(matches!(
            config.set_playout_delay(5, 5000, 5000),
            Err(RtpError::PlayoutDelayOutOfRange(5000))
        ));
        assert!(matches!(
            config.set_playout_delay(5, 200, 100),
            Err(RtpError::PlayoutDelayInverted { min: 200, max: 100 })
        ));
        assert!(config.set_playout_delay(5, 100, 200).is_ok());
    }

    #[test]
    fn sequence_number_wraps() {
        let mut config = make_config();
        config.sequence_number = u16::MAX;
        assert_eq!(config.next_sequence_number(), u16::MAX);
        assert_eq!(config.sequence_number, 0);
    }

    #[test]
    fn from_description_enables_extensions() {
        let description = MediaDescription {
            payload_type: 96,
            clock_rate: 90000,
            mid: Some((3, "v0".to_string())),
            rid: Some((4, "hi".to_string())),
            video_orientation_id: Some(13),
            abs_send_time_id: Some(2),
            playout_delay: Some((5, 0, 400)),
        };
        let config = RtpPacketizationConfig::from_description(0x1234, &description).unwrap();
        assert_eq!(config.mid.as_deref(), Some("v0"));
        assert_eq!(config.rid_id, 4);
        assert_eq!(config.video_orientation_id, 13);
        assert_eq!(config.abs_send_time_id, 2);
        assert_eq!(config.playout_delay_max, 400);
    }

    #[test]
    fn from_description_rejects_bad_id() {
        let description = MediaDescription {
            payload_type: 96,
            clock_rate: 90000,
            mid: Some((15, "v0".to_string())),
            ..Default::default()
        };
        assert!(RtpPacketizationConfig::from_description(0x1234, &description).is_err());
    }

    #[test]
    fn random_state_differs() {
        let a = RtpPacketizationConfig::with_random_state(96, 90000).unwrap();
        let b = RtpPacketizationConfig::with_random_state(96, 90000).unwrap();
        assert_ne!((a.ssrc, a.sequence_number, a.timestamp), (b.ssrc, b.sequence_number, b.timestamp));
    }

    #[test]
    fn timestamp_conversions() {
        let config = make_config();
        assert_eq!(config.seconds_to_timestamp(1.0), 90000);
        assert_eq!(config.seconds_to_timestamp(1.0 / 30.0), 3000);
        assert!((config.timestamp_to_seconds(45000) - 0.5).abs() < 1e-9);
    }
}
