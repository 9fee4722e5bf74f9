//! RFC 5285 one-byte header extension sizing and encoding.
//!
//! An RTP extension block is a 4-byte header (profile `0xBEDE` +
//! length-in-words) followed by one-byte-header elements, each encoded
//! as a control byte `(id << 4) | (len - 1)` and `len` data bytes, then
//! zero padding to a 32-bit word boundary:
//!
//! ```text
//!  0                   1                   2                   3
//!  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |       0xBE    |    0xDE       |           length=N            |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |  ID   | L=0   |     data      |  ID   |  L=1  |   data...
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//!          ...data                |    0 (pad)    |    0 (pad)    |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! ```
//!
//! Elements are emitted in one canonical order — video orientation,
//! absolute send time, MID, RID, playout delay — for byte-for-byte
//! deterministic output. A conformant receiver must accept any order
//! (RFC 5285 §4.2).

use std::time::{SystemTime, UNIX_EPOCH};

use crate::config::{RtpPacketizationConfig, one_byte_id_active};

/// Extension block profile identifier for one-byte headers (RFC 5285 §4.2).
pub const ONE_BYTE_EXTENSIONS_PROFILE: u16 = 0xBEDE;

/// Profile + length word preceding the extension elements.
pub(crate) const EXTENSION_BLOCK_HEADER_LEN: usize = 4;

/// Seconds between the NTP epoch (1900-01-01) and the Unix epoch.
const NTP_UNIX_EPOCH_OFFSET_SECS: u64 = 2_208_988_800;

/// Which extensions a given packet carries, resolved once per call so
/// that sizing and encoding cannot disagree.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ActiveExtensions {
    pub video_orientation: bool,
    pub abs_send_time: bool,
    pub mid: bool,
    pub rid: bool,
    pub playout_delay: bool,
}

impl ActiveExtensions {
    /// Resolve the active set from the negotiated config and the
    /// per-packet marker flag.
    ///
    /// Video orientation is only meaningful on the last packet of an
    /// access unit, so it is gated on `marker` (and suppressed while
    /// the orientation value is 0, i.e. unrotated).
    pub fn resolve(config: &RtpPacketizationConfig, marker: bool) -> Self {
        Self {
            video_orientation: one_byte_id_active(config.video_orientation_id)
                && marker
                && config.video_orientation != 0,
            abs_send_time: config.abs_send_time_id != 0,
            mid: config.mid.is_some(),
            rid: config.rid.is_some(),
            playout_delay: one_byte_id_active(config.playout_delay_id),
        }
    }

    /// Total size in bytes of the extension block for this packet:
    /// 1 control byte + N data bytes per active element, plus the
    /// 4-byte block header when any element is present, rounded up to a
    /// 32-bit word boundary. 0 when no extension is active.
    pub fn block_size(&self, config: &RtpPacketizationConfig) -> usize {
        let mut size = 0usize;
        if self.video_orientation {
            size += 1 + 1;
        }
        if self.abs_send_time {
            size += 1 + 3;
        }
        if self.mid {
            size += 1 + config.mid.as_deref().map_or(0, str::len);
        }
        if self.rid {
            size += 1 + config.rid.as_deref().map_or(0, str::len);
        }
        if self.playout_delay {
            size += 1 + 3;
        }
        if size != 0 {
            size += EXTENSION_BLOCK_HEADER_LEN;
        }
        (size + 3) & !3
    }
}

/// Write the complete extension block into `buf`, which must be exactly
/// the size reported by [`ActiveExtensions::block_size`] and zeroed
/// (alignment padding is carried by the untouched trailing bytes).
///
/// The length word is the block size in 32-bit words excluding the
/// 4-byte block header itself.
pub(crate) fn write_extension_block(
    buf: &mut [u8],
    config: &RtpPacketizationConfig,
    active: &ActiveExtensions,
) {
    buf[0..2].copy_from_slice(&ONE_BYTE_EXTENSIONS_PROFILE.to_be_bytes());
    let length_words = (buf.len() / 4 - 1) as u16;
    buf[2..4].copy_from_slice(&length_words.to_be_bytes());

    let mut offset = EXTENSION_BLOCK_HEADER_LEN;
    if active.video_orientation {
        offset += write_one_byte_header(
            buf,
            offset,
            config.video_orientation_id,
            &[config.video_orientation],
        );
    }
    if active.abs_send_time {
        let value = abs_send_time(ntp_time());
        offset += write_one_byte_header(buf, offset, config.abs_send_time_id, &value);
    }
    if let Some(mid) = &config.mid {
        offset += write_one_byte_header(buf, offset, config.mid_id, mid.as_bytes());
    }
    if let Some(rid) = &config.rid {
        offset += write_one_byte_header(buf, offset, config.rid_id, rid.as_bytes());
    }
    if active.playout_delay {
        let packed = pack_playout_delay(config.playout_delay_min, config.playout_delay_max);
        write_one_byte_header(buf, offset, config.playout_delay_id, &packed);
    }
}

/// Write one element: control byte `(id << 4) | (len - 1)` followed by
/// the data bytes. Returns the number of bytes written.
fn write_one_byte_header(buf: &mut [u8], offset: usize, id: u8, data: &[u8]) -> usize {
    buf[offset] = (id << 4) | ((data.len() as u8 - 1) & 0x0F);
    buf[offset + 1..offset + 1 + data.len()].copy_from_slice(data);
    1 + data.len()
}

/// Current wall clock as a 64-bit NTP fixed-point value: seconds since
/// 1900-01-01 in the upper 32 bits, fraction in the lower 32.
pub(crate) fn ntp_time() -> u64 {
    ntp_time_from(SystemTime::now())
}

/// NTP fixed-point conversion, separated from the clock read so the
/// arithmetic is testable against known instants.
pub(crate) fn ntp_time_from(now: SystemTime) -> u64 {
    let since_epoch = now.duration_since(UNIX_EPOCH).unwrap_or_default();
    let seconds = since_epoch.as_secs() + NTP_UNIX_EPOCH_OFFSET_SECS;
    let fraction = (u64::from(since_epoch.subsec_nanos()) << 32) / 1_000_000_000;
    (seconds << 32) | fraction
}

/// Derive the 24-bit absolute send time from an NTP timestamp and emit
/// it most-significant byte first.
///
/// The value is the NTP fixed point shifted right by 14 bits (6.18
/// seconds.fraction format per the WebRTC abs-send-time extension),
/// truncated explicitly rather than by implicit narrowing.
pub(crate) fn abs_send_time(ntp: u64) -> [u8; 3] {
    let value = ((ntp >> 14) as u32) & 0x00FF_FFFF;
    [(value >> 16) as u8, (value >> 8) as u8, value as u8]
}

/// Pack playout delay bounds into 3 bytes: 12 bits of min, 12 bits of
/// max.
fn pack_playout_delay(min: u16, max: u16) -> [u8; 3] {
    let min = min & 0xFFF;
    let max = max & 0xFFF;
    [
        (min >> 4) as u8,
        (((min & 0xF) << 4) as u8) | ((max >> 8) as u8),
        (max & 0xFF) as u8,
    ]
}
