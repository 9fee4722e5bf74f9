//! RTP fixed header serialization (RFC 3550 §5.1).

/// Size of the mandatory RTP header in bytes.
pub const FIXED_HEADER_LEN: usize = 12;

/// RTP protocol version, fixed at 2.
pub const RTP_VERSION: u8 = 2;

/// Write the 12-byte RTP fixed header at the start of `buf`.
///
/// ```text
///  0                   1                   2                   3
///  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |V=2|P|X|  CC   |M|     PT      |       Sequence Number         |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                           Timestamp                           |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                             SSRC                              |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// ```
///
/// Padding and CSRC count are always 0 (no contributing sources).
/// All multi-byte fields are written in network byte order through
/// explicit offset-based stores; the header is never overlaid on a
/// struct whose in-memory layout could diverge from the wire.
///
/// `buf` must be at least [`FIXED_HEADER_LEN`] bytes.
pub(crate) fn write_fixed_header(
    buf: &mut [u8],
    marker: bool,
    extension: bool,
    payload_type: u8,
    sequence_number: u16,
    timestamp: u32,
    ssrc: u32,
) {
    buf[0] = (RTP_VERSION << 6) | ((extension as u8) << 4);
    buf[1] = ((marker as u8) << 7) | (payload_type & 0x7F);
    buf[2..4].copy_from_slice(&sequence_number.to_be_bytes());
    buf[4..8].copy_from_slice(&timestamp.to_be_bytes());
    buf[8..12].copy_from_slice(&ssrc.to_be_bytes());
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(marker: bool, extension: bool) -> [u8; 12] {
        let mut buf = [0u8; 12];
        write_fixed_header(&mut buf, marker, extension, 96, 0x1234, 0xAABBCCDD, 0x11223344);
        buf
    }

    #[test]
    fn version_is_2() {
        let buf = write(false, false);
        assert_eq!(buf[0] >> 6, 2);
    }

    #[test]
    fn padding_and_cc_clear() {
        let buf = write(true, true);
        assert_eq!(buf[0] & 0x20, 0);
        assert_eq!(buf[0] & 0x0F, 0);
    }

    #[test]
    fn extension_bit() {
        assert_eq!(write(false, false)[0] & 0x10, 0);
        assert_eq!(write(false, true)[0] & 0x10, 0x10);
    }

    #[test]
    fn marker_bit() {
        assert_eq!(write(false, false)[1] & 0x80, 0);
        assert_eq!(write(true, false)[1] & 0x80, 0x80);
    }

    #[test]
    fn payload_type_written() {
        let buf = write(false, false);
        assert_eq!(buf[1] & 0x7F, 96);
    }

    #[test]
    fn big_endian_fields() {
        let buf = write(false, false);
        assert_eq!(u16::from_be_bytes([buf[2], buf[3]]), 0x1234);
        assert_eq!(u32::from_be_bytes([buf[4], buf[5], buf[6], buf[7]]), 0xAABBCCDD);
        assert_eq!(u32::from_be_bytes([buf[8], buf[9], buf[10], buf[11]]), 0x11223344);
    }
}
