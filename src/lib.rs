//! RTP packetization with RFC 5285 one-byte header extensions.
//!
//! This crate turns encoded media payload buffers into wire-ready RTP
//! packets (RFC 3550): 12-byte fixed header, an optional one-byte
//! header extension block (RFC 5285), and the payload appended
//! verbatim.
//!
//! Supported extensions, each independently negotiated per stream:
//!
//! | Extension          | Purpose                                   | Data bytes |
//! |--------------------|-------------------------------------------|------------|
//! | Video orientation  | camera rotation/flip (CVO), marker-only   | 1          |
//! | Absolute send time | coarse send timestamp for BWE             | 3          |
//! | MID                | media identifier (BUNDLE demux)           | 1..=16     |
//! | RID                | RTP stream identifier (simulcast)         | 1..=16     |
//! | Playout delay      | min/max playout hints, 12-bit each        | 3          |
//!
//! ## Usage
//!
//! Build an [`RtpPacketizationConfig`] for the stream (directly, or
//! from a negotiated [`MediaDescription`]), share it, and feed payload
//! buffers through an [`RtpPacketizer`]:
//!
//! ```
//! use rtpkit::{Packetizer, RtpPacketizationConfig, RtpPacketizer};
//!
//! let mut config = RtpPacketizationConfig::new(0x1234_5678, 96, 90000)?;
//! config.set_mid(3, "v0")?;
//! let mut packetizer = RtpPacketizer::new(config.into_shared());
//!
//! let packet = packetizer.packetize(b"encoded frame bytes", true);
//! assert_eq!(packet[0] >> 6, 2); // RTP version
//! # Ok::<(), rtpkit::RtpError>(())
//! ```
//!
//! Codec-specific packetizers (fragmentation, marker policy per access
//! unit) implement [`Packetizer`] and override
//! [`outgoing`](Packetizer::outgoing), composing the shared
//! `packetize` primitive per fragment.
//!
//! Out of scope: depacketizing (receive path), SRTP, transport
//! delivery, congestion control, and session negotiation — negotiation
//! results arrive here already resolved into the config.

pub mod config;
pub mod error;
pub mod extension;
pub mod header;
pub mod packetizer;

pub use config::{MediaDescription, RtpPacketizationConfig, SharedConfig};
pub use error::{Result, RtpError};
pub use extension::ONE_BYTE_EXTENSIONS_PROFILE;
pub use header::FIXED_HEADER_LEN;
pub use packetizer::{Packetizer, RtpPacketizer};
