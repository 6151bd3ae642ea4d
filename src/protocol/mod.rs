//! X-Plane UDP packet format
//!
//! The simulator broadcasts two datagram families used by the monitor:
//!
//! 1. **DREF+** - a single dataref value and its name
//! 2. **DATA*** - one or more 36-byte records, each a data output group id
//!    followed by eight floats
//!
//! [`decode`] turns one datagram into a [`Packet`](crate::types::Packet);
//! the builders produce byte-exact packets for tests and simulation.

mod builder;
mod decode;
pub mod samples;

pub use builder::{build_data_packet, build_dref_packet};
pub use decode::{DATA_RECORD_SIZE, DREF_NAME_OFFSET, HEADER_LEN, decode, packet_kind};
