//! Datagram decoding
//!
//! Both packet families open with a four byte ASCII tag and a one byte
//! marker. Everything after the header is little-endian regardless of host:
//!
//! ```text
//! DREF+ [f32 value] [name bytes ...] [0x00]
//! DATA* ([i32 group_id] [f32; 8]) * k        // 36 bytes per record
//! ```
//!
//! Decoding is pure and never reads past the end of the input.

use tracing::trace;

use crate::types::{DataBlock, DrefUpdate, FIELDS_PER_GROUP, Packet, PacketKind};
use crate::{MonitorError, Result};

/// Length of the tag + marker header.
pub const HEADER_LEN: usize = 5;

/// Offset of the dataref name in a DREF packet.
pub const DREF_NAME_OFFSET: usize = HEADER_LEN + 4;

/// Size of one DATA record: group id plus eight floats.
pub const DATA_RECORD_SIZE: usize = 4 + FIELDS_PER_GROUP * 4;

/// Decode one datagram.
///
/// # Errors
///
/// - [`MonitorError::UnknownPacketType`] when the header is neither `DREF+`
///   nor `DATA*`
/// - [`MonitorError::MalformedPacket`] when a DREF packet is too short to hold
///   its value, or a DATA packet ends in a partial record. In the latter case
///   every complete record is carried in `recovered`.
pub fn decode(raw: &[u8]) -> Result<Packet> {
    match packet_kind(raw) {
        Some(PacketKind::Dref) => decode_dref(raw).map(Packet::Dref),
        Some(PacketKind::Data) => decode_data(raw).map(Packet::Data),
        None => Err(MonitorError::unknown_packet(raw)),
    }
}

/// Identify the packet family from its five byte header.
pub fn packet_kind(raw: &[u8]) -> Option<PacketKind> {
    let header = raw.get(..HEADER_LEN)?;
    [PacketKind::Dref, PacketKind::Data].into_iter().find(|kind| header == kind.header())
}

fn decode_dref(raw: &[u8]) -> Result<DrefUpdate> {
    if raw.len() < DREF_NAME_OFFSET {
        return Err(MonitorError::malformed(
            "DREF",
            format!("{} bytes is too short for a value (need {})", raw.len(), DREF_NAME_OFFSET),
        ));
    }

    let value = parse_f32_le(raw, HEADER_LEN, "DREF")?;
    let name = extract_null_terminated_string(&raw[DREF_NAME_OFFSET..]);

    trace!(name = %name, value, "Decoded DREF");
    Ok(DrefUpdate { name, value })
}

fn decode_data(raw: &[u8]) -> Result<Vec<DataBlock>> {
    let body = &raw[HEADER_LEN..];
    let records = body.chunks_exact(DATA_RECORD_SIZE);
    let remainder = records.remainder().len();

    let mut blocks = Vec::with_capacity(body.len() / DATA_RECORD_SIZE);
    for record in records {
        blocks.push(parse_record(record)?);
    }

    if remainder != 0 {
        return Err(MonitorError::MalformedPacket {
            context: "DATA",
            details: format!(
                "{} trailing bytes after {} complete records (packet length {})",
                remainder,
                blocks.len(),
                raw.len()
            ),
            recovered: blocks,
        });
    }

    trace!(records = blocks.len(), "Decoded DATA");
    Ok(blocks)
}

fn parse_record(record: &[u8]) -> Result<DataBlock> {
    let group_id = parse_i32_le(record, 0, "DATA")?;
    let mut values = [0.0f32; FIELDS_PER_GROUP];
    for (index, value) in values.iter_mut().enumerate() {
        *value = parse_f32_le(record, 4 + index * 4, "DATA")?;
    }
    Ok(DataBlock { group_id, values })
}

/// Bounds-checked little-endian reads
fn read_le_word(data: &[u8], offset: usize, context: &'static str) -> Result<[u8; 4]> {
    offset
        .checked_add(4)
        .and_then(|end| data.get(offset..end))
        .and_then(|bytes| bytes.try_into().ok())
        .ok_or_else(|| {
            MonitorError::malformed(
                context,
                format!(
                    "need 4 bytes at offset {}, have {}",
                    offset,
                    data.len().saturating_sub(offset)
                ),
            )
        })
}

fn parse_i32_le(data: &[u8], offset: usize, context: &'static str) -> Result<i32> {
    read_le_word(data, offset, context).map(i32::from_le_bytes)
}

fn parse_f32_le(data: &[u8], offset: usize, context: &'static str) -> Result<f32> {
    read_le_word(data, offset, context).map(f32::from_le_bytes)
}

/// Text up to the first NUL, or the whole slice when there is none.
fn extract_null_terminated_string(bytes: &[u8]) -> String {
    let null_pos = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
    String::from_utf8_lossy(&bytes[..null_pos]).into_owned()
}
