//! Packet builders for tests, benchmarks and simulation

use super::decode::DATA_RECORD_SIZE;
use crate::types::{FIELDS_PER_GROUP, PacketKind};

/// Build a `DREF+` packet carrying `value` for dataref `name`.
pub fn build_dref_packet(name: &str, value: f32) -> Vec<u8> {
    let mut raw = Vec::with_capacity(PacketKind::Dref.header().len() + 4 + name.len() + 1);
    raw.extend_from_slice(PacketKind::Dref.header());
    raw.extend_from_slice(&value.to_le_bytes());
    raw.extend_from_slice(name.as_bytes());
    raw.push(0);
    raw
}

/// Build a `DATA*` packet with one record per `(group_id, values)` pair.
pub fn build_data_packet(records: &[(i32, [f32; FIELDS_PER_GROUP])]) -> Vec<u8> {
    let mut raw =
        Vec::with_capacity(PacketKind::Data.header().len() + records.len() * DATA_RECORD_SIZE);
    raw.extend_from_slice(PacketKind::Data.header());
    for (group_id, values) in records {
        raw.extend_from_slice(&group_id.to_le_bytes());
        for value in values {
            raw.extend_from_slice(&value.to_le_bytes());
        }
    }
    raw
}
