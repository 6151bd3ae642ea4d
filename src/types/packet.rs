//! Decoded packet types

use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of float fields carried by every DATA record.
pub const FIELDS_PER_GROUP: usize = 8;

/// A single dataref value pushed by a `DREF+` packet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub struct DrefUpdate {
    /// Dataref path, e.g. `sim/flightmodel/position/groundspeed`
    pub name: String,
    pub value: f32,
}

/// One record of a `DATA*` packet: a data output group and its eight values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub struct DataBlock {
    /// Data output group index as numbered by the simulator
    pub group_id: i32,
    pub values: [f32; FIELDS_PER_GROUP],
}

impl DataBlock {
    /// Key under which the channel store files this group.
    pub fn store_key(&self) -> String {
        format!("DATA*{}", self.group_id)
    }
}

/// The two packet families understood by the decoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PacketKind {
    Dref,
    Data,
}

impl PacketKind {
    /// Five-byte header that opens every packet of this kind.
    pub const fn header(self) -> &'static [u8; 5] {
        match self {
            PacketKind::Dref => b"DREF+",
            PacketKind::Data => b"DATA*",
        }
    }
}

impl fmt::Display for PacketKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PacketKind::Dref => f.write_str("DREF"),
            PacketKind::Data => f.write_str("DATA"),
        }
    }
}

/// A fully decoded datagram.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Packet {
    Dref(DrefUpdate),
    Data(Vec<DataBlock>),
}

impl Packet {
    pub fn kind(&self) -> PacketKind {
        match self {
            Packet::Dref(_) => PacketKind::Dref,
            Packet::Data(_) => PacketKind::Data,
        }
    }

    /// DATA records carried by this packet (empty for DREF packets).
    pub fn blocks(&self) -> &[DataBlock] {
        match self {
            Packet::Data(blocks) => blocks,
            Packet::Dref(_) => &[],
        }
    }
}
