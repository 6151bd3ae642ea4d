//! Core types for decoded telemetry.
//!
//! - [`Packet`] is one decoded datagram: a single [`DrefUpdate`] or a list of
//!   [`DataBlock`] records
//! - [`ChannelTable`] maps `group_id * 8 + field` to a [`ChannelDescriptor`]
//! - [`UpdateRate`] controls how often subscribers see new values
//!
//! ## Usage Example
//!
//! ```rust
//! use xplane_monitor::types::{ChannelTable, DataBlock};
//!
//! let table = ChannelTable::builtin();
//! let block = DataBlock { group_id: 17, values: [2.5, -1.0, 90.0, 87.0, 0.0, 0.0, 0.0, 0.0] };
//!
//! let pitch = table.lookup(block.group_id, 0).unwrap();
//! assert_eq!(pitch.name, "pitch");
//! assert_eq!(block.store_key(), "DATA*17");
//! ```

mod channel;
mod packet;
mod update_rate;

pub use channel::{ChannelDescriptor, ChannelTable, MAX_GROUP_ID};
pub use packet::{DataBlock, DrefUpdate, FIELDS_PER_GROUP, Packet, PacketKind};
pub use update_rate::UpdateRate;
