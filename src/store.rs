//! Latest-value store for decoded channels
//!
//! [`ChannelStore`] keeps the most recent value of every dataref and the most
//! recent record of every DATA group. It is plain owned state: whoever owns
//! the store is its only writer (the [`Driver`](crate::driver::Driver) task in
//! a running monitor).

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::{self, Write as _};
use std::sync::Arc;
use tracing::{debug, trace};

use crate::protocol;
use crate::types::{ChannelTable, DataBlock, DrefUpdate, Packet};
use crate::Result;

/// Magnitudes below this render as `"0"`.
pub const COMPACT_EPSILON: f32 = 1e-5;

/// Render a value for display, flushing near-zero noise to `"0"`.
///
/// ```rust
/// use xplane_monitor::store::compact_float;
///
/// assert_eq!(compact_float(1.3e-6), "0");
/// assert_eq!(compact_float(-999.0), "-999.0");
/// assert_eq!(compact_float(14.158216), "14.158216");
/// ```
pub fn compact_float(value: f32) -> String {
    if value.abs() < COMPACT_EPSILON { "0".to_string() } else { format!("{value:?}") }
}

/// Render a DATA record as `[name(unit)=value, ...]` using `table`.
///
/// Fields without a descriptor render as `?(?)`.
pub fn format_block(table: &ChannelTable, block: &DataBlock) -> String {
    let mut out = String::with_capacity(128);
    out.push('[');
    for (field, value) in block.values.iter().enumerate() {
        if field > 0 {
            out.push_str(", ");
        }
        let (name, unit) = table
            .lookup(block.group_id, field)
            .map_or(("?", "?"), |d| (d.name.as_str(), d.unit.as_str()));
        let _ = write!(out, "{}({})={}", name, unit, compact_float(*value));
    }
    out.push(']');
    out
}

/// Channel store owned by a single writer.
#[derive(Debug)]
pub struct ChannelStore {
    table: Arc<ChannelTable>,
    drefs: BTreeMap<String, f32>,
    groups: BTreeMap<String, String>,
    blocks: BTreeMap<i32, DataBlock>,
    sequence: u64,
}

impl ChannelStore {
    pub fn new(table: Arc<ChannelTable>) -> Self {
        Self {
            table,
            drefs: BTreeMap::new(),
            groups: BTreeMap::new(),
            blocks: BTreeMap::new(),
            sequence: 0,
        }
    }

    /// Upsert one dataref.
    pub fn apply_dref(&mut self, update: &DrefUpdate) {
        debug!(name = %update.name, value = update.value, "DREF update");
        self.drefs.insert(update.name.clone(), update.value);
    }

    /// Upsert one DATA group, keyed `DATA*<group_id>`.
    pub fn apply_block(&mut self, block: &DataBlock) {
        let text = format_block(&self.table, block);
        debug!(group = block.group_id, values = %text, "DATA update");
        self.groups.insert(block.store_key(), text);
        self.blocks.insert(block.group_id, *block);
    }

    /// Apply every event carried by a decoded packet.
    pub fn apply(&mut self, packet: &Packet) {
        match packet {
            Packet::Dref(update) => self.apply_dref(update),
            Packet::Data(blocks) => blocks.iter().for_each(|b| self.apply_block(b)),
        }
    }

    /// Count, decode and apply one raw datagram.
    ///
    /// The sequence counter advances for every datagram, including ones that
    /// fail to decode. Complete records salvaged from a malformed DATA packet
    /// are applied before the error is returned; nothing else is touched on
    /// failure.
    pub fn ingest(&mut self, raw: &[u8]) -> Result<Packet> {
        self.sequence += 1;
        trace!(sequence = self.sequence, bytes = raw.len(), "Ingesting datagram");

        let decoded = protocol::decode(raw);
        match &decoded {
            Ok(packet) => self.apply(packet),
            Err(err) => err.recovered_blocks().iter().for_each(|b| self.apply_block(b)),
        }
        decoded
    }

    /// Forget every channel. The lookup table and sequence counter survive.
    pub fn reset(&mut self) {
        debug!(
            drefs = self.drefs.len(),
            groups = self.groups.len(),
            "Clearing channel store"
        );
        self.drefs.clear();
        self.groups.clear();
        self.blocks.clear();
    }

    /// Number of datagrams seen.
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    pub fn dref(&self, name: &str) -> Option<f32> {
        self.drefs.get(name).copied()
    }

    /// Formatted text of a DATA group.
    pub fn group_text(&self, group_id: i32) -> Option<&str> {
        self.groups.get(&format!("DATA*{group_id}")).map(String::as_str)
    }

    /// Latest raw record of a DATA group.
    pub fn block(&self, group_id: i32) -> Option<&DataBlock> {
        self.blocks.get(&group_id)
    }

    /// Number of stored entries (datarefs plus DATA groups).
    pub fn len(&self) -> usize {
        self.drefs.len() + self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn table(&self) -> &Arc<ChannelTable> {
        &self.table
    }

    /// Deterministic text dump, sorted by key.
    pub fn dump(&self) -> String {
        render_dump(self.sequence, &self.drefs, &self.groups)
    }

    /// Owned copy of the current state for publishing to readers.
    pub fn snapshot(&self) -> StoreSnapshot {
        StoreSnapshot {
            sequence: self.sequence,
            drefs: self.drefs.clone(),
            groups: self.groups.clone(),
            blocks: self.blocks.clone(),
        }
    }
}

/// Point-in-time copy of a [`ChannelStore`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub struct StoreSnapshot {
    pub sequence: u64,
    pub drefs: BTreeMap<String, f32>,
    pub groups: BTreeMap<String, String>,
    pub blocks: BTreeMap<i32, DataBlock>,
}

impl fmt::Display for StoreSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&render_dump(self.sequence, &self.drefs, &self.groups))
    }
}

fn render_dump(
    sequence: u64,
    drefs: &BTreeMap<String, f32>,
    groups: &BTreeMap<String, String>,
) -> String {
    let mut out = format!("sequence={sequence}\n");
    for (name, value) in drefs {
        let _ = write!(out, "\n{} = {}", name, compact_float(*value));
    }
    out.push('\n');
    for (key, text) in groups {
        let _ = write!(out, "\n{} = {}", key, text);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MonitorError;
    use crate::protocol::{build_data_packet, build_dref_packet, samples};

    fn store() -> ChannelStore {
        ChannelStore::new(Arc::new(ChannelTable::builtin()))
    }

    #[test]
    fn repeated_dref_keeps_single_entry() {
        let mut store = store();
        let update = DrefUpdate { name: "sim/x".to_string(), value: -3.5 };

        store.apply_dref(&update);
        let once = store.dump();
        store.apply_dref(&update);

        assert_eq!(store.len(), 1);
        assert_eq!(store.dref("sim/x"), Some(-3.5));
        assert_eq!(store.dump(), once);
    }

    #[test]
    fn later_dref_overwrites() {
        let mut store = store();
        store.apply_dref(&DrefUpdate { name: "sim/x".to_string(), value: 1.0 });
        store.apply_dref(&DrefUpdate { name: "sim/x".to_string(), value: 2.0 });
        assert_eq!(store.dref("sim/x"), Some(2.0));
    }

    #[test]
    fn block_text_uses_table_and_compaction() {
        let mut store = store();
        store.apply_block(&DataBlock {
            group_id: 3,
            values: [120.5, 0.000001, -0.000001, 118.0, 0.0, -999.0, 1.0, 2.0],
        });

        assert_eq!(
            store.group_text(3),
            Some(
                "[Vind(kias)=120.5, Vind(keas)=0, Vtrue(ktas)=0, Vtrue(ktgs)=118.0, \
                 ()=0, Vind(mph)=-999.0, Vtrue(mphas)=1.0, Vtrue(mphgs)=2.0]"
            )
        );
    }

    #[test]
    fn unknown_group_fields_render_placeholders() {
        let store_table = ChannelTable::empty();
        let text = format_block(&store_table, &DataBlock { group_id: 99, values: [1.0; 8] });
        assert!(text.starts_with("[?(?)=1.0, "));
        assert!(text.ends_with("?(?)=1.0]"));
    }

    #[test]
    fn sequence_counts_packets_not_records() {
        let mut store = store();
        store.ingest(samples::DATA_GROUPS).unwrap();
        assert_eq!(store.sequence(), 1);
        assert_eq!(store.len(), 6);

        store.ingest(samples::GROUNDSPEED_DREF).unwrap();
        assert_eq!(store.sequence(), 2);
        assert_eq!(store.len(), 7);
    }

    #[test]
    fn rejected_packets_still_count_and_do_not_corrupt() {
        let mut store = store();
        store.ingest(&build_dref_packet("sim/keep", 4.0)).unwrap();
        let before = store.snapshot();

        let err = store.ingest(b"BECN\0\0\0\0").unwrap_err();
        assert!(matches!(err, MonitorError::UnknownPacketType { .. }));
        let err = store.ingest(b"DREF+\x01").unwrap_err();
        assert!(matches!(err, MonitorError::MalformedPacket { .. }));

        let after = store.snapshot();
        assert_eq!(after.sequence, 3);
        assert_eq!(after.drefs, before.drefs);
        assert_eq!(after.groups, before.groups);
    }

    #[test]
    fn partial_data_applies_complete_records() {
        let mut store = store();
        let mut raw = build_data_packet(&[(17, [1.0; 8]), (20, [2.0; 8])]);
        raw.extend_from_slice(&[0u8; 10]);

        let err = store.ingest(&raw).unwrap_err();
        assert_eq!(err.recovered_blocks().len(), 2);
        assert!(store.block(17).is_some());
        assert!(store.block(20).is_some());
        assert_eq!(store.sequence(), 1);
    }

    #[test]
    fn reset_clears_channels_but_keeps_sequence() {
        let mut store = store();
        store.ingest(samples::DATA_GROUPS).unwrap();
        store.ingest(samples::GROUNDSPEED_DREF).unwrap();

        store.reset();

        assert!(store.is_empty());
        assert!(store.block(0).is_none());
        assert_eq!(store.sequence(), 2);
        assert_eq!(store.dump(), "sequence=2\n\n");
        assert!(store.table().described_count() > 0);
    }

    #[test]
    fn dump_is_sorted_and_matches_snapshot() {
        let mut store = store();
        store.apply_dref(&DrefUpdate { name: "sim/b".to_string(), value: 2.0 });
        store.apply_dref(&DrefUpdate { name: "sim/a".to_string(), value: 0.000001 });
        store.apply_block(&DataBlock { group_id: 14, values: [1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0] });

        let dump = store.dump();
        assert_eq!(
            dump,
            "sequence=0\n\nsim/a = 0\nsim/b = 2.0\n\nDATA*14 = \
             [gear(0/1)=1.0, wbrak(part)=0, lbrak(part)=0, rbrak(part)=0, ()=0, ()=0, ()=0, ()=0]"
        );
        assert_eq!(store.snapshot().to_string(), dump);
    }

    #[test]
    fn group_keys_sort_as_text() {
        let mut store = store();
        store.ingest(samples::DATA_GROUPS).unwrap();
        let keys: Vec<_> = store.snapshot().groups.into_keys().collect();
        assert_eq!(keys, ["DATA*0", "DATA*13", "DATA*14", "DATA*2", "DATA*3", "DATA*34"]);
    }
}
