//! Channel name/unit lookup for DATA output groups

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

use super::FIELDS_PER_GROUP;
use crate::{MonitorError, Result};

/// Name and unit of one field of a data output group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub struct ChannelDescriptor {
    pub name: String,
    pub unit: String,
}

impl ChannelDescriptor {
    pub fn new(name: impl Into<String>, unit: impl Into<String>) -> Self {
        Self { name: name.into(), unit: unit.into() }
    }
}

/// Highest data output group id a table may describe.
pub const MAX_GROUP_ID: u32 = 1023;

/// Flat lookup array indexed by `group_id * 8 + field`.
///
/// Groups that were never described leave holes; lookups into a hole or past
/// the end return `None`.
#[derive(Debug, Clone, Default)]
pub struct ChannelTable {
    entries: Vec<Option<ChannelDescriptor>>,
}

/// On-disk form of a channel table.
#[derive(Debug, Deserialize, Serialize)]
struct TableFile {
    groups: Vec<GroupEntry>,
}

#[derive(Debug, Deserialize, Serialize)]
struct GroupEntry {
    id: u32,
    #[serde(default)]
    title: Option<String>,
    fields: Vec<(String, String)>,
}

impl ChannelTable {
    /// Empty table; every lookup misses.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Describe one group, replacing any previous description.
    ///
    /// Fields beyond the eighth are ignored; missing trailing fields stay
    /// undescribed.
    ///
    /// # Errors
    ///
    /// [`MonitorError::Config`] when `group_id` exceeds [`MAX_GROUP_ID`].
    pub fn insert_group(&mut self, group_id: u32, fields: &[(&str, &str)]) -> Result<()> {
        if group_id > MAX_GROUP_ID {
            return Err(MonitorError::config(
                "channel table",
                format!("group {group_id} is above the highest group id {MAX_GROUP_ID}"),
            ));
        }
        self.fill_group(group_id as usize, fields);
        Ok(())
    }

    fn fill_group(&mut self, group: usize, fields: &[(&str, &str)]) {
        let base = group * FIELDS_PER_GROUP;
        if self.entries.len() < base + FIELDS_PER_GROUP {
            self.entries.resize(base + FIELDS_PER_GROUP, None);
        }
        for slot in &mut self.entries[base..base + FIELDS_PER_GROUP] {
            *slot = None;
        }
        for (index, (name, unit)) in fields.iter().take(FIELDS_PER_GROUP).enumerate() {
            self.entries[base + index] = Some(ChannelDescriptor::new(*name, *unit));
        }
    }

    /// Look up the descriptor of `field` within `group_id`.
    pub fn lookup(&self, group_id: i32, field: usize) -> Option<&ChannelDescriptor> {
        if field >= FIELDS_PER_GROUP {
            return None;
        }
        let group = usize::try_from(group_id).ok()?;
        let index = group.checked_mul(FIELDS_PER_GROUP)?.checked_add(field)?;
        self.entries.get(index)?.as_ref()
    }

    /// Number of described fields.
    pub fn described_count(&self) -> usize {
        self.entries.iter().filter(|e| e.is_some()).count()
    }

    /// Parse a table from YAML.
    ///
    /// ```yaml
    /// groups:
    ///   - id: 3
    ///     title: Speeds
    ///     fields:
    ///       - [Vind, kias]
    ///       - [Vind, keas]
    /// ```
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let file: TableFile = serde_yaml_ng::from_str(yaml)?;
        let mut table = Self::empty();
        for group in &file.groups {
            if group.fields.len() > FIELDS_PER_GROUP {
                return Err(MonitorError::config(
                    "channel table",
                    format!(
                        "group {} lists {} fields, at most {} allowed",
                        group.id,
                        group.fields.len(),
                        FIELDS_PER_GROUP
                    ),
                ));
            }
            let fields: Vec<(&str, &str)> =
                group.fields.iter().map(|(n, u)| (n.as_str(), u.as_str())).collect();
            table.insert_group(group.id, &fields)?;
            debug!(group = group.id, title = ?group.title, "Loaded channel group");
        }
        Ok(table)
    }

    /// Load a YAML table from disk.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let yaml = std::fs::read_to_string(path).map_err(|e| {
            MonitorError::config(
                "channel table",
                format!("failed to read {}: {}", path.display(), e),
            )
        })?;
        Self::from_yaml_str(&yaml)
    }

    /// Table covering the commonly enabled X-Plane data output groups.
    pub fn builtin() -> Self {
        let mut table = Self::empty();
        for (group_id, fields) in BUILTIN_GROUPS {
            table.fill_group(*group_id, fields);
        }
        table
    }
}

type GroupFields = [(&'static str, &'static str); FIELDS_PER_GROUP];

const BUILTIN_GROUPS: &[(usize, GroupFields)] = &[
    (
        0,
        [
            ("f-act", "/sec"),
            ("f-sim", "/sec"),
            ("", ""),
            ("frame", "time"),
            ("cpu", "time"),
            ("gpu", "time"),
            ("grnd", "ratio"),
            ("flit", "ratio"),
        ],
    ),
    (
        1,
        [
            ("real", "time"),
            ("totl", "time"),
            ("missn", "time"),
            ("timer", "time"),
            ("", ""),
            ("zulu", "time"),
            ("local", "time"),
            ("hobbs", "time"),
        ],
    ),
    (
        2,
        [
            ("USE", "ratio"),
            ("plane", "count"),
            ("objct", "count"),
            ("", ""),
            ("", ""),
            ("", ""),
            ("", ""),
            ("", ""),
        ],
    ),
    (
        3,
        [
            ("Vind", "kias"),
            ("Vind", "keas"),
            ("Vtrue", "ktas"),
            ("Vtrue", "ktgs"),
            ("", ""),
            ("Vind", "mph"),
            ("Vtrue", "mphas"),
            ("Vtrue", "mphgs"),
        ],
    ),
    (
        4,
        [
            ("Mach", "ratio"),
            ("", ""),
            ("VVI", "fpm"),
            ("", ""),
            ("Gload", "norml"),
            ("Gload", "axial"),
            ("Gload", "side"),
            ("", ""),
        ],
    ),
    (
        13,
        [
            ("elev", "trim"),
            ("ailrn", "trim"),
            ("ruddr", "trim"),
            ("flap", "handl"),
            ("flap", "postn"),
            ("slat", "ratio"),
            ("sbrak", "handl"),
            ("sbrak", "postn"),
        ],
    ),
    (
        14,
        [
            ("gear", "0/1"),
            ("wbrak", "part"),
            ("lbrak", "part"),
            ("rbrak", "part"),
            ("", ""),
            ("", ""),
            ("", ""),
            ("", ""),
        ],
    ),
    (
        17,
        [
            ("pitch", "deg"),
            ("roll", "deg"),
            ("hding", "true"),
            ("hding", "mag"),
            ("", ""),
            ("", ""),
            ("", ""),
            ("", ""),
        ],
    ),
    (
        20,
        [
            ("lat", "deg"),
            ("lon", "deg"),
            ("alt", "ftmsl"),
            ("alt", "ftagl"),
            ("on", "runwy"),
            ("alt", "ind"),
            ("lat", "south"),
            ("lon", "west"),
        ],
    ),
    (
        34,
        [
            ("POWR", "1,hp"),
            ("POWR", "2,hp"),
            ("POWR", "3,hp"),
            ("POWR", "4,hp"),
            ("POWR", "5,hp"),
            ("POWR", "6,hp"),
            ("POWR", "7,hp"),
            ("POWR", "8,hp"),
        ],
    ),
];
