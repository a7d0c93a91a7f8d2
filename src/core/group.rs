//! Grouper: bucket series by their first path segment
//!
//! Sub-keys inside a group are kept in ascending ordinal order so the draw
//! order is reproducible across runs. Groups keep first-encountered order.

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, trace, warn};

use super::config::UngroupedSeriesPolicy;
use super::error::PipelineError;
use super::flatten::FlatMap;
use super::path::FlatPath;

/// Sub-key marker identifying the primary series of a group
pub const PRIMARY_MARKER: &str = "HV";

/// True when `sub_key` names the group's primary series
pub fn is_primary_series(sub_key: &str) -> bool {
    sub_key.contains(PRIMARY_MARKER)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SeriesRole {
    Primary,
    Secondary,
}

impl SeriesRole {
    pub fn of(sub_key: &str) -> Self {
        if is_primary_series(sub_key) {
            SeriesRole::Primary
        } else {
            SeriesRole::Secondary
        }
    }
}

/// Series sharing a first path segment
#[derive(Debug, Clone, PartialEq)]
pub struct Group {
    pub name: String,
    /// sub_key → raw sequence, ascending by sub_key
    pub series: BTreeMap<String, Vec<Value>>,
}

impl Group {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            series: BTreeMap::new(),
        }
    }

    pub fn sub_keys(&self) -> impl Iterator<Item = &str> {
        self.series.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }
}

#[derive(Debug, Clone, Default)]
pub struct Grouping {
    pub groups: Vec<Group>,
    /// Depth-1 series left out under `UngroupedSeriesPolicy::Drop`
    pub ungrouped: Vec<FlatPath>,
}

impl Grouping {
    pub fn get(&self, name: &str) -> Option<&Group> {
        self.groups.iter().find(|g| g.name == name)
    }
}

/// Bucket `series` (paths into `flat`) by group name.
pub fn group(
    series: &[FlatPath],
    flat: &FlatMap,
    policy: UngroupedSeriesPolicy,
) -> Result<Grouping, PipelineError> {
    let separator = flat.separator();
    let mut out = Grouping::default();
    // Maps group name to index in `out.groups`
    let mut group_index: HashMap<String, usize> = HashMap::new();

    for path in series {
        let Some((name, sub_key)) = path.split_group(separator) else {
            let key = path.join(separator);
            match policy {
                UngroupedSeriesPolicy::Reject => {
                    return Err(PipelineError::UngroupableKey { key });
                }
                UngroupedSeriesPolicy::Drop => {
                    warn!(key = %key, "Series has no group segment, dropped");
                    out.ungrouped.push(path.clone());
                    continue;
                }
            }
        };

        let Some(items) = flat.get_path(path).and_then(|v| v.as_sequence()) else {
            trace!(key = %path.join(separator), "Not a sequence in flattened map, skipped");
            continue;
        };

        let idx = match group_index.get(name) {
            Some(&idx) => idx,
            None => {
                let idx = out.groups.len();
                debug!(group = name, idx, "New group");
                group_index.insert(name.to_string(), idx);
                out.groups.push(Group::new(name));
                idx
            }
        };

        trace!(group = name, sub_key = %sub_key, len = items.len(), "Grouped series");
        out.groups[idx].series.insert(sub_key, items.to_vec());
    }

    debug!(
        groups = out.groups.len(),
        ungrouped = out.ungrouped.len(),
        "Grouped series"
    );
    Ok(out)
}
