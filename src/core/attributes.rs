//! Attribute table rows for one-off scalar values

use serde::Serialize;
use tracing::debug;

use super::config::AttributeLabeling;
use super::flatten::FlatMap;
use super::path::FlatPath;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttributeRow {
    pub label: String,
    pub value: String,
}

/// Label for an attribute path.
///
/// Keys without a separator label themselves. Nested keys use the second
/// piece of the joined key by default, so `meta/rig/name` shows as `rig`;
/// `LastSegment` gives `name`. A literal `"meta/id"` key counts as nested.
pub fn attribute_label<'a>(path: &'a FlatPath, separator: &'a str, labeling: AttributeLabeling) -> &'a str {
    let mut pieces = path.key_segments(separator).skip(1);
    let Some(second) = pieces.next() else {
        // No separator anywhere, so the path is a single plain key
        return path.first();
    };
    match labeling {
        AttributeLabeling::SecondSegment => second,
        AttributeLabeling::LastSegment => pieces.last().unwrap_or(second),
    }
}

/// Build `(label, text)` rows in attribute order. Non-scalar paths are skipped.
pub fn build_attribute_table(
    flat: &FlatMap,
    attrs: &[FlatPath],
    labeling: AttributeLabeling,
) -> Vec<AttributeRow> {
    let rows: Vec<AttributeRow> = attrs
        .iter()
        .filter_map(|path| {
            let scalar = flat.get_path(path)?.as_scalar()?;
            Some(AttributeRow {
                label: attribute_label(path, flat.separator(), labeling).to_string(),
                value: scalar.display_text(),
            })
        })
        .collect();

    debug!(rows = rows.len(), "Built attribute table");
    rows
}
