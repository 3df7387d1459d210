// Record export - JSON array or CSV with a fixed column order

use std::fs;
use std::path::Path;

use tracing::info;

use super::errors::AcquisitionError;
use super::models::Record;

pub const CSV_COLUMNS: [&str; 11] = [
    "itemId",
    "title",
    "collectionId",
    "collectionTitle",
    "durationSeconds",
    "viewCount",
    "likeCount",
    "publishedAt",
    "sourceUrl",
    "description",
    "strategyOrigin",
];

pub fn write_json(records: &[Record], path: &Path) -> Result<(), AcquisitionError> {
    ensure_parent(path)?;
    fs::write(path, serde_json::to_string_pretty(records)?)?;
    info!("[Export] Merged JSON saved: {}", path.display());
    Ok(())
}

pub fn write_csv(records: &[Record], path: &Path) -> Result<(), AcquisitionError> {
    ensure_parent(path)?;
    fs::write(path, to_csv(records))?;
    info!("[Export] Saved CSV: {}", path.display());
    Ok(())
}

pub fn to_csv(records: &[Record]) -> String {
    let mut out = CSV_COLUMNS.join(",");
    out.push_str("\r\n");

    for r in records {
        let count = |v: Option<u64>| v.map(|n| n.to_string()).unwrap_or_default();
        let row = [
            r.item_id.clone(),
            r.title.clone(),
            r.collection_id.clone(),
            r.collection_title.clone(),
            count(r.duration_seconds),
            count(r.view_count),
            count(r.like_count),
            r.published_at.clone().unwrap_or_default(),
            r.source_url.clone(),
            r.description.clone(),
            r.strategy_origin.to_string(),
        ];
        let fields: Vec<String> = row.iter().map(|f| escape_field(f)).collect();
        out.push_str(&fields.join(","));
        out.push_str("\r\n");
    }
    out
}

/// RFC 4180 quoting
fn escape_field(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

fn ensure_parent(path: &Path) -> Result<(), AcquisitionError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}
