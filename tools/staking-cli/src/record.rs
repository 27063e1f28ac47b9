//! Append-only JSON log of completed stakes.

use std::{fs, io::Write, path::Path};

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::{json, Value};
use tempfile::NamedTempFile;
use time::{format_description::well_known::Rfc3339, OffsetDateTime};

#[derive(Debug, Clone, Serialize)]
pub struct StakeRecord {
    pub staker: String,
    pub function: String,
    pub amount_wei: String,
    pub lockup_seconds: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub approval_tx: Option<String>,
    pub stake_tx: String,
    pub block_number: u64,
    pub explorer_link: String,
}

/// Add `record` under `stakes` in the JSON file at `path`, creating it if needed.
pub fn append_stake_record(path: &Path, network: &str, record: &StakeRecord) -> Result<()> {
    let now = OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .unwrap_or_else(|_| "unknown".to_string());

    let existing = if path.exists() {
        fs::read_to_string(path).with_context(|| format!("failed reading {}", path.display()))?
    } else {
        String::new()
    };

    let mut root: Value = if existing.trim().is_empty() {
        json!({})
    } else {
        serde_json::from_str(&existing)
            .with_context(|| format!("failed parsing JSON in {}", path.display()))?
    };

    if !root.is_object() {
        root = json!({});
    }

    root["network"] = json!(network);
    root["updated_at"] = json!(now);

    if root.get("stakes").and_then(Value::as_array).is_none() {
        root["stakes"] = json!([]);
    }

    let mut entry = serde_json::to_value(record).context("failed serialising stake record")?;
    entry["recorded_at"] = json!(now);

    if let Some(stakes) = root["stakes"].as_array_mut() {
        stakes.push(entry);
    }

    replace_file(path, &root)
}

/// Write `root` to a temp file next to `path`, then rename it over `path`.
fn replace_file(path: &Path, root: &Value) -> Result<()> {
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir)
        .with_context(|| format!("failed creating directory {}", dir.display()))?;

    let mut staged = NamedTempFile::new_in(dir)
        .with_context(|| format!("failed staging stake log in {}", dir.display()))?;
    serde_json::to_writer_pretty(staged.as_file_mut(), root)
        .context("failed serialising stakes JSON")?;
    staged
        .as_file_mut()
        .flush()
        .context("failed flushing staged stake log")?;
    staged
        .persist(path)
        .with_context(|| format!("failed replacing {}", path.display()))?;
    Ok(())
}
