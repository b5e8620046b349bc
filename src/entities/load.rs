use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};

use super::records::EntityCollections;

const SAMPLE_DATA: &str = include_str!("sample.json");

pub(super) fn read_entities(path: &Path) -> Result<EntityCollections> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read entity data from {}", path.display()))?;
    parse_entities(&raw).with_context(|| format!("failed to parse entity data in {}", path.display()))
}

pub(super) fn sample_entities() -> Result<EntityCollections> {
    parse_entities(SAMPLE_DATA).context("built-in sample data is malformed")
}

pub fn parse_entities(raw: &str) -> Result<EntityCollections> {
    let value: serde_json::Value = serde_json::from_str(raw).context("invalid JSON")?;
    if !value.is_object() {
        return Err(anyhow!(
            "expected an object with people, organizations and events collections"
        ));
    }
    serde_json::from_value(value).context("unexpected entity record shape")
}
