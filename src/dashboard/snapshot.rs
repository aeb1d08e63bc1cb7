use crate::dashboard::layout::{BreakpointLayouts, LayoutItem, SlotGroup};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Storage key of the persisted dashboard.
pub const STORAGE_KEY: &str = "ew-dashboard-layout-v1";

/// Key/value store backed by one JSON file per key inside a directory.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    dir: PathBuf,
}

impl LocalStorage {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    /// `~/.energy_dashboard`, or the working directory when no home exists.
    pub fn default_dir() -> PathBuf {
        dirs_next::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".energy_dashboard")
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }

    pub fn get_item(&self, key: &str) -> anyhow::Result<Option<String>> {
        let path = self.path_for(key);
        match std::fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e).with_context(|| format!("reading {}", path.display())),
        }
    }

    /// Write through a temporary file so a failed write never truncates the
    /// previous value.
    pub fn set_item(&self, key: &str, value: &str) -> anyhow::Result<()> {
        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("creating {}", self.dir.display()))?;
        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, value).with_context(|| format!("writing {}", tmp.display()))?;
        std::fs::rename(&tmp, &path).with_context(|| format!("replacing {}", path.display()))?;
        Ok(())
    }
}

/// Persisted dashboard fields. Each one is optional so older or partial
/// snapshots fall back to defaults field by field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout: Option<Vec<LayoutItem>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layouts: Option<BreakpointLayouts>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_widgets: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimized_widgets: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_dark_mode: Option<bool>,
    #[serde(
        default,
        alias = "lastRemovedKpiPositions",
        skip_serializing_if = "Option::is_none"
    )]
    pub removed_kpi_slots: Option<Vec<SlotGroup>>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct Envelope {
    #[serde(default)]
    state: Snapshot,
}

#[derive(Debug)]
pub enum SnapshotRead {
    Missing,
    Corrupt(anyhow::Error),
    Found(Snapshot),
}

impl Snapshot {
    pub fn to_json(&self) -> anyhow::Result<String> {
        let envelope = Envelope {
            state: self.clone(),
        };
        Ok(serde_json::to_string(&envelope)?)
    }

    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        let envelope: Envelope = serde_json::from_str(json)?;
        Ok(envelope.state)
    }

    pub fn read(storage: &LocalStorage) -> SnapshotRead {
        let raw = match storage.get_item(STORAGE_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return SnapshotRead::Missing,
            Err(e) => return SnapshotRead::Corrupt(e),
        };
        if raw.trim().is_empty() {
            return SnapshotRead::Missing;
        }
        match Self::from_json(&raw) {
            Ok(snapshot) => SnapshotRead::Found(snapshot),
            Err(e) => SnapshotRead::Corrupt(e.context("parsing dashboard snapshot")),
        }
    }

    pub fn write(&self, storage: &LocalStorage) -> anyhow::Result<()> {
        let json = self.to_json()?;
        storage.set_item(STORAGE_KEY, &json)
    }
}
