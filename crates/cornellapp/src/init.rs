//! Context setup shared by every client.
//!
//! Resolves where data lives, loads [`CornellConfig`] from that directory and
//! hands out document sessions wired to a [`FileStore`].
//!
//! The data directory is chosen in this order:
//! 1. An explicit override (the CLI's `--data`).
//! 2. The `CORNELL_DATA` environment variable.
//! 3. The OS data directory, via the `directories` crate.

use crate::api::CornellApi;
use crate::config::CornellConfig;
use crate::error::{CornellError, Result};
use crate::model::{DocumentId, Stage};
use crate::session::SessionContext;
use crate::store::fs::FileStore;
use clapfig::{Clapfig, SearchMode, SearchPath};
use directories::ProjectDirs;
use std::path::PathBuf;

pub const DATA_ENV: &str = "CORNELL_DATA";
pub const CONFIG_FILE: &str = "cornell.toml";

pub struct CornellContext {
    pub data_dir: PathBuf,
    pub config: CornellConfig,
}

impl CornellContext {
    pub fn store(&self) -> FileStore {
        FileStore::new(self.data_dir.clone())
    }

    /// Open a document and load its stages.
    pub fn open(&self, document: DocumentId) -> Result<CornellApi<FileStore>> {
        let context = SessionContext::from_config(document, &self.config);
        let mut api = CornellApi::new(self.store(), context);
        api.open()?;
        Ok(api)
    }

    /// Store a document's raw text and an optional JSON reading plan.
    /// Returns the number of stages imported.
    pub fn import(&self, document: DocumentId, raw_text: &str, stages_json: Option<&str>) -> Result<usize> {
        let stages: Option<Vec<Stage>> = stages_json.map(serde_json::from_str).transpose()?;
        self.store()
            .import_document(document, raw_text, stages.as_deref())?;
        let count = stages.map_or(0, |s| s.len());
        log::info!("imported document {} with {} stage(s)", document, count);
        Ok(count)
    }
}

pub fn resolve_data_dir(data_override: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(path) = data_override {
        return Ok(path);
    }
    if let Ok(path) = std::env::var(DATA_ENV) {
        if !path.trim().is_empty() {
            return Ok(PathBuf::from(path));
        }
    }
    ProjectDirs::from("com", "cornell", "cornell")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .ok_or_else(|| CornellError::Config("Could not determine data directory".to_string()))
}

pub fn initialize(data_override: Option<PathBuf>) -> Result<CornellContext> {
    let data_dir = resolve_data_dir(data_override)?;

    let config: CornellConfig = Clapfig::builder()
        .app_name("cornell")
        .file_name(CONFIG_FILE)
        .search_paths(vec![SearchPath::Path(data_dir.clone())])
        .search_mode(SearchMode::Merge)
        .load()
        .unwrap_or_default();

    log::debug!("data dir: {}", data_dir.display());
    Ok(CornellContext { data_dir, config })
}
