use super::DocumentSource;
use crate::error::{CornellError, Result};
use crate::model::{AnnotationRecord, DocumentId, Stage, StageId};
use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

const RAW_TEXT_FILE: &str = "raw.txt";
const STAGES_FILE: &str = "stages.json";

pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn documents_dir(&self) -> PathBuf {
        self.root.join("documents")
    }

    fn document_dir(&self, document: DocumentId) -> PathBuf {
        self.documents_dir().join(document.to_string())
    }

    fn notes_dir(&self) -> PathBuf {
        self.root.join("notes")
    }

    pub fn note_path(&self, stage: StageId) -> PathBuf {
        self.notes_dir().join(format!("{}.json", stage))
    }

    /// Store a document's raw text and, when given, its reading plan.
    pub fn import_document(
        &self,
        document: DocumentId,
        raw_text: &str,
        stages: Option<&[Stage]>,
    ) -> Result<()> {
        let dir = self.document_dir(document);
        ensure_dir(&dir)?;
        write_atomic(&dir.join(RAW_TEXT_FILE), raw_text)?;

        if let Some(stages) = stages {
            // Notes live in notes/, never inline in the plan
            let plan: Vec<Stage> = stages
                .iter()
                .cloned()
                .map(|mut s| {
                    s.note = None;
                    s
                })
                .collect();
            let content = serde_json::to_string_pretty(&plan)?;
            write_atomic(&dir.join(STAGES_FILE), &content)?;
        }
        Ok(())
    }

    fn read_plan(&self, document: DocumentId) -> Result<Vec<Stage>> {
        let dir = self.document_dir(document);
        if !dir.exists() {
            return Err(CornellError::DocumentNotFound(document));
        }
        let path = dir.join(STAGES_FILE);
        if !path.exists() {
            return Ok(Vec::new());
        }
        let content = fs::read_to_string(&path)
            .map_err(|e| CornellError::Fetch(format!("{}: {}", path.display(), e)))?;
        let mut stages: Vec<Stage> = serde_json::from_str(&content)
            .map_err(|e| CornellError::Fetch(format!("{}: {}", path.display(), e)))?;
        stages.sort_by_key(|s| s.index);
        Ok(stages)
    }

    fn load_note(&self, stage: StageId) -> Option<AnnotationRecord> {
        let path = self.note_path(stage);
        let content = fs::read_to_string(&path).ok()?;
        match serde_json::from_str(&content) {
            Ok(record) => Some(record),
            Err(err) => {
                log::warn!("ignoring unreadable note {}: {}", path.display(), err);
                None
            }
        }
    }

    fn stage_exists(&self, stage: StageId) -> Result<bool> {
        let dir = self.documents_dir();
        if !dir.exists() {
            return Ok(false);
        }
        for entry in fs::read_dir(&dir)? {
            let Ok(document) = entry?.file_name().to_string_lossy().parse::<DocumentId>() else {
                continue;
            };
            // Unreadable plans simply don't contain the stage
            if let Ok(stages) = self.read_plan(document) {
                if stages.iter().any(|s| s.id == stage) {
                    return Ok(true);
                }
            }
        }
        Ok(false)
    }
}

impl DocumentSource for FileStore {
    fn list_stages(&self, document: DocumentId) -> Result<Vec<Stage>> {
        let mut stages = self.read_plan(document)?;
        for stage in &mut stages {
            stage.note = self.load_note(stage.id);
        }
        Ok(stages)
    }

    fn raw_text(&self, document: DocumentId) -> Result<String> {
        let dir = self.document_dir(document);
        if !dir.exists() {
            return Err(CornellError::DocumentNotFound(document));
        }
        let path = dir.join(RAW_TEXT_FILE);
        if !path.exists() {
            return Ok(String::new());
        }
        fs::read_to_string(&path)
            .map_err(|e| CornellError::Fetch(format!("{}: {}", path.display(), e)))
    }

    fn save_annotation_record(&mut self, stage: StageId, record: &AnnotationRecord) -> Result<()> {
        let persist = |e: CornellError| CornellError::Persist(e.to_string());

        if !self.stage_exists(stage).map_err(persist)? {
            return Err(CornellError::Persist(format!("stage {} does not exist", stage)));
        }
        let content = serde_json::to_string_pretty(record).map_err(|e| persist(e.into()))?;
        ensure_dir(&self.notes_dir()).map_err(persist)?;
        write_atomic(&self.note_path(stage), &content).map_err(persist)
    }
}

fn ensure_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)?;
    }
    Ok(())
}

fn write_atomic(target: &Path, content: &str) -> Result<()> {
    let dir = target
        .parent()
        .ok_or_else(|| CornellError::Store(format!("no parent for {}", target.display())))?;
    let tmp_path = dir.join(format!(".write-{}.tmp", Uuid::new_v4()));
    fs::write(&tmp_path, content)?;
    fs::rename(&tmp_path, target)?;
    Ok(())
}
