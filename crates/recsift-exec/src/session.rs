//! The interactive session: one loaded record set, its grid model, the
//! search fragment, and the two background worker slots.
//!
//! Everything here runs on the caller's thread. Only `insert_all` on a
//! snapshot and `VoiceCapture::capture` run on workers. Time is passed in
//! explicitly so debounce behavior is deterministic.

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use recsift_core::config::AppConfig;
use recsift_core::declaration::TypeDeclaration;
use recsift_core::error::Error as CoreError;
use recsift_core::types::RawTable;
use recsift_io::CsvReader;
use recsift_operators::{CellRole, LoadReport, Normalizer, TableModel};
use recsift_store::{RecordStore, SqliteStore, TableSpec};

use crate::debounce::Debouncer;
use crate::error::{Result, SessionError};
use crate::voice::VoiceCapture;
use crate::worker::{OperationKind, WorkerSlot};

pub const SEND_OK: &str = "Data sent successfully!";
pub const VOICE_FAILED: &str = "Voice command failed to recognize a name.";

/// What a completed send wrote.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreOutcome {
    pub rows: usize,
    /// Rows in the table after the send, from readback. `None` when the
    /// rows were committed but could not be read back.
    pub total: Option<u64>,
}

/// Notifications produced by `Session::tick`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    Filtered { visible: usize },
    Stored(StoreOutcome),
    StoreFailed(String),
    VoiceRecognized(String),
    VoiceFailed,
}

impl SessionEvent {
    /// Text a front end shows for the event, if any.
    pub fn message(&self) -> Option<String> {
        match self {
            SessionEvent::Filtered { .. } => None,
            SessionEvent::Stored(_) => Some(SEND_OK.to_string()),
            SessionEvent::StoreFailed(e) => Some(format!("Something went wrong: {e}")),
            SessionEvent::VoiceRecognized(_) => None,
            SessionEvent::VoiceFailed => Some(VOICE_FAILED.to_string()),
        }
    }
}

pub struct Session {
    config: AppConfig,
    declaration: TypeDeclaration,
    reader: CsvReader,
    store: Arc<dyn RecordStore>,
    voice: Arc<dyn VoiceCapture>,

    model: Option<TableModel>,
    report: Option<LoadReport>,

    fragment: String,
    search_enabled: bool,
    debouncer: Debouncer<String>,

    persist: WorkerSlot<StoreOutcome>,
    capture: WorkerSlot<String>,
}

impl Session {
    pub fn new(
        config: AppConfig,
        declaration: TypeDeclaration,
        store: Arc<dyn RecordStore>,
        voice: Arc<dyn VoiceCapture>,
    ) -> Self {
        Self {
            reader: CsvReader::new(config.delimiter),
            debouncer: Debouncer::new(config.search_debounce()),
            config,
            declaration,
            store,
            voice,
            model: None,
            report: None,
            fragment: String::new(),
            search_enabled: true,
            persist: WorkerSlot::new(OperationKind::Persist),
            capture: WorkerSlot::new(OperationKind::VoiceCapture),
        }
    }

    /// Build a session from configuration: the declared column types (YAML
    /// file or the built-in layout) and a SQLite store at `db_path`.
    pub fn from_config(config: AppConfig, voice: Arc<dyn VoiceCapture>) -> Result<Self> {
        let table = TableSpec::people(&config.table)?;
        let store = SqliteStore::open_path(&config.db_path, table)?;
        Self::with_store(config, Arc::new(store), voice)
    }

    /// Like `from_config`, but sends go to `store` instead of `db_path`.
    pub fn with_store(
        config: AppConfig,
        store: Arc<dyn RecordStore>,
        voice: Arc<dyn VoiceCapture>,
    ) -> Result<Self> {
        let declaration = load_declaration(&config)?;
        Ok(Self::new(config, declaration, store, voice))
    }

    pub fn with_voice(mut self, voice: Arc<dyn VoiceCapture>) -> Self {
        self.voice = voice;
        self
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn model(&self) -> Option<&TableModel> {
        self.model.as_ref()
    }

    pub fn report(&self) -> Option<&LoadReport> {
        self.report.as_ref()
    }

    pub fn fragment(&self) -> &str {
        &self.fragment
    }

    pub fn search_enabled(&self) -> bool {
        self.search_enabled
    }

    pub fn send_enabled(&self) -> bool {
        !self.persist.is_busy()
    }

    pub fn voice_enabled(&self) -> bool {
        !self.capture.is_busy()
    }

    /// Read and normalize a delimited file. On error the session is untouched.
    pub fn load_csv(&mut self, path: impl AsRef<Path>) -> Result<LoadReport> {
        let raw = self.reader.read_path(path.as_ref()).map_err(|e| {
            tracing::warn!(path = %path.as_ref().display(), error = %e, "load failed");
            e
        })?;
        self.load_raw(&raw)
    }

    /// Normalize an already-read table and make it the working record set.
    pub fn load_raw(&mut self, raw: &RawTable) -> Result<LoadReport> {
        let normalized = Normalizer::new(&self.declaration)
            .name_column(self.config.name_column.as_str())
            .infer_types(self.config.infer_types)
            .run(raw)
            .map_err(|e| {
                tracing::warn!(error = %e, "load rejected");
                e
            })?;

        let mut model = TableModel::new(normalized.records);
        if self.search_enabled {
            model.apply_filter(Some(self.fragment.as_str()));
        }
        model.take_events();

        self.model = Some(model);
        self.report = Some(normalized.report.clone());
        Ok(normalized.report)
    }

    /// Record new search text. The filter runs once the debounce delay passes
    /// without further changes.
    pub fn set_fragment(&mut self, text: &str, now: Instant) {
        self.fragment = text.to_string();
        if self.search_enabled {
            self.debouncer.schedule(self.fragment.clone(), now);
        }
    }

    /// Disabling search clears the fragment and restores the full set at
    /// once; enabling it re-applies the current fragment at once. Returns the
    /// visible row count.
    pub fn toggle_search(&mut self, enabled: bool) -> Option<usize> {
        self.search_enabled = enabled;
        self.debouncer.cancel();
        if !enabled {
            self.fragment.clear();
        }
        let fragment = enabled.then_some(self.fragment.as_str());
        let model = self.model.as_mut()?;
        Some(model.apply_filter(fragment))
    }

    /// Apply an edit typed into the grid at working-view `row`.
    pub fn edit(&mut self, row: usize, column: usize, text: &str) -> Result<()> {
        let model = self.model.as_mut().ok_or(SessionError::NotLoaded)?;
        model.set_data(row, column, text)?;
        Ok(())
    }

    /// Selecting a cell copies its text into the search fragment.
    pub fn select(&mut self, row: usize, column: usize, now: Instant) -> Option<String> {
        let text = self
            .model
            .as_ref()?
            .data(row, column, CellRole::Display)?;
        self.set_fragment(&text, now);
        Some(text)
    }

    /// Hand a snapshot of the full record set to the persistence worker.
    pub fn send_to_store(&mut self) -> Result<()> {
        let model = self.model.as_ref().ok_or(SessionError::NotLoaded)?;
        if self.persist.is_busy() {
            return Err(SessionError::Busy(OperationKind::Persist));
        }

        let snapshot = model.snapshot();
        let store = Arc::clone(&self.store);
        tracing::info!(rows = snapshot.len(), "sending record set");
        self.persist.start(move || {
            let rows = store.insert_all(&snapshot).map_err(|e| e.to_string())?;
            // rows are committed by now; readback is informational
            let total = match store.readback() {
                Ok(total) => Some(total),
                Err(e) => {
                    tracing::warn!(error = %e, rows, "readback after send failed");
                    None
                }
            };
            Ok(StoreOutcome { rows, total })
        })
    }

    /// Start a voice capture whose transcript becomes the search fragment.
    pub fn voice_search(&mut self) -> Result<()> {
        if self.model.is_none() {
            return Err(SessionError::NotLoaded);
        }
        let voice = Arc::clone(&self.voice);
        self.capture
            .start(move || voice.capture().map_err(|e| e.to_string()))
    }

    /// Collect finished background work and run a due search.
    pub fn tick(&mut self, now: Instant) -> Vec<SessionEvent> {
        let mut events = Vec::new();

        if let Some(outcome) = self.persist.poll() {
            events.push(self.on_stored(outcome));
        }
        if let Some(outcome) = self.capture.poll() {
            events.push(self.on_voice(outcome, now));
        }
        if let Some(fragment) = self.debouncer.poll(now) {
            if let Some(model) = self.model.as_mut() {
                let visible = model.apply_filter(Some(fragment.as_str()));
                tracing::debug!(fragment = %fragment, visible, "search applied");
                events.push(SessionEvent::Filtered { visible });
            }
        }
        events
    }

    /// Block until the outstanding send finishes.
    pub fn wait_for_store(&mut self) -> Option<SessionEvent> {
        let outcome = self.persist.wait()?;
        Some(self.on_stored(outcome))
    }

    /// Block until the outstanding voice capture finishes.
    pub fn wait_for_voice(&mut self, now: Instant) -> Option<SessionEvent> {
        let outcome = self.capture.wait()?;
        Some(self.on_voice(outcome, now))
    }

    fn on_stored(&self, outcome: std::result::Result<StoreOutcome, String>) -> SessionEvent {
        match outcome {
            Ok(done) => {
                tracing::info!(rows = done.rows, total = ?done.total, "send complete");
                SessionEvent::Stored(done)
            }
            Err(e) => {
                tracing::warn!(error = %e, "send failed");
                SessionEvent::StoreFailed(e)
            }
        }
    }

    fn on_voice(&mut self, outcome: std::result::Result<String, String>, now: Instant) -> SessionEvent {
        match outcome {
            Ok(text) => {
                tracing::info!(transcript = %text, "voice recognized");
                self.set_fragment(&text, now);
                SessionEvent::VoiceRecognized(text)
            }
            Err(e) => {
                tracing::warn!(error = %e, "voice capture failed");
                SessionEvent::VoiceFailed
            }
        }
    }
}

fn load_declaration(config: &AppConfig) -> Result<TypeDeclaration> {
    match &config.schema_path {
        Some(path) => {
            let src = std::fs::read_to_string(path)
                .map_err(|e| CoreError::Config(format!("{path}: {e}")))?;
            Ok(TypeDeclaration::from_yaml(&src)?)
        }
        None => Ok(TypeDeclaration::healthcare()),
    }
}
