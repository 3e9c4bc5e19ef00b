//! Batch state: file selection, sequential extraction, and export.

use crate::error::{Result, SelectionError, WorkflowError};
use crate::export::{export_file_name, ExportFormat, ExportJob};
use crate::extract::{file_name_of, is_accepted_type, Extractor};
use crate::fields::FieldSelection;
use crate::progress::ProgressSink;
use crate::types::{ExportArtifact, ResultEntry};
use chrono::NaiveDate;
use std::path::PathBuf;

pub const MAX_FILES: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowState {
    Idle,
    Selecting,
    Processing,
    Completed,
    Failed,
    Exporting,
}

pub struct Workflow<E: Extractor> {
    extractor: E,
    state: WorkflowState,
    files: Vec<PathBuf>,
    selection: FieldSelection,
    results: Vec<ResultEntry>,
    progress: f64,
    error: Option<String>,
}

impl<E: Extractor> Workflow<E> {
    pub fn new(extractor: E) -> Self {
        Self {
            extractor,
            state: WorkflowState::Idle,
            files: Vec::new(),
            selection: FieldSelection::new(),
            results: Vec::new(),
            progress: 0.0,
            error: None,
        }
    }

    pub fn state(&self) -> WorkflowState {
        self.state
    }

    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    pub fn selection(&self) -> &FieldSelection {
        &self.selection
    }

    pub fn results(&self) -> &[ResultEntry] {
        &self.results
    }

    pub fn progress(&self) -> f64 {
        self.progress
    }

    /// Last user-visible error message, if any.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn extractor(&self) -> &E {
        &self.extractor
    }

    /// Replace the upload batch. A rejected selection keeps the previous batch.
    pub fn select_files(&mut self, paths: Vec<PathBuf>) -> Result<()> {
        if self.state == WorkflowState::Processing {
            return Err(WorkflowError::AlreadyProcessing);
        }
        if let Err(e) = check_selection(&paths) {
            self.error = Some(e.to_string());
            return Err(e.into());
        }
        tracing::debug!(count = paths.len(), "files selected");
        self.files = paths;
        self.results.clear();
        self.progress = 0.0;
        self.error = None;
        self.state = WorkflowState::Selecting;
        Ok(())
    }

    pub fn set_selection(&mut self, selection: FieldSelection) {
        self.selection = selection;
    }

    pub fn toggle_field(&mut self, id: &str) -> Result<()> {
        self.selection.toggle(id).map_err(|e| {
            self.error = Some(e.to_string());
            e.into()
        })
    }

    pub fn toggle_all_fields(&mut self) {
        self.selection.toggle_all();
    }

    /// Extract every file in upload order, one call at a time.
    ///
    /// The first failure aborts the batch: later files are not submitted and no
    /// partial results are kept.
    pub fn process(&mut self, sink: &mut dyn ProgressSink) -> Result<()> {
        if self.state == WorkflowState::Processing {
            return Err(WorkflowError::AlreadyProcessing);
        }
        if self.files.is_empty() {
            return Err(WorkflowError::NoFiles);
        }
        if self.selection.is_empty() {
            return Err(WorkflowError::NoFieldsSelected);
        }

        self.state = WorkflowState::Processing;
        self.progress = 0.0;
        self.error = None;
        self.results.clear();

        let total = self.files.len() as f64;
        let mut collected = Vec::with_capacity(self.files.len());
        for (i, path) in self.files.iter().enumerate() {
            let file_name = file_name_of(path);

            self.progress = (i as f64 + 0.5) / total * 100.0;
            sink.progress(self.progress, &file_name);

            match self.extractor.extract(path) {
                Ok(result) => collected.push(ResultEntry { file_name: file_name.clone(), result }),
                Err(e) => {
                    tracing::warn!(file = %file_name, error = %e, "batch aborted");
                    self.error = Some(e.to_string());
                    self.state = WorkflowState::Failed;
                    sink.finish();
                    return Err(e.into());
                }
            }

            self.progress = (i as f64 + 1.0) / total * 100.0;
            sink.progress(self.progress, &file_name);
        }
        sink.finish();

        tracing::info!(files = collected.len(), "extraction complete");
        self.results = collected;
        self.state = WorkflowState::Completed;
        Ok(())
    }

    /// Serialize the completed results. Results survive a failed export.
    pub fn export(
        &mut self,
        format: ExportFormat,
        file_name: Option<&str>,
        today: NaiveDate,
    ) -> Result<ExportArtifact> {
        if self.state != WorkflowState::Completed {
            return Err(WorkflowError::NoResults);
        }
        let job = ExportJob {
            format,
            file_name: export_file_name(file_name, format, today),
            selection: self.selection.clone(),
            entries: self.results.clone(),
        };

        self.state = WorkflowState::Exporting;
        let outcome = job.run();
        self.state = WorkflowState::Completed;

        outcome.map_err(|e| {
            self.error = Some(e.to_string());
            e.into()
        })
    }
}

fn check_selection(paths: &[PathBuf]) -> std::result::Result<(), SelectionError> {
    if paths.len() > MAX_FILES {
        return Err(SelectionError::TooManyFiles {
            count: paths.len(),
            max: MAX_FILES,
        });
    }
    if let Some(bad) = paths.iter().find(|p| !is_accepted_type(p)) {
        return Err(SelectionError::UnsupportedFileType {
            file_name: file_name_of(bad),
        });
    }
    Ok(())
}
