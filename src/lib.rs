pub mod cli;
pub mod config;
pub mod error;
pub mod export;
pub mod extract;
pub mod fields;
pub mod normalize;
pub mod progress;
pub mod render;
pub mod types;
pub mod workflow;

pub use error::{ExportError, ExtractError, SelectionError, WorkflowError};
pub use export::{ExportFormat, ExportJob};
pub use extract::{Extractor, HttpExtractor};
pub use fields::{FieldSelection, FIELD_CATALOG};
pub use types::{ExportArtifact, ExtractionResult, ResultEntry};
pub use workflow::{Workflow, WorkflowState, MAX_FILES};
