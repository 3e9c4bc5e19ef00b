use crate::config::Config;
use crate::error::{ExtractError, SelectionError};
use crate::types::ExtractionResult;
use reqwest::blocking::{multipart, Client};
use std::fs;
use std::path::Path;
use std::time::Duration;

pub const ACCEPTED_EXTENSIONS: &[&str] = &["pdf", "jpg", "jpeg", "png"];

const MAX_FILE_SIZE: u64 = 50 * 1024 * 1024;

/// Submits one document and returns what the endpoint extracted from it.
pub trait Extractor {
    fn extract(&self, path: &Path) -> Result<ExtractionResult, ExtractError>;
}

pub fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn extension_of(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
}

pub fn is_accepted_type(path: &Path) -> bool {
    extension_of(path)
        .map(|ext| ACCEPTED_EXTENSIONS.contains(&ext.as_str()))
        .unwrap_or(false)
}

fn mime_for(path: &Path) -> &'static str {
    match extension_of(path).as_deref() {
        Some("pdf") => "application/pdf",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        _ => "application/octet-stream",
    }
}

/// Check a document before it is queued: accepted type, exists, within size limit.
pub fn validate_document_file(path: &Path) -> Result<(), SelectionError> {
    if !is_accepted_type(path) {
        return Err(SelectionError::UnsupportedFileType {
            file_name: file_name_of(path),
        });
    }
    let metadata = fs::metadata(path).map_err(|_| SelectionError::FileNotFound {
        path: path.to_path_buf(),
    })?;
    if !metadata.is_file() {
        return Err(SelectionError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    if metadata.len() > MAX_FILE_SIZE {
        return Err(SelectionError::FileTooLarge {
            file_name: file_name_of(path),
            size: metadata.len(),
            max: MAX_FILE_SIZE,
        });
    }
    Ok(())
}

/// Multipart client for `POST <base>/extract`.
pub struct HttpExtractor {
    client: Client,
    url: String,
}

impl HttpExtractor {
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self, reqwest::Error> {
        // `None` disables the blocking client's 30s default.
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            url: extract_url(base_url),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, reqwest::Error> {
        Self::new(&config.api_url, config.timeout)
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

pub fn extract_url(base_url: &str) -> String {
    format!("{}/extract", base_url.trim().trim_end_matches('/'))
}

impl Extractor for HttpExtractor {
    fn extract(&self, path: &Path) -> Result<ExtractionResult, ExtractError> {
        let file_name = file_name_of(path);

        let bytes = fs::read(path).map_err(|source| ExtractError::Io {
            file_name: file_name.clone(),
            source,
        })?;
        let size = bytes.len();

        let part = multipart::Part::bytes(bytes)
            .file_name(file_name.clone())
            .mime_str(mime_for(path))
            .map_err(|e| ExtractError::Network {
                file_name: file_name.clone(),
                message: e.to_string(),
            })?;
        let form = multipart::Form::new().part("file", part);

        tracing::debug!(file = %file_name, bytes = size, url = %self.url, "submitting document");

        let response = self
            .client
            .post(&self.url)
            .multipart(form)
            .send()
            .map_err(|e| ExtractError::Network {
                file_name: file_name.clone(),
                message: if e.is_connect() || e.is_timeout() {
                    "Check your internet connection and try again.".to_string()
                } else {
                    format!("Network error: {}", e)
                },
            })?;

        let status = response.status();
        tracing::debug!(file = %file_name, status = status.as_u16(), "extraction response");
        if !status.is_success() {
            let status_text = status
                .canonical_reason()
                .map(str::to_string)
                .unwrap_or_else(|| status.as_u16().to_string());
            tracing::warn!(file = %file_name, status = status.as_u16(), "extraction failed");
            return Err(ExtractError::Remote {
                file_name,
                status: status.as_u16(),
                status_text,
            });
        }

        let body: serde_json::Value = response.json().map_err(|e| ExtractError::InvalidResponse {
            file_name: file_name.clone(),
            message: format!("Invalid JSON: {}", e),
        })?;
        match body {
            serde_json::Value::Object(fields) => {
                tracing::info!(file = %file_name, fields = fields.len(), "extracted");
                Ok(ExtractionResult::new(fields))
            }
            other => Err(ExtractError::InvalidResponse {
                file_name,
                message: format!("expected a JSON object, got {}", json_kind(&other)),
            }),
        }
    }
}

fn json_kind(v: &serde_json::Value) -> &'static str {
    match v {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn extract_url_trims_trailing_slash() {
        assert_eq!(extract_url("https://api.example.com/"), "https://api.example.com/extract");
        assert_eq!(extract_url("http://127.0.0.1:5000"), "http://127.0.0.1:5000/extract");
    }

    #[test]
    fn accepted_types_are_case_insensitive() {
        assert!(is_accepted_type(Path::new("scan.PDF")));
        assert!(is_accepted_type(Path::new("photo.Jpeg")));
        assert!(is_accepted_type(Path::new("a/b/c.png")));
        assert!(!is_accepted_type(Path::new("notes.txt")));
        assert!(!is_accepted_type(Path::new("README")));
    }

    #[cfg(unix)]
    #[test]
    fn non_utf8_file_name_is_kept_lossily() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let path = Path::new(OsStr::from_bytes(b"scans/inv\xff.pdf"));
        assert_eq!(file_name_of(path), "inv\u{FFFD}.pdf");
        assert!(is_accepted_type(path));
    }

    #[test]
    fn mime_follows_extension() {
        assert_eq!(mime_for(Path::new("x.pdf")), "application/pdf");
        assert_eq!(mime_for(Path::new("x.JPG")), "image/jpeg");
        assert_eq!(mime_for(Path::new("x.png")), "image/png");
    }

    #[test]
    fn validate_rejects_missing_and_unsupported() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("gone.pdf");
        assert!(matches!(
            validate_document_file(&missing),
            Err(SelectionError::FileNotFound { .. })
        ));

        let txt = dir.path().join("notes.txt");
        fs::write(&txt, b"hello").unwrap();
        assert!(matches!(
            validate_document_file(&txt),
            Err(SelectionError::UnsupportedFileType { ref file_name }) if file_name == "notes.txt"
        ));

        let pdf = dir.path().join("invoice.pdf");
        let mut f = fs::File::create(&pdf).unwrap();
        f.write_all(b"%PDF-1.7\n").unwrap();
        assert!(validate_document_file(&pdf).is_ok());
    }
}
