use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Which side of the invoice a tax ID belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Party {
    Supplier,
    Customer,
}

impl Party {
    pub fn key(self) -> &'static str {
        match self {
            Party::Supplier => "supplier_gstin",
            Party::Customer => "customer_gstin",
        }
    }
}

/// Raw response object of the extraction endpoint for one file.
///
/// The shape is open: known keys are looked up by presence, everything else is
/// carried along untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExtractionResult {
    pub fields: Map<String, Value>,
}

impl ExtractionResult {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self { fields }
    }

    /// Raw value for a field when present (not null, not an empty string).
    pub fn raw(&self, id: &str) -> Option<&Value> {
        self.fields.get(id).filter(|v| is_present(v))
    }

    /// Tax ID for one party: `{"value": "..."}` or a bare string. Blank counts
    /// as absent; a present value is returned as sent.
    pub fn tax_id(&self, party: Party) -> Option<&str> {
        let field = self.fields.get(party.key())?;
        let value = match field {
            Value::Object(obj) => obj.get("value")?,
            other => other,
        };
        value.as_str().filter(|s| !s.trim().is_empty())
    }
}

fn is_present(v: &Value) -> bool {
    match v {
        Value::Null => false,
        Value::String(s) => !s.is_empty(),
        _ => true,
    }
}

/// String view of a value. Non-string scalars are stringified, objects and
/// arrays are rendered as compact JSON.
pub fn value_to_text(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// One processed file and what the endpoint returned for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultEntry {
    pub file_name: String,
    pub result: ExtractionResult,
}

/// A serialized export, ready to be written to disk.
#[derive(Debug, Clone)]
pub struct ExportArtifact {
    pub file_name: String,
    pub bytes: Vec<u8>,
}
