//! Tax-ID reconciliation and per-field value resolution.
//!
//! The card renderer and all three exporters go through this module, so the
//! supplier/customer branching lives in one place.

use crate::fields::{label_for, FieldSelection, GSTIN};
use crate::types::{value_to_text, ExtractionResult, Party};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaxId {
    Absent,
    Single(String),
    Both { supplier: String, customer: String },
}

pub fn resolve_tax_id(result: &ExtractionResult) -> TaxId {
    match (result.tax_id(Party::Supplier), result.tax_id(Party::Customer)) {
        (Some(s), Some(c)) => TaxId::Both {
            supplier: s.to_string(),
            customer: c.to_string(),
        },
        (Some(one), None) | (None, Some(one)) => TaxId::Single(one.to_string()),
        (None, None) => TaxId::Absent,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Resolved<'a> {
    TaxId(TaxId),
    Value(Option<&'a Value>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedField<'a> {
    pub id: &'a str,
    pub value: Resolved<'a>,
}

fn resolve_one<'a>(result: &'a ExtractionResult, id: &'a str) -> ResolvedField<'a> {
    let value = if id == GSTIN {
        Resolved::TaxId(resolve_tax_id(result))
    } else {
        Resolved::Value(result.raw(id))
    };
    ResolvedField { id, value }
}

/// Selected fields in selection order (export layout).
pub fn resolve<'a>(result: &'a ExtractionResult, selection: &'a FieldSelection) -> Vec<ResolvedField<'a>> {
    selection.iter().map(|id| resolve_one(result, id)).collect()
}

/// Selected fields in catalog order (card layout).
pub fn resolve_for_display<'a>(
    result: &'a ExtractionResult,
    selection: &'a FieldSelection,
) -> Vec<ResolvedField<'a>> {
    selection
        .in_catalog_order()
        .into_iter()
        .map(|id| resolve_one(result, id))
        .collect()
}

const NOT_AVAILABLE: &str = "N/A";

impl<'a> ResolvedField<'a> {
    /// Labeled rows for the result card. Absent values read "N/A".
    pub fn display_rows(&self) -> Vec<(String, String)> {
        match &self.value {
            Resolved::TaxId(TaxId::Single(v)) => vec![("GSTIN".to_string(), v.clone())],
            Resolved::TaxId(TaxId::Both { supplier, customer }) => vec![
                ("Supplier GSTIN".to_string(), supplier.clone()),
                ("Customer GSTIN".to_string(), customer.clone()),
            ],
            Resolved::TaxId(TaxId::Absent) => vec![("GSTIN".to_string(), NOT_AVAILABLE.to_string())],
            Resolved::Value(v) => vec![(
                label_for(self.id).to_string(),
                v.map(value_to_text).unwrap_or_else(|| NOT_AVAILABLE.to_string()),
            )],
        }
    }

    /// (Field, Value) pairs for the long CSV layout. Absent values are empty.
    pub fn csv_rows(&self) -> Vec<(String, String)> {
        match &self.value {
            Resolved::TaxId(TaxId::Absent) => vec![("GSTIN".to_string(), String::new())],
            Resolved::TaxId(_) => self.display_rows(),
            Resolved::Value(v) => vec![(
                label_for(self.id).to_string(),
                v.map(value_to_text).unwrap_or_default(),
            )],
        }
    }

    /// Object members for the JSON export. Non-tax values pass through untouched.
    pub fn json_members(&self) -> Vec<(String, Value)> {
        match &self.value {
            Resolved::TaxId(TaxId::Single(v)) => vec![(GSTIN.to_string(), Value::String(v.clone()))],
            Resolved::TaxId(TaxId::Both { supplier, customer }) => vec![
                (Party::Supplier.key().to_string(), Value::String(supplier.clone())),
                (Party::Customer.key().to_string(), Value::String(customer.clone())),
            ],
            Resolved::TaxId(TaxId::Absent) => vec![(GSTIN.to_string(), Value::Null)],
            Resolved::Value(v) => vec![(self.id.to_string(), v.cloned().unwrap_or(Value::Null))],
        }
    }

    /// Single spreadsheet cell; both tax IDs share one cell.
    pub fn sheet_cell(&self) -> String {
        match &self.value {
            Resolved::TaxId(TaxId::Single(v)) => v.clone(),
            Resolved::TaxId(TaxId::Both { supplier, customer }) => {
                format!("Supplier: {}, Customer: {}", supplier, customer)
            }
            Resolved::TaxId(TaxId::Absent) => String::new(),
            Resolved::Value(v) => v.map(value_to_text).unwrap_or_default(),
        }
    }
}
