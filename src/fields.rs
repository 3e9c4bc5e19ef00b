use crate::error::SelectionError;

/// Extractable field: internal key and the label shown to users.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDef {
    pub id: &'static str,
    pub label: &'static str,
}

pub const GSTIN: &str = "gstin";

pub const FIELD_CATALOG: &[FieldDef] = &[
    FieldDef { id: GSTIN, label: "GSTIN" },
    FieldDef { id: "vat_number", label: "VAT Number" },
    FieldDef { id: "invoice_number", label: "Invoice Number" },
    FieldDef { id: "grand_total", label: "Grand Total" },
    FieldDef { id: "currency", label: "Currency" },
    FieldDef { id: "bank_name", label: "Bank Name" },
    FieldDef { id: "account_number", label: "Account Number" },
    FieldDef { id: "ifsc_code", label: "IFSC Code" },
];

pub fn find_field(id: &str) -> Option<&'static FieldDef> {
    FIELD_CATALOG.iter().find(|f| f.id == id)
}

/// Catalog label for a field id; unknown ids are shown as-is.
pub fn label_for(id: &str) -> &str {
    find_field(id).map(|f| f.label).unwrap_or(id)
}

/// Fields the user wants displayed and exported, in the order they were picked.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldSelection {
    ids: Vec<String>,
}

impl FieldSelection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn all() -> Self {
        Self {
            ids: FIELD_CATALOG.iter().map(|f| f.id.to_string()).collect(),
        }
    }

    /// Build a selection from user input; every id must be in the catalog.
    pub fn from_ids<I, S>(ids: I) -> Result<Self, SelectionError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut selection = Self::new();
        for id in ids {
            let id = id.as_ref().trim();
            if id.is_empty() {
                continue;
            }
            let def = find_field(id).ok_or_else(|| SelectionError::UnknownField { id: id.to_string() })?;
            if !selection.contains(def.id) {
                selection.ids.push(def.id.to_string());
            }
        }
        Ok(selection)
    }

    /// Flip one catalog field in or out of the selection.
    pub fn toggle(&mut self, id: &str) -> Result<(), SelectionError> {
        let def = find_field(id).ok_or_else(|| SelectionError::UnknownField { id: id.to_string() })?;
        if let Some(pos) = self.ids.iter().position(|f| f == def.id) {
            self.ids.remove(pos);
        } else {
            self.ids.push(def.id.to_string());
        }
        Ok(())
    }

    /// Deselect everything when all catalog fields are selected, otherwise select all.
    pub fn toggle_all(&mut self) {
        if self.is_all() {
            self.ids.clear();
        } else {
            *self = Self::all();
        }
    }

    pub fn is_all(&self) -> bool {
        FIELD_CATALOG.iter().all(|f| self.contains(f.id))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.iter().any(|f| f == id)
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.ids.iter().map(String::as_str)
    }

    /// Selected ids in catalog order (card layout), unknown ids last.
    pub fn in_catalog_order(&self) -> Vec<&str> {
        let mut ordered: Vec<&str> = FIELD_CATALOG
            .iter()
            .map(|f| f.id)
            .filter(|id| self.contains(id))
            .collect();
        ordered.extend(self.iter().filter(|id| find_field(id).is_none()));
        ordered
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_on_then_off_restores_selection() {
        let mut selection = FieldSelection::from_ids(["currency", "gstin"]).unwrap();
        let before = selection.clone();
        selection.toggle("bank_name").unwrap();
        assert!(selection.contains("bank_name"));
        selection.toggle("bank_name").unwrap();
        assert_eq!(selection, before);
    }

    #[test]
    fn toggle_rejects_unknown_id() {
        let mut selection = FieldSelection::from_ids(["currency"]).unwrap();
        let err = selection.toggle("po_number").unwrap_err();
        assert!(matches!(err, SelectionError::UnknownField { ref id } if id == "po_number"));
        assert_eq!(selection.iter().collect::<Vec<_>>(), vec!["currency"]);
    }

    #[test]
    fn toggle_all_selects_then_clears() {
        let mut selection = FieldSelection::from_ids(["currency"]).unwrap();
        selection.toggle_all();
        assert_eq!(selection.len(), FIELD_CATALOG.len());
        assert!(selection.is_all());
        selection.toggle_all();
        assert!(selection.is_empty());
    }

    #[test]
    fn from_ids_rejects_unknown_and_dedups() {
        let err = FieldSelection::from_ids(["gstin", "nope"]).unwrap_err();
        assert!(matches!(err, SelectionError::UnknownField { ref id } if id == "nope"));

        let selection = FieldSelection::from_ids(["currency", " currency ", ""]).unwrap();
        assert_eq!(selection.iter().collect::<Vec<_>>(), vec!["currency"]);
    }

    #[test]
    fn catalog_order_ignores_pick_order() {
        let selection = FieldSelection::from_ids(["ifsc_code", "gstin", "currency"]).unwrap();
        assert_eq!(selection.in_catalog_order(), vec!["gstin", "currency", "ifsc_code"]);
        assert_eq!(selection.iter().collect::<Vec<_>>(), vec!["ifsc_code", "gstin", "currency"]);
    }

    #[test]
    fn label_falls_back_to_id() {
        assert_eq!(label_for("grand_total"), "Grand Total");
        assert_eq!(label_for("po_number"), "po_number");
    }
}
