use crate::fields::FieldSelection;
use crate::normalize::resolve_for_display;
use crate::types::ResultEntry;
use std::fmt::Write;

/// Plain-text result card for one file.
pub fn render_entry(entry: &ResultEntry, selection: &FieldSelection) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", entry.file_name);
    let rows: Vec<(String, String)> = resolve_for_display(&entry.result, selection)
        .iter()
        .flat_map(|f| f.display_rows())
        .collect();
    let width = rows.iter().map(|(label, _)| label.chars().count()).max().unwrap_or(0);
    for (label, value) in rows {
        let pad = width - label.chars().count();
        let _ = writeln!(out, "  {}:{} {}", label, " ".repeat(pad), value);
    }
    out
}

pub fn render_results(entries: &[ResultEntry], selection: &FieldSelection) -> String {
    entries
        .iter()
        .map(|e| render_entry(e, selection))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn card_uses_catalog_order_and_na() {
        let entry = ResultEntry {
            file_name: "inv-1.pdf".to_string(),
            result: serde_json::from_value(json!({
                "supplier_gstin": { "value": "S1" },
                "customer_gstin": { "value": "C1" },
                "currency": "INR"
            }))
            .unwrap(),
        };
        let selection = FieldSelection::from_ids(["bank_name", "currency", "gstin"]).unwrap();
        let card = render_entry(&entry, &selection);
        assert_eq!(
            card,
            "inv-1.pdf\n  Supplier GSTIN: S1\n  Customer GSTIN: C1\n  Currency:       INR\n  Bank Name:      N/A\n"
        );
    }
}
