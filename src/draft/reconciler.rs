//! Pure reconciliation and edit operations over the draft.
//!
//! Every operation consumes a draft and returns the updated one; nothing here
//! mutates shared state or performs IO, which keeps edits trivially safe to
//! apply between the controller's suspension points.

use chrono::NaiveDate;

use crate::extraction::StructuredReceipt;

use super::models::{Category, Draft, DraftField, DraftLineItem, LineItemField};

/// Build the initial draft from a structured extraction payload.
///
/// Fields map 1:1; the category tag is validated against the closed
/// enumeration (unknown → `other`), the date is normalized to ISO where
/// possible, and warranty starts at the form default of `"0"` since
/// extraction never produces it.
pub fn from_extraction(structured: &StructuredReceipt) -> Draft {
    Draft {
        store_name: structured.store_name.clone(),
        date: normalize_date(&structured.date),
        total_amount: structured.total_amount.clone(),
        category: structured
            .category
            .as_deref()
            .map(Category::from_extracted)
            .unwrap_or_default(),
        warranty_months: "0".to_string(),
        line_items: structured
            .products
            .iter()
            .map(|p| DraftLineItem {
                name: p.name.clone(),
                price: p.price.clone(),
            })
            .collect(),
    }
}

/// Update a single top-level field. Line items are never touched.
///
/// A category value outside the closed enumeration reconciles to `other`.
pub fn set_field(mut draft: Draft, field: DraftField, value: &str) -> Draft {
    match field {
        DraftField::StoreName => draft.store_name = value.to_string(),
        DraftField::Date => draft.date = value.to_string(),
        DraftField::TotalAmount => draft.total_amount = value.to_string(),
        DraftField::Category => draft.category = Category::from_extracted(value),
        DraftField::WarrantyMonths => draft.warranty_months = value.to_string(),
    }
    draft
}

/// Update one field of the line item at `index`; all other items keep their
/// content and position.
///
/// # Panics
/// Panics if `index` is out of bounds — that is a caller bug, not a
/// recoverable condition.
pub fn set_line_item(mut draft: Draft, index: usize, field: LineItemField, value: &str) -> Draft {
    let item = &mut draft.line_items[index];
    match field {
        LineItemField::Name => item.name = value.to_string(),
        LineItemField::Price => item.price = value.to_string(),
    }
    draft
}

/// Append one empty line item; existing items are not reordered.
pub fn add_line_item(mut draft: Draft) -> Draft {
    draft.line_items.push(DraftLineItem::default());
    draft
}

/// Remove the line item at `index`; later items shift down one position.
///
/// # Panics
/// Panics if `index` is out of bounds.
pub fn remove_line_item(mut draft: Draft, index: usize) -> Draft {
    draft.line_items.remove(index);
    draft
}

/// Normalize a date string to ISO `YYYY-MM-DD`.
///
/// The structuring service is prompted for `DD-MM-YYYY`; already-ISO input
/// passes through. Anything else is preserved verbatim — the store does its
/// own validation.
pub fn normalize_date(raw: &str) -> String {
    let trimmed = raw.trim();
    if NaiveDate::parse_from_str(trimmed, "%Y-%m-%d").is_ok() {
        return trimmed.to_string();
    }
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%d-%m-%Y") {
        return date.format("%Y-%m-%d").to_string();
    }
    raw.to_string()
}
