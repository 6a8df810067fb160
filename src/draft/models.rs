//! The editable draft and its closed category enumeration.

use serde::{Deserialize, Serialize};

/// Closed set of receipt categories.
///
/// `Other` is the universal fallback: anything absent or unrecognized maps to
/// it, and every display mapping is total because of that.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Food,
    Electronics,
    Clothing,
    Home,
    Pharmacy,
    Entertainment,
    Transport,
    Education,
    Utilities,
    Finances,
    Services,
    #[default]
    #[serde(other)]
    Other,
}

impl Category {
    /// Every category, in display order.
    pub const ALL: [Category; 12] = [
        Category::Food,
        Category::Electronics,
        Category::Clothing,
        Category::Home,
        Category::Pharmacy,
        Category::Entertainment,
        Category::Transport,
        Category::Education,
        Category::Utilities,
        Category::Finances,
        Category::Services,
        Category::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Food => "food",
            Self::Electronics => "electronics",
            Self::Clothing => "clothing",
            Self::Home => "home",
            Self::Pharmacy => "pharmacy",
            Self::Entertainment => "entertainment",
            Self::Transport => "transport",
            Self::Education => "education",
            Self::Utilities => "utilities",
            Self::Finances => "finances",
            Self::Services => "services",
            Self::Other => "other",
        }
    }

    /// Strict parse; `None` for anything outside the closed set.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "food" => Some(Self::Food),
            "electronics" => Some(Self::Electronics),
            "clothing" => Some(Self::Clothing),
            "home" => Some(Self::Home),
            "pharmacy" => Some(Self::Pharmacy),
            "entertainment" => Some(Self::Entertainment),
            "transport" => Some(Self::Transport),
            "education" => Some(Self::Education),
            "utilities" => Some(Self::Utilities),
            "finances" => Some(Self::Finances),
            "services" => Some(Self::Services),
            "other" => Some(Self::Other),
            _ => None,
        }
    }

    /// Lenient mapping for extracted values: unrecognized tags become
    /// `Other` instead of failing.
    pub fn from_extracted(s: &str) -> Self {
        Self::parse(s.trim().to_lowercase().as_str()).unwrap_or(Self::Other)
    }

    /// Display label shown in the UI.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Food => "Храна",
            Self::Electronics => "Електроника",
            Self::Clothing => "Дрехи",
            Self::Home => "Дом",
            Self::Pharmacy => "Аптека",
            Self::Entertainment => "Развлечение",
            Self::Transport => "Транспорт",
            Self::Education => "Образование",
            Self::Utilities => "Сметки",
            Self::Finances => "Финанси",
            Self::Services => "Услуги",
            Self::Other => "Друго",
        }
    }
}

/// One editable product row of a draft.
///
/// Identity is positional for the lifetime of the edit session; durable ids
/// are assigned by the store at submission.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftLineItem {
    pub name: String,
    pub price: String,
}

/// The mutable, user-editable receipt record pending submission.
///
/// Amounts are kept as strings to preserve the user's input exactly until the
/// store parses them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Draft {
    pub store_name: String,
    /// Canonically ISO `YYYY-MM-DD`; free-form input is preserved verbatim.
    pub date: String,
    pub total_amount: String,
    pub category: Category,
    pub warranty_months: String,
    pub line_items: Vec<DraftLineItem>,
}

/// Top-level draft fields addressable by an edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftField {
    StoreName,
    Date,
    TotalAmount,
    Category,
    WarrantyMonths,
}

impl DraftField {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::StoreName => "store_name",
            Self::Date => "date",
            Self::TotalAmount => "total_amount",
            Self::Category => "category",
            Self::WarrantyMonths => "warranty_months",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "store_name" => Some(Self::StoreName),
            "date" => Some(Self::Date),
            "total_amount" => Some(Self::TotalAmount),
            "category" => Some(Self::Category),
            "warranty_months" => Some(Self::WarrantyMonths),
            _ => None,
        }
    }
}

/// Fields of one line item addressable by an edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineItemField {
    Name,
    Price,
}

impl LineItemField {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Price => "price",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "name" => Some(Self::Name),
            "price" => Some(Self::Price),
            _ => None,
        }
    }
}
