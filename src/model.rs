//! Form state: recipient, company profile, metadata and the ordered line items.
//!
//! Nothing here validates. Free-text quantities and prices are kept verbatim
//! and only coerced when totals are computed (see [`crate::totals`]).

use chrono::Local;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::AppError;

// ============================================================================
// Company Profile
// ============================================================================

/// Sender details printed in the header block and the footer columns.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CompanyProfile {
    pub name: String,
    pub owner: String,
    pub address: String,
    pub phone: String,
    pub email: String,
    pub tax_number: String,
    pub tax_office: String,
    pub bank_name: String,
    pub iban: String,
    pub bic: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileField {
    Name,
    Owner,
    Address,
    Phone,
    Email,
    TaxNumber,
    TaxOffice,
    BankName,
    Iban,
    Bic,
}

impl FromStr for ProfileField {
    type Err = AppError;

    /// Accepts the JSON key ("taxNumber") as well as "tax-number" or "tax_number".
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .collect::<String>()
            .to_ascii_lowercase();
        match key.as_str() {
            "name" => Ok(ProfileField::Name),
            "owner" => Ok(ProfileField::Owner),
            "address" => Ok(ProfileField::Address),
            "phone" => Ok(ProfileField::Phone),
            "email" => Ok(ProfileField::Email),
            "taxnumber" => Ok(ProfileField::TaxNumber),
            "taxoffice" => Ok(ProfileField::TaxOffice),
            "bankname" => Ok(ProfileField::BankName),
            "iban" => Ok(ProfileField::Iban),
            "bic" => Ok(ProfileField::Bic),
            _ => Err(AppError::ConfigError(format!("Unknown company field: {}", s))),
        }
    }
}

impl CompanyProfile {
    /// Replaces one field for the current document only; nothing is saved.
    pub fn set(&mut self, field: ProfileField, value: impl Into<String>) {
        let value = value.into();
        let slot = match field {
            ProfileField::Name => &mut self.name,
            ProfileField::Owner => &mut self.owner,
            ProfileField::Address => &mut self.address,
            ProfileField::Phone => &mut self.phone,
            ProfileField::Email => &mut self.email,
            ProfileField::TaxNumber => &mut self.tax_number,
            ProfileField::TaxOffice => &mut self.tax_office,
            ProfileField::BankName => &mut self.bank_name,
            ProfileField::Iban => &mut self.iban,
            ProfileField::Bic => &mut self.bic,
        };
        *slot = value;
    }
}

// ============================================================================
// Recipient
// ============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Salutation {
    #[default]
    Herr,
    Frau,
}

impl Salutation {
    /// Opening line of a letter, e.g. "Sehr geehrter Herr Maier,".
    pub fn greeting(&self, name: &str) -> String {
        match self {
            Salutation::Herr => format!("Sehr geehrter Herr {},", name),
            Salutation::Frau => format!("Sehr geehrte Frau {},", name),
        }
    }
}

impl fmt::Display for Salutation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Salutation::Herr => write!(f, "Herr"),
            Salutation::Frau => write!(f, "Frau"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Recipient {
    pub salutation: Salutation,
    pub name: String,
    /// Free text, may span several lines.
    pub address: String,
}

// ============================================================================
// Line Items
// ============================================================================

/// One row of the item table.
///
/// A `Category` opens a new subtotal group that runs until the next
/// `Category` or the end of the list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum LineItem {
    Category {
        #[serde(default)]
        description: String,
    },
    Item {
        #[serde(default)]
        description: String,
        #[serde(default = "default_quantity", deserialize_with = "free_text")]
        quantity: String,
        #[serde(default = "default_price", deserialize_with = "free_text")]
        price: String,
    },
}

fn default_quantity() -> String {
    "1".to_string()
}

fn default_price() -> String {
    "0".to_string()
}

/// Accepts either a JSON string or a JSON number and keeps it as text.
fn free_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(serde_json::Number),
        Missing(Option<()>),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(s) => s,
        Raw::Number(n) => n.to_string(),
        Raw::Missing(_) => String::new(),
    })
}

impl LineItem {
    pub fn category(description: impl Into<String>) -> Self {
        LineItem::Category {
            description: description.into(),
        }
    }

    pub fn item(
        description: impl Into<String>,
        quantity: impl Into<String>,
        price: impl Into<String>,
    ) -> Self {
        LineItem::Item {
            description: description.into(),
            quantity: quantity.into(),
            price: price.into(),
        }
    }

    pub fn is_category(&self) -> bool {
        matches!(self, LineItem::Category { .. })
    }
}

impl Default for LineItem {
    fn default() -> Self {
        LineItem::item("", default_quantity(), default_price())
    }
}

// ============================================================================
// Document
// ============================================================================

/// Everything the layout engine needs besides the company profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Document {
    pub recipient: Recipient,
    /// Invoice or offer number, assigned by hand.
    pub number: String,
    pub project: String,
    pub date: String,
    pub items: Vec<LineItem>,
    /// Logo source: a data URI, an http(s) URL or a file path. Documents
    /// received over HTTP may only use data URIs.
    pub logo: Option<String>,
}

impl Default for Document {
    fn default() -> Self {
        Self {
            recipient: Recipient::default(),
            number: String::new(),
            project: String::new(),
            date: today(),
            items: Vec::new(),
            logo: None,
        }
    }
}

pub fn today() -> String {
    Local::now().date_naive().format("%Y-%m-%d").to_string()
}

impl Document {
    /// Appends an empty item with quantity 1 and price 0.
    pub fn push_item(&mut self) -> usize {
        self.items.push(LineItem::default());
        self.items.len() - 1
    }

    pub fn push_category(&mut self, description: impl Into<String>) -> usize {
        self.items.push(LineItem::category(description));
        self.items.len() - 1
    }

    /// Inserts at `index`, clamped to the end of the list.
    pub fn insert(&mut self, index: usize, item: LineItem) {
        let index = index.min(self.items.len());
        self.items.insert(index, item);
    }

    pub fn remove(&mut self, index: usize) -> Option<LineItem> {
        if index < self.items.len() {
            Some(self.items.remove(index))
        } else {
            None
        }
    }

    pub fn set_description(&mut self, index: usize, text: impl Into<String>) -> bool {
        match self.items.get_mut(index) {
            Some(LineItem::Category { description }) | Some(LineItem::Item { description, .. }) => {
                *description = text.into();
                true
            }
            None => false,
        }
    }

    pub fn set_quantity(&mut self, index: usize, text: impl Into<String>) -> bool {
        match self.items.get_mut(index) {
            Some(LineItem::Item { quantity, .. }) => {
                *quantity = text.into();
                true
            }
            _ => false,
        }
    }

    pub fn set_price(&mut self, index: usize, text: impl Into<String>) -> bool {
        match self.items.get_mut(index) {
            Some(LineItem::Item { price, .. }) => {
                *price = text.into();
                true
            }
            _ => false,
        }
    }

    pub fn set_salutation(&mut self, salutation: Salutation) {
        self.recipient.salutation = salutation;
    }

    pub fn has_categories(&self) -> bool {
        self.items.iter().any(LineItem::is_category)
    }
}
