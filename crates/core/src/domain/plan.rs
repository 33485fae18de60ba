use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlanSlug(pub String);

impl PlanSlug {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlanSlug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PlanSlug {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// A published internet plan as it appears in the content document.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Plan {
    pub slug: PlanSlug,
    pub name: String,
    /// Monthly price in lek.
    pub price_all: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accent_label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_badge: Option<String>,
    #[serde(rename = "down")]
    pub down_mbps: u32,
    #[serde(rename = "up")]
    pub up_mbps: u32,
    #[serde(default)]
    pub features: Vec<String>,
}
