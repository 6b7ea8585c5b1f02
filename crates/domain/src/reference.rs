//! Reference data owned by another service and only read here.

use serde::{Deserialize, Serialize};

/// A country record, looked up by its numeric id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Country {
    pub id: i64,
    pub code: String,
    pub name: String,
    #[serde(default)]
    pub iso3: String,
    #[serde(default)]
    pub number: i64,
    #[serde(default)]
    pub continent_code: String,
    #[serde(default)]
    pub continent_name: String,
    #[serde(default)]
    pub display_order: i64,
    #[serde(default)]
    pub full_name: String,
}

/// A continent record, looked up by its code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Continent {
    pub code: String,
    pub name: String,
}
