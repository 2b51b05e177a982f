//! Space entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use pointpro_core::space::SpaceKind;
use pointpro_core::types::{DbId, Timestamp};

/// A row from the `spaces` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Space {
    pub id: DbId,
    pub name: String,
    pub description: String,
    pub kind: SpaceKind,
    pub capacity: i32,
    pub city: String,
    pub address: String,
    pub equipment: String,
    pub price_per_hour: f64,
    pub image_path: Option<String>,
    pub available: bool,
    pub under_maintenance: bool,
    pub maintenance_until: Option<Timestamp>,
    pub created_at: Timestamp,
}

impl Space {
    /// Equipment is stored as a comma-separated list; split for display.
    pub fn equipment_list(&self) -> Vec<&str> {
        self.equipment
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect()
    }
}

/// DTO for creating a new space.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateSpace {
    pub name: String,
    pub description: Option<String>,
    pub kind: SpaceKind,
    pub capacity: i32,
    pub city: String,
    pub address: Option<String>,
    pub equipment: Option<String>,
    pub price_per_hour: f64,
    pub image_path: Option<String>,
}

/// DTO for updating an existing space. All fields are optional.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct UpdateSpace {
    pub name: Option<String>,
    pub description: Option<String>,
    pub kind: Option<SpaceKind>,
    pub capacity: Option<i32>,
    pub city: Option<String>,
    pub address: Option<String>,
    pub equipment: Option<String>,
    pub price_per_hour: Option<f64>,
    pub image_path: Option<String>,
    pub available: Option<bool>,
}

/// Catalog search parameters for the public listing.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct SpaceFilter {
    /// Case-insensitive substring match on the city.
    pub city: Option<String>,
    pub kind: Option<SpaceKind>,
    /// Exclude spaces that have any reservation on this date.
    pub date: Option<chrono::NaiveDate>,
    /// `price_asc`, `price_desc`, or `capacity`.
    pub sort: Option<String>,
}

impl SpaceFilter {
    pub fn is_search(&self) -> bool {
        self.city.is_some() || self.kind.is_some() || self.date.is_some()
    }
}
