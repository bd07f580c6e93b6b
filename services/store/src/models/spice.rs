//! Catalog item model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Catalog entry. `image_url` is a plain reference to externally hosted
/// media; the service does not handle uploads itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Spice {
    pub id: Uuid,
    pub name: String,
    pub price: f64,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// New catalog entry payload
#[derive(Debug, Clone, Deserialize)]
pub struct NewSpice {
    pub name: String,
    pub price: f64,
    pub description: Option<String>,
    pub image_url: Option<String>,
}

/// Catalog entry update payload
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateSpice {
    pub name: Option<String>,
    pub price: Option<f64>,
    pub description: Option<String>,
    pub image_url: Option<String>,
}
