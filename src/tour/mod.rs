use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::models::TourLocation;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTourLocation {
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub order: i64,
}

impl NewTourLocation {
    pub fn validate(self) -> Result<NewTourLocation, String> {
        if self.name.trim().is_empty() || self.description.trim().is_empty() {
            return Err("Name and description are required".to_string());
        }
        Ok(self)
    }

    pub fn into_location(self, id: String, now: DateTime<Utc>) -> TourLocation {
        TourLocation {
            id,
            name: self.name,
            description: self.description,
            image: self.image,
            icon: self.icon.filter(|s| !s.is_empty()).unwrap_or_else(|| "MapPin".to_string()),
            order: self.order,
            created_at: now,
            updated_at: now,
        }
    }
}

/// By `order`; when nobody set an order, by creation time.
pub fn order_locations(locations: &mut [TourLocation]) {
    if locations.iter().all(|l| l.order == 0) {
        locations.sort_by_key(|l| l.created_at);
    } else {
        locations.sort_by_key(|l| l.order);
    }
}
