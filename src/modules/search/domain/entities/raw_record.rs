// Raw marketplace listing rows as the backend returns them.
// Any field may be absent or inconsistently cased, so everything outside the
// primary key is optional and defaulted, and numeric-ish columns tolerate
// whatever shape the backend happens to send.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Structured floor column. Older rows store a plain number, newer rows store
/// descriptor strings like "basement" or "ground".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawFloorField {
    Number(i64),
    Text(String),
}

/// One row of the remote `properties` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawPropertyRecord {
    pub id: Uuid,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub locality: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub area: Option<f64>,
    #[serde(default)]
    pub property_type: Option<String>,
    #[serde(default)]
    pub listing_type: Option<String>,
    #[serde(default)]
    pub bhk: Option<String>,
    #[serde(default)]
    pub bathrooms: Option<i64>,
    #[serde(default)]
    pub furnishing: Option<String>,
    #[serde(default)]
    pub availability: Option<String>,
    #[serde(default)]
    pub age_of_property: Option<String>,
    #[serde(default)]
    pub images: Option<Vec<String>>,
    #[serde(default)]
    pub floor_no: Option<RawFloorField>,
    #[serde(default)]
    pub plot_area_unit: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub owner_id: Option<Uuid>,
    #[serde(default)]
    pub is_premium: Option<bool>,
    #[serde(default)]
    pub visible: Option<bool>,
    #[serde(default)]
    pub status: Option<String>,
}

impl RawPropertyRecord {
    /// Minimal constructor used by tests and the in-memory source.
    pub fn new(id: Uuid, title: &str) -> Self {
        Self {
            id,
            title: Some(title.to_string()),
            locality: None,
            city: None,
            state: None,
            price: None,
            area: None,
            property_type: None,
            listing_type: None,
            bhk: None,
            bathrooms: None,
            furnishing: None,
            availability: None,
            age_of_property: None,
            images: None,
            floor_no: None,
            plot_area_unit: None,
            created_at: None,
            owner_id: None,
            is_premium: None,
            visible: Some(true),
            status: None,
        }
    }

    /// Whether this row should appear in search results at all.
    /// Hidden and rejected rows are excluded both from counts and batches.
    pub fn is_listable(&self) -> bool {
        self.visible.unwrap_or(false)
            && !self
                .status
                .as_deref()
                .map(|s| s.eq_ignore_ascii_case("rejected"))
                .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserializes_sparse_row() {
        let json = r#"{"id":"550e8400-e29b-41d4-a716-446655440000","title":"2 BHK Flat"}"#;
        let record: RawPropertyRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.title.as_deref(), Some("2 BHK Flat"));
        assert!(record.price.is_none());
        assert!(record.created_at.is_none());
    }

    #[test]
    fn test_floor_field_accepts_number_and_text() {
        let json = r#"{"id":"550e8400-e29b-41d4-a716-446655440000","floor_no":2}"#;
        let record: RawPropertyRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.floor_no, Some(RawFloorField::Number(2)));

        let json = r#"{"id":"550e8400-e29b-41d4-a716-446655440000","floor_no":"basement"}"#;
        let record: RawPropertyRecord = serde_json::from_str(json).unwrap();
        assert_eq!(
            record.floor_no,
            Some(RawFloorField::Text("basement".to_string()))
        );
    }

    #[test]
    fn test_listable_requires_visible_and_not_rejected() {
        let mut record = RawPropertyRecord::new(Uuid::new_v4(), "Plot");
        assert!(record.is_listable());

        record.status = Some("Rejected".to_string());
        assert!(!record.is_listable());

        record.status = Some("approved".to_string());
        record.visible = Some(false);
        assert!(!record.is_listable());
    }
}
