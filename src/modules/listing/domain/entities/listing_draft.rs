use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// One wizard step of the listing form, mapped to its draft column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DraftStep {
    BasicDetails,
    LocationDetails,
    Features,
    Pricing,
    Media,
}

impl DraftStep {
    pub fn column_name(&self) -> &'static str {
        match self {
            DraftStep::BasicDetails => "basic_details",
            DraftStep::LocationDetails => "location_details",
            DraftStep::Features => "features",
            DraftStep::Pricing => "pricing",
            DraftStep::Media => "media",
        }
    }
}

/// Partially-completed listing, one nested JSON blob per wizard step. The
/// blobs stay schemaless on purpose: the wizard form evolves faster than any
/// stored draft does.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListingDraft {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub basic_details: Value,
    pub location_details: Value,
    pub features: Value,
    pub pricing: Value,
    pub media: Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ListingDraft {
    pub fn new(owner_id: Uuid) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            owner_id,
            basic_details: Value::Object(Default::default()),
            location_details: Value::Object(Default::default()),
            features: Value::Object(Default::default()),
            pricing: Value::Object(Default::default()),
            media: Value::Object(Default::default()),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn column(&self, step: DraftStep) -> &Value {
        match step {
            DraftStep::BasicDetails => &self.basic_details,
            DraftStep::LocationDetails => &self.location_details,
            DraftStep::Features => &self.features,
            DraftStep::Pricing => &self.pricing,
            DraftStep::Media => &self.media,
        }
    }

    pub fn column_mut(&mut self, step: DraftStep) -> &mut Value {
        match step {
            DraftStep::BasicDetails => &mut self.basic_details,
            DraftStep::LocationDetails => &mut self.location_details,
            DraftStep::Features => &mut self.features,
            DraftStep::Pricing => &mut self.pricing,
            DraftStep::Media => &mut self.media,
        }
    }
}
