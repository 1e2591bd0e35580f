use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Normalized floor position of a unit.
///
/// Commercial listings care about basement/ground specifically, so those are
/// modeled as their own variants rather than sentinel numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FloorLevel {
    Basement,
    Ground,
    Number(i64),
}

impl FloorLevel {
    /// Numeric view used by the "N+" floor buckets; basement sorts below
    /// ground.
    pub fn as_number(&self) -> i64 {
        match self {
            FloorLevel::Basement => -1,
            FloorLevel::Ground => 0,
            FloorLevel::Number(n) => *n,
        }
    }
}

/// The engine-internal canonical projection of one listing.
///
/// Every `Property` is produced by exactly one transformation of exactly one
/// `RawPropertyRecord`; the transformation is pure and deterministic given the
/// record and the wall-clock instant used for `is_new`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Property {
    pub id: Uuid,
    pub title: String,
    /// Derived "locality, city" display string.
    pub location: String,
    pub locality: String,
    pub city: String,
    /// Display price ("₹1.2 Cr", "₹45.0 L", ...), derived from `price_number`.
    pub price: String,
    /// Filter/sort key in whole rupees.
    pub price_number: i64,
    /// Display area with unit.
    pub area: String,
    /// Magnitude in the record's native unit (sq.ft for everything except
    /// land, which keeps its stored plot unit).
    pub area_number: f64,
    pub bedrooms: u32,
    pub bathrooms: u32,
    /// Free-form display category ("Penthouse", "Agricultural Land", ...).
    pub property_type: String,
    /// Canonical category used for filter matching. Always a member of the
    /// closed set produced by the transformer (Penthouse collapses to
    /// "Apartment" here while `property_type` keeps the display text).
    pub filter_property_type: String,
    /// Lowercased listing type: sale, resale, rent, commercial, pg/hostel.
    pub listing_type: String,
    pub furnished: String,
    pub availability: String,
    pub age_of_property: String,
    /// Recomputed at transform time from `created_at` vs "now"; not a
    /// persisted fact.
    pub is_new: bool,
    pub owner_id: Option<Uuid>,
    /// Unit label for `area_number`. Standardized when the stored unit is
    /// recognized, "sq.ft" when missing; an unrecognized stored unit is kept
    /// verbatim so the land-area filter can exclude the record instead of
    /// comparing it in the wrong unit.
    pub plot_area_unit: String,
    pub is_premium: bool,
    pub images: Vec<String>,
    pub floor_no: Option<FloorLevel>,
    /// Title-derived; `None` means unknown, which never matches an explicit
    /// parking filter option.
    pub parking_available: Option<bool>,
}

impl Property {
    /// Land-like listings (plots, agricultural/industrial/commercial land)
    /// are carved out of the commercial tab and skipped by BHK filtering.
    pub fn is_land_like(&self) -> bool {
        let category = self.filter_property_type.to_lowercase();
        let title = self.title.to_lowercase();
        category.contains("plot")
            || category.contains("land")
            || title.contains("plot")
            || title.contains(" land")
    }

    /// Whether the display category reads as a commercial sub-type.
    pub fn is_commercial_like(&self) -> bool {
        let category = self.filter_property_type.to_lowercase();
        [
            "office",
            "retail",
            "shop",
            "warehouse",
            "godown",
            "showroom",
            "restaurant",
            "co-working",
            "coworking",
            "industrial",
            "commercial",
        ]
        .iter()
        .any(|kw| category.contains(kw))
    }

    /// Residential listings are the only ones BHK filters apply to.
    pub fn is_residential_like(&self) -> bool {
        !self.is_land_like() && !self.is_commercial_like()
    }
}
