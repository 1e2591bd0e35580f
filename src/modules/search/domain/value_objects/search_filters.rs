use serde::{Deserialize, Serialize};

use super::area_unit::AreaUnit;

/// Top-level transaction tab. Partitions the dataset before any other filter
/// applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tab {
    Buy,
    Rent,
    Commercial,
    Land,
}

impl Tab {
    /// Parse the `type` URL parameter; anything unrecognized falls back to
    /// the buy tab.
    pub fn parse(raw: &str) -> Tab {
        match raw.trim().to_lowercase().as_str() {
            "rent" => Tab::Rent,
            "commercial" => Tab::Commercial,
            "land" | "plot" => Tab::Land,
            _ => Tab::Buy,
        }
    }

    /// Default budget ceiling for this tab, in whole rupees. Rent budgets are
    /// monthly and two orders of magnitude below sale prices.
    pub fn default_budget_max(&self) -> i64 {
        match self {
            Tab::Rent => 500_000,
            Tab::Buy | Tab::Commercial | Tab::Land => 300_000_000,
        }
    }
}

/// Active sort order for the result list. Every sort is stable: equal keys
/// keep their input order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    /// Default; performs no reordering.
    Relevance,
    PriceLowToHigh,
    PriceHighToLow,
    AreaHighToLow,
    /// `is_new` flag descending, not timestamp; ties keep input order.
    NewestFirst,
    /// Pushes one commercial sub-type to the front without otherwise
    /// reordering (score-based stable sort).
    CategoryFirst(String),
}

impl SortKey {
    pub fn parse(raw: &str) -> SortKey {
        let raw = raw.trim().to_lowercase();
        match raw.as_str() {
            "price_asc" | "price_low_to_high" => SortKey::PriceLowToHigh,
            "price_desc" | "price_high_to_low" => SortKey::PriceHighToLow,
            "area_desc" | "area_high_to_low" => SortKey::AreaHighToLow,
            "newest" | "newest_first" => SortKey::NewestFirst,
            _ => match raw.strip_prefix("category:") {
                Some(category) if !category.is_empty() => {
                    SortKey::CategoryFirst(category.to_string())
                }
                _ => SortKey::Relevance,
            },
        }
    }
}

/// Default standard-area range, sq.ft.
pub const DEFAULT_AREA_RANGE: (f64, f64) = (0.0, 10_000.0);
/// Default land-area range, in whatever unit the filter currently uses.
pub const DEFAULT_LAND_AREA_RANGE: (f64, f64) = (0.0, 100_000.0);

/// Mutable filter state for one search session.
///
/// The per-range dirty flags record whether the user (or the URL) explicitly
/// constrained that range. A range filter is applied only when its flag is
/// set; the default range for a tab must never silently exclude results the
/// user never asked to exclude.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchFilters {
    pub property_types: Vec<String>,
    pub bhk: Vec<String>,

    pub budget: (i64, i64),
    pub budget_dirty: bool,

    pub area: (f64, f64),
    pub area_dirty: bool,

    pub land_area: (f64, f64),
    pub land_area_dirty: bool,
    pub land_area_unit: AreaUnit,

    pub localities: Vec<String>,
    pub furnished: Vec<String>,
    pub availability: Vec<String>,
    pub construction_age: Vec<String>,

    // Commercial-only selections
    pub floors: Vec<String>,
    pub parking: Vec<String>,

    /// Free-text location search.
    pub location: String,
    pub city: String,

    pub sort: SortKey,

    /// Transient recompute nudge; carries no filter semantics.
    pub trigger: u64,
}

impl SearchFilters {
    /// Tab-appropriate defaults with every dirty flag cleared.
    pub fn defaults_for_tab(tab: Tab) -> Self {
        Self {
            property_types: Vec::new(),
            bhk: Vec::new(),
            budget: (0, tab.default_budget_max()),
            budget_dirty: false,
            area: DEFAULT_AREA_RANGE,
            area_dirty: false,
            land_area: DEFAULT_LAND_AREA_RANGE,
            land_area_dirty: false,
            land_area_unit: AreaUnit::SqFt,
            localities: Vec::new(),
            furnished: Vec::new(),
            availability: Vec::new(),
            construction_age: Vec::new(),
            floors: Vec::new(),
            parking: Vec::new(),
            location: String::new(),
            city: String::new(),
            sort: SortKey::Relevance,
            trigger: 0,
        }
    }

    /// Whether a budget range differs from the given tab's default bounds.
    pub fn budget_differs_from_default(range: (i64, i64), tab: Tab) -> bool {
        range.0 != 0 || range.1 != tab.default_budget_max()
    }

    pub fn area_differs_from_default(range: (f64, f64)) -> bool {
        range != DEFAULT_AREA_RANGE
    }

    pub fn land_area_differs_from_default(range: (f64, f64)) -> bool {
        range != DEFAULT_LAND_AREA_RANGE
    }
}

/// One mutation of the filter state, keyed by field. All filter edits go
/// through `SearchController::update_filter` with one of these.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FilterUpdate {
    PropertyTypes(Vec<String>),
    Bhk(Vec<String>),
    Budget(i64, i64),
    Area(f64, f64),
    LandArea(f64, f64),
    LandAreaUnit(AreaUnit),
    Localities(Vec<String>),
    Furnished(Vec<String>),
    Availability(Vec<String>),
    ConstructionAge(Vec<String>),
    Floors(Vec<String>),
    Parking(Vec<String>),
    Location(String),
    /// Legacy multi-select; collapses to the single `location` field keeping
    /// at most the first entry.
    Locations(Vec<String>),
    City(String),
    Sort(SortKey),
    Trigger,
}
