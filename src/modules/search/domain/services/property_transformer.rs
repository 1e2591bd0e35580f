use chrono::{DateTime, Duration, Utc};

use crate::modules::search::domain::entities::{Property, RawPropertyRecord};
use crate::modules::search::domain::services::inference::{
    floor_from_category_fallback, floor_from_structured_field, floor_from_title,
    parking_from_title, Inference,
};
use crate::modules::search::domain::value_objects::area_unit::{standardize_unit_name, AreaUnit};

/// Maps one raw backend row into the engine's canonical `Property` shape.
///
/// The mapping is pure and deterministic given the record and `now` (which
/// only feeds the 7-day `is_new` window). It never fails: malformed numeric
/// fields default to 0 and unknown type strings pass through as display text.
#[derive(Debug, Clone, Default)]
pub struct PropertyTransformer;

/// Commercial sub-type patterns, checked in priority order; the first group
/// whose keyword list matches wins.
const COMMERCIAL_SUBTYPES: &[(&[&str], &str)] = &[
    (&["office"], "Office Space"),
    (&["retail", "shop"], "Retail Shop"),
    (&["warehouse", "godown"], "Warehouse"),
    (&["showroom"], "Showroom"),
    (&["restaurant", "cafe"], "Restaurant Space"),
    (&["co-working", "coworking"], "Co-working Space"),
    (&["industrial"], "Industrial Building"),
];

impl PropertyTransformer {
    pub fn new() -> Self {
        Self
    }

    pub fn transform(&self, raw: &RawPropertyRecord, now: DateTime<Utc>) -> Property {
        let title = raw.title.clone().unwrap_or_default();
        let raw_type = raw.property_type.clone().unwrap_or_default();

        let (property_type, filter_property_type) = Self::infer_category(&raw_type, &title);

        let locality = raw.locality.clone().unwrap_or_default();
        let city = raw.city.clone().unwrap_or_default();
        let location = match (locality.is_empty(), city.is_empty()) {
            (false, false) => format!("{}, {}", locality, city),
            (false, true) => locality.clone(),
            (true, false) => city.clone(),
            (true, true) => String::new(),
        };

        let price_number = raw.price.map(|p| p.max(0.0) as i64).unwrap_or(0);
        let area_number = raw.area.map(|a| a.max(0.0)).unwrap_or(0.0);

        let land_like = Self::is_land_category(&filter_property_type, &title);
        let plot_area_unit = Self::plot_unit_label(raw, land_like);

        let is_commercial = Self::is_commercial_category(&filter_property_type);
        let floor_no = floor_from_structured_field(&raw.floor_no)
            .or_else(|| floor_from_title(&title))
            .or_else(|| floor_from_category_fallback(is_commercial && !land_like))
            .into_option();

        let parking_available = match parking_from_title(&title) {
            Inference::Matched(available) => Some(available),
            Inference::Unmatched => None,
        };

        let is_new = raw
            .created_at
            .map(|created| now.signed_duration_since(created) < Duration::days(7))
            .unwrap_or(false);

        Property {
            id: raw.id,
            title,
            location,
            locality,
            city,
            price: Self::format_price(price_number),
            price_number,
            area: Self::format_area(area_number, &plot_area_unit),
            area_number,
            bedrooms: Self::parse_bedrooms(raw.bhk.as_deref()),
            bathrooms: raw.bathrooms.map(|b| b.max(0) as u32).unwrap_or(0),
            property_type,
            filter_property_type,
            listing_type: raw
                .listing_type
                .as_deref()
                .map(|l| l.trim().to_lowercase())
                .unwrap_or_default(),
            furnished: Self::display_case(raw.furnishing.as_deref()),
            availability: Self::display_case(raw.availability.as_deref()),
            age_of_property: Self::display_case(raw.age_of_property.as_deref()),
            is_new,
            owner_id: raw.owner_id,
            plot_area_unit,
            is_premium: raw.is_premium.unwrap_or(false),
            images: raw.images.clone().unwrap_or_default(),
            floor_no,
            parking_available,
        }
    }

    /// Transform a whole batch, in order.
    pub fn transform_batch(
        &self,
        records: &[RawPropertyRecord],
        now: DateTime<Utc>,
    ) -> Vec<Property> {
        records.iter().map(|r| self.transform(r, now)).collect()
    }

    /// Category inference in strict priority order:
    /// (a) Penthouse/Duplex remap the filter category only, display stays;
    /// (b) land/plot detection with sub-classing;
    /// (c) commercial sub-type keywords, first listed match wins;
    /// otherwise the raw type passes through for both.
    fn infer_category(raw_type: &str, title: &str) -> (String, String) {
        let type_lower = raw_type.to_lowercase();
        let title_lower = title.to_lowercase();

        if type_lower.contains("penthouse") {
            return (raw_type.to_string(), "Apartment".to_string());
        }
        if type_lower.contains("duplex") {
            return (raw_type.to_string(), "Villa".to_string());
        }

        if Self::mentions_land(&type_lower, &title_lower) {
            let sub_type = Self::classify_land(&type_lower, &title_lower);
            return (sub_type.to_string(), sub_type.to_string());
        }

        for (keywords, label) in COMMERCIAL_SUBTYPES {
            let matched = keywords
                .iter()
                .any(|kw| type_lower.contains(kw) || title_lower.contains(kw));
            if matched {
                return ((*label).to_string(), (*label).to_string());
            }
        }

        (raw_type.to_string(), raw_type.to_string())
    }

    fn mentions_land(type_lower: &str, title_lower: &str) -> bool {
        type_lower.contains("plot")
            || type_lower.contains("land")
            || title_lower.contains("plot")
            || title_lower.contains(" land")
    }

    /// Sub-classify land in priority order: agricultural, industrial,
    /// commercial, then generic.
    fn classify_land(type_lower: &str, title_lower: &str) -> &'static str {
        let mentions = |kw: &str| type_lower.contains(kw) || title_lower.contains(kw);
        if mentions("agricultur") || mentions("farm") {
            "Agricultural Land"
        } else if mentions("industrial") {
            "Industrial Land"
        } else if mentions("commercial") {
            "Commercial Land"
        } else {
            "Land"
        }
    }

    fn is_land_category(filter_type: &str, title: &str) -> bool {
        let lower = filter_type.to_lowercase();
        Self::mentions_land(&lower, &title.to_lowercase())
    }

    fn is_commercial_category(filter_type: &str) -> bool {
        let lower = filter_type.to_lowercase();
        COMMERCIAL_SUBTYPES
            .iter()
            .any(|(keywords, label)| {
                keywords.iter().any(|kw| lower.contains(kw)) || lower == label.to_lowercase()
            })
            || lower.contains("commercial")
    }

    /// Unit label carried on the property. A missing plot unit defaults to
    /// sq.ft; an unrecognized one keeps the stored string, so the land-area
    /// filter can see it is not comparable and exclude the record there.
    fn plot_unit_label(raw: &RawPropertyRecord, land_like: bool) -> String {
        if !land_like {
            return AreaUnit::SqFt.label().to_string();
        }
        match raw.plot_area_unit.as_deref() {
            None => AreaUnit::SqFt.label().to_string(),
            Some(unit) => match standardize_unit_name(unit) {
                Ok(standardized) => standardized.label().to_string(),
                Err(_) => {
                    log::debug!(
                        "record {} has unrecognized plot unit {:?}, keeping it as-is",
                        raw.id,
                        unit
                    );
                    unit.trim().to_string()
                }
            },
        }
    }

    /// Price bands: >= 1 Cr prints in Cr, >= 1 L in lakhs, >= 1000 in K,
    /// else the raw rupee value. Exactly 1,00,00,000 prints "₹1 Cr" without
    /// the trailing ".0".
    pub fn format_price(price_number: i64) -> String {
        if price_number == 10_000_000 {
            return "₹1 Cr".to_string();
        }
        if price_number >= 10_000_000 {
            return format!("₹{:.1} Cr", price_number as f64 / 10_000_000.0);
        }
        if price_number >= 100_000 {
            return format!("₹{:.1} L", price_number as f64 / 100_000.0);
        }
        if price_number >= 1_000 {
            return format!("₹{:.1} K", price_number as f64 / 1_000.0);
        }
        format!("₹{}", price_number)
    }

    fn format_area(area_number: f64, unit_label: &str) -> String {
        if area_number.fract().abs() < f64::EPSILON {
            format!("{:.0} {}", area_number, unit_label)
        } else {
            format!("{:.1} {}", area_number, unit_label)
        }
    }

    /// Parse "3 BHK" / "2bhk" style strings down to the leading integer.
    fn parse_bedrooms(bhk: Option<&str>) -> u32 {
        let Some(bhk) = bhk else { return 0 };
        let digits: String = bhk.chars().take_while(|c| c.is_ascii_digit()).collect();
        digits.parse().unwrap_or(0)
    }

    /// Title-case an enum-ish backend string: underscores become spaces and
    /// each word gets a capital first letter.
    fn display_case(raw: Option<&str>) -> String {
        let Some(raw) = raw else {
            return String::new();
        };
        raw.replace('_', " ")
            .split_whitespace()
            .map(|word| {
                let mut chars = word.chars();
                match chars.next() {
                    Some(first) => {
                        first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
                    }
                    None => String::new(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::search::domain::entities::property::FloorLevel;
    use crate::modules::search::domain::entities::raw_record::RawFloorField;
    use uuid::Uuid;

    fn raw(title: &str, property_type: &str) -> RawPropertyRecord {
        let mut record = RawPropertyRecord::new(Uuid::new_v4(), title);
        record.property_type = Some(property_type.to_string());
        record
    }

    #[test]
    fn test_price_band_boundaries() {
        assert_eq!(PropertyTransformer::format_price(10_000_000), "₹1 Cr");
        assert_eq!(PropertyTransformer::format_price(10_000_001), "₹1.0 Cr");
        assert_eq!(PropertyTransformer::format_price(12_500_000), "₹1.2 Cr");
        assert!(PropertyTransformer::format_price(99_999).contains(" K"));
        assert_eq!(PropertyTransformer::format_price(250_000), "₹2.5 L");
        assert_eq!(PropertyTransformer::format_price(0), "₹0");
        assert_eq!(PropertyTransformer::format_price(999), "₹999");
    }

    #[test]
    fn test_penthouse_remaps_filter_category_only() {
        let record = raw("Luxury penthouse with terrace", "Penthouse");
        let property = PropertyTransformer::new().transform(&record, Utc::now());
        assert_eq!(property.property_type, "Penthouse");
        assert_eq!(property.filter_property_type, "Apartment");
    }

    #[test]
    fn test_duplex_remaps_to_villa() {
        let record = raw("Spacious duplex", "Duplex");
        let property = PropertyTransformer::new().transform(&record, Utc::now());
        assert_eq!(property.property_type, "Duplex");
        assert_eq!(property.filter_property_type, "Villa");
    }

    #[test]
    fn test_land_subclassification_priority() {
        let agricultural = raw("Agricultural land near highway", "Plot");
        let property = PropertyTransformer::new().transform(&agricultural, Utc::now());
        assert_eq!(property.filter_property_type, "Agricultural Land");

        let commercial = raw("Commercial plot in tech park", "Land");
        let property = PropertyTransformer::new().transform(&commercial, Utc::now());
        assert_eq!(property.filter_property_type, "Commercial Land");

        let generic = raw("30x40 plot for sale", "Residential Plot");
        let property = PropertyTransformer::new().transform(&generic, Utc::now());
        assert_eq!(property.filter_property_type, "Land");
    }

    #[test]
    fn test_commercial_subtype_priority_order() {
        // "office" is listed before "co-working", so a title with both reads
        // as office space.
        let record = raw("Office space in co-working hub", "Commercial");
        let property = PropertyTransformer::new().transform(&record, Utc::now());
        assert_eq!(property.filter_property_type, "Office Space");

        let record = raw("Warehouse with loading dock", "Commercial");
        let property = PropertyTransformer::new().transform(&record, Utc::now());
        assert_eq!(property.filter_property_type, "Warehouse");
    }

    #[test]
    fn test_unknown_type_passes_through() {
        let record = raw("Something unusual", "Treehouse");
        let property = PropertyTransformer::new().transform(&record, Utc::now());
        assert_eq!(property.property_type, "Treehouse");
        assert_eq!(property.filter_property_type, "Treehouse");
    }

    #[test]
    fn test_land_uses_stored_plot_unit() {
        let mut record = raw("Farm land with borewell", "Agricultural Land");
        record.area = Some(2.0);
        record.plot_area_unit = Some("Acres".to_string());
        let property = PropertyTransformer::new().transform(&record, Utc::now());
        assert_eq!(property.area, "2 acres");
        assert_eq!(property.plot_area_unit, "acres");
    }

    #[test]
    fn test_missing_plot_unit_falls_back_to_sqft() {
        let mut record = raw("Plot for sale", "Plot");
        record.area = Some(1200.0);
        record.plot_area_unit = None;
        let property = PropertyTransformer::new().transform(&record, Utc::now());
        assert_eq!(property.plot_area_unit, "sq.ft");
    }

    #[test]
    fn test_unknown_plot_unit_kept_as_stored() {
        let mut record = raw("Plot for sale", "Plot");
        record.area = Some(1200.0);
        record.plot_area_unit = Some("parsecs".to_string());
        let property = PropertyTransformer::new().transform(&record, Utc::now());
        // Not folded to sq.ft: the land-area filter decides what to do with
        // a unit it cannot convert.
        assert_eq!(property.plot_area_unit, "parsecs");
        assert_eq!(property.area, "1200 parsecs");
    }

    #[test]
    fn test_non_land_area_is_sqft() {
        let mut record = raw("2 BHK apartment", "Apartment");
        record.area = Some(1050.0);
        record.plot_area_unit = Some("acres".to_string());
        let property = PropertyTransformer::new().transform(&record, Utc::now());
        assert_eq!(property.area, "1050 sq.ft");
    }

    #[test]
    fn test_bedrooms_parsed_from_bhk() {
        let mut record = raw("Flat", "Apartment");
        record.bhk = Some("3 BHK".to_string());
        let property = PropertyTransformer::new().transform(&record, Utc::now());
        assert_eq!(property.bedrooms, 3);

        record.bhk = Some("2bhk".to_string());
        let property = PropertyTransformer::new().transform(&record, Utc::now());
        assert_eq!(property.bedrooms, 2);

        record.bhk = Some("studio".to_string());
        let property = PropertyTransformer::new().transform(&record, Utc::now());
        assert_eq!(property.bedrooms, 0);
    }

    #[test]
    fn test_display_case_normalization() {
        let mut record = raw("Flat", "Apartment");
        record.furnishing = Some("SEMI_FURNISHED".to_string());
        record.availability = Some("ready_to_move".to_string());
        let property = PropertyTransformer::new().transform(&record, Utc::now());
        assert_eq!(property.furnished, "Semi Furnished");
        assert_eq!(property.availability, "Ready To Move");
    }

    #[test]
    fn test_is_new_window() {
        let now = Utc::now();
        let mut record = raw("Flat", "Apartment");

        record.created_at = Some(now - Duration::days(3));
        assert!(PropertyTransformer::new().transform(&record, now).is_new);

        record.created_at = Some(now - Duration::days(8));
        assert!(!PropertyTransformer::new().transform(&record, now).is_new);

        record.created_at = None;
        assert!(!PropertyTransformer::new().transform(&record, now).is_new);
    }

    #[test]
    fn test_floor_priority_structured_beats_title() {
        let mut record = raw("Shop on 3rd floor", "Retail Shop");
        record.floor_no = Some(RawFloorField::Number(1));
        let property = PropertyTransformer::new().transform(&record, Utc::now());
        assert_eq!(property.floor_no, Some(FloorLevel::Number(1)));
    }

    #[test]
    fn test_floor_commercial_fallback_to_ground() {
        let record = raw("Retail shop on main road", "Retail Shop");
        let property = PropertyTransformer::new().transform(&record, Utc::now());
        assert_eq!(property.floor_no, Some(FloorLevel::Ground));
    }

    #[test]
    fn test_floor_unknown_for_residential_without_hints() {
        let record = raw("2 BHK apartment", "Apartment");
        let property = PropertyTransformer::new().transform(&record, Utc::now());
        assert_eq!(property.floor_no, None);
    }

    #[test]
    fn test_missing_numerics_default_to_zero() {
        let record = raw("Mystery listing", "");
        let property = PropertyTransformer::new().transform(&record, Utc::now());
        assert_eq!(property.price_number, 0);
        assert_eq!(property.area_number, 0.0);
        assert_eq!(property.price, "₹0");
        assert_eq!(property.bathrooms, 0);
    }

    #[test]
    fn test_location_string_composition() {
        let mut record = raw("Flat", "Apartment");
        record.locality = Some("Indiranagar".to_string());
        record.city = Some("Bangalore".to_string());
        let property = PropertyTransformer::new().transform(&record, Utc::now());
        assert_eq!(property.location, "Indiranagar, Bangalore");

        record.locality = None;
        let property = PropertyTransformer::new().transform(&record, Utc::now());
        assert_eq!(property.location, "Bangalore");
    }
}
