//! Seeds tab and filter state from URL query parameters.
//!
//! Every list-valued parameter is comma separated with each token URL-encoded
//! individually. Range parameters set the matching dirty flag by their mere
//! presence: `budgetMin=100` alone is an explicit constraint even though the
//! ceiling stays at the default.

use crate::modules::search::domain::value_objects::area_unit::standardize_unit_name;
use crate::modules::search::domain::value_objects::{SearchFilters, Tab};

/// Result of parsing one query string.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedQuery {
    pub tab: Tab,
    pub filters: SearchFilters,
}

pub fn parse_query(query: &str) -> ParsedQuery {
    let pairs = split_pairs(query);

    let tab = first(&pairs, "type")
        .map(|v| Tab::parse(&v))
        .unwrap_or(Tab::Buy);
    let mut filters = SearchFilters::defaults_for_tab(tab);

    // Singular field; the legacy plural keeps only its first entry.
    if let Some(location) = first_list_entry(&pairs, "locations").or_else(|| first(&pairs, "location")) {
        filters.location = location;
    }

    filters.property_types = list(&pairs, "propertyTypes");
    if filters.property_types.is_empty() {
        // Legacy singular spelling.
        if let Some(single) = first(&pairs, "propertyType") {
            filters.property_types = vec![single];
        }
    }
    filters.bhk = list(&pairs, "bhk");
    filters.availability = list(&pairs, "availability");
    filters.construction_age = list(&pairs, "construction");
    filters.furnished = list(&pairs, "furnished");

    let budget_min = first(&pairs, "budgetMin");
    let budget_max = first(&pairs, "budgetMax");
    if budget_min.is_some() || budget_max.is_some() {
        let (default_min, default_max) = filters.budget;
        filters.budget = (
            parse_or(budget_min, default_min),
            parse_or(budget_max, default_max),
        );
        filters.budget_dirty = true;
    }

    let area_min = first(&pairs, "areaMin");
    let area_max = first(&pairs, "areaMax");
    if area_min.is_some() || area_max.is_some() {
        let (default_min, default_max) = filters.area;
        filters.area = (parse_or(area_min, default_min), parse_or(area_max, default_max));
        filters.area_dirty = true;
    }

    let land_min = first(&pairs, "landAreaMin");
    let land_max = first(&pairs, "landAreaMax");
    if land_min.is_some() || land_max.is_some() {
        let (default_min, default_max) = filters.land_area;
        filters.land_area = (parse_or(land_min, default_min), parse_or(land_max, default_max));
        filters.land_area_dirty = true;
    }
    if let Some(raw_unit) = first(&pairs, "landAreaUnit") {
        match standardize_unit_name(&raw_unit) {
            Ok(unit) => {
                filters.land_area_unit = unit;
                filters.land_area_dirty = true;
            }
            Err(err) => {
                log::debug!("ignoring unrecognized landAreaUnit {:?}: {}", raw_unit, err);
            }
        }
    }

    // Singular like `location`: only the first comma-separated value counts.
    if let Some(city) = first_list_entry(&pairs, "city") {
        filters.city = city;
    }

    ParsedQuery { tab, filters }
}

fn split_pairs(query: &str) -> Vec<(String, String)> {
    query
        .trim_start_matches('?')
        .split('&')
        .filter_map(|pair| {
            let (key, value) = pair.split_once('=')?;
            if key.is_empty() {
                return None;
            }
            Some((key.to_string(), value.to_string()))
        })
        .collect()
}

/// First occurrence of a singular parameter, decoded. Undecodable values are
/// treated as absent.
fn first(pairs: &[(String, String)], key: &str) -> Option<String> {
    pairs
        .iter()
        .find(|(k, _)| k == key)
        .and_then(|(_, v)| urlencoding::decode(v).ok())
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Comma-separated list parameter, each token decoded separately.
fn list(pairs: &[(String, String)], key: &str) -> Vec<String> {
    pairs
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| {
            v.split(',')
                .filter_map(|token| urlencoding::decode(token).ok())
                .map(|token| token.trim().to_string())
                .filter(|token| !token.is_empty())
                .collect()
        })
        .unwrap_or_default()
}

fn first_list_entry(pairs: &[(String, String)], key: &str) -> Option<String> {
    list(pairs, key).into_iter().next()
}

fn parse_or<T: std::str::FromStr>(raw: Option<String>, default: T) -> T {
    raw.and_then(|v| v.parse().ok()).unwrap_or(default)
}
