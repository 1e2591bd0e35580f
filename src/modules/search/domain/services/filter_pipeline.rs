use serde::{Deserialize, Serialize};

use crate::modules::search::domain::entities::property::FloorLevel;
use crate::modules::search::domain::entities::Property;
use crate::modules::search::domain::services::location_normalizer::{
    is_major_city, normalize_location_name,
};
use crate::modules::search::domain::value_objects::area_unit::{
    convert_area, standardize_unit_name,
};
use crate::modules::search::domain::value_objects::{SearchFilters, SortKey, Tab};
use crate::shared::errors::{AppError, AppResult};

/// Selection sentinel that disables the property-type stage entirely.
const ALL_SENTINEL: &str = "all";

/// Every floor bucket the commercial floor filter knows about. Selecting all
/// of them is the same as selecting none.
const ALL_FLOOR_BUCKETS: &[&str] = &["basement", "ground", "1", "2", "3", "3+"];

/// Pipeline configuration.
///
/// `merged_tabs` folds commercial and land listings into the buy/rent result
/// sets. The legacy non-merged partition is kept behind this toggle because
/// its deprecation status was never settled; nothing outside configuration
/// exposes it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub merged_tabs: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self { merged_tabs: true }
    }
}

/// Applies the cascading multi-criteria filter over the in-memory list.
///
/// Runs as an ordered sequence of independent stages, each stage narrowing
/// (never widening) the candidate set. The order is load-bearing: the land
/// and commercial carve-outs in the tab partition happen before category
/// matching, and the commercial floor heuristic looks at the set narrowed by
/// every earlier stage.
#[derive(Debug, Clone, Default)]
pub struct FilterPipeline {
    config: PipelineConfig,
}

impl FilterPipeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: PipelineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Pure projection of (list, tab, filters) to the filtered + sorted view.
    pub fn apply(&self, properties: &[Property], tab: Tab, filters: &SearchFilters) -> Vec<Property> {
        let mut current: Vec<Property> = properties
            .iter()
            .filter(|p| self.matches_tab(p, tab))
            .cloned()
            .collect();
        log::debug!("PIPELINE: tab partition kept {} of {}", current.len(), properties.len());

        self.apply_property_type_stage(&mut current, filters);
        self.apply_budget_stage(&mut current, filters);
        self.apply_area_stage(&mut current, filters);
        self.apply_bhk_stage(&mut current, filters);
        self.apply_attribute_stages(&mut current, filters);

        if tab == Tab::Commercial {
            self.apply_commercial_floor_stage(&mut current, filters);
            self.apply_commercial_parking_stage(&mut current, filters);
        }

        self.apply_location_stage(&mut current, filters);

        current = match self.apply_locality_stage(current.clone(), filters) {
            Ok(narrowed) => narrowed,
            Err(err) => {
                // A wholesale failure here degrades to "no locality filter
                // applied" rather than an empty result set.
                log::warn!("PIPELINE: locality stage failed, skipping it: {}", err);
                current
            }
        };

        self.apply_sort_stage(&mut current, filters);
        log::debug!("PIPELINE: final result has {} records", current.len());
        current
    }

    // Stage 1: tab partition. Exactly one of four mutually exclusive
    // branches, with a merged and a legacy mode.
    fn matches_tab(&self, property: &Property, tab: Tab) -> bool {
        let listing = property.listing_type.as_str();
        let category = property.filter_property_type.to_lowercase();
        let land_category = category.contains("plot") || category.contains("land");
        let pg_like = listing.contains("pg")
            || listing.contains("hostel")
            || category.contains("pg")
            || category.contains("hostel");

        match tab {
            Tab::Buy => {
                if self.config.merged_tabs {
                    matches!(listing, "sale" | "resale" | "commercial")
                } else {
                    matches!(listing, "sale" | "resale")
                        && !land_category
                        && !property.is_commercial_like()
                }
            }
            Tab::Rent => {
                let base = listing == "rent" || pg_like;
                if self.config.merged_tabs {
                    base
                } else {
                    base && !property.is_commercial_like()
                }
            }
            Tab::Commercial => {
                // Land is carved out even when it also matches a commercial
                // keyword ("Commercial Land" belongs to the land tab).
                (property.is_commercial_like() || listing == "commercial") && !land_category
            }
            Tab::Land => land_category,
        }
    }

    // Stage 2: property-type filter. OR across selected tokens, ANDed with
    // every other stage.
    fn apply_property_type_stage(&self, current: &mut Vec<Property>, filters: &SearchFilters) {
        let tokens: Vec<String> = filters
            .property_types
            .iter()
            .map(|t| normalize_token(t))
            .filter(|t| !t.is_empty())
            .collect();
        if tokens.is_empty() || tokens.iter().any(|t| t == ALL_SENTINEL) {
            return;
        }

        current.retain(|p| tokens.iter().any(|token| matches_property_type(p, token)));
        log::debug!("PIPELINE: property-type stage kept {}", current.len());
    }

    // Stage 3: budget. Applied only when the user (or URL) dirtied it.
    fn apply_budget_stage(&self, current: &mut Vec<Property>, filters: &SearchFilters) {
        if !filters.budget_dirty {
            return;
        }
        let (min, max) = filters.budget;
        current.retain(|p| p.price_number >= min && p.price_number <= max);
        log::debug!("PIPELINE: budget stage kept {}", current.len());
    }

    // Stage 4: area. Branches per record: land records use the land range in
    // the filter's unit, everything else uses the standard sq.ft range; each
    // branch only blocks when its own dirty flag is set.
    fn apply_area_stage(&self, current: &mut Vec<Property>, filters: &SearchFilters) {
        if !filters.area_dirty && !filters.land_area_dirty {
            return;
        }
        current.retain(|p| {
            if p.is_land_like() {
                if !filters.land_area_dirty {
                    return true;
                }
                let record_unit = match standardize_unit_name(&p.plot_area_unit) {
                    Ok(unit) => unit,
                    Err(err) => {
                        // Can't compare in an unknown unit; exclude this
                        // record from the land-area comparison only.
                        log::debug!("PIPELINE: excluding {} from land-area filter: {}", p.id, err);
                        return false;
                    }
                };
                let in_filter_unit = convert_area(p.area_number, record_unit, filters.land_area_unit);
                let (min, max) = filters.land_area;
                in_filter_unit >= min && in_filter_unit <= max
            } else {
                if !filters.area_dirty {
                    return true;
                }
                let (min, max) = filters.area;
                p.area_number >= min && p.area_number <= max
            }
        });
        log::debug!("PIPELINE: area stage kept {}", current.len());
    }

    // Stage 5: BHK, residential records only; everything else passes.
    fn apply_bhk_stage(&self, current: &mut Vec<Property>, filters: &SearchFilters) {
        if filters.bhk.is_empty() {
            return;
        }
        current.retain(|p| {
            if !p.is_residential_like() {
                return true;
            }
            filters.bhk.iter().any(|token| bhk_matches(p.bedrooms, token))
        });
        log::debug!("PIPELINE: bhk stage kept {}", current.len());
    }

    // Stage 6: furnished / availability / construction-age, each a simple
    // OR-across-tokens keyword match, skipped when its set is empty.
    fn apply_attribute_stages(&self, current: &mut Vec<Property>, filters: &SearchFilters) {
        if !filters.furnished.is_empty() {
            current.retain(|p| {
                filters
                    .furnished
                    .iter()
                    .any(|token| furnished_matches(&p.furnished, token))
            });
        }
        if !filters.availability.is_empty() {
            current.retain(|p| {
                filters
                    .availability
                    .iter()
                    .any(|token| availability_matches(&p.availability, token))
            });
        }
        if !filters.construction_age.is_empty() {
            current.retain(|p| {
                filters
                    .construction_age
                    .iter()
                    .any(|token| construction_age_matches(&p.age_of_property, token))
            });
        }
    }

    // Stage 7a: commercial floor buckets.
    fn apply_commercial_floor_stage(&self, current: &mut Vec<Property>, filters: &SearchFilters) {
        if filters.floors.is_empty() {
            return;
        }
        let selected: Vec<String> = filters.floors.iter().map(|f| normalize_token(f)).collect();
        // Selecting every known bucket filters nothing.
        if ALL_FLOOR_BUCKETS.iter().all(|b| selected.iter().any(|s| s == b)) {
            return;
        }

        // Source data is inconsistent about ground floors: when nothing in
        // the already-narrowed set claims an explicit ground/0 floor, floor 1
        // stands in for ground.
        let has_explicit_ground = current
            .iter()
            .any(|p| p.floor_no == Some(FloorLevel::Ground));

        current.retain(|p| {
            let Some(floor) = p.floor_no else { return false };
            let effective = if !has_explicit_ground && floor == FloorLevel::Number(1) {
                FloorLevel::Ground
            } else {
                floor
            };
            selected.iter().any(|bucket| floor_bucket_matches(effective, bucket))
        });
        log::debug!("PIPELINE: floor stage kept {}", current.len());
    }

    // Stage 7b: commercial parking. Unknown availability matches neither
    // explicit option.
    fn apply_commercial_parking_stage(&self, current: &mut Vec<Property>, filters: &SearchFilters) {
        if filters.parking.is_empty() {
            return;
        }
        current.retain(|p| {
            filters.parking.iter().any(|token| {
                let token = token.to_lowercase();
                let wants_available = !token.contains("not") && !token.contains("no ")
                    && token != "no";
                match p.parking_available {
                    Some(available) => available == wants_available,
                    None => false,
                }
            })
        });
        log::debug!("PIPELINE: parking stage kept {}", current.len());
    }

    // Stage 8: free-text location keywords over location + locality + city.
    fn apply_location_stage(&self, current: &mut Vec<Property>, filters: &SearchFilters) {
        let keywords: Vec<String> = filters
            .location
            .to_lowercase()
            .split(|c: char| c.is_whitespace() || c == ',')
            .filter(|k| !k.is_empty())
            .map(|k| k.to_string())
            .collect();
        if keywords.is_empty() {
            return;
        }
        current.retain(|p| {
            let combined =
                format!("{} {} {}", p.location, p.locality, p.city).to_lowercase();
            keywords.iter().any(|k| combined.contains(k))
        });
        log::debug!("PIPELINE: location stage kept {}", current.len());
    }

    // Stage 9: locality selection. Major cities compare against the city
    // field, everything else against the locality; per-record normalization
    // errors degrade to a raw substring match for that record only. Because
    // every error source is caught inside the per-record closure, the Result
    // return currently has no Err producer; the caller's fallback to the
    // unfiltered set is the whole-stage contract, not a live code path.
    fn apply_locality_stage(
        &self,
        current: Vec<Property>,
        filters: &SearchFilters,
    ) -> AppResult<Vec<Property>> {
        if filters.localities.is_empty() {
            return Ok(current);
        }
        let narrowed = current
            .into_iter()
            .filter(|p| {
                filters.localities.iter().any(|selected| {
                    match locality_matches(p, selected) {
                        Ok(matched) => matched,
                        Err(err) => {
                            log::debug!(
                                "PIPELINE: locality fallback for {}: {}",
                                p.id,
                                err
                            );
                            let needle = selected.to_lowercase();
                            p.locality.to_lowercase().contains(&needle)
                                || p.city.to_lowercase().contains(&needle)
                        }
                    }
                })
            })
            .collect();
        Ok(narrowed)
    }

    // Stage 10: stable sort by the active key. Relevance reorders nothing.
    fn apply_sort_stage(&self, current: &mut [Property], filters: &SearchFilters) {
        match &filters.sort {
            SortKey::Relevance => {}
            SortKey::PriceLowToHigh => current.sort_by_key(|p| p.price_number),
            SortKey::PriceHighToLow => {
                current.sort_by_key(|p| std::cmp::Reverse(p.price_number))
            }
            SortKey::AreaHighToLow => current.sort_by(|a, b| {
                b.area_number
                    .partial_cmp(&a.area_number)
                    .unwrap_or(std::cmp::Ordering::Equal)
            }),
            // Boolean flag descending, not timestamp; ties keep input order.
            SortKey::NewestFirst => current.sort_by_key(|p| !p.is_new),
            // Score-based: matching records score 1 and float to the front,
            // everything else keeps its relative order.
            SortKey::CategoryFirst(category) => {
                let needle = normalize_token(category);
                current.sort_by_key(|p| {
                    let hit = normalize_token(&p.filter_property_type).contains(&needle);
                    if hit {
                        0
                    } else {
                        1
                    }
                });
            }
        }
    }
}

/// Lowercase and strip all whitespace, the normal form for filter tokens.
fn normalize_token(raw: &str) -> String {
    raw.to_lowercase().chars().filter(|c| !c.is_whitespace()).collect()
}

/// Priority-ordered token matching rules against `filter_property_type`.
///
/// Later rules assume the earlier, more specific ones already had their
/// chance: the specific land sub-types fire before the generic land/plot
/// fallback, and "villa" is checked after "gated community villa".
fn matches_property_type(property: &Property, token: &str) -> bool {
    let category = property.filter_property_type.to_lowercase();
    let category_norm = normalize_token(&category);

    // Independent house, guarding against the "house" in "penthouse".
    if token.contains("independent") {
        return category.contains("independent")
            || (category.contains("house") && !category.contains("penthouse"));
    }

    // Gated community villa needs all three fragments present.
    if token.contains("gated") {
        return category.contains("gated")
            && category.contains("community")
            && category.contains("villa");
    }

    // Specific land sub-types need BOTH their keyword AND a land/plot
    // keyword, and run before the generic land fallback.
    if token.contains("agricultur") {
        return category.contains("agricultur")
            && (category.contains("land") || category.contains("plot"));
    }
    if token.contains("industrial") && (token.contains("land") || token.contains("plot")) {
        return category.contains("industrial")
            && (category.contains("land") || category.contains("plot"));
    }
    if token.contains("commercial") && (token.contains("land") || token.contains("plot")) {
        return category.contains("commercial")
            && (category.contains("land") || category.contains("plot"));
    }
    if token.contains("land") || token.contains("plot") {
        return category.contains("land") || category.contains("plot");
    }

    // Villa excludes community-tagged records (those belong to the gated
    // community bucket above).
    if token.contains("villa") {
        return category.contains("villa") && !category.contains("community");
    }

    // Broad category groups, each a keyword union.
    if token.contains("apartment") || token.contains("flat") {
        return category.contains("apartment") || category.contains("flat");
    }
    if token.contains("pg") || token.contains("hostel") {
        return category.contains("pg") || category.contains("hostel");
    }
    if token.contains("coliving") || token.contains("co-living") {
        return category_norm.contains("coliving") || category_norm.contains("co-living");
    }
    if token.contains("builder") {
        return category.contains("builder") && category.contains("floor");
    }
    if token.contains("studio") {
        return category.contains("studio");
    }
    if token.contains("coworking") || token.contains("co-working") {
        return category_norm.contains("coworking") || category_norm.contains("co-working");
    }
    if token.contains("office") {
        return category.contains("office");
    }
    if token.contains("retail") || token.contains("shop") {
        return category.contains("retail") || category.contains("shop");
    }
    if token.contains("warehouse") || token.contains("godown") {
        return category.contains("warehouse") || category.contains("godown");
    }
    if token.contains("showroom") {
        return category.contains("showroom");
    }
    if token.contains("restaurant") || token.contains("cafe") {
        return category.contains("restaurant") || category.contains("cafe");
    }
    if token.contains("industrial") {
        return category.contains("industrial");
    }

    category_norm.contains(token)
}

fn bhk_matches(bedrooms: u32, token: &str) -> bool {
    let token = token.to_lowercase();
    let digits: String = token.chars().take_while(|c| c.is_ascii_digit()).collect();
    let Ok(n) = digits.parse::<u32>() else {
        return false;
    };
    if token.contains('+') {
        bedrooms >= n
    } else {
        bedrooms == n
    }
}

fn furnished_matches(field: &str, token: &str) -> bool {
    let field = field.to_lowercase();
    let token = token.to_lowercase();
    if token.contains("semi") {
        return field.contains("semi");
    }
    if token.contains("unfurnished") {
        return field.contains("unfurnished");
    }
    // Plain "furnished" must not swallow semi/unfurnished records.
    field.contains("furnished") && !field.contains("unfurnished") && !field.contains("semi")
}

fn availability_matches(field: &str, token: &str) -> bool {
    let field = field.to_lowercase();
    let token = token.to_lowercase();
    if token.contains("ready") {
        return field.contains("ready") || field.contains("immediate");
    }
    if token.contains("under") {
        return field.contains("under") || field.contains("construction");
    }
    field.contains(&token)
}

fn construction_age_matches(field: &str, token: &str) -> bool {
    let field = field.to_lowercase();
    let token = token.to_lowercase();
    if token.contains("new") {
        return field.contains("new") || field.contains("0-1") || field.contains("less than");
    }
    field.contains(&token)
}

fn floor_bucket_matches(floor: FloorLevel, bucket: &str) -> bool {
    match bucket {
        "basement" => floor == FloorLevel::Basement,
        "ground" => floor == FloorLevel::Ground,
        _ => {
            if let Some(min) = bucket.strip_suffix('+') {
                match min.parse::<i64>() {
                    Ok(min) => floor.as_number() >= min && floor != FloorLevel::Basement,
                    Err(_) => false,
                }
            } else {
                match bucket.parse::<i64>() {
                    Ok(n) => floor == FloorLevel::Number(n),
                    Err(_) => false,
                }
            }
        }
    }
}

fn locality_matches(property: &Property, selected: &str) -> AppResult<bool> {
    let wanted = normalize_location_name(selected);
    if wanted.is_empty() {
        return Err(AppError::NormalizationError(format!(
            "empty locality selection {:?}",
            selected
        )));
    }
    if is_major_city(selected) {
        Ok(normalize_location_name(&property.city) == wanted)
    } else {
        Ok(normalize_location_name(&property.locality) == wanted)
    }
}
