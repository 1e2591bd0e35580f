//! Owns the in-memory property list and the filter state for one search
//! session, and keeps the derived filtered view in sync.
//!
//! All list mutations (batch loads, change-feed events) are whole-list
//! replacements, so the filtered projection is always computed from a
//! complete, consistent snapshot.

use chrono::Utc;
use regex::Regex;
use std::sync::{Arc, OnceLock};

use crate::modules::search::domain::entities::Property;
use crate::modules::search::domain::services::{
    normalize_location_name, FilterPipeline, PipelineConfig, PropertyTransformer,
};
use crate::modules::search::domain::value_objects::search_filters::{
    DEFAULT_AREA_RANGE, DEFAULT_LAND_AREA_RANGE,
};
use crate::modules::search::domain::value_objects::{
    AreaUnit, FilterUpdate, SearchFilters, SortKey, Tab,
};
use crate::modules::search::infrastructure::{ChangeEvent, ChangeFeed, PropertyDataSource};
use crate::shared::errors::AppResult;
use crate::shared::utils::TimedOperation;

use super::url_params::parse_query;

/// Fixed batch size for the initial load and every load-more page.
pub const PAGE_SIZE: usize = 20;

/// Locality strings that are known-bad data, never offered as suggestions.
const LOCALITY_DENYLIST: &[&str] = &["n/a", "na", "nil", "none", "unknown", "other", "test"];

const MAX_SUGGESTION_LEN: usize = 40;

fn pin_code_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\b\d{6}\b").expect("pin code regex"))
}

fn street_number_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // Leading house/plot numbers like "12/4,", "#221 " or "45-2,"
    RE.get_or_init(|| Regex::new(r"^\s*#?\d+([/-]\d+)*[\s,]").expect("street number regex"))
}

pub struct SearchController {
    source: Arc<dyn PropertyDataSource>,
    transformer: PropertyTransformer,
    pipeline: FilterPipeline,
    tab: Tab,
    filters: SearchFilters,
    properties: Vec<Property>,
    filtered: Vec<Property>,
    total_count: u64,
    loading: bool,
}

impl SearchController {
    pub fn new(source: Arc<dyn PropertyDataSource>) -> Self {
        Self::with_state(source, Tab::Buy, SearchFilters::defaults_for_tab(Tab::Buy))
    }

    /// Seed tab and filters from a URL query string.
    pub fn from_query(source: Arc<dyn PropertyDataSource>, query: &str) -> Self {
        let parsed = parse_query(query);
        Self::with_state(source, parsed.tab, parsed.filters)
    }

    fn with_state(source: Arc<dyn PropertyDataSource>, tab: Tab, filters: SearchFilters) -> Self {
        Self {
            source,
            transformer: PropertyTransformer::new(),
            pipeline: FilterPipeline::new(),
            tab,
            filters,
            properties: Vec::new(),
            filtered: Vec::new(),
            total_count: 0,
            loading: false,
        }
    }

    pub fn set_pipeline_config(&mut self, config: PipelineConfig) {
        self.pipeline = FilterPipeline::with_config(config);
        self.recompute();
    }

    /// First page plus the remote total. A failure leaves the list untouched
    /// and the operation retryable.
    pub async fn load_initial(&mut self) -> AppResult<()> {
        self.loading = true;
        let result = self.load_initial_inner().await;
        self.loading = false;
        if let Err(ref err) = result {
            log::error!("initial property load failed: {}", err);
        }
        result
    }

    async fn load_initial_inner(&mut self) -> AppResult<()> {
        let timer = TimedOperation::new("load_initial");
        let total = self.source.count_listable().await?;
        let batch = self.source.fetch_batch(0, PAGE_SIZE).await?;
        self.properties = self.transformer.transform_batch(&batch, Utc::now());
        self.total_count = total;
        self.recompute();
        timer.finish_with_info(&format!("{} of {} records", self.properties.len(), total));
        Ok(())
    }

    /// Append the next page. Refused (no-op) while a load is in flight or
    /// when every remote record is already loaded.
    pub async fn load_more(&mut self) -> AppResult<()> {
        if self.loading {
            log::debug!("load_more skipped: load already in flight");
            return Ok(());
        }
        if !self.has_more() {
            log::debug!("load_more skipped: all {} records loaded", self.total_count);
            return Ok(());
        }

        self.loading = true;
        let result = self.source.fetch_batch(self.properties.len(), PAGE_SIZE).await;
        self.loading = false;

        match result {
            Ok(batch) => {
                let mut next = self.properties.clone();
                next.extend(self.transformer.transform_batch(&batch, Utc::now()));
                self.properties = next;
                self.recompute();
                Ok(())
            }
            Err(err) => {
                log::error!("load_more failed, list unchanged: {}", err);
                Err(err)
            }
        }
    }

    /// Open the live change feed on the backing source. The caller owns the
    /// handle and pumps events back through `apply_change`.
    pub async fn subscribe(&self) -> AppResult<ChangeFeed> {
        self.source.subscribe().await
    }

    /// Fold one change-feed event into the list without a reload. Untouched
    /// records keep their relative order.
    pub fn apply_change(&mut self, event: ChangeEvent) {
        match event {
            ChangeEvent::Inserted(raw) => {
                if !raw.is_listable() {
                    return;
                }
                let property = self.transformer.transform(&raw, Utc::now());
                let mut next = Vec::with_capacity(self.properties.len() + 1);
                next.push(property);
                next.extend(self.properties.iter().cloned());
                self.properties = next;
                self.total_count += 1;
            }
            ChangeEvent::Updated(raw) => {
                let Some(pos) = self.properties.iter().position(|p| p.id == raw.id) else {
                    return;
                };
                let mut next = self.properties.clone();
                if raw.is_listable() {
                    next[pos] = self.transformer.transform(&raw, Utc::now());
                } else {
                    next.remove(pos);
                    self.total_count = self.total_count.saturating_sub(1);
                }
                self.properties = next;
            }
            ChangeEvent::Deleted(id) => {
                let before = self.properties.len();
                let next: Vec<Property> =
                    self.properties.iter().filter(|p| p.id != id).cloned().collect();
                if next.len() < before {
                    self.total_count = self.total_count.saturating_sub(1);
                }
                self.properties = next;
            }
        }
        self.recompute();
    }

    /// Switch the active tab, applying the budget and area reset rules.
    pub fn set_tab(&mut self, tab: Tab) {
        if tab == self.tab {
            return;
        }
        let previous = self.tab;
        self.tab = tab;

        // An untouched budget silently follows the new tab's default range.
        // A dirtied one is clamped into the new ceiling and re-checked, so a
        // range that collapses onto the default stops counting as dirty.
        if !self.filters.budget_dirty {
            self.filters.budget = (0, tab.default_budget_max());
        } else {
            let ceiling = tab.default_budget_max();
            let (min, max) = self.filters.budget;
            let clamped = (min.min(ceiling), max.min(ceiling));
            self.filters.budget = clamped;
            self.filters.budget_dirty = SearchFilters::budget_differs_from_default(clamped, tab);
        }

        // Crossing the land boundary resets exactly the range that became
        // irrelevant, never both.
        if (previous == Tab::Land) != (tab == Tab::Land) {
            if tab == Tab::Land {
                self.filters.area = DEFAULT_AREA_RANGE;
                self.filters.area_dirty = false;
            } else {
                self.filters.land_area = DEFAULT_LAND_AREA_RANGE;
                self.filters.land_area_dirty = false;
                self.filters.land_area_unit = AreaUnit::SqFt;
            }
        }

        self.recompute();
    }

    /// Single mutation entry point for every filter field.
    pub fn update_filter(&mut self, update: FilterUpdate) {
        match update {
            FilterUpdate::PropertyTypes(types) => self.filters.property_types = types,
            FilterUpdate::Bhk(bhk) => self.filters.bhk = bhk,
            FilterUpdate::Budget(min, max) => {
                self.filters.budget = (min, max);
                self.filters.budget_dirty =
                    SearchFilters::budget_differs_from_default((min, max), self.tab);
            }
            FilterUpdate::Area(min, max) => {
                self.filters.area = (min, max);
                self.filters.area_dirty = SearchFilters::area_differs_from_default((min, max));
            }
            FilterUpdate::LandArea(min, max) => {
                self.filters.land_area = (min, max);
                self.filters.land_area_dirty =
                    SearchFilters::land_area_differs_from_default((min, max));
            }
            FilterUpdate::LandAreaUnit(unit) => {
                self.filters.land_area_unit = unit;
                // Changing the unit reinterprets the range, so it always
                // counts as an explicit constraint.
                self.filters.land_area_dirty = true;
            }
            FilterUpdate::Localities(localities) => self.filters.localities = localities,
            FilterUpdate::Furnished(furnished) => self.filters.furnished = furnished,
            FilterUpdate::Availability(availability) => self.filters.availability = availability,
            FilterUpdate::ConstructionAge(ages) => self.filters.construction_age = ages,
            FilterUpdate::Floors(floors) => self.filters.floors = floors,
            FilterUpdate::Parking(parking) => self.filters.parking = parking,
            FilterUpdate::Location(location) => self.filters.location = location,
            FilterUpdate::Locations(locations) => {
                self.filters.location = locations.into_iter().next().unwrap_or_default();
            }
            FilterUpdate::City(city) => self.filters.city = city,
            FilterUpdate::Sort(sort) => self.filters.sort = sort,
            FilterUpdate::Trigger => {
                self.filters.trigger = self.filters.trigger.wrapping_add(1);
            }
        }
        self.recompute();
    }

    /// Reset every filter field to tab-appropriate defaults, clearing all
    /// dirty flags.
    pub fn clear_filters(&mut self) {
        self.filters = SearchFilters::defaults_for_tab(self.tab);
        self.recompute();
    }

    pub fn set_sort(&mut self, sort: SortKey) {
        self.update_filter(FilterUpdate::Sort(sort));
    }

    /// The derived filtered view, a pure projection of (list, tab, filters).
    pub fn filtered(&self) -> &[Property] {
        &self.filtered
    }

    /// Everything loaded so far, unfiltered.
    pub fn properties(&self) -> &[Property] {
        &self.properties
    }

    pub fn filters(&self) -> &SearchFilters {
        &self.filters
    }

    pub fn tab(&self) -> Tab {
        self.tab
    }

    pub fn total_count(&self) -> u64 {
        self.total_count
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn has_more(&self) -> bool {
        (self.properties.len() as u64) < self.total_count
    }

    /// Locality dropdown options derived from the entire loaded set, not the
    /// filtered one: normalized cities plus localities that do not look like
    /// pasted street addresses, deduplicated and sorted.
    pub fn locality_suggestions(&self) -> Vec<String> {
        let mut suggestions: Vec<String> = Vec::new();
        let mut seen: Vec<String> = Vec::new();

        let mut push = |value: String| {
            let key = value.to_lowercase();
            if !key.is_empty() && !seen.contains(&key) {
                seen.push(key);
                suggestions.push(value);
            }
        };

        for property in &self.properties {
            let city = normalize_location_name(&property.city);
            if !city.is_empty() {
                push(city);
            }
            let locality = property.locality.trim();
            if !locality.is_empty() && !looks_like_address(locality) {
                push(normalize_location_name(locality));
            }
        }

        suggestions.sort_by_key(|s| s.to_lowercase());
        suggestions
    }

    fn recompute(&mut self) {
        self.filtered = self.pipeline.apply(&self.properties, self.tab, &self.filters);
    }
}

/// Heuristic screen for locality strings that are really full addresses:
/// PIN codes, leading street numbers, very long strings, too many comma
/// segments, or known-bad entries.
fn looks_like_address(value: &str) -> bool {
    if value.len() > MAX_SUGGESTION_LEN {
        return true;
    }
    if value.split(',').count() > 3 {
        return true;
    }
    if pin_code_regex().is_match(value) || street_number_regex().is_match(value) {
        return true;
    }
    let lower = value.to_lowercase();
    LOCALITY_DENYLIST.iter().any(|bad| lower == *bad)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::search::domain::entities::RawPropertyRecord;
    use crate::modules::search::infrastructure::InMemoryDataSource;
    use chrono::Duration;
    use uuid::Uuid;

    fn record(title: &str, listing: &str, property_type: &str) -> RawPropertyRecord {
        let mut r = RawPropertyRecord::new(Uuid::new_v4(), title);
        r.listing_type = Some(listing.to_string());
        r.property_type = Some(property_type.to_string());
        r.price = Some(5_000_000.0);
        r.created_at = Some(Utc::now() - Duration::days(30));
        r
    }

    fn seeded_controller(records: Vec<RawPropertyRecord>) -> SearchController {
        SearchController::new(Arc::new(InMemoryDataSource::with_records(records)))
    }

    #[tokio::test]
    async fn test_load_initial_populates_list_and_total() {
        let mut controller = seeded_controller(vec![
            record("2 BHK flat", "sale", "Apartment"),
            record("3 BHK flat", "sale", "Apartment"),
        ]);
        controller.load_initial().await.unwrap();
        assert_eq!(controller.properties().len(), 2);
        assert_eq!(controller.total_count(), 2);
        assert_eq!(controller.filtered().len(), 2);
        assert!(!controller.has_more());
    }

    #[tokio::test]
    async fn test_load_more_exhaustion_is_noop() {
        let mut controller = seeded_controller(vec![record("flat", "sale", "Apartment")]);
        controller.load_initial().await.unwrap();
        assert!(!controller.has_more());

        let before = controller.properties().len();
        controller.load_more().await.unwrap();
        assert_eq!(controller.properties().len(), before);
    }

    #[tokio::test]
    async fn test_load_more_appends_next_page() {
        let records: Vec<_> = (0..(PAGE_SIZE + 5))
            .map(|i| {
                let mut r = record(&format!("flat {}", i), "sale", "Apartment");
                r.created_at = Some(Utc::now() - Duration::days(i as i64));
                r
            })
            .collect();
        let mut controller = seeded_controller(records);
        controller.load_initial().await.unwrap();
        assert_eq!(controller.properties().len(), PAGE_SIZE);
        assert!(controller.has_more());

        controller.load_more().await.unwrap();
        assert_eq!(controller.properties().len(), PAGE_SIZE + 5);
        assert!(!controller.has_more());
    }

    #[tokio::test]
    async fn test_insert_event_prepends_listable_record() {
        let mut controller = seeded_controller(vec![record("old flat", "sale", "Apartment")]);
        controller.load_initial().await.unwrap();

        let fresh = record("fresh flat", "sale", "Apartment");
        controller.apply_change(ChangeEvent::Inserted(fresh.clone()));
        assert_eq!(controller.properties().len(), 2);
        assert_eq!(controller.properties()[0].id, fresh.id);
        assert_eq!(controller.total_count(), 2);

        let mut hidden = record("hidden flat", "sale", "Apartment");
        hidden.visible = Some(false);
        controller.apply_change(ChangeEvent::Inserted(hidden));
        assert_eq!(controller.properties().len(), 2);
    }

    #[tokio::test]
    async fn test_update_event_replaces_in_place() {
        let first = record("first", "sale", "Apartment");
        let second = record("second", "sale", "Apartment");
        let third = record("third", "sale", "Apartment");
        let mut controller =
            seeded_controller(vec![first.clone(), second.clone(), third.clone()]);
        controller.load_initial().await.unwrap();
        let pos = controller
            .properties()
            .iter()
            .position(|p| p.id == second.id)
            .unwrap();

        let mut renamed = second.clone();
        renamed.title = Some("second, renovated".to_string());
        controller.apply_change(ChangeEvent::Updated(renamed));
        assert_eq!(controller.properties().len(), 3);
        assert_eq!(controller.properties()[pos].id, second.id);
        assert_eq!(controller.properties()[pos].title, "second, renovated");
    }

    #[tokio::test]
    async fn test_delete_event_preserves_remaining_order() {
        let records: Vec<_> = (0..4)
            .map(|i| {
                let mut r = record(&format!("flat {}", i), "sale", "Apartment");
                r.created_at = Some(Utc::now() - Duration::days(i as i64));
                r
            })
            .collect();
        let victim = records[1].id;
        let mut controller = seeded_controller(records);
        controller.load_initial().await.unwrap();
        let order_before: Vec<Uuid> = controller
            .properties()
            .iter()
            .map(|p| p.id)
            .filter(|id| *id != victim)
            .collect();

        controller.apply_change(ChangeEvent::Deleted(victim));
        let order_after: Vec<Uuid> = controller.properties().iter().map(|p| p.id).collect();
        assert_eq!(order_after, order_before);
        assert_eq!(controller.total_count(), 3);
    }

    #[tokio::test]
    async fn test_set_tab_resets_untouched_budget() {
        let mut controller = seeded_controller(vec![]);
        controller.set_tab(Tab::Rent);
        assert_eq!(controller.filters().budget, (0, Tab::Rent.default_budget_max()));
        assert!(!controller.filters().budget_dirty);
    }

    #[tokio::test]
    async fn test_set_tab_clamps_dirty_budget() {
        let mut controller = seeded_controller(vec![]);
        controller.update_filter(FilterUpdate::Budget(0, 50_000_000));
        assert!(controller.filters().budget_dirty);

        controller.set_tab(Tab::Rent);
        assert_eq!(controller.filters().budget, (0, Tab::Rent.default_budget_max()));
        // Clamping collapsed it onto the rent default, so it is clean again.
        assert!(!controller.filters().budget_dirty);
    }

    #[tokio::test]
    async fn test_land_crossing_resets_exactly_one_range() {
        let mut controller = seeded_controller(vec![]);
        controller.update_filter(FilterUpdate::Area(100.0, 2_000.0));
        controller.update_filter(FilterUpdate::LandArea(0.0, 5.0));
        controller.update_filter(FilterUpdate::LandAreaUnit(AreaUnit::Acre));

        controller.set_tab(Tab::Land);
        // The standard area range became irrelevant and was reset.
        assert!(!controller.filters().area_dirty);
        assert_eq!(controller.filters().area, DEFAULT_AREA_RANGE);
        // The land range survived the switch.
        assert!(controller.filters().land_area_dirty);
        assert_eq!(controller.filters().land_area, (0.0, 5.0));

        controller.set_tab(Tab::Buy);
        assert!(!controller.filters().land_area_dirty);
        assert_eq!(controller.filters().land_area, DEFAULT_LAND_AREA_RANGE);
        assert_eq!(controller.filters().land_area_unit, AreaUnit::SqFt);
    }

    #[tokio::test]
    async fn test_clear_filters_resets_everything() {
        let mut controller = seeded_controller(vec![]);
        controller.update_filter(FilterUpdate::Budget(100, 200));
        controller.update_filter(FilterUpdate::Bhk(vec!["2 BHK".to_string()]));
        controller.update_filter(FilterUpdate::Location("whitefield".to_string()));

        controller.clear_filters();
        assert_eq!(*controller.filters(), SearchFilters::defaults_for_tab(Tab::Buy));
    }

    #[tokio::test]
    async fn test_locations_update_collapses_to_first() {
        let mut controller = seeded_controller(vec![]);
        controller.update_filter(FilterUpdate::Locations(vec![
            "Whitefield".to_string(),
            "Koramangala".to_string(),
        ]));
        assert_eq!(controller.filters().location, "Whitefield");
    }

    #[tokio::test]
    async fn test_from_query_seeds_tab_and_filters() {
        let source = Arc::new(InMemoryDataSource::new());
        let controller = SearchController::from_query(source, "type=rent&budgetMax=30000");
        assert_eq!(controller.tab(), Tab::Rent);
        assert!(controller.filters().budget_dirty);
        assert_eq!(controller.filters().budget, (0, 30_000));
    }

    #[tokio::test]
    async fn test_locality_suggestions_exclude_address_like_strings() {
        let mut good = record("flat", "sale", "Apartment");
        good.locality = Some("Whitefield".to_string());
        good.city = Some("bengaluru".to_string());
        let mut pin = record("flat", "sale", "Apartment");
        pin.locality = Some("MG Road 560001".to_string());
        pin.city = Some("bengaluru".to_string());
        let mut street = record("flat", "sale", "Apartment");
        street.locality = Some("12/4, Cross Street, HSR, Sector 2, Zone 5".to_string());
        street.city = Some("bengaluru".to_string());

        let mut controller = seeded_controller(vec![good, pin, street]);
        controller.load_initial().await.unwrap();
        let suggestions = controller.locality_suggestions();
        assert_eq!(suggestions, vec!["Bangalore".to_string(), "Whitefield".to_string()]);
    }

    #[test]
    fn test_address_screen() {
        assert!(looks_like_address("MG Road 560001"));
        assert!(looks_like_address("12/4, First Cross"));
        assert!(looks_like_address("#221 Baker Street"));
        assert!(looks_like_address("a, b, c, d, e"));
        assert!(looks_like_address("test"));
        assert!(!looks_like_address("Whitefield"));
        assert!(!looks_like_address("HSR Layout, Sector 2"));
    }
}
