use chrono::{Duration, Utc};
use nivaas_lib::modules::search::domain::entities::RawPropertyRecord;
use uuid::Uuid;

/// Builder for raw property records with sensible listable defaults.
pub struct PropertyFactory {
    record: RawPropertyRecord,
}

impl PropertyFactory {
    pub fn new(title: &str) -> Self {
        let mut record = RawPropertyRecord::new(Uuid::new_v4(), title);
        record.listing_type = Some("sale".to_string());
        record.property_type = Some("Apartment".to_string());
        record.price = Some(5_000_000.0);
        record.area = Some(1_200.0);
        record.locality = Some("Whitefield".to_string());
        record.city = Some("Bangalore".to_string());
        record.created_at = Some(Utc::now() - Duration::days(30));
        Self { record }
    }

    pub fn listing_type(mut self, listing_type: &str) -> Self {
        self.record.listing_type = Some(listing_type.to_string());
        self
    }

    pub fn property_type(mut self, property_type: &str) -> Self {
        self.record.property_type = Some(property_type.to_string());
        self
    }

    pub fn price(mut self, price: f64) -> Self {
        self.record.price = Some(price);
        self
    }

    pub fn locality(mut self, locality: &str) -> Self {
        self.record.locality = Some(locality.to_string());
        self
    }

    pub fn city(mut self, city: &str) -> Self {
        self.record.city = Some(city.to_string());
        self
    }

    pub fn created_days_ago(mut self, days: i64) -> Self {
        self.record.created_at = Some(Utc::now() - Duration::days(days));
        self
    }

    pub fn visible(mut self, visible: bool) -> Self {
        self.record.visible = Some(visible);
        self
    }

    pub fn build(self) -> RawPropertyRecord {
        self.record
    }
}
