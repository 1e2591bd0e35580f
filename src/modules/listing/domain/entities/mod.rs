pub mod listing_draft;

pub use listing_draft::{DraftStep, ListingDraft};
