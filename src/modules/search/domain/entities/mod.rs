pub mod property;
pub mod raw_record;

pub use property::{FloorLevel, Property};
pub use raw_record::RawPropertyRecord;
