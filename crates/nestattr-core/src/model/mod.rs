pub mod attributes;
pub mod entity;
pub mod outcome;
pub mod record;

pub use attributes::{AttributeMap, ReservedKeys};
pub use entity::Entity;
pub use outcome::{EntryOutcome, ReconciliationReport};
pub use record::Record;
