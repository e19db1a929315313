pub mod compaction;
pub mod dates;
pub mod entity;
pub mod error;
pub mod ids;
pub mod mutation;
pub mod preferences;
pub mod state;
pub mod weight;

pub use compaction::{CellEntry, CellTone};
pub use dates::DateRange;
pub use entity::{CategoryState, Group, Item};
pub use error::CoreError;
pub use ids::{ALL_DATES, Category};
pub use mutation::MembershipUpdate;
pub use preferences::PreferenceRecord;
pub use state::{ConfigState, StoredConfig};
pub use weight::Weight;
