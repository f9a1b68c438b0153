pub mod config;
pub mod events;

pub use config::SchoolYearConfig;
pub use events::{EventDraft, EventStore, StoreError};
