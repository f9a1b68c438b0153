pub mod dates;
pub mod event;
pub mod event_type;
pub mod grid;
pub mod groups;
pub mod marks;

pub use event::Event;
pub use event_type::{AliasTable, EventType};
pub use grid::{CalendarCell, MonthData};
pub use groups::EventGroup;
pub use marks::{DayMarks, MarkSet};
