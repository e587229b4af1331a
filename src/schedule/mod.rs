mod types;
mod time;
mod layout;
mod stats;
mod clock;
mod source;
mod store;

pub use types::{Category, ScheduleDocument};
pub use time::compact_range;
pub use layout::{GridLayout, PlacedActivity};
pub use stats::{format_hours, Statistics};
pub use clock::NowCell;
pub use source::{load_schedule, DataSource};
pub use store::{dated_file_name, ScheduleStore};

#[cfg(test)]
pub use layout::layout;
