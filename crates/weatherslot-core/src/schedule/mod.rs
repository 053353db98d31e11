//! Weekly recurring schedule: entry types, validation and the store.

mod entry;
mod store;

pub use entry::{
    parse_weekday, EntryError, RawScheduleEntry, ScheduleEntry, ScheduleRecord, TimeRange,
};
pub use store::ScheduleStore;
