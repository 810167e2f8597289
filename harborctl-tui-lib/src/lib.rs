pub mod ansi;
pub mod diff;
pub mod select;
pub mod table;

pub use select::{MultiSelect, SelectItem, SelectOutcome};
