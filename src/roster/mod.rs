pub mod classifier;
pub mod range;

pub use classifier::{classify, filter_by_range, FilteredRoster};
pub use range::{compute_range, describe_range, is_in_range, parse_level, LevelRange};
