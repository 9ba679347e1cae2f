pub mod api;
pub mod config;
pub mod models;
pub mod report;
pub mod roster;
pub mod session;
pub mod tui;

pub use api::{GameDataApi, TibiaDataClient};
pub use config::Settings;
pub use models::{ClassBucket, FinderError, Player, Result, RosterByClass};
pub use roster::{classify, compute_range, filter_by_range, is_in_range, FilteredRoster, LevelRange};
pub use session::{PartyFinder, Session};
