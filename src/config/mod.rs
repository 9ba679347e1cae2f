pub mod settings;

pub use settings::{ApiSettings, AppSettings, DisplaySettings, Settings, StorageSettings};
