pub mod client;
pub mod tibiadata;

pub use client::{ApiClientConfig, GameDataApi};
pub use tibiadata::TibiaDataClient;

#[cfg(test)]
pub use client::MockGameDataApi;
