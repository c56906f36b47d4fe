pub mod client;
pub mod models;

pub use client::{CoinGeckoClient, SOURCE_NAME};
pub use models::{ChartInterval, FetchError};
