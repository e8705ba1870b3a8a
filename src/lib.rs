pub mod analysis;
pub mod api;
pub mod concurrent_fetcher;
pub mod error;
pub mod export;
pub mod history;
pub mod models;
pub mod normalizer;
pub mod pipeline;
pub mod registry;
pub mod ui;

#[cfg(test)]
mod testing;
