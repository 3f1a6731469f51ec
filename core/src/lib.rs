//! tradeview-core: monthly trade history, persistence and chart model.

pub mod chart;
pub mod clock;
pub mod codec;
pub mod command;
pub mod config;
pub mod downsample;
pub mod engine;
pub mod error;
pub mod event;
pub mod history;
pub mod range;
pub mod resource;
pub mod rng;
pub mod save_data;
pub mod snapshot;
pub mod source;
pub mod store;
pub mod types;
