//! Click-through-rate prediction for bid requests.
//!
//! A request's four categorical features are turned into coefficient keys,
//! resolved against the published model in the coefficient store, and scored
//! with logistic regression.

pub mod config;
pub mod engine;
pub mod error;
pub mod keys;
pub mod redis_client;
pub mod resolver;
pub mod routes;
pub mod scorer;
pub mod storage;
pub mod types;

pub use engine::BiddingEngine;
pub use error::AppError;
pub use types::{BiddingRequest, BiddingResponse, CtrPrediction, FeatureSet};
