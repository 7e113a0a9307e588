//! Meter value aggregate
//!
//! Append-only log of sampled readings.

pub mod model;
pub mod repository;

pub use model::{
    flatten_samples, MeterSample, NewSampledValue, SampledReading, SampledValueRecord,
};
pub use repository::MeterValueRepository;
