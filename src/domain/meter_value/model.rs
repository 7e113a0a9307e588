//! Sampled meter reading types

use chrono::{DateTime, Utc};
use serde::Deserialize;

/// One OCPP `SampledValue`, kept as the opaque strings the charge point sent.
///
/// Deserializes from the OCPP-J JSON shape; absent optional fields stay
/// `None` and no defaults are filled in.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SampledReading {
    pub value: String,
    #[serde(default)]
    pub context: Option<String>,
    #[serde(default)]
    pub format: Option<String>,
    #[serde(default)]
    pub measurand: Option<String>,
    #[serde(default)]
    pub phase: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub unit: Option<String>,
}

impl SampledReading {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            context: None,
            format: None,
            measurand: None,
            phase: None,
            location: None,
            unit: None,
        }
    }
}

/// One OCPP `MeterValue`: a timestamp and the readings taken at that instant
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeterSample {
    pub timestamp: DateTime<Utc>,
    pub sampled_value: Vec<SampledReading>,
}

/// Flatten samples into individual readings, each carrying its parent
/// timestamp, in the order received.
pub fn flatten_samples(
    charge_point_id: &str,
    connector_id: u32,
    transaction_id: Option<i32>,
    samples: Vec<MeterSample>,
) -> Vec<NewSampledValue> {
    samples
        .into_iter()
        .flat_map(|sample| {
            let timestamp = sample.timestamp;
            sample
                .sampled_value
                .into_iter()
                .map(move |reading| NewSampledValue {
                    charge_point_id: charge_point_id.to_string(),
                    connector_id,
                    transaction_id,
                    timestamp,
                    reading,
                })
        })
        .collect()
}

/// A reading flattened with its parent timestamp, ready to append
#[derive(Debug, Clone, PartialEq)]
pub struct NewSampledValue {
    pub charge_point_id: String,
    pub connector_id: u32,
    /// Associated transaction, if the association rule allowed one
    pub transaction_id: Option<i32>,
    pub timestamp: DateTime<Utc>,
    pub reading: SampledReading,
}

/// A stored reading. `id` is the arrival sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct SampledValueRecord {
    pub id: i64,
    pub charge_point_id: String,
    pub connector_id: u32,
    pub transaction_id: Option<i32>,
    pub timestamp: DateTime<Utc>,
    pub reading: SampledReading,
}

impl NewSampledValue {
    pub fn into_record(self, id: i64) -> SampledValueRecord {
        SampledValueRecord {
            id,
            charge_point_id: self.charge_point_id,
            connector_id: self.connector_id,
            transaction_id: self.transaction_id,
            timestamp: self.timestamp,
            reading: self.reading,
        }
    }
}
