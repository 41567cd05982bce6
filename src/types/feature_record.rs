//! Feature record parsing for census income model inference.
//!
//! A request body is turned into a [`FeatureRecord`] in two steps: a presence
//! check over every required key, then numeric coercion of each value. Keys are
//! kept in the exact order the classifier was fit on.

use serde_json::{Map, Value};
use thiserror::Error;

/// Number of features the classifier expects.
pub const FEATURE_COUNT: usize = 14;

/// Required feature keys, in the positional order used during training.
pub const FEATURE_KEYS: [&str; FEATURE_COUNT] = [
    "age",
    "final-weight",
    "education",
    "education-number",
    "marital-status",
    "relationship",
    "occupation",
    "race",
    "sex",
    "capital-gain",
    "capital-loss",
    "hours-per-week",
    "native-country",
    "employment-type",
];

/// Errors raised while turning a JSON body into a feature record
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RecordError {
    /// A required key is absent from the request
    #[error("Missing key: {0} in JSON request")]
    MissingKey(&'static str),

    /// The body parsed as JSON but is not an object
    #[error("expected a JSON object, found {0}")]
    NotAnObject(&'static str),

    /// A string value that does not parse as a float
    #[error("could not convert string to float: '{value}' (key '{key}')")]
    InvalidNumber { key: &'static str, value: String },

    /// A value of a JSON type with no numeric meaning
    #[error("could not convert {kind} to float (key '{key}')")]
    NotNumeric { key: &'static str, kind: &'static str },

    /// A value that coerces to NaN or an infinity
    #[error("Input contains NaN or infinity (key '{key}')")]
    NotFinite { key: &'static str },
}

impl RecordError {
    /// Whether the error is the client's fault in the sense of the HTTP contract.
    ///
    /// Only missing keys count; every other failure is reported as a server error.
    pub fn is_client_error(&self) -> bool {
        matches!(self, RecordError::MissingKey(_))
    }
}

/// A request body that passed the presence check.
///
/// Holds borrowed values for every required key, in training order.
#[derive(Debug)]
pub struct ValidatedRecord<'a> {
    values: Vec<&'a Value>,
}

impl<'a> ValidatedRecord<'a> {
    /// Check that `body` is an object carrying every required key.
    ///
    /// Stops at the first missing key, in training order.
    pub fn validate(body: &'a Value) -> Result<Self, RecordError> {
        let object = body
            .as_object()
            .ok_or_else(|| RecordError::NotAnObject(json_kind(body)))?;

        let mut values = Vec::with_capacity(FEATURE_COUNT);
        for key in FEATURE_KEYS {
            values.push(object.get(key).ok_or(RecordError::MissingKey(key))?);
        }

        Ok(Self { values })
    }

    /// Coerce every value to a number.
    pub fn coerce(&self) -> Result<FeatureRecord, RecordError> {
        let mut features = [0.0; FEATURE_COUNT];
        for ((slot, key), value) in features.iter_mut().zip(FEATURE_KEYS).zip(&self.values) {
            *slot = coerce_value(key, value)?;
        }
        Ok(FeatureRecord { features })
    }
}

/// A fully numeric feature record, ready for inference.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureRecord {
    features: [f64; FEATURE_COUNT],
}

impl FeatureRecord {
    /// Build a record directly from numeric values in training order
    pub fn new(features: [f64; FEATURE_COUNT]) -> Self {
        Self { features }
    }

    /// Validate and coerce a JSON body in one go.
    pub fn from_json(body: &Value) -> Result<Self, RecordError> {
        ValidatedRecord::validate(body)?.coerce()
    }

    /// Feature values in training order.
    pub fn values(&self) -> &[f64; FEATURE_COUNT] {
        &self.features
    }

    /// Single-row float32 vector, the input shape of exported models.
    pub fn to_f32_row(&self) -> Vec<f32> {
        self.features.iter().map(|&v| v as f32).collect()
    }

    /// Look up a feature value by key name.
    pub fn get(&self, key: &str) -> Option<f64> {
        FEATURE_KEYS
            .iter()
            .position(|&k| k == key)
            .map(|idx| self.features[idx])
    }

    /// Render the record back to a JSON object keyed by feature name.
    pub fn to_json(&self) -> Value {
        let map: Map<String, Value> = FEATURE_KEYS
            .iter()
            .zip(self.features)
            .map(|(key, value)| (key.to_string(), Value::from(value)))
            .collect();
        Value::Object(map)
    }
}

fn coerce_value(key: &'static str, value: &Value) -> Result<f64, RecordError> {
    let number = match value {
        Value::Number(n) => n.as_f64().ok_or(RecordError::NotNumeric {
            key,
            kind: "number",
        })?,
        Value::Bool(b) => {
            if *b {
                1.0
            } else {
                0.0
            }
        }
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| RecordError::InvalidNumber {
                key,
                value: s.clone(),
            })?,
        other => {
            return Err(RecordError::NotNumeric {
                key,
                kind: json_kind(other),
            })
        }
    };

    if !number.is_finite() {
        return Err(RecordError::NotFinite { key });
    }

    Ok(number)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
