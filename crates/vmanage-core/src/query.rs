//! Convenience builder for HTTP query parameters.
//!
//! vManage query parameters are usually modelled as small serde structs
//! (`InfoTag`, `MigrationTokenQueryParams`); [`QueryParams::from_model`]
//! flattens those into pairs using their wire names.

use crate::error::{Error, Result};
use serde::Serialize;
use std::fmt::Display;

/// Builder for assembling query parameter pairs.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct QueryParams {
    pairs: Vec<(String, String)>,
}

impl QueryParams {
    /// Create a new, empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self { pairs: Vec::new() }
    }

    /// Flatten a serializable parameter model into pairs.
    ///
    /// `null` members are skipped, scalars are rendered without quotes.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidRequest`] if the model does not serialize to a
    /// flat JSON object.
    pub fn from_model<T: Serialize + ?Sized>(model: &T) -> Result<Self> {
        let value = serde_json::to_value(model)?;
        let serde_json::Value::Object(map) = value else {
            return Err(Error::InvalidRequest(
                "query parameters must serialize to an object".to_string(),
            ));
        };

        let mut params = Self::new();
        for (key, value) in map {
            match value {
                serde_json::Value::Null => {}
                serde_json::Value::String(s) => params.pairs.push((key, s)),
                serde_json::Value::Bool(_) | serde_json::Value::Number(_) => {
                    params.pairs.push((key, value.to_string()));
                }
                _ => {
                    return Err(Error::InvalidRequest(format!(
                        "query parameter `{key}` is not a scalar"
                    )))
                }
            }
        }
        Ok(params)
    }

    /// Append a key/value pair when the value is present.
    pub fn push_opt<T>(&mut self, key: &str, value: Option<T>)
    where
        T: ToString,
    {
        if let Some(value) = value {
            self.pairs.push((key.to_string(), value.to_string()));
        }
    }

    /// Append a required key/value pair.
    pub fn push<T>(&mut self, key: &str, value: T)
    where
        T: Display,
    {
        self.pairs.push((key.to_string(), value.to_string()));
    }

    /// Borrow the collected pairs.
    #[must_use]
    pub fn as_pairs(&self) -> &[(String, String)] {
        &self.pairs
    }

    /// Return the collected key/value pairs.
    #[must_use]
    pub fn into_pairs(self) -> Vec<(String, String)> {
        self.pairs
    }

    /// Returns true if no parameters have been added.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}
