// Raw stored records
//
// A RawRecord is the schema-less attribute map a key-value table hands
// back: attribute name -> attribute value. Typed entities are encoded on
// write and decoded on read; a decode failure is the batch-processing
// error the listing path has to deal with.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Errors converting between raw records and typed entities
#[derive(Debug, Error)]
pub enum RecordError {
    /// Attribute payload did not match the expected schema
    #[error("failed to decode record: {0}")]
    Decode(#[from] serde_json::Error),

    /// Entity did not serialize to an attribute map
    #[error("entity is not an attribute map")]
    NotAMap,
}

/// A schema-less stored record
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawRecord {
    attributes: Map<String, Value>,
}

impl RawRecord {
    /// Encode a typed entity into its stored representation
    pub fn encode<T: Serialize>(entity: &T) -> Result<Self, RecordError> {
        match serde_json::to_value(entity)? {
            Value::Object(attributes) => Ok(Self { attributes }),
            _ => Err(RecordError::NotAMap),
        }
    }

    /// Decode the record into a typed entity. Extra attributes are
    /// ignored, so narrower views decode from full records.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, RecordError> {
        Ok(serde_json::from_value(Value::Object(
            self.attributes.clone(),
        ))?)
    }

    /// Read a single attribute without decoding the whole record
    pub fn get(&self, attribute: &str) -> Option<&Value> {
        self.attributes.get(attribute)
    }

    /// Overwrite a single attribute in place
    pub fn set(&mut self, attribute: impl Into<String>, value: Value) {
        self.attributes.insert(attribute.into(), value);
    }
}
