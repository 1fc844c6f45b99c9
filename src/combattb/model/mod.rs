use flexstr::{SharedStr as FlexStr, ToSharedStr};
use serde_json::Value;

use crate::errors::{Result, SchemaError};
use crate::schema::Record;

pub mod entities;
pub mod feature;
pub mod variant;

pub use self::entities::*;
pub use self::feature::*;
pub use self::variant::*;

// Typed views of the schema's entity kinds.  Records are the untyped form
// that the registry validates and the store persists.
pub trait Entity: serde::Serialize + serde::de::DeserializeOwned {
    const KIND: &'static str;

    fn kind(&self) -> FlexStr {
        Self::KIND.to_shared_str()
    }

    fn to_record(&self) -> Result<Record> {
        record_of(&self.kind(), self)
    }

    fn from_record(record: &Record) -> Result<Self> {
        Ok(serde_json::from_value(Value::Object(record.properties.clone()))?)
    }
}

pub(crate) fn record_of<T: serde::Serialize>(kind: &str, value: &T) -> Result<Record> {
    match serde_json::to_value(value)? {
        Value::Object(properties) => Ok(Record::new(kind, properties)),
        other => Err(SchemaError::invalid(kind, "", format!("not an object: {}", other))),
    }
}
