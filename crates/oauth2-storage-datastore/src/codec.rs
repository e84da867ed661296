use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

use oauth2_ports::{DatastoreError, Entity};

use crate::StoreError;

pub(crate) fn encode<T: Serialize>(record: &T) -> Result<Entity, DatastoreError> {
    match serde_json::to_value(record) {
        Ok(Value::Object(properties)) => Ok(properties),
        Ok(other) => Err(DatastoreError::InvalidEntity(format!(
            "expected a property map, got {}",
            other
        ))),
        Err(e) => Err(DatastoreError::InvalidEntity(e.to_string())),
    }
}

pub(crate) fn decode<T: DeserializeOwned>(entity: Entity) -> Result<T, DatastoreError> {
    serde_json::from_value(Value::Object(entity))
        .map_err(|e| DatastoreError::InvalidEntity(e.to_string()))
}

/// Only string user data can be persisted. `None` and JSON null store as "".
pub(crate) fn user_data_to_property(user_data: Option<&Value>) -> Result<String, StoreError> {
    match user_data {
        None | Some(Value::Null) => Ok(String::new()),
        Some(Value::String(s)) => Ok(s.clone()),
        Some(_) => Err(StoreError::InvalidUserDataType),
    }
}

pub(crate) fn user_data_from_property(property: String) -> Option<Value> {
    if property.is_empty() {
        None
    } else {
        Some(Value::String(property))
    }
}

/// Stored lifetimes are i64; records carry i32 seconds.
pub(crate) fn narrow_expires_in(expires_in: i64) -> i32 {
    i32::try_from(expires_in).unwrap_or(if expires_in < 0 { i32::MIN } else { i32::MAX })
}
