//! Envelope reshaping between the upstream and the front end.
//!
//! Upstream responses all share the `{ success, data | error, message? }`
//! convention. A shaper receives the successful upstream body and decides
//! what the front end sees: the body untouched, the `data` fields lifted to
//! the top level, or `data` re-parsed through one of the document models to
//! pin the downstream contract.

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ShapeError {
    #[error("upstream body is not a JSON object")]
    NotAnObject,

    #[error("upstream body has no data field")]
    MissingData,

    #[error("upstream data does not match the expected shape: {0}")]
    Mismatch(String),
}

pub fn verbatim(body: Value) -> Result<Value, ShapeError> {
    Ok(body)
}

/// Lift the fields of the `data` object to the top level of the envelope:
/// `{success, data: {post}}` becomes `{success, post}`. A missing or
/// non-object `data` leaves the body untouched.
pub fn unwrap_data(mut body: Value) -> Result<Value, ShapeError> {
    let Some(envelope) = body.as_object_mut() else {
        return Err(ShapeError::NotAnObject);
    };

    match envelope.remove("data") {
        Some(Value::Object(inner)) => {
            for (key, value) in inner {
                envelope.insert(key, value);
            }
        }
        Some(other) => {
            envelope.insert("data".to_string(), other);
        }
        None => {}
    }

    Ok(body)
}

/// Re-parse `data` through a document model and re-emit it, keeping the rest
/// of the envelope. Upstream data that does not match the model is a shape
/// mismatch, handled by the route's fallback policy.
pub fn typed<T>(mut body: Value) -> Result<Value, ShapeError>
where
    T: DeserializeOwned + Serialize,
{
    let Some(envelope) = body.as_object_mut() else {
        return Err(ShapeError::NotAnObject);
    };

    let data = envelope.remove("data").ok_or(ShapeError::MissingData)?;

    let parsed: T = serde_json::from_value(data).map_err(|e| ShapeError::Mismatch(e.to_string()))?;
    let reencoded = serde_json::to_value(parsed).map_err(|e| ShapeError::Mismatch(e.to_string()))?;

    envelope.insert("data".to_string(), reencoded);
    Ok(body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Notice;
    use serde_json::json;

    #[test]
    fn unwrap_data_lifts_object_fields() {
        let body = json!({"success": true, "data": {"post": {"title": "t"}, "total": 3}});
        let shaped = unwrap_data(body).unwrap();
        assert_eq!(shaped, json!({"success": true, "post": {"title": "t"}, "total": 3}));
    }

    #[test]
    fn unwrap_data_keeps_array_data_in_place() {
        let body = json!({"success": true, "data": [1, 2]});
        let shaped = unwrap_data(body).unwrap();
        assert_eq!(shaped, json!({"success": true, "data": [1, 2]}));
    }

    #[test]
    fn unwrap_data_rejects_non_objects() {
        assert!(unwrap_data(json!([1, 2])).is_err());
    }

    #[test]
    fn typed_round_trips_matching_data() {
        let body = json!({
            "success": true,
            "data": [{
                "title": "Congress schedule",
                "content": "Convenes on the 14th.",
                "category": "general",
                "status": "published"
            }]
        });

        let shaped = typed::<Vec<Notice>>(body).unwrap();
        assert_eq!(shaped["success"], true);
        assert_eq!(shaped["data"][0]["category"], "general");
        assert_eq!(shaped["data"][0]["views"], 0);
    }

    #[test]
    fn typed_flags_mismatched_data() {
        let body = json!({"success": true, "data": [{"title": "no content field"}]});
        assert!(matches!(
            typed::<Vec<Notice>>(body),
            Err(ShapeError::Mismatch(_))
        ));
    }

    #[test]
    fn typed_requires_data() {
        let body = json!({"success": true});
        assert!(matches!(
            typed::<Vec<Notice>>(body),
            Err(ShapeError::MissingData)
        ));
    }
}
