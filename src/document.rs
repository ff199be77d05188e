//! Solutions document handling
//!
//! Decoding the request body, checking the document shape and producing the
//! bytes that get stored. The document itself stays a `serde_json::Value` so
//! every field the checks do not look at passes through untouched.

use serde_json::Value;

use crate::error::{HandlerError, Result};
use crate::http::json;

const EMPTY_BODY: &str = "Request body is empty";

/// Fields every solution record must carry with a truthy value
const REQUIRED_SOLUTION_FIELDS: [&str; 3] = ["id", "name", "category"];

/// Decode the event body into a document
///
/// A string body is parsed as JSON; any other value is taken as the already
/// decoded document. Absent, empty, falsy and undecodable bodies fail
/// validation. Number text is kept exactly as sent.
pub fn parse_body(body: Option<&Value>) -> Result<Value> {
    let document = match body {
        None | Some(Value::Null) => return Err(HandlerError::validation(EMPTY_BODY)),
        Some(Value::String(raw)) if raw.is_empty() => {
            return Err(HandlerError::validation(EMPTY_BODY))
        }
        Some(Value::String(raw)) => serde_json::from_str(raw)
            .map_err(|e| HandlerError::Validation(e.to_string()))?,
        Some(value) => value.clone(),
    };

    if !is_truthy(&document) {
        return Err(HandlerError::validation(EMPTY_BODY));
    }
    Ok(document)
}

/// Check the document shape
///
/// Only the top-level containers and the three required solution fields are
/// checked; nothing else is inspected.
pub fn validate(document: &Value) -> Result<()> {
    let Some(root) = document.as_object() else {
        return Err(HandlerError::validation("Invalid data: must be an object"));
    };

    if !root.get("categories").is_some_and(Value::is_array) {
        return Err(HandlerError::validation(
            "Invalid data: categories must be an array",
        ));
    }

    if !root.get("features").is_some_and(Value::is_object) {
        return Err(HandlerError::validation(
            "Invalid data: features must be an object",
        ));
    }

    let Some(solutions) = root.get("solutions").and_then(Value::as_array) else {
        return Err(HandlerError::validation(
            "Invalid data: solutions must be an array",
        ));
    };

    for (idx, solution) in solutions.iter().enumerate() {
        let complete = REQUIRED_SOLUTION_FIELDS
            .iter()
            .all(|field| solution.get(field).is_some_and(is_truthy));
        if !complete {
            return Err(HandlerError::Validation(format!(
                "Solution at index {idx} missing required fields (id, name, category)"
            )));
        }
    }

    Ok(())
}

/// Render the document the way it is stored: 2-space indentation, key order
/// kept, non-ASCII escaped
pub fn to_stored_json(document: &Value) -> Result<String> {
    Ok(json::to_indented_string(document)?)
}

/// JSON truthiness: null, false, zero, and empty strings/arrays/objects are falsy
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f.abs() > 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}
