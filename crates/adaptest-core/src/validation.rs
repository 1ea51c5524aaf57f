//! Input validation for response histories.
//!
//! Typed histories are checked by [`validate_responses`] before any numerical
//! work. Untyped payloads (JSON handed over by a calling service or loaded
//! from disk) go through [`validate_irt_responses`], which also catches shape
//! errors that the type system rules out for `Response`.

use serde_json::Value;

use crate::error::{InvalidInput, Result};
use crate::irt::{DIFFICULTY_MAX, DIFFICULTY_MIN};
use crate::model::Response;

fn check_difficulty(index: usize, value: f64) -> Result<()> {
    if !value.is_finite() {
        return Err(InvalidInput::NonFiniteDifficulty { index }.into());
    }
    if !(DIFFICULTY_MIN..=DIFFICULTY_MAX).contains(&value) {
        return Err(InvalidInput::DifficultyOutOfRange { index, value }.into());
    }
    Ok(())
}

/// Validate a typed response history.
///
/// Rejects an empty history and any difficulty that is non-finite or outside
/// `[0, 100]` (both ends inclusive).
pub fn validate_responses(responses: &[Response]) -> Result<()> {
    if responses.is_empty() {
        return Err(InvalidInput::EmptyResponses.into());
    }
    for (index, r) in responses.iter().enumerate() {
        check_difficulty(index, r.item_difficulty)?;
    }
    Ok(())
}

/// Validate an untyped response payload.
///
/// The payload must be a non-empty array of objects, each with a numeric
/// difficulty (`item_difficulty` or `itemDifficulty`) in `[0, 100]` and a
/// boolean `correct` flag.
pub fn validate_irt_responses(input: &Value) -> Result<()> {
    parse_responses(input).map(|_| ())
}

/// Validate an untyped payload and convert it into typed responses.
pub fn parse_responses(input: &Value) -> Result<Vec<Response>> {
    let entries = input.as_array().ok_or(InvalidInput::NotAnArray)?;
    if entries.is_empty() {
        return Err(InvalidInput::EmptyResponses.into());
    }

    entries
        .iter()
        .enumerate()
        .map(|(index, entry)| -> Result<Response> {
            let obj = entry
                .as_object()
                .ok_or(InvalidInput::NotAnObject { index })?;

            let difficulty = obj
                .get("item_difficulty")
                .or_else(|| obj.get("itemDifficulty"))
                .and_then(Value::as_f64)
                .ok_or(InvalidInput::MissingDifficulty { index })?;
            check_difficulty(index, difficulty)?;

            let correct = obj
                .get("correct")
                .and_then(Value::as_bool)
                .ok_or(InvalidInput::NonBooleanCorrectness { index })?;

            Ok(Response::new(difficulty, correct))
        })
        .collect()
}
