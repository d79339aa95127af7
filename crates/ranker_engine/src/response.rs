use serde::Deserialize;
use serde_json::{Map, Value};

use crate::{FailureKind, RankingError, RankingReport};

#[derive(Debug, Deserialize)]
struct HealthBody {
    message: String,
}

/// Validates a ranking service body against the response contract.
///
/// The report may sit at the top level or, as the reference backend wraps
/// predictions, under a `result` object.
pub fn parse_ranking_response(body: &[u8]) -> Result<RankingReport, RankingError> {
    let value: Value = serde_json::from_slice(body)
        .map_err(|err| malformed(format!("invalid json: {err}")))?;
    let object = value
        .as_object()
        .ok_or_else(|| malformed("expected a json object"))?;
    let object = match object.get("result") {
        Some(Value::Object(inner)) => inner,
        _ => object,
    };

    let rank = match object.get("rank") {
        None | Some(Value::Null) => return Err(malformed("missing field `rank`")),
        Some(value) => value
            .as_f64()
            .ok_or_else(|| malformed("field `rank` is not a number"))?,
    };
    if !rank.is_finite() || !(0.0..=1.0).contains(&rank) {
        return Err(malformed(format!("field `rank` = {rank} is outside [0, 1]")));
    }

    Ok(RankingReport {
        position_title: string_field(object, "positionTitle")?,
        company_name: string_field(object, "companyName")?,
        rank,
        feedback: string_field(object, "feedback")?,
    })
}

/// Reads the `message` greeting the service returns on its root path.
pub fn parse_health_response(body: &[u8]) -> Result<String, RankingError> {
    serde_json::from_slice::<HealthBody>(body)
        .map(|health| health.message)
        .map_err(|err| malformed(format!("invalid health body: {err}")))
}

fn string_field(object: &Map<String, Value>, name: &str) -> Result<String, RankingError> {
    match object.get(name) {
        None | Some(Value::Null) => Err(malformed(format!("missing field `{name}`"))),
        Some(Value::String(text)) => Ok(text.clone()),
        Some(_) => Err(malformed(format!("field `{name}` is not a string"))),
    }
}

fn malformed(message: impl Into<String>) -> RankingError {
    RankingError::new(FailureKind::MalformedResponse, message)
}
