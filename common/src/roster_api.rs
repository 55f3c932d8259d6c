//! Fetch the team roster from the registration server.

use anyhow::{Context, Result, anyhow};
use serde_json::{Map, Value};

pub const DEFAULT_ROSTER_URL: &str = "http://localhost:3001/Hack/students";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Pull the list of team objects out of a roster payload.
///
/// Accepted shapes are a JSON array of teams, an object with a `teams` array, or
/// either of those encoded again inside a JSON string.
///
/// # Errors
/// Returns an error if the body is not JSON, or has any other shape.
pub fn parse_roster_payload(body: &str) -> Result<Vec<Map<String, Value>>> {
    let value: Value = serde_json::from_str(body).context("Roster response is not valid JSON")?;
    extract_teams(value, true)
}

fn extract_teams(value: Value, allow_string: bool) -> Result<Vec<Map<String, Value>>> {
    match value {
        Value::Array(items) => items
            .into_iter()
            .enumerate()
            .map(|(i, item)| match item {
                Value::Object(team) => Ok(team),
                other => Err(anyhow!(
                    "Roster entry #{i} is not an object: {}",
                    type_name(&other)
                )),
            })
            .collect(),
        Value::Object(mut object) => match object.remove("teams") {
            Some(teams @ Value::Array(_)) => extract_teams(teams, false),
            Some(other) => Err(anyhow!(
                "Roster 'teams' field is {}, expected an array",
                type_name(&other)
            )),
            None => Err(anyhow!(
                "Roster object has no 'teams' field (keys: {})",
                object.keys().cloned().collect::<Vec<_>>().join(", ")
            )),
        },
        Value::String(inner) if allow_string => {
            let value: Value = serde_json::from_str(&inner)
                .context("Roster response is a string that does not contain JSON")?;
            extract_teams(value, false)
        }
        other => Err(anyhow!(
            "Unexpected roster response: {}, expected an array or an object with 'teams'",
            type_name(&other)
        )),
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Request the roster and return its teams. Makes a single attempt.
///
/// # Errors
/// Returns an error if the request fails, the server returns an error status, or the
/// payload has an unexpected shape.
#[cfg(feature = "network")]
pub fn get_roster_from_server(url: &str, timeout_secs: u64) -> Result<Vec<Map<String, Value>>> {
    use std::time::Duration;

    let client = reqwest::blocking::Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .context("Failed to build HTTP client")?;
    let response = client
        .get(url)
        .send()
        .with_context(|| format!("Failed to reach {url}"))?;

    let status = response.status();
    if !status.is_success() {
        let msg = response
            .text()
            .unwrap_or_else(|_| "Unknown error".to_string());
        return Err(anyhow!("Server returned an error ({status}): {msg}"));
    }
    let body = response
        .text()
        .context("Failed to read roster response body")?;
    parse_roster_payload(&body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_array() {
        let teams = parse_roster_payload(r#"[{"teamname": "A"}, {"teamname": "B"}]"#).unwrap();
        assert_eq!(teams.len(), 2);
        assert_eq!(teams[1]["teamname"], "B");
    }

    #[test]
    fn test_parse_wrapped_object() {
        let teams = parse_roster_payload(r#"{"count": 1, "teams": [{"teamname": "A"}]}"#).unwrap();
        assert_eq!(teams.len(), 1);
    }

    #[test]
    fn test_parse_string_encoded() {
        let body = serde_json::to_string(r#"{"teams": [{"teamname": "A"}]}"#).unwrap();
        let teams = parse_roster_payload(&body).unwrap();
        assert_eq!(teams[0]["teamname"], "A");
    }

    #[test]
    fn test_parse_rejects_other_shapes() {
        assert!(parse_roster_payload("not json").is_err());
        assert!(parse_roster_payload("42").is_err());
        assert!(parse_roster_payload(r#"{"data": []}"#).is_err());
        assert!(parse_roster_payload(r#"{"teams": {"teamname": "A"}}"#).is_err());
        assert!(parse_roster_payload(r#"[1, 2]"#).is_err());
        // only one level of string encoding is unwrapped
        let twice = serde_json::to_string(&serde_json::to_string("[]").unwrap()).unwrap();
        assert!(parse_roster_payload(&twice).is_err());
    }
}
