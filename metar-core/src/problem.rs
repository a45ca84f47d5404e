//! Problem-detail responses (RFC 7807 style) returned by the weather
//! service API, and the error taxonomy API clients report with.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use thiserror::Error;

/// Failure to read a problem-detail document.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProblemError {
    #[error("Missing required key '{0}' in problem details")]
    MissingField(&'static str),

    #[error("Expecting {field} as {expected}, not '{found}'")]
    WrongType {
        field: &'static str,
        expected: &'static str,
        found: String,
    },
}

/// Errors surfaced by an API client fetching reports.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    /// The request failed and the service explained why.
    #[error("{0}")]
    Response(Box<ProblemDetails>),

    /// Bad, corrupt or unexpected data came back.
    #[error("Unexpected API data: {0}")]
    Data(String),
}

impl ApiError {
    /// Classify the body of a failed response.
    ///
    /// Bodies that are not a well-formed problem document become
    /// [`ApiError::Data`].
    pub fn from_body(body: &str, url: &str) -> Self {
        let value: Value = match serde_json::from_str(body) {
            Ok(value) => value,
            Err(err) => return ApiError::Data(format!("response body is not JSON: {err}")),
        };

        match ProblemDetails::from_json(&value, url) {
            Ok(problem) => ApiError::Response(Box::new(problem)),
            Err(err) => ApiError::Data(err.to_string()),
        }
    }
}

/// Extra information for a failure caused by an invalid parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterError {
    pub parameter: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProblemDetails {
    /// URI reference identifying the problem type.
    pub problem_type: String,
    pub title: String,
    /// HTTP status code generated by the origin server.
    pub status: i64,
    pub detail: String,
    /// URI reference identifying this occurrence.
    pub instance: String,
    /// Request identifier to quote when contacting the service.
    pub correlation_id: String,
    /// The URL that was requested.
    pub url: String,
    pub parameter_errors: Option<Vec<ParameterError>>,
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn required<'a>(data: &'a Value, key: &'static str) -> Result<&'a Value, ProblemError> {
    data.get(key).ok_or(ProblemError::MissingField(key))
}

fn required_str(
    data: &Value,
    key: &'static str,
    field: &'static str,
) -> Result<String, ProblemError> {
    let value = required(data, key)?;
    value
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| ProblemError::WrongType {
            field,
            expected: "string",
            found: type_name(value).to_string(),
        })
}

/// Render a loose JSON value as text, strings without their quotes.
fn loose_text(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
        None => String::new(),
    }
}

fn parameter_errors(data: &Value) -> Option<Vec<ParameterError>> {
    let entries = data.get("parameterErrors")?.as_array()?;
    if !entries.iter().all(Value::is_object) {
        return None;
    }

    Some(
        entries
            .iter()
            .map(|entry| ParameterError {
                parameter: loose_text(entry.get("parameter")),
                message: loose_text(entry.get("message")),
            })
            .collect(),
    )
}

impl ProblemDetails {
    /// Build from the JSON body of a failed response.
    ///
    /// `parameterErrors` is optional and silently dropped when it is not a
    /// list of objects.
    pub fn from_json(data: &Value, url: &str) -> Result<Self, ProblemError> {
        let status = required(data, "status")?;
        let status = status.as_i64().ok_or_else(|| ProblemError::WrongType {
            field: "status",
            expected: "int",
            found: type_name(status).to_string(),
        })?;

        Ok(Self {
            problem_type: required_str(data, "type", "problem_type")?,
            title: required_str(data, "title", "title")?,
            status,
            detail: required_str(data, "detail", "detail")?,
            instance: required_str(data, "instance", "instance")?,
            correlation_id: required_str(data, "correlationId", "correlation_id")?,
            url: url.to_string(),
            parameter_errors: parameter_errors(data),
        })
    }
}

impl fmt::Display for ProblemDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}).", self.status, self.title)?;
        for perr in self.parameter_errors.iter().flatten() {
            write!(
                f,
                " Parameter '{}' is invalid. {}.",
                perr.parameter.replace('"', "'"),
                perr.message.replace('"', "'"),
            )?;
        }
        write!(f, " Attempted URL '{}'.", self.url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const URL: &str = "https://api.weather.gov/stations/KXYZ/observations/latest";

    fn problem_json() -> Value {
        json!({
            "type": "https://api.weather.gov/problems/NotFound",
            "title": "Not Found",
            "status": 404,
            "detail": "Station not found",
            "instance": "https://api.weather.gov/requests/abc",
            "correlationId": "abc123",
        })
    }

    #[test]
    fn parses_required_fields() {
        let problem = ProblemDetails::from_json(&problem_json(), URL).expect("problem should parse");

        assert_eq!(problem.status, 404);
        assert_eq!(problem.correlation_id, "abc123");
        assert_eq!(problem.parameter_errors, None);
        assert_eq!(problem.to_string(), format!("404 (Not Found). Attempted URL '{URL}'."));
    }

    #[test]
    fn renders_parameter_errors() {
        let mut data = problem_json();
        data["status"] = json!(400);
        data["title"] = json!("Bad Request");
        data["parameterErrors"] = json!([
            { "parameter": "path.stationId", "message": "Does not match \"^[A-Z]{4}$\"" },
        ]);

        let problem = ProblemDetails::from_json(&data, URL).expect("problem should parse");
        assert_eq!(
            problem.to_string(),
            format!(
                "400 (Bad Request). Parameter 'path.stationId' is invalid. \
                 Does not match '^[A-Z]{{4}}$'. Attempted URL '{URL}'."
            )
        );
    }

    #[test]
    fn malformed_parameter_errors_are_dropped() {
        let mut data = problem_json();
        data["parameterErrors"] = json!(["not an object"]);

        let problem = ProblemDetails::from_json(&data, URL).expect("problem should parse");
        assert_eq!(problem.parameter_errors, None);
    }

    #[test]
    fn missing_and_mistyped_fields() {
        let mut data = problem_json();
        data.as_object_mut().unwrap().remove("correlationId");
        assert_eq!(
            ProblemDetails::from_json(&data, URL).unwrap_err(),
            ProblemError::MissingField("correlationId")
        );

        let mut data = problem_json();
        data["status"] = json!("404");
        let err = ProblemDetails::from_json(&data, URL).unwrap_err();
        assert!(err.to_string().contains("Expecting status as int, not 'string'"));
    }

    #[test]
    fn api_error_classifies_bodies() {
        let err = ApiError::from_body(&problem_json().to_string(), URL);
        assert!(matches!(err, ApiError::Response(ref p) if p.status == 404));
        assert!(err.to_string().starts_with("404 (Not Found)."));

        let err = ApiError::from_body("<html>gateway timeout</html>", URL);
        assert!(matches!(err, ApiError::Data(_)));

        let err = ApiError::from_body(r#"{"title": "oops"}"#, URL);
        assert!(err.to_string().contains("Missing required key 'status'"));
    }
}
