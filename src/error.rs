use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Why a single query parameter (or the query as a whole) was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    Missing,
    NotAnInteger,
    OutOfRange,
    Overflow,
    MalformedQuery,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParamIssue {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub param: Option<String>,
    pub kind: IssueKind,
    pub message: String,
}

impl ParamIssue {
    pub fn missing(param: &str) -> Self {
        Self {
            param: Some(param.to_string()),
            kind: IssueKind::Missing,
            message: format!("query parameter `{}` is required", param),
        }
    }

    pub fn not_an_integer(param: &str, value: &str) -> Self {
        Self {
            param: Some(param.to_string()),
            kind: IssueKind::NotAnInteger,
            message: format!("query parameter `{}` must be an integer, got {:?}", param, value),
        }
    }

    pub fn out_of_range(param: &str, value: &str) -> Self {
        Self {
            param: Some(param.to_string()),
            kind: IssueKind::OutOfRange,
            message: format!(
                "query parameter `{}` is outside the 64-bit integer range: {}",
                param, value
            ),
        }
    }
}

/// Rejection for a request whose operands cannot be turned into a result.
///
/// Always rendered as `422 Unprocessable Entity` with every collected issue
/// listed under `detail`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("validation failed: {}", summarize(.issues))]
pub struct ValidationError {
    pub issues: Vec<ParamIssue>,
}

fn summarize(issues: &[ParamIssue]) -> String {
    issues
        .iter()
        .map(|issue| issue.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

impl ValidationError {
    pub fn new(issues: Vec<ParamIssue>) -> Self {
        Self { issues }
    }

    pub fn overflow(expression: String) -> Self {
        Self::new(vec![ParamIssue {
            param: None,
            kind: IssueKind::Overflow,
            message: format!("result of {} does not fit in a 64-bit integer", expression),
        }])
    }

    pub fn malformed_query(detail: String) -> Self {
        Self::new(vec![ParamIssue {
            param: None,
            kind: IssueKind::MalformedQuery,
            message: detail,
        }])
    }

    pub fn status(&self) -> StatusCode {
        StatusCode::UNPROCESSABLE_ENTITY
    }
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'static str,
    detail: &'a [ParamIssue],
}

impl IntoResponse for ValidationError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: "validation_error",
            detail: &self.issues,
        };
        (self.status(), Json(body)).into_response()
    }
}
