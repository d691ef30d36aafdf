use axum::{
    extract::{rejection::QueryRejection, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::IntErrorKind;
use tower_http::trace::TraceLayer;
use tracing::debug;

use crate::error::{ParamIssue, ValidationError};

/// The arithmetic operations the service exposes, one per endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Add,
    Subtract,
    Multiply,
}

impl Operation {
    pub const ALL: [Operation; 3] = [Operation::Add, Operation::Subtract, Operation::Multiply];

    pub fn name(self) -> &'static str {
        match self {
            Operation::Add => "add",
            Operation::Subtract => "subtract",
            Operation::Multiply => "multiply",
        }
    }

    pub fn path(self) -> &'static str {
        match self {
            Operation::Add => "/add",
            Operation::Subtract => "/subtract",
            Operation::Multiply => "/multiply",
        }
    }

    pub fn symbol(self) -> char {
        match self {
            Operation::Add => '+',
            Operation::Subtract => '-',
            Operation::Multiply => '*',
        }
    }

    /// Returns `None` when the result does not fit in an `i64`.
    pub fn apply(self, a: i64, b: i64) -> Option<i64> {
        match self {
            Operation::Add => a.checked_add(b),
            Operation::Subtract => a.checked_sub(b),
            Operation::Multiply => a.checked_mul(b),
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Raw query string operands, before integer validation.
///
/// Values arrive form-urlencoded, so a literal `+` decodes to a space and is
/// rejected; a positive sign must be sent as `%2B`.
#[derive(Debug, Default, Deserialize)]
pub struct OperandParams {
    pub a: Option<String>,
    pub b: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArithmeticRequest {
    pub a: i64,
    pub b: i64,
}

impl ArithmeticRequest {
    pub fn new(a: i64, b: i64) -> Self {
        Self { a, b }
    }
}

impl TryFrom<OperandParams> for ArithmeticRequest {
    type Error = ValidationError;

    fn try_from(params: OperandParams) -> Result<Self, Self::Error> {
        let mut issues = Vec::new();
        let a = parse_operand("a", params.a.as_deref(), &mut issues);
        let b = parse_operand("b", params.b.as_deref(), &mut issues);

        match (a, b) {
            (Some(a), Some(b)) => Ok(Self { a, b }),
            _ => Err(ValidationError::new(issues)),
        }
    }
}

fn parse_operand(name: &str, raw: Option<&str>, issues: &mut Vec<ParamIssue>) -> Option<i64> {
    let Some(raw) = raw else {
        issues.push(ParamIssue::missing(name));
        return None;
    };

    match raw.parse::<i64>() {
        Ok(value) => Some(value),
        Err(e) => {
            let issue = match e.kind() {
                IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => {
                    ParamIssue::out_of_range(name, raw)
                }
                _ => ParamIssue::not_an_integer(name, raw),
            };
            issues.push(issue);
            None
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArithmeticResult {
    pub result: i64,
}

/// Stateless evaluator behind every arithmetic endpoint.
#[derive(Debug, Clone, Copy, Default)]
pub struct Calculator;

impl Calculator {
    pub fn new() -> Self {
        Self
    }

    pub fn evaluate(
        &self,
        operation: Operation,
        request: ArithmeticRequest,
    ) -> Result<ArithmeticResult, ValidationError> {
        let ArithmeticRequest { a, b } = request;
        match operation.apply(a, b) {
            Some(result) => {
                debug!(%operation, a, b, result, "evaluated");
                Ok(ArithmeticResult { result })
            }
            None => Err(ValidationError::overflow(format!(
                "{} {} {}",
                a,
                operation.symbol(),
                b
            ))),
        }
    }

    pub fn add(&self, a: i64, b: i64) -> Result<ArithmeticResult, ValidationError> {
        self.evaluate(Operation::Add, ArithmeticRequest::new(a, b))
    }

    pub fn subtract(&self, a: i64, b: i64) -> Result<ArithmeticResult, ValidationError> {
        self.evaluate(Operation::Subtract, ArithmeticRequest::new(a, b))
    }

    pub fn multiply(&self, a: i64, b: i64) -> Result<ArithmeticResult, ValidationError> {
        self.evaluate(Operation::Multiply, ArithmeticRequest::new(a, b))
    }
}

type OperandQuery = Result<Query<OperandParams>, QueryRejection>;

fn handle(
    operation: Operation,
    query: OperandQuery,
) -> Result<Json<ArithmeticResult>, ValidationError> {
    let outcome = query
        .map_err(|rejection| ValidationError::malformed_query(rejection.body_text()))
        .and_then(|Query(params)| ArithmeticRequest::try_from(params))
        .and_then(|request| Calculator::new().evaluate(operation, request));

    match outcome {
        Ok(result) => Ok(Json(result)),
        Err(e) => {
            debug!(%operation, error = %e, "rejected request");
            Err(e)
        }
    }
}

/// `GET /add?a=..&b=..`
pub async fn add(query: OperandQuery) -> Result<Json<ArithmeticResult>, ValidationError> {
    handle(Operation::Add, query)
}

/// `GET /subtract?a=..&b=..`
pub async fn subtract(query: OperandQuery) -> Result<Json<ArithmeticResult>, ValidationError> {
    handle(Operation::Subtract, query)
}

/// `GET /multiply?a=..&b=..`
pub async fn multiply(query: OperandQuery) -> Result<Json<ArithmeticResult>, ValidationError> {
    handle(Operation::Multiply, query)
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub version: String,
}

pub async fn health() -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

async fn not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(serde_json::json!({ "detail": "Not Found" })),
    )
}

/// Builds the HTTP application with every endpoint and request tracing.
pub fn router() -> Router {
    Router::new()
        .route(Operation::Add.path(), get(add))
        .route(Operation::Subtract.path(), get(subtract))
        .route(Operation::Multiply.path(), get(multiply))
        .route("/health", get(health))
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
}
