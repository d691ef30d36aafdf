//! Integer arithmetic over HTTP: `/add`, `/subtract` and `/multiply`.

pub mod calculator;
pub mod config;
pub mod error;
pub mod logging;
pub mod server;


pub use calculator::{router, ArithmeticRequest, ArithmeticResult, Calculator, Operation};
pub use config::Config;
pub use error::{IssueKind, ParamIssue, ValidationError};
