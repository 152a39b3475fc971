//! Data access layer repositories.
//!
//! Repositories are generic over `ConnectionTrait` so the same code runs against a pooled
//! connection or inside a caller's transaction. Counters and balances are only ever
//! changed with `column = column + value` updates evaluated by the database.

pub mod earning;
pub mod package;
pub mod package_request;
pub mod rank;
pub mod user;

use sea_orm::{
    sea_query::{Expr, ExprTrait, IntoColumnRef},
    Value,
};

/// `column + value` as an update expression.
pub(crate) fn increment(column: impl IntoColumnRef, value: impl Into<Value>) -> Expr {
    Expr::col(column).add(value.into())
}
