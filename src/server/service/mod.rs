//! Service layer for business logic and orchestration.
//!
//! Services own transaction boundaries, load records through the repositories, run the
//! pure referral logic over them and persist the outcome.

pub mod approval;
pub mod audit;
pub mod downline;
pub mod retry;
