//! Tests for the referral engine services.
//!
//! These run each service against an in-memory database and check the persisted
//! ledger, balances and referral pointers afterwards.

mod audit;
mod downline;

use uplink_test_utils::prelude::*;
