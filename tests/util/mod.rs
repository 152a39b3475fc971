//! Test utilities for building application state from a test context.

use uplink::server::{model::app::AppState, referral::ReferralSettings};
use uplink_test_utils::TestContext;

/// Extension trait for TestContext to create AppState with default referral settings
pub trait TestContextExt {
    fn into_app_state(&self) -> AppState;
}

impl TestContextExt for TestContext {
    fn into_app_state(&self) -> AppState {
        AppState {
            db: self.db.clone(),
            referral: ReferralSettings::default(),
        }
    }
}
