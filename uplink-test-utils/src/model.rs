//! Database model type aliases for test utilities.
//!
//! These aliases match those in the main uplink crate to keep fixture
//! signatures consistent across tests.

/// Type alias for the referral user database model.
pub type UserModel = entity::uplink_user::Model;

/// Type alias for the rank database model.
pub type RankModel = entity::uplink_rank::Model;

/// Type alias for the purchasable package database model.
pub type PackageModel = entity::uplink_package::Model;

/// Type alias for the package purchase request database model.
pub type PackageRequestModel = entity::uplink_package_request::Model;

/// Type alias for the earning ledger database model.
pub type EarningModel = entity::uplink_earning::Model;
