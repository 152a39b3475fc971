//! SeaORM entities for the uplink referral engine.

pub mod prelude;

pub mod sea_orm_active_enums;
pub mod uplink_earning;
pub mod uplink_package;
pub mod uplink_package_request;
pub mod uplink_rank;
pub mod uplink_user;
