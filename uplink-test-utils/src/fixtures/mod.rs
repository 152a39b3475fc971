//! Test fixture modules for inserting referral engine records.
//!
//! - `user` - Users, referrer edges and rank assignment
//! - `rank` - Rank ladder tiers
//! - `package` - Purchasable packages
//! - `package_request` - Purchase requests and the earnings recorded against them

pub mod package;
pub mod package_request;
pub mod rank;
pub mod user;
