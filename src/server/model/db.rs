//! Database model type aliases.
//!
//! Short names for the SeaORM entity models so services and repositories don't import
//! from the generated `entity` crate directly.

/// A platform user and a node of the referral graph.
///
/// # Fields (from `entity::uplink_user::Model`)
/// - `id` - Primary key
/// - `username` - Unique username, the key `referred_by` points at
/// - `referred_by` - Referrer username, not a foreign key
/// - `points` - Accumulated package points
/// - `balance` - Withdrawable commission balance
/// - `total_earnings` - Lifetime commission total
/// - `rank_id` - Current rank (nullable)
/// - `current_package_id` - Most recently approved package (nullable)
/// - `package_expiry_date` - When the current package lapses (nullable)
/// - `referral_count` - Denormalized count of direct referrals
/// - `created_at` / `updated_at` - Record timestamps
pub type UserModel = entity::uplink_user::Model;

/// A rung of the rank ladder, unlocked at `required_points`.
pub type RankModel = entity::uplink_rank::Model;

/// A purchasable package and the commissions it pays.
pub type PackageModel = entity::uplink_package::Model;

/// A purchase awaiting or past admin review.
///
/// `status` leaves `pending` exactly once; `processed_at` records when.
pub type PackageRequestModel = entity::uplink_package_request::Model;

/// Append-only ledger row for commissions and points.
pub type EarningModel = entity::uplink_earning::Model;
