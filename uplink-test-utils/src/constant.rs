//! Standard rank ladder used across tests.
//!
//! Titles and thresholds only matter relative to each other; the engine never
//! inspects a rank by title.

/// Base tier, the minimum threshold of the ladder.
pub static CONSULTANT_RANK: (&str, i64) = ("Consultant", 0);

/// Middle tier.
pub static MANAGER_RANK: (&str, i64) = ("Manager", 100);

/// Top tier.
pub static DIRECTOR_RANK: (&str, i64) = ("Director", 500);
