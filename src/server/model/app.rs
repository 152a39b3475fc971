use sea_orm::DatabaseConnection;

use crate::server::referral::ReferralSettings;

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub referral: ReferralSettings,
}
