use sea_orm::entity::prelude::*;

/// Lifecycle of a package purchase request, terminal once it leaves `Pending`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum PackageRequestStatus {
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "approved")]
    Approved,
    #[sea_orm(string_value = "rejected")]
    Rejected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
pub enum EarningType {
    #[sea_orm(string_value = "direct_commission")]
    DirectCommission,
    #[sea_orm(string_value = "indirect_commission")]
    IndirectCommission,
    #[sea_orm(string_value = "points")]
    Points,
}

impl EarningType {
    /// Whether rows of this type move money into `balance` / `total_earnings`.
    pub fn is_monetary(&self) -> bool {
        matches!(self, Self::DirectCommission | Self::IndirectCommission)
    }
}
