pub use super::uplink_earning::Entity as UplinkEarning;
pub use super::uplink_package::Entity as UplinkPackage;
pub use super::uplink_package_request::Entity as UplinkPackageRequest;
pub use super::uplink_rank::Entity as UplinkRank;
pub use super::uplink_user::Entity as UplinkUser;
