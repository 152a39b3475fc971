mod get_user_downline;

use super::*;
