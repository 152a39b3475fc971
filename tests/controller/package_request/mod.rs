mod reject_package_request;

use super::*;
