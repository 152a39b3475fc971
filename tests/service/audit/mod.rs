mod run;

use super::*;
