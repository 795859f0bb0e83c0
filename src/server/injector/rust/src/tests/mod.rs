/* src/server/injector/rust/src/tests/mod.rs */

use super::*;
