#![allow(dead_code, unused_imports)]

pub use cait_test_utils::builders;
pub use cait_test_utils::sinks::RecordingSink;
pub use cait_test_utils::{init_tracing, wait_until, with_timeout, ReloadCounter};
