#![allow(dead_code)]

pub use blocktask_test_utils::builders;
pub use blocktask_test_utils::harness;
pub use blocktask_test_utils::init_tracing;
