pub mod condition;
pub mod cooldown;
pub mod crossing;
pub mod evaluator;

pub use cooldown::CooldownGuard;
pub use evaluator::AlertEvaluator;
