pub mod rubric;
pub mod team;

pub use rubric::Criterion;
pub use team::{EvaluationState, Team};
