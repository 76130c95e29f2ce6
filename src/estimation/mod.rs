pub mod compose;
pub mod config;
pub mod engine;
pub mod factors;
pub mod profile;
pub mod skills;
pub mod validation;

pub use compose::{
    compose, compose_low_value, Breakdown, Estimate, FactorContribution, OutputPolicy,
    ValuationTier,
};
pub use config::*;
pub use engine::{EstimateError, Estimator};
pub use factors::{resolve, Factor, FactorSet, FactorTables, RangeOp};
pub use profile::{parse_skills_text, Education, EmploymentType, Profile};
pub use skills::{MatchedSkill, ScoreResult, SkillTable};
pub use validation::{validate, validate_config, ValidationOutcome, Warning};
