use thiserror::Error;
use tracing::{debug, warn};

use super::compose::{compose, compose_low_value, Estimate, OutputPolicy};
use super::config::EstimationConfig;
use super::factors::{resolve, FactorTables};
use super::profile::Profile;
use super::skills::SkillTable;
use super::validation::{validate, validate_config, ValidationOutcome, Warning};

/// Caller-correctable input errors. No partial result accompanies them.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EstimateError {
    #[error("skills are required: cannot estimate a salary without at least one skill")]
    EmptySkills,
    #[error("experience cannot be negative (got {0} years)")]
    NegativeExperience(i64),
}

/// Salary estimator over immutable reference tables.
///
/// Built once at startup; `estimate` only reads the tables, so one instance
/// can be shared across threads (e.g. behind an `Arc`).
#[derive(Debug, Clone)]
pub struct Estimator {
    skills: SkillTable,
    factors: FactorTables,
    policy: OutputPolicy,
}

impl Estimator {
    /// Validate and compile the tables. Returns every table error at once.
    pub fn new(config: EstimationConfig) -> Result<Self, Vec<String>> {
        validate_config(&config)?;
        Ok(Self {
            skills: SkillTable::new(&config.skills),
            factors: FactorTables::from_config(&config),
            policy: OutputPolicy::from_config(&config),
        })
    }

    pub fn skills(&self) -> &SkillTable {
        &self.skills
    }

    /// Value a profile: validate, score skills, resolve factors, compose.
    pub fn estimate(&self, profile: &Profile) -> Result<Estimate, EstimateError> {
        let mut warnings = Vec::new();
        match validate(profile) {
            ValidationOutcome::Ok => {}
            ValidationOutcome::RejectedEmptySkills => return Err(EstimateError::EmptySkills),
            ValidationOutcome::RejectedNegativeExperience => {
                return Err(EstimateError::NegativeExperience(profile.experience_years))
            }
            ValidationOutcome::WarnHighExperience => {
                let warning = Warning::HighExperience {
                    years: profile.experience_years,
                };
                warn!("{}", warning);
                warnings.push(warning);
            }
        }

        let score = self.skills.score(&profile.skills);
        debug!(
            total_score = score.total_score,
            premium_count = score.premium_count,
            "scored skills"
        );

        let mut estimate = if score.has_matches() {
            let factors = resolve(profile, &score, &self.factors);
            compose(&factors, score, &self.policy)
        } else {
            debug!("no premium skills matched, using low-value band");
            compose_low_value(score, &self.policy)
        };

        estimate.warnings = warnings;
        Ok(estimate)
    }
}
