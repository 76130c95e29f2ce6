use serde::Serialize;
use std::collections::BTreeMap;

use super::config::{EstimationConfig, SalaryRange};
use super::factors::{BaseAmount, Factor, FactorSet};
use super::skills::ScoreResult;
use super::validation::Warning;

/// Rounding and bounding applied to every figure.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OutputPolicy {
    pub bounds: SalaryRange,
    pub rounding_step: u32,
    pub low_value_band: SalaryRange,
}

impl OutputPolicy {
    pub fn from_config(config: &EstimationConfig) -> Self {
        Self {
            bounds: config.bounds,
            rounding_step: config.rounding_step,
            low_value_band: config.low_value_band,
        }
    }

    /// Round half-up to the step, then pull into bounds.
    pub fn finalize(&self, raw: f64) -> u32 {
        let step = self.rounding_step.max(1) as f64;
        let rounded = (raw / step + 0.5).floor() * step;
        rounded.clamp(self.bounds.min as f64, self.bounds.max as f64) as u32
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ValuationTier {
    /// Full multiplier chain applied
    Full,
    /// No premium skill matched; fixed low band reported
    LowValueSkills,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FactorContribution {
    pub factor: Factor,
    pub value: f64,
    pub detail: String,
    pub before: f64, // Running amount before this factor
    pub after: f64,  // Running amount after this factor
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Breakdown {
    pub base: BaseAmount,
    pub factors: Vec<FactorContribution>,
    /// Product of base and every factor, before rounding and clamping
    pub raw: f64,
}

impl Breakdown {
    pub fn value_of(&self, factor: Factor) -> Option<f64> {
        self.factors
            .iter()
            .find(|c| c.factor == factor)
            .map(|c| c.value)
    }

    /// Factor name to applied value
    pub fn values(&self) -> BTreeMap<Factor, f64> {
        self.factors.iter().map(|c| (c.factor, c.value)).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Estimate {
    /// MAD per month
    pub salary: u32,
    pub tier: ValuationTier,
    /// Only set on the low-value branch
    pub band: Option<SalaryRange>,
    /// Absent on the low-value branch, which skips the multiplier chain
    pub breakdown: Option<Breakdown>,
    pub skill_analysis: ScoreResult,
    pub warnings: Vec<Warning>,
}

/// Multiply the base through the chain, round, clamp.
pub fn compose(factors: &FactorSet, score: ScoreResult, policy: &OutputPolicy) -> Estimate {
    let mut amount = factors.base.amount;
    let mut contributions = Vec::with_capacity(Factor::CHAIN.len());

    for resolved in factors.chain() {
        let before = amount;
        amount *= resolved.value;
        contributions.push(FactorContribution {
            factor: resolved.factor,
            value: resolved.value,
            detail: resolved.detail.clone(),
            before,
            after: amount,
        });
    }

    Estimate {
        salary: policy.finalize(amount),
        tier: ValuationTier::Full,
        band: None,
        breakdown: Some(Breakdown {
            base: factors.base.clone(),
            factors: contributions,
            raw: amount,
        }),
        skill_analysis: score,
        warnings: Vec::new(),
    }
}

/// Result for a skill list with no premium skill: the fixed low band, its
/// midpoint as the salary, and no multiplier chain.
pub fn compose_low_value(score: ScoreResult, policy: &OutputPolicy) -> Estimate {
    let band = policy.low_value_band;
    let midpoint = (band.min as f64 + band.max as f64) / 2.0;

    Estimate {
        salary: policy.finalize(midpoint),
        tier: ValuationTier::LowValueSkills,
        band: Some(band),
        breakdown: None,
        skill_analysis: score,
        warnings: Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::estimation::factors::ResolvedFactor;

    fn policy() -> OutputPolicy {
        OutputPolicy::from_config(&EstimationConfig::default())
    }

    fn resolved(factor: Factor, value: f64) -> ResolvedFactor {
        ResolvedFactor {
            factor,
            value,
            detail: String::new(),
        }
    }

    fn factor_set(base: f64, values: [f64; 6]) -> FactorSet {
        FactorSet {
            base: BaseAmount {
                tier: "test".to_string(),
                keyword: None,
                amount: base,
            },
            seniority: resolved(Factor::Seniority, values[0]),
            experience: resolved(Factor::Experience, values[1]),
            skill_quality: resolved(Factor::SkillQuality, values[2]),
            education: resolved(Factor::Education, values[3]),
            location: resolved(Factor::Location, values[4]),
            employment_type: resolved(Factor::EmploymentType, values[5]),
        }
    }

    fn empty_score() -> ScoreResult {
        ScoreResult {
            total_score: 0.0,
            premium_count: 0,
            matched_skills: vec![],
        }
    }

    #[test]
    fn test_finalize_rounds_half_up() {
        let p = policy();
        assert_eq!(p.finalize(12_349.0), 12_300);
        assert_eq!(p.finalize(12_350.0), 12_400);
        assert_eq!(p.finalize(12_351.0), 12_400);
    }

    #[test]
    fn test_finalize_clamps() {
        let p = policy();
        assert_eq!(p.finalize(1_000.0), 4_000);
        assert_eq!(p.finalize(3_949.0), 4_000);
        assert_eq!(p.finalize(500_000.0), 120_000);
    }

    #[test]
    fn test_compose_multiplies_chain() {
        let f = factor_set(10_000.0, [1.3, 1.2, 1.5, 1.0, 1.0, 1.0]);
        let estimate = compose(&f, empty_score(), &policy());
        // 10000 * 1.3 * 1.2 * 1.5 = 23400
        assert_eq!(estimate.salary, 23_400);
        assert_eq!(estimate.tier, ValuationTier::Full);
        assert!(estimate.band.is_none());

        let breakdown = estimate.breakdown.unwrap();
        assert_eq!(breakdown.factors.len(), 6);
        assert!((breakdown.raw - 23_400.0).abs() < 1e-6);
        assert_eq!(breakdown.value_of(Factor::Experience), Some(1.2));
        assert_eq!(breakdown.values().len(), 6);
    }

    #[test]
    fn test_compose_running_totals() {
        let f = factor_set(10_000.0, [2.0, 0.5, 1.0, 1.0, 1.0, 3.0]);
        let breakdown = compose(&f, empty_score(), &policy()).breakdown.unwrap();
        let first = &breakdown.factors[0];
        assert_eq!((first.before, first.after), (10_000.0, 20_000.0));
        let second = &breakdown.factors[1];
        assert_eq!((second.before, second.after), (20_000.0, 10_000.0));
        let last = &breakdown.factors[5];
        assert_eq!(last.factor, Factor::EmploymentType);
        assert_eq!(last.after, 30_000.0);
    }

    #[test]
    fn test_compose_clamps_to_bounds() {
        let low = compose(&factor_set(1_000.0, [1.0; 6]), empty_score(), &policy());
        assert_eq!(low.salary, 4_000);

        let high = compose(&factor_set(100_000.0, [2.0; 6]), empty_score(), &policy());
        assert_eq!(high.salary, 120_000);
    }

    #[test]
    fn test_low_value_band() {
        let estimate = compose_low_value(empty_score(), &policy());
        assert_eq!(estimate.tier, ValuationTier::LowValueSkills);
        assert_eq!(estimate.band, Some(SalaryRange { min: 5000, max: 8000 }));
        assert_eq!(estimate.salary, 6_500);
        assert!(estimate.breakdown.is_none());
    }
}
