use serde::Serialize;
use std::collections::{BTreeSet, HashSet};
use std::fmt;

use super::config::{BucketMultiplier, EstimationConfig};
use super::factors::{first_bucket_match, RangeOp};
use super::profile::Profile;

/// Experience above this many years is suspicious but still valued.
pub const MAX_SANE_EXPERIENCE_YEARS: i64 = 50;

/// Non-fatal advisory returned alongside a computed estimate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Warning {
    HighExperience { years: i64 },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::HighExperience { years } => write!(
                f,
                "experience of {} years seems too high (maximum considered is {})",
                years, MAX_SANE_EXPERIENCE_YEARS
            ),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationOutcome {
    Ok,
    RejectedEmptySkills,
    RejectedNegativeExperience,
    WarnHighExperience,
}

impl ValidationOutcome {
    pub fn is_rejected(&self) -> bool {
        matches!(
            self,
            ValidationOutcome::RejectedEmptySkills | ValidationOutcome::RejectedNegativeExperience
        )
    }
}

/// Check a profile before any scoring happens.
///
/// Only skills and experience are checked; unknown education, location and
/// employment values are resolved to defaults downstream.
pub fn validate(profile: &Profile) -> ValidationOutcome {
    if profile.skills.iter().all(|s| s.trim().is_empty()) {
        return ValidationOutcome::RejectedEmptySkills;
    }
    if profile.experience_years < 0 {
        return ValidationOutcome::RejectedNegativeExperience;
    }
    if profile.experience_years > MAX_SANE_EXPERIENCE_YEARS {
        return ValidationOutcome::WarnHighExperience;
    }
    ValidationOutcome::Ok
}

fn check_positive(errors: &mut Vec<String>, path: &str, value: f64) {
    if !value.is_finite() || value <= 0.0 {
        errors.push(format!("{}: must be a positive number, got {}", path, value));
    }
}

fn check_keywords(errors: &mut Vec<String>, path: &str, keywords: &[String]) {
    if !keywords.iter().any(|k| !k.trim().is_empty()) {
        errors.push(format!("{}: needs at least one non-empty keyword", path));
    }
}

fn check_buckets(errors: &mut Vec<String>, path: &str, buckets: &[BucketMultiplier]) {
    for (i, bucket) in buckets.iter().enumerate() {
        check_positive(errors, &format!("{}[{}].multiplier", path, i), bucket.multiplier);
    }
}

/// Years at which `range` starts or stops matching when scanning upward from 0.
fn range_edges(range: &RangeOp) -> [u64; 2] {
    match *range {
        RangeOp::LessThan(n) | RangeOp::GreaterEqual(n) => [n, n],
        RangeOp::LessEqual(n) | RangeOp::GreaterThan(n) => [n.saturating_add(1); 2],
        RangeOp::Equal(n) => [n, n.saturating_add(1)],
        RangeOp::Between(low, high) => [low, high.saturating_add(1)],
    }
}

/// Every year from 0 up must hit some bucket, and the multiplier that
/// lookup returns must never fall as years increase. The resolved
/// multiplier is constant between edges, so only the edges are visited.
fn check_experience_steps(errors: &mut Vec<String>, buckets: &[BucketMultiplier]) {
    let mut years: BTreeSet<u64> = buckets.iter().flat_map(|b| range_edges(&b.range)).collect();
    years.insert(0);

    let mut previous: Option<f64> = None;
    for year in years {
        match first_bucket_match(buckets, year) {
            None => errors.push(format!(
                "estimation.experience: no bucket matches {} years",
                year
            )),
            Some(bucket) => {
                if let Some(prev) = previous {
                    if bucket.multiplier < prev {
                        errors.push(format!(
                            "estimation.experience: multiplier drops from {} to {} \
                             at {} years ('{}')",
                            prev, bucket.multiplier, year, bucket.range
                        ));
                    }
                }
                previous = Some(bucket.multiplier);
            }
        }
    }
}

/// Validate reference tables at startup.
/// Returns all validation errors at once (not just the first).
pub fn validate_config(config: &EstimationConfig) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    check_positive(&mut errors, "estimation.skill_coefficient", config.skill_coefficient);

    // Skill table
    let mut seen = HashSet::new();
    for (i, skill) in config.skills.iter().enumerate() {
        let key = skill.name.trim().to_lowercase();
        if key.is_empty() {
            errors.push(format!("estimation.skills[{}].name: must not be empty", i));
        } else if !seen.insert(key) {
            errors.push(format!(
                "estimation.skills[{}].name: duplicate skill '{}'",
                i, skill.name
            ));
        }
        if !(skill.weight > 0.0 && skill.weight <= 1.0) {
            errors.push(format!(
                "estimation.skills[{}].weight: must be in (0, 1], got {}",
                i, skill.weight
            ));
        }
    }

    check_buckets(&mut errors, "estimation.premium_bonus", &config.premium_bonus);

    // Role and seniority tiers
    for (i, role) in config.roles.iter().enumerate() {
        check_keywords(&mut errors, &format!("estimation.roles[{}].keywords", i), &role.keywords);
        check_positive(&mut errors, &format!("estimation.roles[{}].base", i), role.base);
    }
    check_positive(&mut errors, "estimation.default_base", config.default_base);

    for (i, tier) in config.seniority.iter().enumerate() {
        check_keywords(
            &mut errors,
            &format!("estimation.seniority[{}].keywords", i),
            &tier.keywords,
        );
        check_positive(
            &mut errors,
            &format!("estimation.seniority[{}].multiplier", i),
            tier.multiplier,
        );
    }

    // Experience step function, checked as resolved (first bucket wins)
    check_buckets(&mut errors, "estimation.experience", &config.experience);
    check_experience_steps(&mut errors, &config.experience);

    // Lookups
    let edu = &config.education;
    check_positive(&mut errors, "estimation.education.phd", edu.phd);
    check_positive(&mut errors, "estimation.education.master", edu.master);
    check_positive(&mut errors, "estimation.education.bachelor", edu.bachelor);
    check_positive(&mut errors, "estimation.education.other", edu.other);

    for (city, mult) in &config.locations {
        check_positive(&mut errors, &format!("estimation.locations.{}", city), *mult);
    }

    let emp = &config.employment;
    check_positive(&mut errors, "estimation.employment.full_time", emp.full_time);
    check_positive(&mut errors, "estimation.employment.contract", emp.contract);
    check_positive(&mut errors, "estimation.employment.part_time", emp.part_time);
    check_positive(&mut errors, "estimation.employment.internship", emp.internship);

    // Output policy
    let bounds = config.bounds;
    if bounds.min > bounds.max {
        errors.push(format!(
            "estimation.bounds: min {} exceeds max {}",
            bounds.min, bounds.max
        ));
    }
    if config.rounding_step == 0 {
        errors.push("estimation.rounding_step: must be greater than zero".to_string());
    }
    let band = config.low_value_band;
    if band.min > band.max {
        errors.push(format!(
            "estimation.low_value_band: min {} exceeds max {}",
            band.min, band.max
        ));
    } else if band.min < bounds.min || band.max > bounds.max {
        errors.push(format!(
            "estimation.low_value_band: {}-{} lies outside bounds {}-{}",
            band.min, band.max, bounds.min, bounds.max
        ));
    }

    // Clamping happens after rounding, so the bounds and the band midpoint
    // must already sit on the step.
    let step = u64::from(config.rounding_step);
    if step > 0 {
        for (name, value) in [("min", bounds.min), ("max", bounds.max)] {
            if u64::from(value) % step != 0 {
                errors.push(format!(
                    "estimation.bounds.{}: {} is not a multiple of rounding_step {}",
                    name, value, step
                ));
            }
        }
        if (u64::from(band.min) + u64::from(band.max)) % (2 * step) != 0 {
            errors.push(format!(
                "estimation.low_value_band: midpoint of {}-{} is not a multiple \
                 of rounding_step {}",
                band.min, band.max, step
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
