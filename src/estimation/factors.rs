use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use tracing::debug;

use super::config::{
    BucketMultiplier, EducationMultipliers, EmploymentMultipliers, EstimationConfig,
};
use super::profile::{Education, EmploymentType, Profile};
use super::skills::ScoreResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(try_from = "String", into = "String")]
pub enum RangeOp {
    LessThan(u64),
    LessEqual(u64),
    GreaterThan(u64),
    GreaterEqual(u64),
    Equal(u64),
    Between(u64, u64), // Inclusive range: N-M
}

impl RangeOp {
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();
        if let Some(val) = s.strip_prefix(">=") {
            Ok(RangeOp::GreaterEqual(val.trim().parse()?))
        } else if let Some(val) = s.strip_prefix("<=") {
            Ok(RangeOp::LessEqual(val.trim().parse()?))
        } else if let Some(val) = s.strip_prefix(">") {
            Ok(RangeOp::GreaterThan(val.trim().parse()?))
        } else if let Some(val) = s.strip_prefix("<") {
            Ok(RangeOp::LessThan(val.trim().parse()?))
        } else if s.contains('-') && !s.starts_with('-') {
            // Range format: "4-5"
            let parts: Vec<&str> = s.split('-').collect();
            if parts.len() == 2 {
                let low: u64 = parts[0].trim().parse()?;
                let high: u64 = parts[1].trim().parse()?;
                if low > high {
                    bail!("Invalid range {}: lower end exceeds upper end", s)
                }
                Ok(RangeOp::Between(low, high))
            } else {
                bail!("Invalid range format: {}", s)
            }
        } else {
            Ok(RangeOp::Equal(s.parse()?))
        }
    }

    pub fn matches(&self, value: u64) -> bool {
        match self {
            RangeOp::LessThan(n) => value < *n,
            RangeOp::LessEqual(n) => value <= *n,
            RangeOp::GreaterThan(n) => value > *n,
            RangeOp::GreaterEqual(n) => value >= *n,
            RangeOp::Equal(n) => value == *n,
            RangeOp::Between(low, high) => value >= *low && value <= *high,
        }
    }
}

impl fmt::Display for RangeOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RangeOp::LessThan(n) => write!(f, "<{}", n),
            RangeOp::LessEqual(n) => write!(f, "<={}", n),
            RangeOp::GreaterThan(n) => write!(f, ">{}", n),
            RangeOp::GreaterEqual(n) => write!(f, ">={}", n),
            RangeOp::Equal(n) => write!(f, "{}", n),
            RangeOp::Between(low, high) => write!(f, "{}-{}", low, high),
        }
    }
}

impl TryFrom<String> for RangeOp {
    type Error = anyhow::Error;

    fn try_from(s: String) -> Result<Self> {
        RangeOp::parse(&s)
    }
}

impl From<RangeOp> for String {
    fn from(range: RangeOp) -> Self {
        range.to_string()
    }
}

/// The six multipliers of the chain, in application order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Factor {
    Seniority,
    Experience,
    SkillQuality,
    Education,
    Location,
    EmploymentType,
}

impl Factor {
    pub const CHAIN: [Factor; 6] = [
        Factor::Seniority,
        Factor::Experience,
        Factor::SkillQuality,
        Factor::Education,
        Factor::Location,
        Factor::EmploymentType,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Factor::Seniority => "Seniority",
            Factor::Experience => "Experience",
            Factor::SkillQuality => "Skill quality",
            Factor::Education => "Education",
            Factor::Location => "Location",
            Factor::EmploymentType => "Employment type",
        }
    }
}

/// One resolved multiplier with a human-readable reason.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedFactor {
    pub factor: Factor,
    pub value: f64,
    pub detail: String, // e.g. "matched 'senior'", "8 years in '<=10'"
}

/// Base amount selected from the role taxonomy.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BaseAmount {
    pub tier: String,
    pub keyword: Option<String>, // None when the default floor applies
    pub amount: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FactorSet {
    pub base: BaseAmount,
    pub seniority: ResolvedFactor,
    pub experience: ResolvedFactor,
    pub skill_quality: ResolvedFactor,
    pub education: ResolvedFactor,
    pub location: ResolvedFactor,
    pub employment_type: ResolvedFactor,
}

impl FactorSet {
    /// Multipliers in chain order
    pub fn chain(&self) -> [&ResolvedFactor; 6] {
        [
            &self.seniority,
            &self.experience,
            &self.skill_quality,
            &self.education,
            &self.location,
            &self.employment_type,
        ]
    }
}

/// Ordered keyword rule. Keywords are stored lowercased.
#[derive(Debug, Clone)]
pub struct KeywordRule {
    pub name: String,
    pub keywords: Vec<String>,
    pub value: f64,
}

impl KeywordRule {
    fn new(name: &str, keywords: &[String], value: f64) -> Self {
        Self {
            name: name.to_string(),
            keywords: keywords.iter().map(|k| k.trim().to_lowercase()).collect(),
            value,
        }
    }
}

/// First rule owning a keyword that occurs as a substring of `text` wins.
/// `text` must already be lowercased.
fn first_keyword_match<'a>(
    rules: &'a [KeywordRule],
    text: &str,
) -> Option<(&'a KeywordRule, &'a str)> {
    rules.iter().find_map(|rule| {
        rule.keywords
            .iter()
            .find(|k| !k.is_empty() && text.contains(k.as_str()))
            .map(|k| (rule, k.as_str()))
    })
}

/// First bucket whose range contains `value` wins.
pub(crate) fn first_bucket_match(
    buckets: &[BucketMultiplier],
    value: u64,
) -> Option<&BucketMultiplier> {
    buckets.iter().find(|b| b.range.matches(value))
}

/// Lookup tables for the Factor Resolver, compiled once from configuration.
#[derive(Debug, Clone)]
pub struct FactorTables {
    roles: Vec<KeywordRule>,
    default_base: f64,
    seniority: Vec<KeywordRule>,
    experience: Vec<BucketMultiplier>,
    skill_coefficient: f64,
    premium_bonus: Vec<BucketMultiplier>,
    education: EducationMultipliers,
    // lowercased city -> (display name, multiplier)
    locations: BTreeMap<String, (String, f64)>,
    employment: EmploymentMultipliers,
}

impl FactorTables {
    pub fn from_config(config: &EstimationConfig) -> Self {
        Self {
            roles: config
                .roles
                .iter()
                .map(|r| KeywordRule::new(&r.tier, &r.keywords, r.base))
                .collect(),
            default_base: config.default_base,
            seniority: config
                .seniority
                .iter()
                .map(|s| KeywordRule::new(&s.level, &s.keywords, s.multiplier))
                .collect(),
            experience: config.experience.clone(),
            skill_coefficient: config.skill_coefficient,
            premium_bonus: config.premium_bonus.clone(),
            education: config.education.clone(),
            locations: config
                .locations
                .iter()
                .map(|(city, mult)| (city.trim().to_lowercase(), (city.clone(), *mult)))
                .collect(),
            employment: config.employment.clone(),
        }
    }

    fn base_amount(&self, title: &str) -> BaseAmount {
        match first_keyword_match(&self.roles, title) {
            Some((rule, keyword)) => BaseAmount {
                tier: rule.name.clone(),
                keyword: Some(keyword.to_string()),
                amount: rule.value,
            },
            None => BaseAmount {
                tier: "default".to_string(),
                keyword: None,
                amount: self.default_base,
            },
        }
    }

    fn seniority(&self, title: &str) -> ResolvedFactor {
        let (value, detail) = match first_keyword_match(&self.seniority, title) {
            Some((rule, keyword)) => (rule.value, format!("{} (matched '{}')", rule.name, keyword)),
            None => (1.0, "mid-level (no seniority keyword)".to_string()),
        };
        ResolvedFactor {
            factor: Factor::Seniority,
            value,
            detail,
        }
    }

    fn experience(&self, years: i64) -> ResolvedFactor {
        let years = years.max(0) as u64;
        let (value, detail) = match first_bucket_match(&self.experience, years) {
            Some(bucket) => (
                bucket.multiplier,
                format!("{} years in '{}'", years, bucket.range),
            ),
            None => (1.0, format!("{} years, no bucket matched", years)),
        };
        ResolvedFactor {
            factor: Factor::Experience,
            value,
            detail,
        }
    }

    fn skill_quality(&self, score: &ScoreResult) -> ResolvedFactor {
        let linear = 1.0 + score.total_score * self.skill_coefficient;
        let premium = score.premium_count as u64;
        let (value, detail) = match first_bucket_match(&self.premium_bonus, premium) {
            Some(bonus) => (
                linear * bonus.multiplier,
                format!(
                    "score {:.2} x {} with bonus x{} for {} premium skills ('{}')",
                    score.total_score,
                    self.skill_coefficient,
                    bonus.multiplier,
                    premium,
                    bonus.range
                ),
            ),
            None => (
                linear,
                format!("score {:.2} x {}", score.total_score, self.skill_coefficient),
            ),
        };
        ResolvedFactor {
            factor: Factor::SkillQuality,
            value,
            detail,
        }
    }

    fn education(&self, education: Education) -> ResolvedFactor {
        let value = match education {
            Education::PhD => self.education.phd,
            Education::Master => self.education.master,
            Education::Bachelor => self.education.bachelor,
            Education::Other => self.education.other,
        };
        ResolvedFactor {
            factor: Factor::Education,
            value,
            detail: education.label().to_string(),
        }
    }

    fn location(&self, location: &str) -> ResolvedFactor {
        let key = location.trim().to_lowercase();
        let (value, detail) = match self.locations.get(&key) {
            Some((city, mult)) => (*mult, city.clone()),
            None => {
                debug!(location, "unknown location, using neutral multiplier");
                (1.0, format!("'{}' not in table (neutral)", location.trim()))
            }
        };
        ResolvedFactor {
            factor: Factor::Location,
            value,
            detail,
        }
    }

    fn employment(&self, employment: EmploymentType) -> ResolvedFactor {
        let value = match employment {
            EmploymentType::FullTime => self.employment.full_time,
            EmploymentType::Contract => self.employment.contract,
            EmploymentType::PartTime => self.employment.part_time,
            EmploymentType::Internship => self.employment.internship,
        };
        ResolvedFactor {
            factor: Factor::EmploymentType,
            value,
            detail: employment.label().to_string(),
        }
    }
}

/// Derive the base amount and every multiplier for a profile.
///
/// Each quantity reads a disjoint slice of the profile; only the skill-quality
/// multiplier depends on the score.
pub fn resolve(profile: &Profile, score: &ScoreResult, tables: &FactorTables) -> FactorSet {
    let title = profile.job_title.to_lowercase();

    let factors = FactorSet {
        base: tables.base_amount(&title),
        seniority: tables.seniority(&title),
        experience: tables.experience(profile.experience_years),
        skill_quality: tables.skill_quality(score),
        education: tables.education(profile.education),
        location: tables.location(&profile.location),
        employment_type: tables.employment(profile.employment_type),
    };

    debug!(
        tier = %factors.base.tier,
        base = factors.base.amount,
        seniority = factors.seniority.value,
        experience = factors.experience.value,
        skill_quality = factors.skill_quality.value,
        "resolved factors"
    );

    factors
}
