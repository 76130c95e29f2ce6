use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::factors::RangeOp;

/// Reference tables and policy constants for the estimator.
///
/// Every field is optional in YAML and falls back to the built-in value, so a
/// config file only needs to mention the tables it overrides.
///
/// Example YAML:
/// ```yaml
/// estimation:
///   skill_coefficient: 0.15
///   skills:
///     - { name: "Rust", weight: 0.85 }
///   experience:
///     - { range: "0", multiplier: 0.6 }
///     - { range: ">0", multiplier: 1.0 }
///   locations:
///     Casablanca: 1.18
///   bounds: { min: 4000, max: 120000 }
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct EstimationConfig {
    /// Each point of skill score adds this fraction to the skill multiplier
    pub skill_coefficient: f64,

    /// Premium skill reference table, matched in order
    pub skills: Vec<SkillWeight>,

    /// Bonus multipliers keyed on premium skill count; first match wins
    pub premium_bonus: Vec<BucketMultiplier>,

    /// Role tiers matched against the job title; first match wins
    pub roles: Vec<RoleTier>,

    /// Base amount when no role tier matches
    pub default_base: f64,

    /// Seniority tiers matched against the job title; first match wins
    pub seniority: Vec<SeniorityTier>,

    /// Experience step function; first match wins
    pub experience: Vec<BucketMultiplier>,

    pub education: EducationMultipliers,

    /// City name to multiplier; unknown cities are neutral (1.0)
    pub locations: BTreeMap<String, f64>,

    pub employment: EmploymentMultipliers,

    /// Hard floor and ceiling on the monthly figure
    pub bounds: SalaryRange,

    /// Salaries are rounded half-up to a multiple of this
    pub rounding_step: u32,

    /// Fixed band reported when no premium skill matches
    pub low_value_band: SalaryRange,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct SkillWeight {
    pub name: String,
    /// In (0, 1]
    pub weight: f64,
}

/// Maps a numeric range expression ("0", "<=5", ">15", "4-5") to a multiplier.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct BucketMultiplier {
    pub range: RangeOp,
    pub multiplier: f64,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct RoleTier {
    pub tier: String,
    pub keywords: Vec<String>,
    pub base: f64,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct SeniorityTier {
    pub level: String,
    pub keywords: Vec<String>,
    pub multiplier: f64,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct EducationMultipliers {
    pub phd: f64,
    pub master: f64,
    pub bachelor: f64,
    pub other: f64,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct EmploymentMultipliers {
    pub full_time: f64,
    pub contract: f64,
    pub part_time: f64,
    pub internship: f64,
}

/// Closed interval of monthly amounts in MAD
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct SalaryRange {
    pub min: u32,
    pub max: u32,
}

fn skill(name: &str, weight: f64) -> SkillWeight {
    SkillWeight {
        name: name.to_string(),
        weight,
    }
}

fn bucket(range: RangeOp, multiplier: f64) -> BucketMultiplier {
    BucketMultiplier { range, multiplier }
}

fn role(tier: &str, keywords: &[&str], base: f64) -> RoleTier {
    RoleTier {
        tier: tier.to_string(),
        keywords: keywords.iter().map(|k| k.to_string()).collect(),
        base,
    }
}

fn seniority(level: &str, keywords: &[&str], multiplier: f64) -> SeniorityTier {
    SeniorityTier {
        level: level.to_string(),
        keywords: keywords.iter().map(|k| k.to_string()).collect(),
        multiplier,
    }
}

impl Default for EstimationConfig {
    fn default() -> Self {
        Self {
            skill_coefficient: 0.15,
            skills: vec![
                // AI / ML / data
                skill("Machine Learning", 1.0),
                skill("Deep Learning", 1.0),
                skill("AI", 1.0),
                skill("TensorFlow", 0.9),
                skill("PyTorch", 0.9),
                skill("NLP", 0.9),
                skill("Data Science", 0.85),
                skill("Big Data", 0.8),
                skill("Spark", 0.8),
                skill("Hadoop", 0.75),
                // Cloud / DevOps
                skill("AWS", 0.9),
                skill("Azure", 0.9),
                skill("GCP", 0.9),
                skill("Kubernetes", 0.85),
                skill("Docker", 0.8),
                skill("Terraform", 0.8),
                skill("CI/CD", 0.75),
                skill("Jenkins", 0.7),
                // Languages
                skill("Python", 0.75),
                skill("Java", 0.7),
                skill("JavaScript", 0.65),
                skill("TypeScript", 0.7),
                skill("Go", 0.8),
                skill("Rust", 0.85),
                skill("Scala", 0.8),
                skill("C++", 0.7),
                // Backend / databases
                skill("Node.js", 0.65),
                skill("PostgreSQL", 0.6),
                skill("MongoDB", 0.65),
                skill("Redis", 0.6),
                skill("Microservices", 0.7),
                skill("REST API", 0.5),
                skill("GraphQL", 0.65),
                // Frontend
                skill("React", 0.6),
                skill("Angular", 0.6),
                skill("Vue.js", 0.6),
                // Mobile
                skill("iOS", 0.65),
                skill("Android", 0.65),
                skill("Flutter", 0.7),
                skill("React Native", 0.7),
                skill("Swift", 0.65),
                skill("Kotlin", 0.65),
                // Other
                skill("Blockchain", 0.85),
                skill("Cybersecurity", 0.8),
                skill("Penetration Testing", 0.8),
            ],
            premium_bonus: vec![
                bucket(RangeOp::GreaterEqual(6), 1.3),
                bucket(RangeOp::GreaterEqual(4), 1.15),
            ],
            roles: vec![
                role("ai_ml", &["ai", "machine learning", "ml"], 25000.0),
                role("data_scientist", &["data scientist"], 23000.0),
                role("devops_cloud", &["devops", "cloud"], 22000.0),
                role("full_stack", &["full stack", "full-stack"], 18000.0),
                role("backend_software", &["backend", "software"], 17000.0),
                role("frontend_mobile", &["frontend", "mobile"], 15000.0),
                role("data_analyst", &["data", "analyst"], 14000.0),
                role("qa_test", &["qa", "test"], 12000.0),
                role("engineer", &["engineer"], 16000.0),
            ],
            default_base: 12000.0,
            seniority: vec![
                seniority("principal", &["principal", "lead"], 1.8),
                seniority("staff", &["staff"], 1.6),
                seniority("senior", &["senior", "sr"], 1.3),
                seniority("junior", &["junior", "jr"], 0.7),
            ],
            experience: vec![
                bucket(RangeOp::Equal(0), 0.6),
                bucket(RangeOp::LessEqual(1), 0.75),
                bucket(RangeOp::LessEqual(2), 0.9),
                bucket(RangeOp::LessEqual(3), 1.0),
                bucket(RangeOp::LessEqual(5), 1.2),
                bucket(RangeOp::LessEqual(7), 1.5),
                bucket(RangeOp::LessEqual(10), 1.8),
                bucket(RangeOp::LessEqual(15), 2.2),
                bucket(RangeOp::GreaterThan(15), 2.5),
            ],
            education: EducationMultipliers {
                phd: 1.35,
                master: 1.20,
                bachelor: 1.0,
                other: 0.85,
            },
            locations: BTreeMap::from([
                ("Casablanca".to_string(), 1.18),
                ("Rabat".to_string(), 1.15),
                ("Mohammedia".to_string(), 1.10),
                ("Tangier".to_string(), 1.08),
                ("Marrakech".to_string(), 1.08),
            ]),
            employment: EmploymentMultipliers {
                full_time: 1.0,
                contract: 1.15,
                part_time: 0.65,
                internship: 0.50,
            },
            bounds: SalaryRange {
                min: 4000,
                max: 120000,
            },
            rounding_step: 100,
            low_value_band: SalaryRange {
                min: 5000,
                max: 8000,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_estimation_config() {
        let config = EstimationConfig::default();

        assert_eq!(config.skills.len(), 45);
        assert_eq!(config.skills[0].name, "Machine Learning");
        assert_eq!(config.roles[0].tier, "ai_ml");
        assert_eq!(config.default_base, 12000.0);
        assert_eq!(config.experience.len(), 9);
        assert_eq!(config.bounds, SalaryRange { min: 4000, max: 120000 });
        assert_eq!(config.rounding_step, 100);
    }

    #[test]
    fn test_estimation_config_serde_roundtrip() {
        let config = EstimationConfig::default();
        let yaml = serde_saphyr::to_string(&config).unwrap();
        let parsed: EstimationConfig = serde_saphyr::from_str(&yaml).unwrap();
        assert_eq!(config, parsed);
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let yaml = r#"
skill_coefficient: 0.2
bounds: { min: 3000, max: 90000 }
"#;
        let config: EstimationConfig = serde_saphyr::from_str(yaml).unwrap();
        assert_eq!(config.skill_coefficient, 0.2);
        assert_eq!(config.bounds, SalaryRange { min: 3000, max: 90000 });
        assert_eq!(config.skills, EstimationConfig::default().skills);
        assert_eq!(config.experience, EstimationConfig::default().experience);
    }

    #[test]
    fn test_experience_buckets_parse() {
        let yaml = r#"
experience:
  - range: "0"
    multiplier: 0.5
  - range: "1-4"
    multiplier: 1.0
  - range: ">4"
    multiplier: 2.0
"#;
        let config: EstimationConfig = serde_saphyr::from_str(yaml).unwrap();
        assert_eq!(config.experience.len(), 3);
        assert_eq!(config.experience[1].range, RangeOp::Between(1, 4));
        assert_eq!(config.experience[2].range, RangeOp::GreaterThan(4));
    }

    #[test]
    fn test_invalid_range_fails_to_parse() {
        let yaml = r#"
experience:
  - range: "soon"
    multiplier: 0.5
"#;
        let result: Result<EstimationConfig, _> = serde_saphyr::from_str(yaml);
        assert!(result.is_err());
    }

    #[test]
    fn test_unknown_field_rejected() {
        let result: Result<EstimationConfig, _> = serde_saphyr::from_str("bonus: 3");
        assert!(result.is_err());
    }

    #[test]
    fn test_empty_config_is_default() {
        let config: EstimationConfig = serde_saphyr::from_str("{}").unwrap();
        assert_eq!(config, EstimationConfig::default());
    }
}
