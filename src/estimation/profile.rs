use serde::{Deserialize, Serialize};
use tracing::debug;

/// A job profile to be valued.
///
/// Example YAML:
/// ```yaml
/// job_title: Senior AI Engineer
/// location: Casablanca
/// education: Master's Degree
/// experience_years: 10
/// employment_type: Full-time
/// skills: [Python, Machine Learning, Docker]
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Profile {
    pub job_title: String,

    #[serde(default)]
    pub location: String,

    /// Unrecognized labels become `Education::Other`
    #[serde(default)]
    pub education: Education,

    /// Signed so that negative input reaches the validator instead of failing to parse
    pub experience_years: i64,

    /// Unrecognized labels become `EmploymentType::FullTime`
    #[serde(default)]
    pub employment_type: EmploymentType,

    pub skills: Vec<String>,
}

#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(from = "String", into = "String")]
pub enum Education {
    PhD,
    Master,
    Bachelor,
    #[default]
    Other,
}

impl Education {
    /// Parse a free-form education label. Never fails: anything unknown is `Other`.
    pub fn parse(s: &str) -> Self {
        let normalized = s.trim().to_lowercase().replace('\u{2019}', "'");
        match normalized.as_str() {
            "phd" | "ph.d" | "ph.d." | "doctorate" => Education::PhD,
            "master" | "masters" | "master's" | "master's degree" | "masters degree" | "msc" => {
                Education::Master
            }
            "bachelor" | "bachelors" | "bachelor's" | "bachelor's degree" | "bachelors degree"
            | "bsc" | "licence" => Education::Bachelor,
            "" | "other" => Education::Other,
            _ => {
                debug!(label = s, "unrecognized education, using Other");
                Education::Other
            }
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Education::PhD => "PhD",
            Education::Master => "Master's Degree",
            Education::Bachelor => "Bachelor's Degree",
            Education::Other => "Other",
        }
    }
}

impl From<String> for Education {
    fn from(s: String) -> Self {
        Education::parse(&s)
    }
}

impl From<Education> for String {
    fn from(e: Education) -> Self {
        e.label().to_string()
    }
}

#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(from = "String", into = "String")]
pub enum EmploymentType {
    #[default]
    FullTime,
    Contract,
    PartTime,
    Internship,
}

impl EmploymentType {
    /// Parse a free-form employment label, ignoring case, spaces, `-` and `_`.
    /// Unknown labels are treated as full-time.
    pub fn parse(s: &str) -> Self {
        let normalized: String = s
            .chars()
            .filter(|c| !matches!(c, ' ' | '-' | '_'))
            .flat_map(char::to_lowercase)
            .collect();
        match normalized.as_str() {
            "contract" => EmploymentType::Contract,
            "parttime" => EmploymentType::PartTime,
            "internship" | "intern" => EmploymentType::Internship,
            "" | "fulltime" => EmploymentType::FullTime,
            _ => {
                debug!(label = s, "unrecognized employment type, using full-time");
                EmploymentType::FullTime
            }
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            EmploymentType::FullTime => "Full-time",
            EmploymentType::Contract => "Contract",
            EmploymentType::PartTime => "Part-time",
            EmploymentType::Internship => "Internship",
        }
    }
}

impl From<String> for EmploymentType {
    fn from(s: String) -> Self {
        EmploymentType::parse(&s)
    }
}

impl From<EmploymentType> for String {
    fn from(e: EmploymentType) -> Self {
        e.label().to_string()
    }
}

/// Split free-form skill text into a list.
///
/// Comma-separated when the text contains a comma, whitespace-separated
/// otherwise. Entries are trimmed and empty entries dropped.
pub fn parse_skills_text(text: &str) -> Vec<String> {
    let parts: Vec<&str> = if text.contains(',') {
        text.split(',').collect()
    } else {
        text.split_whitespace().collect()
    };

    parts
        .into_iter()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::sync::{Arc, Mutex};

    /// Collects formatted log output in memory.
    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl CapturedLogs {
        fn contents(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    fn capture_debug_logs(f: impl FnOnce()) -> String {
        let logs = CapturedLogs::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .finish();
        tracing::subscriber::with_default(subscriber, f);
        logs.contents()
    }

    #[test]
    fn test_parse_skills_comma_separated() {
        let skills = parse_skills_text("Python, Machine Learning ,, Docker");
        assert_eq!(skills, vec!["Python", "Machine Learning", "Docker"]);
    }

    #[test]
    fn test_parse_skills_whitespace_separated() {
        let skills = parse_skills_text("  Python   Rust\tGo ");
        assert_eq!(skills, vec!["Python", "Rust", "Go"]);
    }

    #[test]
    fn test_parse_skills_blank() {
        assert!(parse_skills_text("   ").is_empty());
        assert!(parse_skills_text(" , ,").is_empty());
    }

    #[test]
    fn test_education_labels() {
        assert_eq!(Education::parse("PhD"), Education::PhD);
        assert_eq!(Education::parse("Master's Degree"), Education::Master);
        assert_eq!(Education::parse("master\u{2019}s"), Education::Master);
        assert_eq!(Education::parse(" bachelor "), Education::Bachelor);
        assert_eq!(Education::parse("High School"), Education::Other);
        assert_eq!(Education::parse(""), Education::Other);
    }

    #[test]
    fn test_employment_labels() {
        assert_eq!(EmploymentType::parse("Full-time"), EmploymentType::FullTime);
        assert_eq!(EmploymentType::parse("part_time"), EmploymentType::PartTime);
        assert_eq!(EmploymentType::parse("CONTRACT"), EmploymentType::Contract);
        assert_eq!(EmploymentType::parse("Intern"), EmploymentType::Internship);
        assert_eq!(EmploymentType::parse("freelance"), EmploymentType::FullTime);
    }

    #[test]
    fn test_unknown_labels_log_fallback() {
        let logs = capture_debug_logs(|| {
            assert_eq!(Education::parse("High School"), Education::Other);
            assert_eq!(EmploymentType::parse("freelance"), EmploymentType::FullTime);
        });
        assert!(logs.contains("unrecognized education, using Other"));
        assert!(logs.contains("High School"));
        assert!(logs.contains("unrecognized employment type, using full-time"));
        assert!(logs.contains("freelance"));
    }

    #[test]
    fn test_known_labels_do_not_log() {
        let logs = capture_debug_logs(|| {
            Education::parse("Other");
            Education::parse("PhD");
            EmploymentType::parse("Full-time");
            EmploymentType::parse("Contract");
        });
        assert!(logs.is_empty(), "unexpected log output: {}", logs);
    }

    #[test]
    fn test_profile_yaml_parse() {
        let yaml = r#"
job_title: Senior AI Engineer
location: Casablanca
education: "Master's Degree"
experience_years: 10
employment_type: Contract
skills:
  - Python
  - Machine Learning
"#;
        let profile: Profile = serde_saphyr::from_str(yaml).unwrap();
        assert_eq!(profile.job_title, "Senior AI Engineer");
        assert_eq!(profile.education, Education::Master);
        assert_eq!(profile.employment_type, EmploymentType::Contract);
        assert_eq!(profile.experience_years, 10);
        assert_eq!(profile.skills.len(), 2);
    }

    #[test]
    fn test_profile_yaml_defaults() {
        let yaml = r#"
job_title: Engineer
experience_years: -1
skills: []
"#;
        let profile: Profile = serde_saphyr::from_str(yaml).unwrap();
        assert_eq!(profile.location, "");
        assert_eq!(profile.education, Education::Other);
        assert_eq!(profile.employment_type, EmploymentType::FullTime);
        assert_eq!(profile.experience_years, -1);
    }

    #[test]
    fn test_profile_rejects_unknown_fields() {
        let yaml = r#"
job_title: Engineer
experience_years: 1
skills: [Go]
salary: 1000
"#;
        let result: Result<Profile, _> = serde_saphyr::from_str(yaml);
        assert!(result.is_err());
    }
}
