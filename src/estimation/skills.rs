use serde::Serialize;

use super::config::SkillWeight;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchedSkill {
    pub name: String,
    pub weight: f64,
}

/// Outcome of scoring a skill list against the reference table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreResult {
    pub total_score: f64,
    /// Number of distinct reference skills matched
    pub premium_count: usize,
    /// In reference table order
    pub matched_skills: Vec<MatchedSkill>,
}

impl ScoreResult {
    pub fn has_matches(&self) -> bool {
        self.premium_count > 0
    }
}

#[derive(Debug, Clone)]
struct SkillEntry {
    name: String,
    key: String, // lowercased name
    weight: f64,
}

/// Immutable premium-skill reference table.
#[derive(Debug, Clone)]
pub struct SkillTable {
    entries: Vec<SkillEntry>,
}

impl SkillTable {
    pub fn new(skills: &[SkillWeight]) -> Self {
        Self {
            entries: skills
                .iter()
                .map(|s| SkillEntry {
                    name: s.name.clone(),
                    key: s.name.trim().to_lowercase(),
                    weight: s.weight,
                })
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// (name, weight) pairs in table order
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.entries.iter().map(|e| (e.name.as_str(), e.weight))
    }

    /// Score a skill list.
    ///
    /// The list is joined into one lowercase blob and every reference skill
    /// whose name occurs anywhere in it counts once with its full weight.
    /// Containment is substring-based, so "JavaScript" also earns "Java" and
    /// "React Native" also earns "React". Existing score distributions depend
    /// on this, so overlapping names are not deduplicated.
    pub fn score(&self, skills: &[String]) -> ScoreResult {
        let blob = skills.join(", ").to_lowercase();

        let matched_skills: Vec<MatchedSkill> = self
            .entries
            .iter()
            .filter(|e| !e.key.is_empty() && blob.contains(e.key.as_str()))
            .map(|e| MatchedSkill {
                name: e.name.clone(),
                weight: e.weight,
            })
            .collect();

        ScoreResult {
            total_score: matched_skills.iter().map(|m| m.weight).sum(),
            premium_count: matched_skills.len(),
            matched_skills,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::estimation::config::EstimationConfig;

    fn table() -> SkillTable {
        SkillTable::new(&EstimationConfig::default().skills)
    }

    fn skills(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_score_basic() {
        let result = table().score(&skills(&["Python", "Machine Learning"]));
        assert_eq!(result.premium_count, 2);
        assert!((result.total_score - 1.75).abs() < 1e-9);
        // table order, not input order
        assert_eq!(result.matched_skills[0].name, "Machine Learning");
        assert_eq!(result.matched_skills[1].name, "Python");
    }

    #[test]
    fn test_score_case_insensitive() {
        let result = table().score(&skills(&["kUbErNeTeS"]));
        assert_eq!(result.premium_count, 1);
        assert!((result.total_score - 0.85).abs() < 1e-9);
    }

    #[test]
    fn test_score_duplicates_count_once() {
        let result = table().score(&skills(&["Python", "python", "PYTHON"]));
        assert_eq!(result.premium_count, 1);
        assert!((result.total_score - 0.75).abs() < 1e-9);
    }

    #[test]
    fn test_score_substring_overlap_counts_both() {
        let result = table().score(&skills(&["JavaScript"]));
        let names: Vec<&str> = result.matched_skills.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["Java", "JavaScript"]);
        assert!((result.total_score - 1.35).abs() < 1e-9);

        let result = table().score(&skills(&["React Native"]));
        let names: Vec<&str> = result.matched_skills.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["React", "React Native"]);
    }

    #[test]
    fn test_score_no_matches() {
        let result = table().score(&skills(&["HTML", "CSS", "Bootstrap", "jQuery"]));
        assert!(!result.has_matches());
        assert_eq!(result.total_score, 0.0);
        assert!(result.matched_skills.is_empty());
    }

    #[test]
    fn test_score_many_premium_skills() {
        let result = table().score(&skills(&[
            "Python",
            "Machine Learning",
            "TensorFlow",
            "Deep Learning",
            "AWS",
            "Docker",
            "Kubernetes",
        ]));
        assert_eq!(result.premium_count, 7);
        assert!((result.total_score - 6.2).abs() < 1e-9);
    }

    #[test]
    fn test_custom_table() {
        let table = SkillTable::new(&[SkillWeight {
            name: "Elixir".to_string(),
            weight: 0.5,
        }]);
        assert_eq!(table.len(), 1);
        let result = table.score(&skills(&["elixir", "Python"]));
        assert_eq!(result.premium_count, 1);
        assert_eq!(result.total_score, 0.5);
    }
}
