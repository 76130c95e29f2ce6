use owo_colors::OwoColorize;
use std::io::IsTerminal;

use crate::estimation::{Estimate, SkillTable, ValuationTier, Warning};

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Group digits in thousands: 26800 -> "26,800"
pub fn format_thousands(value: u32) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// "26,800 MAD/month"
pub fn format_salary(value: u32) -> String {
    format!("{} MAD/month", format_thousands(value))
}

/// Format a multiplier compactly: 1.0 -> "x1", 0.60 -> "x0.6", 1.2625 -> "x1.2625"
pub fn format_multiplier(value: f64) -> String {
    let formatted = format!("{:.4}", value);
    let trimmed = formatted.trim_end_matches('0').trim_end_matches('.');
    format!("x{}", trimmed)
}

pub fn format_warning(warning: &Warning, use_colors: bool) -> String {
    if use_colors {
        format!("{} {}", "warning:".yellow().bold(), warning)
    } else {
        format!("warning: {}", warning)
    }
}

/// Multi-line human-readable estimate with breakdown and skill analysis
pub fn format_estimate(estimate: &Estimate, use_colors: bool) -> String {
    let mut lines = Vec::new();

    let salary = format_salary(estimate.salary);
    if use_colors {
        lines.push(format!("Estimated salary: {}", salary.green().bold()));
    } else {
        lines.push(format!("Estimated salary: {}", salary));
    }

    match estimate.tier {
        ValuationTier::LowValueSkills => {
            let range = match estimate.band {
                Some(band) => format!(
                    "{}-{} MAD/month",
                    format_thousands(band.min),
                    format_thousands(band.max)
                ),
                None => "a low band".to_string(),
            };
            let note = format!(
                "Low-value skill set: no high-value technical skills found. \
                 Expect {} for entry-level positions.",
                range
            );
            if use_colors {
                lines.push(note.yellow().to_string());
            } else {
                lines.push(note);
            }
        }
        ValuationTier::Full => {
            if let Some(ref breakdown) = estimate.breakdown {
                lines.push(String::new());
                lines.push("Breakdown:".to_string());
                let keyword = breakdown
                    .base
                    .keyword
                    .as_ref()
                    .map(|k| format!(", matched '{}'", k))
                    .unwrap_or_default();
                lines.push(format!(
                    "  {:<16} {:>8}  ({}{})",
                    "Base",
                    breakdown.base.amount.round() as u64,
                    breakdown.base.tier,
                    keyword
                ));
                for contribution in &breakdown.factors {
                    let value = format_multiplier(contribution.value);
                    let value = if use_colors {
                        value.cyan().to_string()
                    } else {
                        value
                    };
                    lines.push(format!(
                        "  {:<16} {:>8}  {}",
                        contribution.factor.label(),
                        value,
                        contribution.detail
                    ));
                }
                lines.push(format!("  {:<16} {:>8.0}", "Raw", breakdown.raw));
            }
        }
    }

    let analysis = &estimate.skill_analysis;
    lines.push(String::new());
    lines.push("Skill analysis:".to_string());
    lines.push(format!("  Score: {:.2}", analysis.total_score));
    lines.push(format!("  High-value skills: {}", analysis.premium_count));
    if !analysis.matched_skills.is_empty() {
        let matched = analysis
            .matched_skills
            .iter()
            .map(|m| format!("{}({})", m.name, m.weight))
            .collect::<Vec<_>>()
            .join(", ");
        lines.push(format!("  Matched: {}", matched));
    }

    lines.join("\n")
}

/// Pretty JSON rendering for callers that consume the estimate programmatically
pub fn format_json(estimate: &Estimate) -> serde_json::Result<String> {
    serde_json::to_string_pretty(estimate)
}

/// Tab-separated line for scripting
/// Columns: salary, tier, score, premium count, title (no headers, no colors)
pub fn format_tsv(estimate: &Estimate, title: &str) -> String {
    let tier = match estimate.tier {
        ValuationTier::Full => "full",
        ValuationTier::LowValueSkills => "low_value_skills",
    };
    format!(
        "{}\t{}\t{:.2}\t{}\t{}",
        estimate.salary,
        tier,
        estimate.skill_analysis.total_score,
        estimate.skill_analysis.premium_count,
        title
    )
}

/// List the reference skill table, one "name  weight" row per skill
pub fn format_skill_table(table: &SkillTable, use_colors: bool) -> String {
    if table.is_empty() {
        return "No premium skills configured.".to_string();
    }

    let width = table.iter().map(|(name, _)| name.chars().count()).max().unwrap_or(0);
    table
        .iter()
        .map(|(name, weight)| {
            let padded = format!("{:<width$}", name, width = width);
            if use_colors {
                format!("{}  {:.2}", padded.bold(), weight)
            } else {
                format!("{}  {:.2}", padded, weight)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}
