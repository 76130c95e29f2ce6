use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use crate::config::{get_config_path, Config};
use crate::estimation::{validate_config, EstimationConfig, SalaryRange, SkillWeight};

/// Prompt user with a message and return their trimmed input.
fn prompt(message: &str) -> Result<String> {
    print!("{}", message);
    std::io::stdout()
        .flush()
        .context("Failed to flush stdout")?;
    let mut input = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut input)
        .context("Failed to read input")?;
    Ok(input.trim().to_string())
}

/// Prompt user with a message and a default value. Returns default if input is empty.
fn prompt_with_default(message: &str, default: &str) -> Result<String> {
    let input = prompt(&format!("{} [{}]: ", message, default))?;
    if input.is_empty() {
        Ok(default.to_string())
    } else {
        Ok(input)
    }
}

/// Prompt user with a yes/no question. Returns bool based on input and default.
fn prompt_yes_no(message: &str, default_yes: bool) -> Result<bool> {
    let hint = if default_yes { "Y/n" } else { "y/N" };
    let input = prompt(&format!("{} [{}]: ", message, hint))?;
    let input = input.to_lowercase();
    if input.is_empty() {
        Ok(default_yes)
    } else {
        Ok(input == "y" || input == "yes")
    }
}

/// Prompt until the input parses as a number accepted by `accept`.
fn prompt_number<T, F>(message: &str, default: T, accept: F, rule: &str) -> Result<T>
where
    T: std::str::FromStr + std::fmt::Display + Copy,
    F: Fn(T) -> bool,
{
    loop {
        let input = prompt_with_default(message, &default.to_string())?;
        match input.parse::<T>() {
            Ok(v) if accept(v) => return Ok(v),
            _ => println!("  Invalid: {}. Try again.", rule),
        }
    }
}

/// Serialize `config` as YAML and write it atomically, creating parent directories.
pub fn write_config(path: &Path, config: &Config) -> Result<()> {
    let yaml = serde_saphyr::to_string(config)
        .map_err(|e| anyhow::anyhow!("Failed to serialize config: {}", e))?;

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }

    let mut file = AtomicWriteFile::open(path)
        .with_context(|| format!("Failed to open atomic write file at {}", path.display()))?;
    file.write_all(yaml.as_bytes())
        .with_context(|| format!("Failed to write config to {}", path.display()))?;
    file.commit()
        .with_context(|| format!("Failed to save config to {}", path.display()))?;

    Ok(())
}

fn prompt_tables(defaults: EstimationConfig) -> Result<EstimationConfig> {
    let mut config = defaults;

    println!();
    println!("Every skill-score point adds this fraction to the skill multiplier.");
    config.skill_coefficient = prompt_number(
        "Skill coefficient",
        config.skill_coefficient,
        |v: f64| v.is_finite() && v > 0.0,
        "must be a positive number",
    )?;

    println!();
    println!("Premium skills raise the estimate. Weights range from just above 0 up to 1.");
    while prompt_yes_no("Add a premium skill?", false)? {
        let name = loop {
            let n = prompt("  Skill name: ")?;
            if !n.is_empty() {
                break n;
            }
            println!("  Skill name is required.");
        };
        let weight = prompt_number(
            "  Weight",
            0.5,
            |v: f64| v > 0.0 && v <= 1.0,
            "must be in (0, 1]",
        )?;
        config.skills.push(SkillWeight { name, weight });
    }

    println!();
    println!("Estimates are clamped to a monthly floor and ceiling (MAD).");
    let step = config.rounding_step.max(1);
    let min = prompt_number(
        "Floor",
        config.bounds.min,
        |v: u32| v % step == 0,
        &format!("must be a whole multiple of {}", step),
    )?;
    let max = prompt_number(
        "Ceiling",
        config.bounds.max.max(min),
        |v: u32| v >= min && v % step == 0,
        &format!("must be a multiple of {} no lower than the floor", step),
    )?;
    config.bounds = SalaryRange { min, max };

    Ok(config)
}

/// Write a configuration file holding the reference tables.
///
/// With `interactive`, asks a few questions first; otherwise writes the
/// built-in tables. An existing file is only replaced with `force` or after
/// confirmation. Returns the written path, or None when the user aborted.
pub fn run_init_wizard(
    default_path: Option<PathBuf>,
    force: bool,
    interactive: bool,
) -> Result<Option<PathBuf>> {
    let config_path = match default_path {
        Some(p) => p,
        None => get_config_path()?,
    };

    let estimation = if interactive {
        println!("Salary Estimator Configuration");
        println!("==============================");
        if prompt_yes_no("Customize tables? (n accepts defaults)", false)? {
            prompt_tables(EstimationConfig::default())?
        } else {
            EstimationConfig::default()
        }
    } else {
        EstimationConfig::default()
    };

    if let Err(errors) = validate_config(&estimation) {
        anyhow::bail!("Refusing to write invalid tables: {}", errors.join("; "));
    }

    if config_path.exists() && !force {
        let overwrite = interactive
            && prompt_yes_no(
                &format!(
                    "Config already exists at {}. Overwrite?",
                    config_path.display()
                ),
                false,
            )?;
        if !overwrite {
            return Ok(None);
        }
    }

    let config = Config {
        estimation: Some(estimation),
    };
    write_config(&config_path, &config)?;

    Ok(Some(config_path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::load_config;
    use tempfile::tempdir;

    #[test]
    fn test_write_config_roundtrip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.yaml");
        let config = Config {
            estimation: Some(EstimationConfig::default()),
        };

        write_config(&path, &config).unwrap();
        let loaded = load_config(Some(path)).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_init_writes_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.yaml");

        let written = run_init_wizard(Some(path.clone()), false, false).unwrap();
        assert_eq!(written, Some(path.clone()));

        let loaded = load_config(Some(path)).unwrap();
        assert_eq!(loaded.estimation, Some(EstimationConfig::default()));
    }

    #[test]
    fn test_init_keeps_existing_without_force() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "{}").unwrap();

        let written = run_init_wizard(Some(path.clone()), false, false).unwrap();
        assert_eq!(written, None);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "{}");
    }

    #[test]
    fn test_init_force_overwrites() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "{}").unwrap();

        let written = run_init_wizard(Some(path.clone()), true, false).unwrap();
        assert_eq!(written, Some(path.clone()));
        let loaded = load_config(Some(path)).unwrap();
        assert!(loaded.estimation.is_some());
    }
}
