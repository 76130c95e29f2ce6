use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing::{debug, Level};

use salary_estimator::estimation::{
    parse_skills_text, Education, EmploymentType, EstimateError, Estimator, Profile,
};

// Exit codes
const EXIT_SUCCESS: i32 = 0;
const EXIT_GENERAL: i32 = 1;
const EXIT_INVALID_INPUT: i32 = 2;
const EXIT_CONFIG: i32 = 4;

#[derive(Args, Debug)]
struct EstimateArgs {
    /// Job title, e.g. "Senior AI Engineer"
    #[arg(long, required_unless_present = "profile")]
    title: Option<String>,

    /// City, e.g. "Casablanca"
    #[arg(long, default_value = "")]
    location: String,

    /// PhD, Master's, Bachelor's, or anything else
    #[arg(long, default_value = "Other")]
    education: String,

    /// Years of experience
    #[arg(long, required_unless_present = "profile", allow_negative_numbers = true)]
    experience: Option<i64>,

    /// Full-time, Contract, Part-time, or Internship
    #[arg(long, default_value = "Full-time")]
    employment_type: String,

    /// Comma- or space-separated skills, e.g. "Python, Machine Learning"
    #[arg(long, required_unless_present = "profile")]
    skills: Option<String>,

    /// Read the profile from a YAML file instead of flags
    #[arg(
        long,
        conflicts_with_all = [
            "title",
            "location",
            "education",
            "experience",
            "employment_type",
            "skills",
        ]
    )]
    profile: Option<PathBuf>,

    /// Print the estimate as JSON
    #[arg(long, conflicts_with = "tsv")]
    json: bool,

    /// Print one tab-separated line: salary, tier, score, premium count, title
    #[arg(long)]
    tsv: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Estimate a monthly salary for a job profile
    Estimate(EstimateArgs),
    /// List the premium skill reference table
    Skills,
    /// Write a configuration file with the reference tables
    Init {
        /// Overwrite an existing file without asking
        #[arg(long)]
        force: bool,

        /// Ask a few questions before writing instead of using the built-in tables
        #[arg(long)]
        interactive: bool,
    },
}

#[derive(Parser, Debug)]
#[command(name = "salary-estimator")]
#[command(about = "Estimate a monthly salary from a job profile", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/salary-estimator/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

fn profile_from_args(args: &EstimateArgs) -> anyhow::Result<Profile> {
    if let Some(ref path) = args.profile {
        return salary_estimator::config::load_profile(path);
    }

    Ok(Profile {
        job_title: args.title.clone().unwrap_or_default(),
        location: args.location.clone(),
        education: Education::parse(&args.education),
        experience_years: args.experience.unwrap_or_default(),
        employment_type: EmploymentType::parse(&args.employment_type),
        skills: parse_skills_text(args.skills.as_deref().unwrap_or_default()),
    })
}

/// Load config, then validate and compile the reference tables. Exits on failure.
fn build_estimator(config_path: Option<PathBuf>) -> Estimator {
    let config = match salary_estimator::config::load_config(config_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };

    match Estimator::new(config.estimation.unwrap_or_default()) {
        Ok(estimator) => {
            debug!(skills = estimator.skills().len(), "reference tables ready");
            estimator
        }
        Err(errors) => {
            eprintln!("Estimation config errors:");
            for error in errors {
                eprintln!("  - {}", error);
            }
            std::process::exit(EXIT_CONFIG);
        }
    }
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::WARN })
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let config_path = cli.config.map(PathBuf::from);
    let use_colors = salary_estimator::output::should_use_colors();

    match cli.command {
        Commands::Init { force, interactive } => {
            match salary_estimator::config::run_init_wizard(config_path, force, interactive) {
                Ok(Some(path)) => println!("Config written to {}", path.display()),
                Ok(None) => println!(
                    "Config already exists, left unchanged (use --force to overwrite)."
                ),
                Err(e) => {
                    eprintln!("Init failed: {:#}", e);
                    std::process::exit(EXIT_GENERAL);
                }
            }
        }
        Commands::Skills => {
            let estimator = build_estimator(config_path);
            println!(
                "{}",
                salary_estimator::output::format_skill_table(estimator.skills(), use_colors)
            );
        }
        Commands::Estimate(args) => {
            let estimator = build_estimator(config_path);
            let profile = match profile_from_args(&args) {
                Ok(p) => p,
                Err(e) => {
                    eprintln!("Profile error: {:#}", e);
                    std::process::exit(EXIT_INVALID_INPUT);
                }
            };
            debug!(?profile, "estimating");

            let estimate = match estimator.estimate(&profile) {
                Ok(estimate) => estimate,
                Err(e) => {
                    eprintln!("Error: {}", e);
                    if matches!(e, EstimateError::NegativeExperience(_)) {
                        eprintln!("Please enter 0 or a positive number of years.");
                    }
                    std::process::exit(EXIT_INVALID_INPUT);
                }
            };

            for warning in &estimate.warnings {
                eprintln!(
                    "{}",
                    salary_estimator::output::format_warning(warning, use_colors)
                );
            }

            if args.json {
                match salary_estimator::output::format_json(&estimate) {
                    Ok(json) => println!("{}", json),
                    Err(e) => {
                        eprintln!("Failed to serialize estimate: {}", e);
                        std::process::exit(EXIT_GENERAL);
                    }
                }
            } else if args.tsv {
                println!(
                    "{}",
                    salary_estimator::output::format_tsv(&estimate, &profile.job_title)
                );
            } else {
                println!(
                    "{}",
                    salary_estimator::output::format_estimate(&estimate, use_colors)
                );
            }
        }
    }

    std::process::exit(EXIT_SUCCESS);
}
