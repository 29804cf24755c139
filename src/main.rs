use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use clap::Parser;
use dialoguer::{Error as DialoguerError, Input, Select};
use ptcase::{AppConfig, AppError, CaseInput, MAX_PATIENT_AGE, MockTextBackend, Specialization};

const SPECIALIZATION_PLACEHOLDER: &str = "Select a physiotherapy domain";

#[derive(Parser)]
#[command(name = "ptcase")]
#[command(version)]
#[command(
    about = "Generate a physiotherapy case study from a handful of scenario parameters",
    long_about = None
)]
struct Cli {
    /// Patient age, 0-100 (prompted interactively when omitted).
    #[arg(long)]
    age: Option<u8>,
    /// Free-text patient background.
    #[arg(long)]
    background: Option<String>,
    /// Physiotherapy specialization, e.g. "geriatric".
    #[arg(long)]
    specialization: Option<String>,
    /// Free-text description of the ADL problem.
    #[arg(long)]
    adl_problem: Option<String>,
    /// Path to an optional TOML configuration file.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Run against the mock backend instead of calling the API.
    #[arg(long)]
    mock: bool,
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), AppError> {
    let config = load_config(cli.config.as_deref())?;

    let Some(input) = resolve_input(&cli)? else {
        return Ok(());
    };

    let document = if cli.mock {
        ptcase::generate_case_study_with_backend(&input, &config, Box::new(MockTextBackend))
    } else {
        ptcase::generate_case_study(&input, &config)
    }?;

    println!("{}", document.to_markdown());
    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<AppConfig, AppError> {
    match path {
        Some(path) => {
            let content = fs::read_to_string(path)?;
            ptcase::parse_config_content(&content)
        }
        None => Ok(AppConfig::default()),
    }
}

/// Resolve the intake record from flags, prompting for anything omitted.
///
/// Returns `Ok(None)` when the user interrupts a prompt.
fn resolve_input(cli: &Cli) -> Result<Option<CaseInput>, AppError> {
    let age = match cli.age {
        Some(value) => value,
        None => match prompt_age()? {
            Some(value) => value,
            None => return Ok(None),
        },
    };

    let background = match &cli.background {
        Some(value) => value.clone(),
        None => match prompt_text("Patient background (e.g. 'Jill, female, total hip a year ago')")?
        {
            Some(value) => value,
            None => return Ok(None),
        },
    };

    let specialization = match &cli.specialization {
        Some(value) => parse_specialization(value)?,
        None => match prompt_specialization()? {
            Some(value) => value,
            None => return Ok(None),
        },
    };

    let adl_problem = match &cli.adl_problem {
        Some(value) => value.clone(),
        None => match prompt_text(
            "ADL problem (e.g. 'Difficulty with walking, transferring, balance')",
        )? {
            Some(value) => value,
            None => return Ok(None),
        },
    };

    CaseInput::new(age, background, specialization, adl_problem).map(Some)
}

fn parse_specialization(value: &str) -> Result<Specialization, AppError> {
    Specialization::parse(value).ok_or_else(|| {
        let options =
            Specialization::ALL.iter().map(|s| s.as_str()).collect::<Vec<_>>().join(", ");
        AppError::InvalidInput(format!("Unknown specialization '{}'. Expected one of: {}", value, options))
    })
}

fn prompt_age() -> Result<Option<u8>, AppError> {
    match Input::new()
        .with_prompt(format!("Patient age (0-{})", MAX_PATIENT_AGE))
        .default(30u8)
        .validate_with(|value: &u8| {
            if *value <= MAX_PATIENT_AGE {
                Ok(())
            } else {
                Err(format!("age must be between 0 and {}", MAX_PATIENT_AGE))
            }
        })
        .interact_text()
    {
        Ok(value) => Ok(Some(value)),
        Err(DialoguerError::IO(err)) if err.kind() == ErrorKind::Interrupted => Ok(None),
        Err(err) => Err(AppError::Configuration(format!("Failed to read age: {}", err))),
    }
}

fn prompt_text(prompt: &str) -> Result<Option<String>, AppError> {
    match Input::<String>::new().with_prompt(prompt).allow_empty(true).interact_text() {
        Ok(value) => Ok(Some(value)),
        Err(DialoguerError::IO(err)) if err.kind() == ErrorKind::Interrupted => Ok(None),
        Err(err) => Err(AppError::Configuration(format!("Failed to read input: {}", err))),
    }
}

fn prompt_specialization() -> Result<Option<Specialization>, AppError> {
    let mut items = vec![SPECIALIZATION_PLACEHOLDER];
    items.extend(Specialization::ALL.iter().map(|s| s.as_str()));

    match Select::new()
        .with_prompt("Physiotherapy specialization")
        .items(&items)
        .default(0)
        .interact()
    {
        Ok(0) => Ok(Some(Specialization::Unselected)),
        Ok(index) => Ok(Some(Specialization::ALL[index - 1])),
        Err(DialoguerError::IO(err)) if err.kind() == ErrorKind::Interrupted => Ok(None),
        Err(err) => {
            Err(AppError::Configuration(format!("Failed to read specialization: {}", err)))
        }
    }
}
