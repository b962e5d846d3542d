// IBAN Check - Command Line Interface
// validate / convert / format IBANs, list countries, check CSV batches

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::{debug, error, info};
use std::path::PathBuf;

use iban_check::{
    available_countries, from_bban, load_csv, print_format, registry, to_bban, validate_batch,
    Iban, IbanError, DEFAULT_SEPARATOR, VERSION,
};

/// Validate, convert and format International Bank Account Numbers
#[derive(Parser, Debug)]
#[command(name = "iban-check", author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Args {
    /// Enable verbose logging (use -vv for trace output)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Validate one or more IBANs
    Validate {
        #[arg(required = true, value_name = "IBAN")]
        ibans: Vec<String>,
    },

    /// Extract the BBAN of an IBAN, split along the country's blocks
    ToBban {
        iban: String,

        #[arg(short, long, default_value = DEFAULT_SEPARATOR)]
        separator: String,
    },

    /// Build an IBAN from a country code and BBAN
    FromBban {
        #[arg(value_name = "COUNTRY")]
        country_code: String,

        bban: String,
    },

    /// Print an IBAN in groups of 4 characters
    Format {
        iban: String,

        #[arg(short, long, default_value = DEFAULT_SEPARATOR)]
        separator: String,
    },

    /// List supported countries
    Countries {
        /// Emit JSON instead of a table
        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// Validate every IBAN in a CSV file (needs an `iban` column)
    Batch {
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Write the JSON report here instead of stdout
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Check every built-in country example
    SelfTest,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let log_level = match args.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
        .format_timestamp_millis()
        .init();

    debug!("iban-check v{}", VERSION);

    let all_ok = match args.command {
        Command::Validate { ibans } => run_validate(&ibans),
        Command::ToBban { iban, separator } => {
            println!("{}", to_bban(&iban, &separator)?);
            true
        }
        Command::FromBban { country_code, bban } => {
            println!("{}", from_bban(&country_code, &bban)?);
            true
        }
        Command::Format { iban, separator } => {
            println!("{}", print_format(&iban, &separator));
            true
        }
        Command::Countries { json } => {
            run_countries(json)?;
            true
        }
        Command::Batch { input, output } => run_batch(&input, output.as_deref())?,
        Command::SelfTest => run_self_test(),
    };

    if !all_ok {
        std::process::exit(1);
    }

    Ok(())
}

fn run_validate(ibans: &[String]) -> bool {
    let mut all_ok = true;

    for input in ibans {
        match Iban::parse(input) {
            Ok(iban) => println!("✓ {}", iban),
            Err(e) => {
                all_ok = false;
                println!("✗ {} - {}", input, e);
            }
        }
    }

    all_ok
}

fn run_countries(json: bool) -> Result<()> {
    let countries = available_countries();

    if json {
        let specs: Vec<_> = countries.values().collect();
        println!("{}", serde_json::to_string_pretty(&specs)?);
        return Ok(());
    }

    println!("{:<4} {:>6}  {:<20} {}", "CODE", "LENGTH", "STRUCTURE", "EXAMPLE");
    for spec in countries.values() {
        println!(
            "{:<4} {:>6}  {:<20} {}",
            spec.country_code(),
            spec.length(),
            spec.structure(),
            print_format(spec.example(), DEFAULT_SEPARATOR)
        );
    }
    println!("\n{} countries", countries.len());

    Ok(())
}

fn run_batch(input: &std::path::Path, output: Option<&std::path::Path>) -> Result<bool> {
    if !input.exists() {
        error!("Input file not found: {:?}", input);
        anyhow::bail!("Input file not found: {:?}", input);
    }

    info!("Checking {:?}...", input);
    let records = load_csv(input)?;
    let report = validate_batch(&input.display().to_string(), &records, registry());
    let json = serde_json::to_string_pretty(&report)?;

    match output {
        Some(path) => {
            std::fs::write(path, json)
                .with_context(|| format!("Failed to write report to {}", path.display()))?;
            println!("✓ Report written to {}", path.display());
        }
        None => println!("{}", json),
    }

    for failure in report.failures() {
        debug!("line {}: {} is invalid", failure.line, failure.input);
    }

    Ok(report.all_valid())
}

fn run_self_test() -> bool {
    let mut failures = 0;

    for spec in available_countries().values() {
        let result = spec
            .check(spec.example())
            .map_err(IbanError::InvalidIban)
            .and_then(|_| spec.to_bban(spec.example(), ""))
            .and_then(|bban| spec.from_bban(&bban))
            .and_then(|rebuilt| {
                if rebuilt == spec.example() {
                    Ok(())
                } else {
                    Err(IbanError::InvalidBban(rebuilt))
                }
            });

        match result {
            Ok(()) => debug!("{} ok", spec.country_code()),
            Err(e) => {
                failures += 1;
                println!("✗ {} - {}", spec.country_code(), e);
            }
        }
    }

    let total = available_countries().len();
    if failures == 0 {
        println!("✓ All {} country specifications passed", total);
    } else {
        println!("✗ {} of {} country specifications failed", failures, total);
    }

    failures == 0
}
