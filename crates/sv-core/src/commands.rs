//! Subcommand implementations.

use std::collections::BTreeSet;
use std::path::Path;

use serde::Serialize;
use sv_common::{InstitutionKey, OutputFormat, Result, SCHEMA_VERSION};
use sv_config::{resolve_config_path, FieldSet, IssueFlags, ValidatorConfig};
use sv_core::exit_codes::ExitCode;
use sv_core::input_files::{list_input_files, InputFormat};
use sv_core::jstor::load_jstor_issns;
use sv_core::magic_words::{MagicWordCondition, MagicWordFlags};
use sv_core::marc_fields::{sorted_codes, valid_forms, valid_serial_types};
use sv_core::policy::{FilePolicy, PolicyResolver};
use sv_core::years::{end_dates_compatible, parse_year, start_dates_compatible, YearSpan};
use sv_core::{classify, classify_all, derive_abbreviation, unique_path, FieldSource, IssueSource};
use tracing::{info, warn};

use crate::cli::{Boundary, Cli, Commands, YearsArgs};

pub fn run(cli: Cli) -> Result<ExitCode> {
    let format = cli.format;
    match cli.command {
        Commands::Plan {
            input_dir,
            data_dir,
        } => {
            let config = load_config(cli.config.as_deref())?;
            plan(&config, &input_dir, &data_dir, format)
        }
        Commands::Resolve { files } => {
            let config = load_config(cli.config.as_deref())?;
            resolve(&config, &files, format)
        }
        Commands::Years(args) => years(&args, format),
        Commands::Classify {
            holdings,
            nonpublic_note,
            public_note,
            condition,
        } => classify_text(
            holdings.as_deref(),
            nonpublic_note.as_deref(),
            public_note.as_deref(),
            condition,
            format,
        ),
        Commands::Defaults => {
            print_defaults(format)?;
            Ok(ExitCode::Clean)
        }
        Commands::UniquePath { path } => {
            let free = unique_path(&path)?;
            println!("{}", free.display());
            Ok(ExitCode::Clean)
        }
    }
}

fn load_config(cli_path: Option<&Path>) -> Result<ValidatorConfig> {
    let path = resolve_config_path(cli_path);
    Ok(ValidatorConfig::load_optional(path.as_deref())?)
}

/// One input file's resolved policy, as reported.
#[derive(Debug, Serialize)]
struct FileReport<'a> {
    filename: &'a str,
    abbreviation: String,
    format: Option<InputFormat>,
    institution: &'a InstitutionKey,
    field_source: FieldSource,
    field_program: Option<&'a InstitutionKey>,
    fields: Option<&'a FieldSet>,
    issue_source: IssueSource,
    issue_program: Option<&'a InstitutionKey>,
    disqualifying_issues: BTreeSet<String>,
}

impl<'a> FileReport<'a> {
    fn new(policy: &'a FilePolicy<'a>) -> Self {
        Self {
            filename: &policy.filename,
            abbreviation: derive_abbreviation(&policy.filename),
            format: InputFormat::from_filename(&policy.filename),
            institution: &policy.institution,
            field_source: policy.fields.source,
            field_program: policy.fields.program,
            fields: policy.fields.fields,
            issue_source: policy.issues.source,
            issue_program: policy.issues.program,
            disqualifying_issues: policy.issues.active_categories(),
        }
    }
}

#[derive(Debug, Serialize)]
struct PlanReport<'a> {
    schema_version: &'static str,
    input_dir: String,
    files: Vec<FileReport<'a>>,
    files_without_fields: Vec<&'a str>,
    jstor_issns: usize,
}

fn plan(config: &ValidatorConfig, input_dir: &Path, data_dir: &Path, format: OutputFormat) -> Result<ExitCode> {
    let files = list_input_files(input_dir)?;
    let jstor = load_jstor_issns(data_dir)?;
    let resolver = PolicyResolver::new(config);

    let policies: Vec<FilePolicy<'_>> = files.iter().map(|f| resolver.resolve(f)).collect();
    let missing: Vec<&str> = policies
        .iter()
        .filter(|p| !p.has_fields())
        .map(|p| p.filename.as_str())
        .collect();
    for filename in &missing {
        warn!(file = %filename, "no input fields configured");
    }
    info!(files = policies.len(), missing = missing.len(), "planned headless run");

    match format {
        OutputFormat::Json => {
            let report = PlanReport {
                schema_version: SCHEMA_VERSION,
                input_dir: input_dir.display().to_string(),
                files: policies.iter().map(FileReport::new).collect(),
                files_without_fields: missing.clone(),
                jstor_issns: jstor.len(),
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        OutputFormat::Text => {
            for policy in &policies {
                print_policy(&FileReport::new(policy));
            }
            println!("{} input file(s), {} without fields", policies.len(), missing.len());
            println!("{} JSTOR ISSN(s) loaded", jstor.len());
        }
    }

    Ok(if missing.is_empty() {
        ExitCode::Clean
    } else {
        ExitCode::Findings
    })
}

fn resolve(config: &ValidatorConfig, files: &[String], format: OutputFormat) -> Result<ExitCode> {
    let resolver = PolicyResolver::new(config);
    let names: Vec<&str> = files.iter().map(|f| file_name(f)).collect();
    let policies: Vec<FilePolicy<'_>> = names.iter().map(|f| resolver.resolve(f)).collect();
    let any_missing = policies.iter().any(|p| !p.has_fields());

    match format {
        OutputFormat::Json => {
            let reports: Vec<FileReport<'_>> = policies.iter().map(FileReport::new).collect();
            println!("{}", serde_json::to_string_pretty(&reports)?);
        }
        OutputFormat::Text => {
            for policy in &policies {
                print_policy(&FileReport::new(policy));
            }
        }
    }

    Ok(if any_missing {
        ExitCode::Findings
    } else {
        ExitCode::Clean
    })
}

/// Final path segment of `path`; per-file overrides are keyed by bare name.
fn file_name(path: &str) -> &str {
    path.rsplit(|c: char| c == '/' || c == '\\')
        .next()
        .unwrap_or(path)
}

fn print_policy(report: &FileReport<'_>) {
    println!("{} [{}] ({})", report.filename, report.institution, report.abbreviation);
    match report.field_program {
        Some(program) => println!("  fields: {} ({program})", report.field_source),
        None => println!("  fields: {}", report.field_source),
    }
    if let Some(fields) = report.fields {
        for entry in fields {
            println!("    {: <12}{}", entry.category, entry.location);
        }
    }
    match report.issue_program {
        Some(program) => println!("  issues: {} ({program})", report.issue_source),
        None => println!("  issues: {}", report.issue_source),
    }
    let active: Vec<&str> = report.disqualifying_issues.iter().map(String::as_str).collect();
    println!("    {}", active.join(", "));
}

#[derive(Debug, Serialize)]
struct YearsReport {
    boundary: &'static str,
    bib_year: u32,
    bib_reading: u32,
    holdings_year: u32,
    holdings_reading: u32,
    compatible: bool,
}

fn years(args: &YearsArgs, format: OutputFormat) -> Result<ExitCode> {
    let bib_text = args.bib_text.as_deref().unwrap_or(args.bib_year.as_str());
    let holdings_text = args.holdings_text.as_deref().unwrap_or(args.holdings_year.as_str());
    let bib = YearSpan::new(parse_year(&args.bib_year)?, bib_text);
    let holdings = YearSpan::new(parse_year(&args.holdings_year)?, holdings_text);

    let report = match args.boundary {
        Boundary::Start => YearsReport {
            boundary: "start",
            bib_year: bib.year,
            bib_reading: bib.earliest(),
            holdings_year: holdings.year,
            holdings_reading: holdings.latest(),
            compatible: start_dates_compatible(bib.year, bib.text, holdings.year, holdings.text),
        },
        Boundary::End => YearsReport {
            boundary: "end",
            bib_year: bib.year,
            bib_reading: bib.latest(),
            holdings_year: holdings.year,
            holdings_reading: holdings.earliest(),
            compatible: end_dates_compatible(bib.year, bib.text, holdings.year, holdings.text),
        },
    };

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Text => println!(
            "{}: holdings {} (read as {}) vs bib {} (read as {}): {}",
            report.boundary,
            report.holdings_year,
            report.holdings_reading,
            report.bib_year,
            report.bib_reading,
            if report.compatible { "ok" } else { "out of range" }
        ),
    }

    Ok(if report.compatible {
        ExitCode::Clean
    } else {
        ExitCode::Findings
    })
}

fn classify_text(
    holdings: Option<&str>,
    nonpublic_note: Option<&str>,
    public_note: Option<&str>,
    condition: Option<MagicWordCondition>,
    format: OutputFormat,
) -> Result<ExitCode> {
    let flags = match condition {
        Some(condition) => {
            let found = classify(holdings, nonpublic_note, public_note, condition);
            let mut flags = MagicWordFlags::default();
            match condition {
                MagicWordCondition::Completeness => flags.completeness = found,
                MagicWordCondition::Binding => flags.binding = found,
                MagicWordCondition::Nonprint => flags.nonprint = found,
            }
            flags
        }
        None => classify_all(holdings, nonpublic_note, public_note),
    };
    let checked: Vec<MagicWordCondition> = match condition {
        Some(c) => vec![c],
        None => MagicWordCondition::ALL.to_vec(),
    };

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&flags)?),
        OutputFormat::Text => {
            for c in &checked {
                println!("{: <14}{}", c.to_string(), if flags.get(*c) { "1" } else { "" });
            }
        }
    }

    Ok(if flags.issue_names().is_empty() {
        ExitCode::Clean
    } else {
        ExitCode::Findings
    })
}

/// Built-in baseline: disqualifying issues plus the accepted 008 codes.
#[derive(Debug, Serialize)]
struct DefaultsReport {
    disqualifying_issues: IssueFlags,
    valid_serial_types: Vec<char>,
    valid_forms: Vec<char>,
}

fn print_defaults(format: OutputFormat) -> Result<()> {
    let report = DefaultsReport {
        disqualifying_issues: IssueFlags::builtin_defaults(),
        valid_serial_types: sorted_codes(&valid_serial_types()),
        valid_forms: sorted_codes(&valid_forms()),
    };
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Text => {
            for (issue, enabled) in report.disqualifying_issues.iter() {
                println!("{: <40}{}", issue, u8::from(enabled));
            }
            println!("{: <40}{}", "valid_serial_types", quote_codes(&report.valid_serial_types));
            println!("{: <40}{}", "valid_forms", quote_codes(&report.valid_forms));
        }
    }
    Ok(())
}

fn quote_codes(codes: &[char]) -> String {
    let quoted: Vec<String> = codes.iter().map(|c| format!("'{c}'")).collect();
    quoted.join(" ")
}
