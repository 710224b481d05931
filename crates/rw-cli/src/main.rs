//! RuleWizard CLI
//!
//! CLI tool for turning filtering-log events into filter rules.

mod input;

use std::borrow::Cow;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use rw_core::url::extract_host;
use rw_core::{EventStatus, RuleKind, RuleWizard};

#[derive(Parser)]
#[command(name = "rw-cli")]
#[command(about = "RuleWizard filter rule generator")]
struct Cli {
    /// JSON syntax table overriding the default AdGuard markers
    #[arg(long, global = true)]
    syntax: Option<PathBuf>,

    /// Print machine-readable JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Candidate patterns for a new rule covering a URL
    Patterns {
        /// Request URL
        #[arg(short, long)]
        url: String,

        /// Request domain (defaults to the URL host)
        #[arg(short, long)]
        domain: Option<String>,

        /// Generate allowlist patterns
        #[arg(short, long)]
        allowlist: bool,
    },

    /// Exception rules for logged events
    Exception {
        /// Event JSON file (object or array), `-` for stdin
        #[arg(short, long, default_value = "-")]
        event: String,
    },

    /// Filtering-log status of logged events
    Status {
        /// Event JSON file (object or array), `-` for stdin
        #[arg(short, long, default_value = "-")]
        event: String,
    },
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct EventReport<'a> {
    label: Cow<'a, str>,
    kind: Option<RuleKind>,
    status: EventStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    rules: Option<Vec<String>>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = input::load_syntax(cli.syntax.as_deref()).and_then(|syntax| {
        let wizard = RuleWizard::new(&syntax);
        match cli.command {
            Commands::Patterns {
                url,
                domain,
                allowlist,
            } => cmd_patterns(&wizard, &url, domain.as_deref(), allowlist, cli.json),
            Commands::Exception { event } => cmd_events(&wizard, &event, true, cli.json),
            Commands::Status { event } => cmd_events(&wizard, &event, false, cli.json),
        }
    });

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn cmd_patterns(
    wizard: &RuleWizard,
    url: &str,
    domain: Option<&str>,
    allowlist: bool,
    json: bool,
) -> Result<(), String> {
    let domain = match domain.or_else(|| extract_host(url)) {
        Some(domain) => domain,
        None => return Err(format!("Cannot determine the domain of '{}', pass --domain", url)),
    };

    let patterns = wizard.patterns(url, domain, allowlist);
    tracing::debug!(url, domain, count = patterns.len(), "generated patterns");

    if json {
        print_json(&patterns)
    } else {
        for pattern in &patterns {
            println!("{}", pattern);
        }
        Ok(())
    }
}

fn cmd_events(wizard: &RuleWizard, path: &str, with_rules: bool, json: bool) -> Result<(), String> {
    let events = input::read_events(path)?;

    let reports: Vec<EventReport> = events
        .iter()
        .map(|event| EventReport {
            label: event.display_label(),
            kind: wizard.rule_kind(event),
            status: wizard.status(event),
            rules: with_rules.then(|| wizard.exception_rules(event)),
        })
        .collect();

    if json {
        return print_json(&reports);
    }

    for report in &reports {
        println!("{}\t{}", report.status, report.label);
        if let Some(rules) = &report.rules {
            if rules.is_empty() {
                println!("  (no rule could be generated)");
            }
            for rule in rules {
                println!("  {}", rule);
            }
        }
    }

    Ok(())
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), String> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| format!("Failed to serialize output: {}", e))?;
    println!("{}", json);
    Ok(())
}
