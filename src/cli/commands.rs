use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{anyhow, bail, Context};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::{error, info, warn};

use crate::config::{load_routes, required_value_from, RuntimeConfig};
use crate::factory::combine;
use crate::matcher::RoutePatternMatcher;
use crate::parser::{parse, parse_with};
use crate::pattern::{NameMap, NoPolicies, PatternSummary, RequiredValues, RouteValues};
use crate::transform::substitute_required_values;

/// Command-line interface for routepat
///
/// Parses, matches, combines and checks route templates.
#[derive(Parser)]
#[command(name = "routepat")]
#[command(about = "Route template compiler and matcher", long_about = None)]
#[command(version)]
pub struct Cli {
    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Parse a template and print its structure as JSON
    Parse {
        /// Route template, e.g. "{controller=Home}/{action=Index}/{id?}"
        template: String,
    },
    /// Match request paths against a template
    Match {
        /// Route template
        template: String,

        /// Request paths to match
        #[arg(required = true)]
        paths: Vec<String>,

        /// Extra or overriding default (repeatable)
        #[arg(short, long = "default", value_name = "KEY=VALUE", value_parser = parse_key_value)]
        defaults: Vec<(String, String)>,
    },
    /// Derive a pattern with required values substituted
    Substitute {
        /// Route template
        template: String,

        /// Required value (repeatable). `key=` is empty, `key=*any*` is any
        #[arg(short, long = "require", value_name = "KEY=VALUE", value_parser = parse_key_value)]
        required: Vec<(String, String)>,

        /// Out-of-line default applied before substitution (repeatable)
        #[arg(short, long = "default", value_name = "KEY=VALUE", value_parser = parse_key_value)]
        defaults: Vec<(String, String)>,
    },
    /// Append one template to another
    Combine {
        /// Left template
        left: String,
        /// Right template
        right: String,
    },
    /// Validate every route in a route file (YAML, TOML or JSON)
    Check {
        /// Path to the route file
        #[arg(short, long)]
        routes: PathBuf,
    },
}

fn parse_key_value(text: &str) -> Result<(String, String), String> {
    let (key, value) = text
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{text}'"))?;
    if key.is_empty() {
        return Err(format!("empty key in '{text}'"));
    }
    Ok((key.to_string(), value.to_string()))
}

#[derive(Serialize)]
struct MatchReport<'a> {
    path: &'a str,
    matched: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    values: Option<RouteValues>,
    duration_us: u128,
}

#[derive(Serialize)]
struct CheckReport<'a> {
    route: &'a str,
    template: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pattern: Option<PatternSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

/// Run the CLI, writing results to stdout.
///
/// # Errors
///
/// Returns an error for invalid templates, unreadable route files, paths
/// that match nothing, and impossible substitutions.
pub fn run_cli(cli: Cli) -> anyhow::Result<()> {
    let config = RuntimeConfig::from_env();
    let stdout = io::stdout();
    execute(&cli.command, &config, &mut stdout.lock())
}

/// Run one command against an arbitrary writer.
///
/// # Errors
///
/// Same as [`run_cli`].
pub fn execute(command: &Commands, config: &RuntimeConfig, out: &mut dyn Write) -> anyhow::Result<()> {
    match command {
        Commands::Parse { template } => {
            let pattern = parse(template)?;
            write_json(out, &pattern.summary())
        }
        Commands::Match {
            template,
            paths,
            defaults,
        } => {
            let pattern = parse(template)?;
            let mut effective = pattern.defaults().clone();
            effective.extend(defaults.iter().map(|(k, v)| (k.as_str(), v.clone())));
            let matcher = RoutePatternMatcher::new(&pattern, effective);

            let mut reports = Vec::with_capacity(paths.len());
            for path in paths {
                let start = Instant::now();
                let values = matcher.try_match(path);
                let elapsed = start.elapsed();
                if elapsed > config.slow_match {
                    warn!(
                        template = %template,
                        path = %path,
                        duration_us = elapsed.as_micros(),
                        threshold_us = config.slow_match.as_micros(),
                        "Slow route matching detected"
                    );
                } else {
                    info!(
                        template = %template,
                        path = %path,
                        matched = values.is_some(),
                        duration_us = elapsed.as_micros(),
                        "Route match attempt"
                    );
                }
                reports.push(MatchReport {
                    path,
                    matched: values.is_some(),
                    values,
                    duration_us: elapsed.as_micros(),
                });
            }
            write_json(out, &reports)?;
            if reports.iter().all(|r| !r.matched) {
                bail!("no path matched '{template}'");
            }
            Ok(())
        }
        Commands::Substitute {
            template,
            required,
            defaults,
        } => {
            let defaults: NameMap<String> = defaults
                .iter()
                .map(|(k, v)| (k.as_str(), v.clone()))
                .collect();
            let pattern = parse_with(
                template,
                defaults,
                NameMap::new(),
                RequiredValues::new(),
            )?;
            let required: RequiredValues = required
                .iter()
                .map(|(k, v)| (k.as_str(), required_value_from(Some(v.as_str()))))
                .collect();
            let derived = substitute_required_values(&pattern, &required, &NoPolicies)
                .ok_or_else(|| anyhow!("required values cannot be substituted into '{template}'"))?;
            write_json(out, &derived.summary())
        }
        Commands::Combine { left, right } => {
            let left = parse(left)?;
            let right = parse(right)?;
            let combined = combine(Some(&left), &right)?;
            write_json(out, &combined.summary())
        }
        Commands::Check { routes } => {
            let file = load_routes(routes)?;
            let mut failures = 0usize;
            let mut reports = Vec::with_capacity(file.routes.len());
            for definition in &file.routes {
                match definition.to_pattern() {
                    Ok(pattern) => {
                        info!(
                            route = %definition.label(),
                            parameters = pattern.parameter_count(),
                            inbound_precedence = pattern.inbound_precedence(),
                            "Route template accepted"
                        );
                        reports.push(CheckReport {
                            route: definition.label(),
                            template: &definition.template,
                            pattern: Some(pattern.summary()),
                            error: None,
                        });
                    }
                    Err(e) => {
                        error!(route = %definition.label(), error = %e, "Route template rejected");
                        failures += 1;
                        reports.push(CheckReport {
                            route: definition.label(),
                            template: &definition.template,
                            pattern: None,
                            error: Some(e.to_string()),
                        });
                    }
                }
            }
            write_json(out, &reports)?;
            if failures > 0 {
                bail!(
                    "{failures} of {} routes in {} are invalid",
                    file.routes.len(),
                    routes.display()
                );
            }
            Ok(())
        }
    }
}

fn write_json<T: Serialize>(out: &mut dyn Write, value: &T) -> anyhow::Result<()> {
    serde_json::to_writer_pretty(&mut *out, value).context("failed to write JSON output")?;
    writeln!(out)?;
    Ok(())
}
