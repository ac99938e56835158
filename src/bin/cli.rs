//! Binary entry point for the paramql command-line tool.
#![forbid(unsafe_code)]

#[path = "cli/config.rs"]
mod config;
#[path = "cli/ui.rs"]
mod ui;

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use paramql::query::{ParseErrorWithCode, ValueKind};
use paramql::{
    lex, ParseError, QueryParams, QueryParser, SchemaError, SchemaRegistry, ValueType,
};
use serde::Serialize;
use thiserror::Error;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use config::{CliConfig, ConfigError};
use ui::{Theme, Ui};

#[derive(Parser, Debug)]
#[command(
    name = "paramql",
    version,
    about = "Translate query parameters into typed predicates and orders",
    disable_help_subcommand = true
)]
struct Cli {
    #[arg(
        long,
        global = true,
        env = "PARAMQL_SCHEMA",
        value_name = "FILE",
        help = "TOML schema document"
    )]
    schema: Option<PathBuf>,

    #[arg(
        long,
        global = true,
        env = "PARAMQL_CONFIG",
        value_name = "FILE",
        help = "CLI config file (defaults to the user config directory)"
    )]
    config: Option<PathBuf>,

    #[arg(
        long,
        global = true,
        value_enum,
        default_value_t = OutputFormat::Text,
        help = "Output format for structured responses"
    )]
    format: OutputFormat,

    #[arg(long, global = true, value_enum, default_value_t = ThemeArg::Auto)]
    theme: ThemeArg,

    #[arg(long, short, global = true, help = "Log parser decisions to stderr")]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    #[command(about = "Parse query parameters into predicates and orders")]
    Parse {
        #[arg(long, value_name = "SCHEMA", help = "Root schema to resolve keys against")]
        root: Option<String>,

        #[arg(
            long = "param",
            short = 'p',
            value_name = "KEY=VALUE",
            action = ArgAction::Append,
            help = "Query parameter (repeatable)"
        )]
        params: Vec<String>,

        #[arg(long, value_name = "FIELD", action = ArgAction::Append)]
        sort: Vec<String>,

        #[arg(long, value_name = "DIR", action = ArgAction::Append)]
        direction: Vec<String>,
    },

    #[command(about = "Show the comparator and literal of a raw value")]
    Lex {
        #[arg(value_name = "VALUE", allow_hyphen_values = true)]
        value: String,
    },

    #[command(about = "Resolve a path and coerce one raw value against it")]
    Coerce {
        #[arg(long, value_name = "SCHEMA")]
        root: Option<String>,

        #[arg(long, value_name = "PATH")]
        path: String,

        #[arg(value_name = "VALUE", allow_hyphen_values = true)]
        value: String,
    },

    #[command(about = "List registered schemas and their attributes")]
    Schema {
        #[arg(value_name = "NAME")]
        name: Option<String>,
    },
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum ThemeArg {
    Auto,
    Light,
    Dark,
    Plain,
}

impl From<ThemeArg> for Theme {
    fn from(theme: ThemeArg) -> Self {
        match theme {
            ThemeArg::Auto => Theme::Auto,
            ThemeArg::Light => Theme::Light,
            ThemeArg::Dark => Theme::Dark,
            ThemeArg::Plain => Theme::Plain,
        }
    }
}

#[derive(Debug, Error)]
enum CliError {
    #[error("{0}")]
    Message(String),
    #[error("{}", ParseErrorWithCode(.0))]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Schema(#[from] SchemaError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    if let Err(err) = run(cli) {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let fallback = if verbose { "paramql=debug" } else { "warn" };
    let filter = EnvFilter::try_from_env("PARAMQL_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(fallback));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn run(cli: Cli) -> Result<(), CliError> {
    let ui = Ui::new(cli.theme.into());
    let config = CliConfig::load(cli.config.clone())?;
    debug!(config = ?config.path(), "loaded CLI config");

    match cli.command {
        Command::Lex { value } => {
            let lexeme = lex(&value);
            let report = LexReport {
                comparator: lexeme.comparator.symbol(),
                literal: lexeme.literal,
            };
            emit(cli.format, &report, || {
                ui.row("comparator", lexeme.comparator);
                ui.row("literal", lexeme.literal.unwrap_or("(none)"));
            })?;
        }
        Command::Parse {
            root,
            params,
            sort,
            direction,
        } => {
            let registry = load_registry(cli.schema.as_ref(), &config)?;
            let root = resolve_root(root, &config)?;
            let parser = QueryParser::with_options(registry, config.parser_options());
            let params = build_params(&params, &sort, &direction, parser.options())?;
            let parsed = parser.parse(&params, &root)?;
            emit(cli.format, &parsed, || {
                ui.heading("Predicates");
                if parsed.predicates.is_empty() {
                    ui.empty("predicates");
                }
                for predicate in &parsed.predicates {
                    ui.predicate(predicate);
                }
                ui.heading("Orders");
                if parsed.orders.is_empty() {
                    ui.empty("orders");
                }
                for order in &parsed.orders {
                    ui.order(order);
                }
            })?;
        }
        Command::Coerce { root, path, value } => {
            let registry = load_registry(cli.schema.as_ref(), &config)?;
            let root = resolve_root(root, &config)?;
            let parser = QueryParser::with_options(registry, config.parser_options());
            let predicate = parser.coerce(&root, &path, &value)?;
            emit(cli.format, &predicate, || ui.predicate(&predicate))?;
        }
        Command::Schema { name } => {
            let registry = load_registry(cli.schema.as_ref(), &config)?;
            let report = schema_report(&registry, name.as_deref())?;
            emit(cli.format, &report, || {
                for schema in &report {
                    ui.heading(&schema.name);
                    if schema.attributes.is_empty() {
                        ui.empty("attributes");
                    }
                    for attribute in &schema.attributes {
                        let ty = match &attribute.relation {
                            Some(target) => format!("{} -> {target}", attribute.kind),
                            None => attribute.kind.to_string(),
                        };
                        ui.row(&attribute.name, ty);
                    }
                }
            })?;
        }
    }
    Ok(())
}

fn load_registry(
    explicit: Option<&PathBuf>,
    config: &CliConfig,
) -> Result<SchemaRegistry, CliError> {
    let path = explicit.cloned().or_else(|| config.schema_path()).ok_or_else(|| {
        CliError::Message("no schema file; pass --schema or set schema.path in the config".into())
    })?;
    debug!(path = %path.display(), "loading schema");
    Ok(SchemaRegistry::load(&path)?)
}

fn resolve_root(explicit: Option<String>, config: &CliConfig) -> Result<String, CliError> {
    explicit
        .or_else(|| config.default_root().map(str::to_owned))
        .ok_or_else(|| {
            CliError::Message("--root is required (or set schema.root in the config)".into())
        })
}

fn build_params(
    raw: &[String],
    sort: &[String],
    direction: &[String],
    options: &paramql::ParserOptions,
) -> Result<QueryParams, CliError> {
    let mut params = QueryParams::new();
    for entry in raw {
        let (key, value) = entry.split_once('=').ok_or_else(|| {
            CliError::Message(format!("invalid parameter '{entry}', expected KEY=VALUE"))
        })?;
        if key.is_empty() {
            return Err(CliError::Message(format!(
                "invalid parameter '{entry}', key is empty"
            )));
        }
        params.append(key, value);
    }
    for field in sort {
        params.append(options.sort_key.as_str(), field.as_str());
    }
    for dir in direction {
        params.append(options.direction_key.as_str(), dir.as_str());
    }
    Ok(params)
}

#[derive(Serialize)]
struct LexReport<'a> {
    comparator: &'static str,
    literal: Option<&'a str>,
}

#[derive(Serialize)]
struct SchemaReport {
    name: String,
    attributes: Vec<AttributeReport>,
}

#[derive(Serialize)]
struct AttributeReport {
    name: String,
    kind: ValueKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    relation: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    members: Vec<String>,
}

fn schema_report(
    registry: &SchemaRegistry,
    only: Option<&str>,
) -> Result<Vec<SchemaReport>, CliError> {
    let names: Vec<&str> = match only {
        Some(name) if registry.schema(name).is_some() => vec![name],
        Some(name) => return Err(CliError::Message(format!("unknown schema '{name}'"))),
        None => registry.schema_names(),
    };
    let mut report = Vec::with_capacity(names.len());
    for name in names {
        let Some(schema) = registry.schema(name) else {
            continue;
        };
        let attributes = schema
            .attributes()
            .map(|attribute| AttributeReport {
                name: attribute.name().to_owned(),
                kind: attribute.value_type().kind(),
                relation: attribute.target().map(str::to_owned),
                members: match attribute.value_type() {
                    ValueType::Enumeration(members) => members.clone(),
                    _ => Vec::new(),
                },
            })
            .collect();
        report.push(SchemaReport {
            name: name.to_owned(),
            attributes,
        });
    }
    Ok(report)
}

fn emit<T, F>(format: OutputFormat, value: &T, printer: F) -> Result<(), CliError>
where
    T: Serialize,
    F: FnOnce(),
{
    match format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(value)?;
            println!("{json}");
        }
        OutputFormat::Text => printer(),
    }
    Ok(())
}
