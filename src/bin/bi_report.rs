//! Command-line front end for the report engine
//!
//! Resolves definitions, renders reports from JSON definition and row files,
//! and evaluates single expressions.

use std::fs;
use std::io::{self, Write};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use serde_json::Value as JsonValue;

use bi_report::model::{
    BiDefinition, DataSourceDefinition, Definition, DefinitionKind, FormatDefinition,
    IndicatorDefinition, ParameterDefinition, QueryDefinition, ReportDefinition, ViewDefinition,
};
use bi_report::{
    Arguments, EngineConfig, ExpressionEvaluator, InMemoryRepository, MemoryDataSource,
    ReferenceResolver, RenderContext, RenderMode, ReportEngine, Value,
};

#[derive(Parser)]
#[command(name = "bi-report")]
#[command(about = "Resolve BI definitions and render report views")]
#[command(version)]
struct Cli {
    /// Log more (-v debug, -vv trace); RUST_LOG overrides
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve a definition and print it as JSON
    Resolve {
        /// JSON file holding an array of definitions
        #[arg(short, long)]
        definitions: String,
        /// Definition kind (query, indicator, report, view, datasource, parameter, format)
        kind: DefinitionKind,
        /// Definition identifier
        id: String,
    },
    /// Render a report view to stdout
    Render {
        /// JSON file holding an array of definitions
        #[arg(short, long)]
        definitions: String,
        /// JSON file mapping query identifiers to row arrays
        #[arg(long)]
        data: String,
        /// Report identifier
        report: String,
        /// View name or identifier; the first view when omitted
        #[arg(long)]
        view: Option<String>,
        /// Report argument as name=value; repeatable
        #[arg(short, long = "arg")]
        args: Vec<String>,
        /// JSON engine configuration file
        #[arg(long)]
        config: Option<String>,
        /// Annotate invalid elements instead of failing
        #[arg(long)]
        production: bool,
    },
    /// Evaluate one expression
    Eval {
        /// Expression text
        expression: String,
        /// JSON object used as the scope
        #[arg(short, long)]
        scope: Option<String>,
    },
}

fn main() -> Result<()> {
    human_panic::setup_panic!();

    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Resolve {
            definitions,
            kind,
            id,
        } => handle_resolve(&definitions, kind, &id),
        Commands::Render {
            definitions,
            data,
            report,
            view,
            args,
            config,
            production,
        } => handle_render(
            &definitions,
            &data,
            &report,
            view.as_deref(),
            &args,
            config.as_deref(),
            production,
        ),
        Commands::Eval { expression, scope } => handle_eval(&expression, scope.as_deref()),
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

fn load_repository(path: &str) -> Result<InMemoryRepository> {
    let json = fs::read_to_string(path).with_context(|| format!("reading '{path}'"))?;
    InMemoryRepository::from_json_str(&json).with_context(|| format!("loading definitions from '{path}'"))
}

fn handle_resolve(definitions: &str, kind: DefinitionKind, id: &str) -> Result<()> {
    let repository = load_repository(definitions)?;
    let resolver = ReferenceResolver::new(&repository);
    let resolved = match kind {
        DefinitionKind::Query => resolve::<QueryDefinition>(&resolver, id)?,
        DefinitionKind::Indicator => resolve::<IndicatorDefinition>(&resolver, id)?,
        DefinitionKind::Report => resolve::<ReportDefinition>(&resolver, id)?,
        DefinitionKind::View => resolve::<ViewDefinition>(&resolver, id)?,
        DefinitionKind::DataSource => resolve::<DataSourceDefinition>(&resolver, id)?,
        DefinitionKind::Parameter => resolve::<ParameterDefinition>(&resolver, id)?,
        DefinitionKind::Format => resolve::<FormatDefinition>(&resolver, id)?,
    };
    println!("{}", serde_json::to_string_pretty(&resolved)?);
    Ok(())
}

fn resolve<T: BiDefinition>(resolver: &ReferenceResolver<'_>, id: &str) -> Result<Definition> {
    Ok(resolver.resolve_by_id::<T>(id)?.into_definition())
}

fn handle_render(
    definitions: &str,
    data: &str,
    report: &str,
    view: Option<&str>,
    args: &[String],
    config: Option<&str>,
    production: bool,
) -> Result<()> {
    let repository = load_repository(definitions)?;
    let rows = fs::read_to_string(data).with_context(|| format!("reading '{data}'"))?;
    let source = MemoryDataSource::from_json_str(&rows).with_context(|| format!("loading rows from '{data}'"))?;

    let mut config = match config {
        Some(path) => {
            let json = fs::read_to_string(path).with_context(|| format!("reading '{path}'"))?;
            EngineConfig::from_json_str(&json).with_context(|| format!("loading configuration from '{path}'"))?
        }
        None => EngineConfig::default(),
    };
    if production {
        config.render_mode = RenderMode::Production;
    }

    let mut arguments = Arguments::new();
    for arg in args {
        let Some((name, value)) = arg.split_once('=') else {
            bail!("argument '{arg}' is not of the form name=value");
        };
        arguments.insert(name.trim(), value);
    }

    let engine = ReportEngine::new(&repository, &source).with_config(config);
    let mut out = Vec::new();
    engine.render_report(report, view, &arguments, &mut out)?;

    let mut stdout = io::stdout().lock();
    stdout.write_all(&out)?;
    writeln!(stdout)?;
    Ok(())
}

fn handle_eval(expression: &str, scope: Option<&str>) -> Result<()> {
    let scope = match scope {
        Some(json) => {
            let json: JsonValue = serde_json::from_str(json).context("parsing scope JSON")?;
            match Value::from(json) {
                Value::Object(record) => record,
                other => bail!("scope must be a JSON object, got {}", other.type_name()),
            }
        }
        None => Default::default(),
    };

    let evaluator = ExpressionEvaluator::default();
    let context = RenderContext::root(&scope);
    let value = evaluator.evaluate(&context, expression)?;
    println!("{}", serde_json::to_string(&value)?);
    Ok(())
}
