//! Command-line interface for mapkit-rs
//!
//! Prints the tool catalog and runs tool calls against a headless
//! in-memory map, which is handy for checking what a model's tool calls
//! would do.

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand, ValueEnum};
use comfy_table::{Cell, Row, Table};
use mapkit_core::MemorySurface;
use mapkit_tools::{LayerSummary, MapToolProvider, ToolCall, ToolDefinition, ToolProvider};
use mapkit_utils::{DispatchMode, LogFormat, MapkitConfig};
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

#[derive(Parser, Debug)]
#[command(name = "mapkit")]
#[command(about = "Inspect and exercise the mapkit tool catalog", long_about = None)]
struct Args {
    /// JSON configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Override the dispatch mode
    #[arg(long, global = true, value_enum)]
    mode: Option<ModeArg>,

    /// Log output format
    #[arg(long, global = true, value_enum, default_value_t = LogFormatArg::Pretty)]
    log_format: LogFormatArg,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the tool catalog
    Catalog {
        /// Output format
        #[arg(short, long, value_enum, default_value_t = CatalogFormat::Json)]
        format: CatalogFormat,
    },

    /// Execute a single tool call
    Exec {
        /// Tool name
        #[arg(short, long)]
        tool: String,

        /// Tool parameters as a JSON object
        #[arg(short, long, default_value = "{}")]
        params: String,
    },

    /// Execute tool calls from a JSON Lines file, one {"name", "params"} per line
    Run {
        /// Input file, or "-" for stdin
        file: PathBuf,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum CatalogFormat {
    Json,
    Table,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum ModeArg {
    Deferred,
    Await,
}

impl From<ModeArg> for DispatchMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Deferred => DispatchMode::Deferred,
            ModeArg::Await => DispatchMode::AwaitCompletion,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum LogFormatArg {
    Pretty,
    Json,
}

impl From<LogFormatArg> for LogFormat {
    fn from(format: LogFormatArg) -> Self {
        match format {
            LogFormatArg::Pretty => LogFormat::Pretty,
            LogFormatArg::Json => LogFormat::Json,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    mapkit_utils::init_tracing_with(args.log_format.into());

    let config = load_config(args.config.as_deref(), args.mode)?;
    debug!(?config, "Configuration loaded");

    match args.command {
        Command::Catalog { format } => {
            let catalog = mapkit_tools::tools_for_llm();
            match format {
                CatalogFormat::Json => println!("{}", serde_json::to_string_pretty(&catalog)?),
                CatalogFormat::Table => println!("{}", catalog_table(&catalog)),
            }
            Ok(())
        }
        Command::Exec { tool, params } => {
            let params = serde_json::from_str(&params).context("Parameters are not valid JSON")?;
            run_calls(&config, vec![ToolCall::new(tool, params)]).await
        }
        Command::Run { file } => {
            let calls = parse_calls(&read_input(&file)?)?;
            info!(count = calls.len(), file = %file.display(), "Running tool calls");
            run_calls(&config, calls).await
        }
    }
}

/// Defaults, then the config file, then the environment, then flags
fn load_config(path: Option<&Path>, mode: Option<ModeArg>) -> Result<MapkitConfig> {
    let config = match path {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config {}", path.display()))?;
            MapkitConfig::from_json(&raw)
                .with_context(|| format!("Invalid config {}", path.display()))?
        }
        None => MapkitConfig::default(),
    };

    let mut config = config.with_env()?;
    if let Some(mode) = mode {
        config.dispatch_mode = mode.into();
    }
    Ok(config)
}

async fn run_calls(config: &MapkitConfig, calls: Vec<ToolCall>) -> Result<()> {
    let provider = MapToolProvider::with_config(MemorySurface::new(), config)?;

    let outcomes = provider.execute_all(&calls).await;
    for outcome in &outcomes {
        println!("{}", serde_json::to_string(outcome)?);
    }

    let layers = provider.layers().await?;
    if !layers.is_empty() {
        println!("{}", layers_table(&layers));
    }

    let failed = outcomes.iter().filter(|o| o.is_error()).count();
    if failed > 0 {
        bail!("{failed} of {} tool call(s) failed", outcomes.len());
    }
    Ok(())
}

fn read_input(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut input = String::new();
        std::io::stdin()
            .read_to_string(&mut input)
            .context("Failed to read stdin")?;
        return Ok(input);
    }

    std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

/// Parse JSON Lines, skipping blank lines and `#` comments
fn parse_calls(input: &str) -> Result<Vec<ToolCall>> {
    input
        .lines()
        .enumerate()
        .filter(|(_, line)| {
            let line = line.trim();
            !line.is_empty() && !line.starts_with('#')
        })
        .map(|(i, line)| {
            serde_json::from_str(line).with_context(|| format!("Invalid tool call on line {}", i + 1))
        })
        .collect()
}

fn catalog_table(catalog: &[ToolDefinition]) -> Table {
    let mut table = Table::new();
    table.set_header(Row::from(vec!["Tool", "Required", "Optional"]));

    for def in catalog {
        let schema = &def.input_schema;
        let optional: Vec<_> = schema
            .properties
            .keys()
            .filter(|name| !schema.is_required(name))
            .map(String::as_str)
            .collect();

        table.add_row(Row::from(vec![
            Cell::new(&def.name),
            Cell::new(schema.required.join(", ")),
            Cell::new(optional.join(", ")),
        ]));
    }

    table
}

fn layers_table(layers: &[LayerSummary]) -> Table {
    let count = |n: Option<usize>| n.map_or_else(|| "-".to_string(), |n| n.to_string());

    let mut table = Table::new();
    table.set_header(Row::from(vec!["Layer", "Points", "Lines", "Polygons"]));
    for layer in layers {
        table.add_row(Row::from(vec![
            Cell::new(&layer.name),
            Cell::new(count(layer.points)),
            Cell::new(count(layer.lines)),
            Cell::new(count(layer.polygons)),
        ]));
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use serde_json::json;

    #[test]
    fn test_args_definition() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_parse_exec_args() {
        let args = Args::try_parse_from([
            "mapkit",
            "--mode",
            "await",
            "exec",
            "--tool",
            "set_map_style",
            "--params",
            r#"{"styleUrl": "mapbox://styles/mapbox/dark-v11"}"#,
        ])
        .unwrap();

        assert_eq!(args.mode, Some(ModeArg::Await));
        let Command::Exec { tool, .. } = args.command else {
            panic!("Expected exec");
        };
        assert_eq!(tool, "set_map_style");
    }

    #[test]
    fn test_parse_calls() {
        let input = r#"
# draw a trip
{"name": "add_points_to_map", "params": {"points": [{"lat": 1, "lng": 2}]}}

{"name": "clear_map_layers"}
"#;
        let calls = parse_calls(input).unwrap();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].params["points"][0]["lat"], json!(1));
        assert_eq!(calls[1].name, "clear_map_layers");
    }

    #[test]
    fn test_parse_calls_reports_line() {
        let err = parse_calls("{\"name\": \"a\"}\nnot json").unwrap_err();
        assert!(err.to_string().contains("line 2"));
    }

    #[test]
    fn test_catalog_table() {
        let rendered = catalog_table(&mapkit_tools::tools_for_llm()).to_string();
        for def in mapkit_tools::tools_for_llm() {
            assert!(rendered.contains(&def.name));
        }
        assert!(rendered.contains("layerNames"));
    }

    #[test]
    fn test_layers_table() {
        let layers = vec![LayerSummary {
            name: "trip".to_string(),
            points: Some(3),
            lines: None,
            polygons: Some(1),
        }];
        let rendered = layers_table(&layers).to_string();
        assert!(rendered.contains("trip"));
        assert!(rendered.contains('3'));
        assert!(rendered.contains('-'));
    }

    #[test]
    fn test_load_config_mode_flag_wins() {
        let config = load_config(None, Some(ModeArg::Await)).unwrap();
        assert_eq!(config.dispatch_mode, DispatchMode::AwaitCompletion);
    }

    #[tokio::test]
    async fn test_run_calls_reports_failures() {
        let config = MapkitConfig::default();
        let ok = vec![ToolCall::new(
            "add_route_to_map",
            json!({"coordinates": [[0, 0], [1, 1]]}),
        )];
        assert!(run_calls(&config, ok).await.is_ok());

        let bad = vec![ToolCall::new("teleport", json!({}))];
        assert!(run_calls(&config, bad).await.is_err());
    }
}
