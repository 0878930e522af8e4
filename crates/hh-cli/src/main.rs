//! hhscan CLI

mod config;
mod scan;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use config::{ScanConfig, ScanOverrides, read_scan_config};

#[derive(Parser)]
#[command(name = "hhscan")]
#[command(about = "hhscan - BDT x Xbb working-point scan for HH4b categories")]
#[command(version)]
struct Cli {
    /// Log verbosity level (trace, debug, info, warn, error)
    #[arg(long, global = true, default_value = "warn")]
    log_level: tracing::Level,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan the cut grid, draw the maps and report the best working point
    Scan {
        /// Scan config (YAML, or JSON by extension)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Directory with the input archive; maps are written here
        #[arg(long)]
        plot_dir: Option<PathBuf>,

        /// Category label used in file names
        #[arg(long)]
        category: Option<String>,

        /// Input archive (overrides the path derived from plot dir and category)
        #[arg(short, long)]
        input: Option<PathBuf>,

        #[arg(long, allow_negative_numbers = true)]
        bdt_min: Option<f64>,
        #[arg(long, allow_negative_numbers = true)]
        bdt_max: Option<f64>,
        #[arg(long, allow_negative_numbers = true)]
        xbb_min: Option<f64>,
        #[arg(long, allow_negative_numbers = true)]
        xbb_max: Option<f64>,

        /// Cell annotation font size (pt)
        #[arg(long)]
        annot_fontsize: Option<f64>,

        /// Leave cut pairs without a record empty instead of failing
        #[arg(long)]
        allow_missing: bool,

        /// Also write each map as SVG plus its heatmap artifact JSON
        #[arg(long)]
        show: bool,

        /// Write the selection summary here (pretty JSON)
        #[arg(long)]
        summary: Option<PathBuf>,

        /// Skip rendering; only report the selection
        #[arg(long)]
        no_plots: bool,
    },

    /// Re-render a saved heatmap artifact (format from the output extension)
    Render {
        /// Heatmap artifact JSON
        #[arg(short, long)]
        input: PathBuf,

        /// Output file (.png, .pdf or .svg)
        #[arg(short, long)]
        output: PathBuf,

        /// Renderer config YAML
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Print version information
    Version,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so stdout carries only the report.
    tracing_subscriber::fmt()
        .with_max_level(cli.log_level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Scan {
            config,
            plot_dir,
            category,
            input,
            bdt_min,
            bdt_max,
            xbb_min,
            xbb_max,
            annot_fontsize,
            allow_missing,
            show,
            summary,
            no_plots,
        } => {
            let overrides = ScanOverrides {
                plot_dir,
                category,
                input,
                bdt_min,
                bdt_max,
                xbb_min,
                xbb_max,
                annot_fontsize,
                allow_missing,
                show,
            };
            cmd_scan(config.as_deref(), overrides, summary.as_ref(), !no_plots)
        }
        Commands::Render { input, output, config } => {
            cmd_render(&input, &output, config.as_deref())
        }
        Commands::Version => {
            println!("hhscan {}", hh_core::VERSION);
            Ok(())
        }
    }
}

fn cmd_scan(
    config: Option<&Path>,
    overrides: ScanOverrides,
    summary_out: Option<&PathBuf>,
    write_plots: bool,
) -> Result<()> {
    let cfg = match config {
        Some(path) => read_scan_config(path)?,
        None => ScanConfig::default(),
    };
    let settings = cfg.resolve(overrides)?;
    tracing::info!(
        category = %settings.category,
        input = %settings.input.display(),
        "starting scan"
    );

    let summary = scan::run_scan(&settings, write_plots)?;
    print!("{}", summary.report());

    if let Some(path) = summary_out {
        write_json(path, serde_json::to_value(&summary)?)?;
    }
    Ok(())
}

fn cmd_render(input: &Path, output: &Path, config: Option<&Path>) -> Result<()> {
    let yaml = config
        .map(|p| std::fs::read_to_string(p).with_context(|| format!("reading {}", p.display())))
        .transpose()?;
    let viz = hh_viz_render::config::resolve_config(yaml.as_deref())?;
    let json = std::fs::read_to_string(input)
        .with_context(|| format!("reading artifact {}", input.display()))?;
    let svg = hh_viz_render::render_svg_json(&json, "heatmap", &viz)?;
    let format = output
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("svg")
        .to_ascii_lowercase();
    let bytes = hh_viz_render::svg_to_bytes(svg, &format, &viz)?;
    std::fs::write(output, bytes).with_context(|| format!("writing {}", output.display()))?;
    tracing::info!(path = %output.display(), "wrote plot");
    Ok(())
}

fn write_json(path: &Path, value: serde_json::Value) -> Result<()> {
    std::fs::write(path, serde_json::to_string_pretty(&value)?)?;
    Ok(())
}
