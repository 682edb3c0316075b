use std::io::{self, Read};
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{CommandFactory, Parser};
use clap_complete::Shell;
use tracing::info;
use tracing_subscriber::EnvFilter;

use planet_labels::body::System;
use planet_labels::error::Error;
use planet_labels::export::{svg_to_pdf, svg_to_png};
use planet_labels::fonts::{ApproxMeasure, CosmicTextMeasure, TextMeasure};
use planet_labels::renderer::Renderer;
use planet_labels::theme::MapStyle;

/// Render a star system map with non-overlapping planet labels
#[derive(Parser, Debug)]
#[command(name = "planet-labels")]
#[command(version)]
#[command(about = "Render star system maps with planet labels to SVG, PNG, PDF or JSON", long_about = None)]
struct Args {
    /// System file, TOML or YAML (use "-" for stdin)
    #[arg(value_name = "SYSTEM", required_unless_present = "completions")]
    input: Option<PathBuf>,

    /// Output file path (extension determines format: .svg, .png, .pdf or .json)
    #[arg(short, long, value_name = "OUTPUT", required_unless_present = "completions")]
    output: Option<PathBuf>,

    /// Built-in style name or path to a TOML/YAML style file
    #[arg(short, long, value_name = "STYLE", default_value = "deep_space")]
    style: String,

    /// Map zoom factor
    #[arg(short, long, default_value_t = 1.0)]
    zoom: f64,

    /// View width in pixels (overrides the style)
    #[arg(long)]
    width: Option<f64>,

    /// View height in pixels (overrides the style)
    #[arg(long)]
    height: Option<f64>,

    /// Raster scale multiplier for PNG output
    #[arg(long, default_value_t = 1.0)]
    png_scale: f32,

    /// Size text with a fixed per-character advance instead of system fonts
    #[arg(long)]
    approx_metrics: bool,

    /// Log label placement decisions
    #[arg(short, long)]
    verbose: bool,

    /// Print shell completions and exit
    #[arg(long, value_name = "SHELL", value_enum)]
    completions: Option<Shell>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    if let Some(shell) = args.completions {
        clap_complete::generate(shell, &mut Args::command(), "planet-labels", &mut io::stdout());
        return Ok(());
    }

    let (Some(input), Some(output)) = (args.input.as_deref(), args.output.as_deref()) else {
        bail!("both SYSTEM and --output are required");
    };

    let mut style = MapStyle::resolve(&args.style)?;
    if let Some(width) = args.width {
        style.width = width;
    }
    if let Some(height) = args.height {
        style.height = height;
    }

    let system = if input.to_str() == Some("-") {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .context("Failed to read from stdin")?;
        System::from_str_any(&buffer)?
    } else {
        System::load(input)?
    };

    let output_ext = output
        .extension()
        .and_then(|e| e.to_str())
        .context("Output file has no extension")?
        .to_ascii_lowercase();

    let data = if args.approx_metrics {
        render(&system, &style, ApproxMeasure, args.zoom, &output_ext, args.png_scale)?
    } else {
        let measure = CosmicTextMeasure::new(style.font_family.clone());
        render(&system, &style, measure, args.zoom, &output_ext, args.png_scale)?
    };

    std::fs::write(output, data)
        .with_context(|| format!("Failed to write {}", output.display()))?;
    info!(output = %output.display(), format = %output_ext, "map saved");
    Ok(())
}

fn render<M: TextMeasure>(
    system: &System,
    style: &MapStyle,
    measure: M,
    zoom: f64,
    format: &str,
    png_scale: f32,
) -> Result<Vec<u8>> {
    let mut renderer = Renderer::new(style, measure, zoom);
    let data = match format {
        "svg" => renderer.render_svg(system).into_bytes(),
        "png" => svg_to_png(&renderer.render_svg(system), png_scale)?,
        "pdf" => svg_to_pdf(&renderer.render_svg(system))?,
        "json" => serde_json::to_vec_pretty(&renderer.render_commands(system))?,
        other => return Err(Error::UnsupportedFormat(other.to_string()).into()),
    };
    Ok(data)
}

fn init_tracing(verbose: bool) {
    let default = if verbose {
        "planet_labels=debug"
    } else {
        "planet_labels=info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}
