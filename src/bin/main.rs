use aerostack_rs::airfoil::generate::{GeometryCache, Naca4Digit, TrailingEdge};
use aerostack_rs::airfoil::presets::{get_preset, list_presets, AirfoilPreset};
use aerostack_rs::{analyze, AeroError, AnalyzeRequest, ValidationError};
use clap::{ArgGroup, Args, Parser, Subcommand};
use serde::Serialize;
use serde_json::json;
use std::fs;
use std::path::PathBuf;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
enum CliError {
    #[error(transparent)]
    Aero(#[from] AeroError),

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl From<ValidationError> for CliError {
    fn from(e: ValidationError) -> Self {
        CliError::Aero(e.into())
    }
}

type CliResult<T> = Result<T, CliError>;

#[derive(Parser)]
#[command(name = "aerostack")]
#[command(about = "2D airfoil analysis with thin-airfoil theory and a panel method", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct SamplingArgs {
    /// Chord length
    #[arg(long, default_value_t = 1.0)]
    chord: f64,
    /// Number of cosine spaced stations per surface
    #[arg(long, default_value_t = 200)]
    n_points: usize,
}

#[derive(Subcommand)]
enum Commands {
    /// List the preset airfoil catalog
    Presets,
    /// Sample the surfaces of a NACA 4-digit airfoil
    Naca {
        /// Four digit code, e.g. 2412
        digits: String,
        #[command(flatten)]
        sampling: SamplingArgs,
        /// Use the closed trailing edge thickness distribution
        #[arg(long)]
        closed_te: bool,
    },
    /// Show a preset and its sampled surfaces
    Preset {
        /// Preset id, e.g. naca-2412
        id: String,
        #[command(flatten)]
        sampling: SamplingArgs,
    },
    /// Run both solvers on a NACA code, a preset or a JSON geometry file
    #[command(group(ArgGroup::new("source").required(true).args(["digits", "preset", "file"])))]
    Analyze {
        /// Four digit NACA code
        #[arg(long)]
        digits: Option<String>,
        /// Preset id
        #[arg(long)]
        preset: Option<String>,
        /// JSON file with x, yu, yl and optionally alpha_deg, V_inf, panels
        #[arg(long)]
        file: Option<PathBuf>,
        /// Angles of attack in degrees, one report each. Defaults to the preset's angle or 4
        #[arg(long, num_args = 1.., allow_negative_numbers = true)]
        alpha: Vec<f64>,
        /// Number of panels
        #[arg(long)]
        panels: Option<usize>,
        /// Freestream speed
        #[arg(long)]
        v_inf: Option<f64>,
        #[command(flatten)]
        sampling: SamplingArgs,
    },
}

fn main() -> CliResult<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let mut cache = GeometryCache::default();

    match cli.command {
        Commands::Presets => print_json(&json!({ "presets": list_presets()? })),
        Commands::Naca {
            digits,
            sampling,
            closed_te,
        } => cmd_naca(&mut cache, &digits, &sampling, closed_te),
        Commands::Preset { id, sampling } => cmd_preset(&id, &sampling),
        Commands::Analyze {
            digits,
            preset,
            file,
            alpha,
            panels,
            v_inf,
            sampling,
        } => {
            let source = match (digits, preset, file) {
                (Some(d), _, _) => Source::Digits(d),
                (_, Some(id), _) => Source::Preset(get_preset(&id)?),
                (_, _, Some(path)) => Source::File(read_request(path)?),
                (None, None, None) => unreachable!("clap requires one geometry source"),
            };
            let angles: Vec<Option<f64>> = if alpha.is_empty() {
                vec![None]
            } else {
                alpha.into_iter().map(Some).collect()
            };

            let mut reports = Vec::with_capacity(angles.len());
            for angle in angles {
                let mut request = source.request(&mut cache, &sampling, angle)?;
                if let Some(n) = panels {
                    request.panels = n;
                }
                if let Some(v) = v_inf {
                    request.v_inf = v;
                }
                reports.push(analyze(&request)?);
            }

            if let [report] = reports.as_slice() {
                print_json(report)
            } else {
                print_json(&reports)
            }
        }
    }
}

/// Where the analyzed geometry comes from
enum Source {
    Digits(String),
    Preset(&'static AirfoilPreset),
    File(AnalyzeRequest),
}

impl Source {
    fn request(
        &self,
        cache: &mut GeometryCache,
        sampling: &SamplingArgs,
        alpha: Option<f64>,
    ) -> CliResult<AnalyzeRequest> {
        match self {
            Source::Digits(d) => naca_request(cache, d, sampling, alpha.unwrap_or(4.0)),
            Source::Preset(p) => {
                naca_request(cache, p.digits, sampling, alpha.unwrap_or(p.default_alpha))
            }
            Source::File(base) => {
                let mut request = base.clone();
                if let Some(a) = alpha {
                    request.alpha_deg = a;
                }
                Ok(request)
            }
        }
    }
}

fn cmd_naca(
    cache: &mut GeometryCache,
    digits: &str,
    sampling: &SamplingArgs,
    closed_te: bool,
) -> CliResult<()> {
    let trailing_edge = if closed_te {
        TrailingEdge::Closed
    } else {
        TrailingEdge::Open
    };
    let naca = Naca4Digit::from_code(digits, sampling.chord)?;
    let samples =
        cache.get_or_generate(digits, sampling.chord, sampling.n_points, trailing_edge)?;

    print_json(&json!({
        "digits": digits,
        "chord": sampling.chord,
        "n_points": sampling.n_points,
        "metrics": naca.metrics(),
        "x": samples.x,
        "yu": samples.yu,
        "yl": samples.yl,
    }))
}

fn cmd_preset(id: &str, sampling: &SamplingArgs) -> CliResult<()> {
    let preset = get_preset(id)?;
    let samples = preset.generate(sampling.chord, sampling.n_points)?;

    print_json(&json!({
        "preset": preset.summary()?,
        "geometry": {
            "chord": sampling.chord,
            "n_points": sampling.n_points,
            "x": samples.x,
            "yu": samples.yu,
            "yl": samples.yl,
        },
    }))
}

fn naca_request(
    cache: &mut GeometryCache,
    digits: &str,
    sampling: &SamplingArgs,
    alpha_deg: f64,
) -> CliResult<AnalyzeRequest> {
    let samples = cache.get_or_generate(
        digits,
        sampling.chord,
        sampling.n_points,
        TrailingEdge::Open,
    )?;
    debug!(digits, alpha_deg, cached = cache.len(), "built analysis request");
    Ok(AnalyzeRequest::from_samples(samples, alpha_deg))
}

fn read_request(path: PathBuf) -> CliResult<AnalyzeRequest> {
    let text = fs::read_to_string(&path).map_err(|source| CliError::Io { path, source })?;
    Ok(serde_json::from_str(&text)?)
}

fn print_json<T: Serialize>(value: &T) -> CliResult<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
