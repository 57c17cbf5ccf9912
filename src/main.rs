use std::io::{self, Write};
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use serde_json::{json, Value};
use tracing_subscriber::fmt::MakeWriter;

use vitals_triage::assess::{self, Verdict};
use vitals_triage::{run_assessment, FailurePolicy, HttpPageSource, Settings};

#[derive(Parser)]
#[command(name = "vitals_triage", about = "Patient vitals risk triage over a paginated API")]
struct Cli {
    /// Settings file (toml, json or yaml); VITALS_* variables override it
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch every page and print the categorized report
    Run {
        #[arg(short, long, value_enum, default_value_t = Format::Text)]
        format: Format,
        /// Return results gathered so far if a page keeps failing
        #[arg(long)]
        partial: bool,
        #[command(flatten)]
        overrides: Overrides,
    },
    /// Score one record locally, without touching the network
    Score {
        #[arg(long)]
        id: Option<String>,
        /// Blood pressure as systolic/diastolic, e.g. 130/85
        #[arg(long)]
        bp: Option<String>,
        /// Degrees Fahrenheit
        #[arg(long)]
        temperature: Option<String>,
        #[arg(long)]
        age: Option<String>,
    },
    /// Show the effective settings (credential redacted)
    Config {
        #[command(flatten)]
        overrides: Overrides,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Text,
    Json,
}

#[derive(Args)]
struct Overrides {
    #[arg(long)]
    base_url: Option<String>,
    #[arg(long)]
    api_key: Option<String>,
    #[arg(long)]
    page_size: Option<u32>,
    #[arg(long)]
    request_timeout_ms: Option<u64>,
    #[arg(long)]
    max_attempts: Option<u32>,
    #[arg(long)]
    backoff_unit_ms: Option<u64>,
    #[arg(long)]
    page_delay_ms: Option<u64>,
}

impl Overrides {
    fn apply(self, settings: &mut Settings) {
        if let Some(v) = self.base_url {
            settings.base_url = v;
        }
        if let Some(v) = self.api_key {
            settings.api_key = v;
        }
        if let Some(v) = self.page_size {
            settings.page_size = v;
        }
        if let Some(v) = self.request_timeout_ms {
            settings.request_timeout_ms = v;
        }
        if let Some(v) = self.max_attempts {
            settings.max_attempts = v;
        }
        if let Some(v) = self.backoff_unit_ms {
            settings.backoff_unit_ms = v;
        }
        if let Some(v) = self.page_delay_ms {
            settings.page_delay_ms = v;
        }
    }
}

fn load_settings(path: Option<&PathBuf>, overrides: Overrides) -> Result<Settings> {
    let mut settings = Settings::load(path.map(PathBuf::as_path)).context("Failed to load settings")?;
    overrides.apply(&mut settings);
    Ok(settings)
}

/// Log sink that clears the spinner around each line. Logs stay off stdout,
/// which carries the report.
#[derive(Clone)]
struct SpinnerWriter(ProgressBar);

impl Write for SpinnerWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.suspend(|| io::stderr().write(buf))
    }

    fn write_all(&mut self, buf: &[u8]) -> io::Result<()> {
        self.0.suspend(|| io::stderr().write_all(buf))
    }

    fn flush(&mut self) -> io::Result<()> {
        io::stderr().flush()
    }
}

impl<'a> MakeWriter<'a> for SpinnerWriter {
    type Writer = SpinnerWriter;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Hidden until a run starts, so other commands never draw it.
    let spinner = ProgressBar::hidden();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_writer(SpinnerWriter(spinner.clone()))
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            format,
            partial,
            overrides,
        } => {
            let mut settings = load_settings(cli.config.as_ref(), overrides)?;
            if partial {
                settings.failure_policy = FailurePolicy::Partial;
            }
            settings.validate()?;

            let source = HttpPageSource::new(&settings).context("Failed to build HTTP client")?;

            spinner.set_draw_target(ProgressDrawTarget::stderr());
            spinner.set_style(
                ProgressStyle::default_spinner().template("{spinner} [{elapsed_precise}] {msg}")?,
            );
            spinner.set_message(format!("fetching {}", settings.base_url));
            spinner.enable_steady_tick(Duration::from_millis(120));

            let result = run_assessment(&source, &settings).await;
            spinner.finish_and_clear();
            let report = result.context("Assessment aborted, no report produced")?;

            match format {
                Format::Text => report.print(),
                Format::Json => println!("{}", serde_json::to_string_pretty(&report)?),
            }
        }
        Commands::Score {
            id,
            bp,
            temperature,
            age,
        } => {
            let record = json!({
                "patient_id": id.map(Value::String),
                "blood_pressure": bp.map(Value::String),
                "temperature": temperature.map(Value::String),
                "age": age.map(Value::String),
            });
            print_classification(&assess::classify(&record));
        }
        Commands::Config { overrides } => {
            let settings = load_settings(cli.config.as_ref(), overrides)?;
            println!("{}", serde_json::to_string_pretty(&settings.redacted())?);
            if let Err(e) = settings.validate() {
                println!("\nwarning: {}", e);
            }
        }
    }

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        eprintln!("\nDone in {}", format_duration(elapsed));
    }

    Ok(())
}

fn print_classification(c: &assess::Classification) {
    println!("Patient:  {}", c.patient_id);
    match &c.verdict {
        Verdict::Scored(b) => {
            println!(
                "Score:    {} (blood pressure {}, temperature {}, age {})",
                b.total(),
                b.blood_pressure,
                b.temperature,
                b.age
            );
            println!("High risk: {}", if b.is_high_risk() { "yes" } else { "no" });
        }
        Verdict::Unscorable(defects) => {
            println!("Unscorable: {:?}", defects);
        }
    }
    println!("Fever:    {}", if c.fever { "yes" } else { "no" });
}

fn format_duration(d: Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        format!("{:.1}s", d.as_secs_f64())
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m {}s", secs / 3600, (secs % 3600) / 60, secs % 60)
    }
}
