use clap::{Parser, Subcommand, ValueEnum};
use std::borrow::Cow;
use std::path::PathBuf;
use tracing::{debug, error};

use journal_screen::config::{self, Config};
use journal_screen::input::{collect_sources, read_source, InputText};
use journal_screen::output::{self, ScoredText};
use journal_screen::scoring::{self, Preset, ScoringConfig, ScoringEngine};

const EXIT_SUCCESS: i32 = 0;
const EXIT_INPUT: i32 = 2;
const EXIT_OUTPUT: i32 = 3;
const EXIT_CONFIG: i32 = 4;

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq, Default)]
enum OutputFormat {
    #[default]
    Text,
    Tsv,
    Json,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq, Default)]
enum RulesFormat {
    #[default]
    Text,
    Json,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Score text and report its severity category
    Analyze {
        /// Text to analyze (words are joined with spaces); reads stdin if no text or file is given
        text: Vec<String>,

        /// Analyze a file; may be repeated, each file is scored separately
        #[arg(short, long = "file", value_name = "PATH")]
        files: Vec<PathBuf>,

        /// Built-in rule table (overrides the config file's rules)
        #[arg(short, long)]
        preset: Option<Preset>,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,

        /// Show the contribution of every matched rule
        #[arg(short, long)]
        breakdown: bool,

        /// Disable colored output
        #[arg(long)]
        no_color: bool,
    },
    /// Print the category and interpretation for a score
    Classify {
        /// Score to classify
        #[arg(allow_negative_numbers = true)]
        score: f64,
    },
    /// List the active scoring rules
    Rules {
        /// Built-in rule table (overrides the config file's rules)
        #[arg(short, long)]
        preset: Option<Preset>,

        /// Output format
        #[arg(long, value_enum, default_value_t = RulesFormat::Text)]
        format: RulesFormat,
    },
    /// Write a starter config file with the full rule table spelled out
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },
}

#[derive(Parser, Debug)]
#[command(name = "journal-screen")]
#[command(about = "Keyword-based screening of journal text for depressive sentiment", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/journal-screen/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

fn main() {
    let cli = Cli::parse();
    journal_screen::logging::init_tracing(cli.verbose);

    let code = match cli.command {
        Commands::Classify { score } => {
            let classification = scoring::classify(score);
            println!(
                "{}",
                output::format_classification(score, &classification, output::should_use_colors())
            );
            EXIT_SUCCESS
        }
        Commands::Init { force } => run_init(cli.config, force),
        Commands::Rules { preset, format } => run_rules(cli.config, preset, format),
        Commands::Analyze {
            text,
            files,
            preset,
            format,
            breakdown,
            no_color,
        } => {
            let use_colors = !no_color && output::should_use_colors();
            run_analyze(cli.config, &text, &files, preset, format, breakdown, use_colors)
        }
    };

    std::process::exit(code);
}

/// Load config and resolve the scoring section, letting `--preset` win.
fn resolve_scoring(config_path: Option<PathBuf>, preset: Option<Preset>) -> Result<ScoringConfig, i32> {
    let config = match config::load_config(config_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            return Err(EXIT_CONFIG);
        }
    };

    let scoring = effective_scoring(&config, preset);
    if let Err(errors) = scoring::validate_scoring(&scoring) {
        eprintln!("Scoring config errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        return Err(EXIT_CONFIG);
    }
    Ok(scoring)
}

fn effective_scoring(config: &Config, preset: Option<Preset>) -> ScoringConfig {
    let scoring = config.effective_scoring();
    match preset {
        Some(p) => scoring.with_preset(p),
        None => scoring,
    }
}

/// Shared built-in engine when possible, otherwise one compiled from config.
fn build_engine(scoring: &ScoringConfig) -> Result<Cow<'static, ScoringEngine>, i32> {
    if scoring.is_builtin() {
        debug!(preset = scoring.effective_preset().name(), "using built-in rules");
        return Ok(Cow::Borrowed(ScoringEngine::preset(
            scoring.effective_preset(),
        )));
    }
    match ScoringEngine::from_config(scoring) {
        Ok(engine) => {
            debug!(rules = engine.rules().count(), baseline = engine.baseline(), "using configured rules");
            Ok(Cow::Owned(engine))
        }
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            Err(EXIT_CONFIG)
        }
    }
}

fn run_analyze(
    config_path: Option<PathBuf>,
    text: &[String],
    files: &[PathBuf],
    preset: Option<Preset>,
    format: OutputFormat,
    breakdown: bool,
    use_colors: bool,
) -> i32 {
    let engine = match resolve_scoring(config_path, preset).and_then(|s| build_engine(&s)) {
        Ok(e) => e,
        Err(code) => return code,
    };

    let mut inputs: Vec<InputText> = Vec::new();
    for source in collect_sources(text, files) {
        match read_source(&source) {
            Ok(input) => inputs.push(input),
            Err(e) => {
                error!("{:#}", e);
                eprintln!("Input error: {:#}", e);
                return EXIT_INPUT;
            }
        }
    }

    let results: Vec<_> = inputs.iter().map(|input| engine.analyze(&input.text)).collect();
    let scored: Vec<ScoredText> = inputs
        .iter()
        .zip(results.iter())
        .map(|(input, result)| ScoredText {
            label: &input.label,
            result,
        })
        .collect();

    match format {
        OutputFormat::Text => println!("{}", output::format_analyses(&scored, breakdown, use_colors)),
        OutputFormat::Tsv => println!("{}", output::format_tsv(&scored)),
        OutputFormat::Json => return print_json(output::format_json(&scored)),
    }

    EXIT_SUCCESS
}

fn run_rules(config_path: Option<PathBuf>, preset: Option<Preset>, format: RulesFormat) -> i32 {
    let engine = match resolve_scoring(config_path, preset).and_then(|s| build_engine(&s)) {
        Ok(e) => e,
        Err(code) => return code,
    };

    match format {
        RulesFormat::Text => println!(
            "{}",
            output::format_rules_table(engine.rules(), engine.baseline(), output::should_use_colors())
        ),
        RulesFormat::Json => {
            return print_json(output::format_rules_json(engine.rules(), engine.baseline()))
        }
    }
    EXIT_SUCCESS
}

/// Print rendered JSON, or report the serialization failure.
fn print_json(rendered: anyhow::Result<String>) -> i32 {
    match rendered {
        Ok(json) => {
            println!("{}", json);
            EXIT_SUCCESS
        }
        Err(e) => {
            eprintln!("Output error: {:#}", e);
            EXIT_OUTPUT
        }
    }
}

fn run_init(config_path: Option<PathBuf>, force: bool) -> i32 {
    let path = match config_path {
        Some(p) => p,
        None => match config::get_config_path() {
            Ok(p) => p,
            Err(e) => {
                eprintln!("Config error: {:#}", e);
                return EXIT_CONFIG;
            }
        },
    };

    match config::write_starter_config(&path, force) {
        Ok(()) => {
            println!("Config written to {}", path.display());
            EXIT_SUCCESS
        }
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            EXIT_CONFIG
        }
    }
}
