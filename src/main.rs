use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Instant;
use tracing::{debug, info};
use tracing_subscriber::{fmt, EnvFilter};

use testiq_visuals::config::{self, Config};
use testiq_visuals::question::{self, Question};
use testiq_visuals::render::{self, VisualGenerator};
use testiq_visuals::report;

const EXIT_SUCCESS: i32 = 0;
const EXIT_FAILURE: i32 = 1;
const EXIT_CONFIG: i32 = 4;

#[derive(Subcommand, Debug)]
enum Commands {
    /// Score questions and print the visual-need report (default if no subcommand)
    Analyze {
        /// YAML list of questions (defaults to the built-in sample)
        #[arg(short, long)]
        questions: Option<PathBuf>,

        /// Print the summary as JSON instead of the text report
        #[arg(long)]
        json: bool,

        /// Show how each score was built up
        #[arg(long)]
        breakdown: bool,
    },
    /// Render the diagram for one question
    Render {
        /// Question text
        #[arg(long)]
        content: String,

        /// Question category (spatial, logique, numerique, ...)
        #[arg(long, default_value = "")]
        category: String,

        /// Identifier used in log output
        #[arg(long, default_value = "Q0")]
        id: String,

        /// Write the PNG here instead of printing the data URI
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Render the matrix and Venn samples and print their sizes
    Demo,
    /// Write the built-in defaults to the config file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[derive(Parser, Debug)]
#[command(name = "testiq-visuals")]
#[command(about = "Visual-need scoring and diagram rendering for IQ-test questions", long_about = None)]
#[command(version)]
struct Cli {
    /// More log output (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Path to config file (defaults to ~/.config/testiq-visuals/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

fn init_logging(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let command = cli.command.unwrap_or(Commands::Analyze {
        questions: None,
        json: false,
        breakdown: false,
    });
    let start_time = Instant::now();

    if let Commands::Init { force } = command {
        let path = match cli.config.map_or_else(config::get_config_path, Ok) {
            Ok(p) => p,
            Err(e) => {
                eprintln!("Config error: {}", e);
                std::process::exit(EXIT_CONFIG);
            }
        };
        if let Err(e) = config::write_default_config(&path, force) {
            eprintln!("Config error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
        println!("Wrote default config to {}", path.display());
        std::process::exit(EXIT_SUCCESS);
    }

    // Load config
    let config = match config::load_config(cli.config) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };

    // Validate config at startup
    if let Err(errors) = config::validate_config(&config) {
        eprintln!("Config errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        std::process::exit(EXIT_CONFIG);
    }

    let code = match command {
        Commands::Analyze {
            questions,
            json,
            breakdown,
        } => run_analyze(&config, questions, json, breakdown),
        Commands::Render {
            content,
            category,
            id,
            output,
        } => run_render(&config, &id, Question::with_category(content, category), output),
        Commands::Demo => run_demo(&config),
        Commands::Init { .. } => EXIT_SUCCESS,
    };

    debug!(elapsed = ?start_time.elapsed(), "done");
    std::process::exit(code);
}

fn run_analyze(config: &Config, questions: Option<PathBuf>, json: bool, breakdown: bool) -> i32 {
    let questions = match questions {
        Some(path) => match question::load_questions(&path) {
            Ok(q) => q,
            Err(e) => {
                eprintln!("Error: {:#}", e);
                return EXIT_FAILURE;
            }
        },
        None => question::sample_questions(),
    };
    info!(count = questions.len(), "analyzing questions");

    let analyses = report::analyze_all(&questions, &config.scoring);
    let summary = report::summarize(&analyses);

    if json {
        match serde_json::to_string_pretty(&summary) {
            Ok(text) => println!("{}", text),
            Err(e) => {
                eprintln!("Failed to serialize summary: {}", e);
                return EXIT_FAILURE;
            }
        }
        return EXIT_SUCCESS;
    }

    let use_colors = report::should_use_colors();
    println!("{}", report::format_report_header(questions.len()));
    for (i, (question, analysis)) in questions.iter().zip(&analyses).enumerate() {
        println!();
        println!(
            "{}",
            report::format_analysis_entry(i + 1, question, analysis, use_colors)
        );
        if breakdown {
            println!("{}", report::format_breakdown(analysis));
        }
    }
    println!();
    println!("{}", report::format_summary(&summary, use_colors));
    println!();
    println!("{}", report::format_completion(&summary, use_colors));

    EXIT_SUCCESS
}

fn run_render(config: &Config, id: &str, question: Question, output: Option<PathBuf>) -> i32 {
    let generator = match VisualGenerator::new(&config.render) {
        Ok(g) => g,
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            return EXIT_CONFIG;
        }
    };

    let uri = match render::generate_visual_for_question(id, &question, &generator) {
        Ok(uri) => uri,
        Err(e) => {
            eprintln!("Render failed: {:#}", e);
            return EXIT_FAILURE;
        }
    };

    if uri.is_empty() {
        eprintln!("No visual applies to {}", id);
        return EXIT_SUCCESS;
    }

    match output {
        Some(path) => {
            if let Err(e) = render::write_png(&path, &uri) {
                eprintln!("Error: {:#}", e);
                return EXIT_FAILURE;
            }
            println!("Wrote {}", path.display());
        }
        None => println!("{}", uri),
    }
    EXIT_SUCCESS
}

fn run_demo(config: &Config) -> i32 {
    let generator = match VisualGenerator::new(&config.render) {
        Ok(g) => g,
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            return EXIT_CONFIG;
        }
    };

    println!("🎨 Test du générateur de visuels TestIQ...");
    let samples = [
        (
            "Q14",
            "matrice",
            Question::with_category("Matrice 2x2 avec rotation: trouvez l'élément manquant", "spatial"),
        ),
        (
            "Q45",
            "Venn",
            Question::with_category("Principe inclusion-exclusion ensembles A et B", "logique"),
        ),
    ];
    for (id, label, question) in &samples {
        match render::generate_visual_for_question(id, question, &generator) {
            Ok(uri) => println!("✅ Visuel {} généré: {} caractères", label, uri.chars().count()),
            Err(e) => {
                eprintln!("Render failed for {}: {:#}", id, e);
                return EXIT_FAILURE;
            }
        }
    }
    EXIT_SUCCESS
}
