mod config;
mod export;
mod output;
mod prompt;
mod simulate;

use clap::Parser;
use elocompare_core::{ChoiceProvider, Session, SessionConfig, SessionResults};
use std::io;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

use crate::config::ElocompareConfig;
use crate::prompt::TerminalJudge;
use crate::simulate::{SimulatedJudge, rank_agreement, trailing_displacement};

/// Report an unrecoverable CLI error and exit with status 2.
pub fn fatal(err: impl std::fmt::Display) -> ! {
    eprintln!("elocompare: {err}");
    std::process::exit(2);
}

#[derive(Parser)]
#[command(name = "elocompare", version, about = "Pairwise preference experiments with Elo scoring")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Run an interactive comparison session in the terminal
    Run(RunArgs),
    /// Run a session against a simulated judge with hidden item strengths
    Simulate(SimulateArgs),
    /// Create a default config file at ~/.config/elocompare/config.toml
    Init,
}

#[derive(clap::Args)]
struct ItemArgs {
    /// Directory whose files are the items (e.g. a folder of images)
    #[arg(long)]
    dir: Option<PathBuf>,

    /// File with one item per line, or a JSON array of strings
    #[arg(long)]
    items: Option<PathBuf>,

    /// Inline item (repeatable)
    #[arg(long = "item")]
    inline_items: Vec<String>,
}

#[derive(clap::Args)]
struct SessionArgs {
    /// Rounds before the session ends on its own
    #[arg(long)]
    rounds: Option<usize>,

    /// Elo K-factor
    #[arg(long)]
    k_factor: Option<f64>,

    /// Number of recently shown items kept out of the next pair
    #[arg(long)]
    recency_window: Option<usize>,

    /// Seed for reproducible pair selection
    #[arg(long)]
    seed: Option<u64>,

    /// Output JSON instead of a table
    #[arg(long)]
    json: bool,

    /// Debug logging for every round
    #[arg(short, long)]
    verbose: bool,

    /// Path to config file (default: ~/.config/elocompare/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Parser)]
struct RunArgs {
    #[command(flatten)]
    source: ItemArgs,

    #[command(flatten)]
    session: SessionArgs,

    /// Round log CSV (default: results.csv)
    #[arg(long)]
    results: Option<PathBuf>,

    /// Final scores CSV (default: rankings.csv)
    #[arg(long)]
    rankings: Option<PathBuf>,
}

#[derive(Parser)]
struct SimulateArgs {
    #[command(flatten)]
    source: ItemArgs,

    /// Generate this many placeholder items instead of reading them
    #[arg(long)]
    count: Option<usize>,

    #[command(flatten)]
    session: SessionArgs,

    /// Probability that the simulated judge answers at random
    #[arg(long, default_value_t = 0.0)]
    noise: f64,

    /// Round log CSV (not written unless given)
    #[arg(long)]
    results: Option<PathBuf>,

    /// Final scores CSV (not written unless given)
    #[arg(long)]
    rankings: Option<PathBuf>,
}

/// An item list is either a JSON array of strings or one item per line.
/// Entries are trimmed and blanks dropped in both forms.
fn parse_item_list(content: &str) -> Result<Vec<String>, serde_json::Error> {
    let content = content.trim_start();
    let raw: Vec<String> = if content.starts_with('[') {
        serde_json::from_str(content)?
    } else {
        content.lines().map(str::to_owned).collect()
    };
    Ok(raw.iter()
        .map(|entry| entry.trim())
        .filter(|entry| !entry.is_empty())
        .map(str::to_owned)
        .collect())
}

/// File names of the regular files in `dir`, sorted so the pool order is stable.
fn list_dir_items(dir: &Path) -> Vec<String> {
    let entries = std::fs::read_dir(dir)
        .unwrap_or_else(|e| fatal(format!("Failed to read directory {}: {e}", dir.display())));

    let mut items = Vec::new();
    for entry in entries {
        let entry = entry
            .unwrap_or_else(|e| fatal(format!("Failed to read directory {}: {e}", dir.display())));
        let is_file = entry.file_type().map(|t| t.is_file()).unwrap_or(false);
        if !is_file {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.starts_with('.') {
            continue;
        }
        items.push(name);
    }
    items.sort();
    items
}

/// Load items from all sources: --dir, --items file, --item inline args.
fn load_items(args: &ItemArgs) -> Vec<String> {
    let mut items = Vec::new();

    if let Some(ref dir) = args.dir {
        items.extend(list_dir_items(dir));
    }

    if let Some(ref path) = args.items {
        let content = std::fs::read_to_string(path)
            .unwrap_or_else(|e| fatal(format!("Failed to read items file {}: {e}", path.display())));
        let listed = parse_item_list(&content)
            .unwrap_or_else(|e| fatal(format!("{} is not a valid JSON item list: {e}", path.display())));
        items.extend(listed);
    }

    items.extend(args.inline_items.iter().cloned());
    items
}

/// Merge CLI flags over config file values over built-in defaults.
fn session_config(args: &SessionArgs, cfg: &ElocompareConfig) -> SessionConfig {
    let defaults = SessionConfig::default();

    let k_factor = args.k_factor.or(cfg.k_factor).unwrap_or(defaults.k_factor);
    if !k_factor.is_finite() || k_factor <= 0.0 {
        fatal(format!("--k-factor must be a positive number, got {k_factor}"));
    }

    let max_rounds = args.rounds.or(cfg.rounds).unwrap_or(defaults.max_rounds);
    if max_rounds == 0 {
        fatal("--rounds must be at least 1");
    }

    SessionConfig {
        k_factor,
        max_rounds,
        recency_window: args.recency_window.or(cfg.recency_window).unwrap_or(defaults.recency_window),
        initial_rating: defaults.initial_rating,
        seed: args.seed,
    }
}

fn init_logging(verbose: bool) {
    let default_directives = if verbose {
        "elocompare=debug,elocompare_core=debug"
    } else {
        "elocompare=info,elocompare_core=warn"
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run(args) => {
            init_logging(args.session.verbose);
            run_interactive(args);
        }
        Commands::Simulate(args) => {
            init_logging(args.session.verbose);
            run_simulation(args);
        }
        Commands::Init => {
            let path = ElocompareConfig::default_path()
                .unwrap_or_else(|| fatal("HOME is not set, cannot locate the config directory"));
            ElocompareConfig::write_template(&path).unwrap_or_else(|e| fatal(e));
            println!("Wrote {}; uncomment the keys you want to change.", path.display());
        }
    }
}

fn load_config_for(args: &SessionArgs) -> ElocompareConfig {
    match args.config.clone().or_else(ElocompareConfig::default_path) {
        Some(path) => ElocompareConfig::load(&path).unwrap_or_else(|e| fatal(e)),
        None => ElocompareConfig::default(),
    }
}

fn start_session(items: Vec<String>, config: SessionConfig) -> Session {
    Session::new(items, config).unwrap_or_else(|e| fatal(e))
}

/// Drive the session to completion and hand its results back.
fn play(session: &mut Session, judge: &mut impl ChoiceProvider) -> SessionResults {
    session.run(judge).unwrap_or_else(|e| fatal(e)).clone()
}

/// Write the round log and the score table.
fn save_results(results: &SessionResults, results_path: Option<&Path>, rankings_path: Option<&Path>) {
    if let Some(path) = results_path {
        export::write_results_csv(path, &results.records)
            .unwrap_or_else(|e| fatal(format!("Failed to write {}: {e}", path.display())));
        tracing::info!(path = %path.display(), rows = results.records.len(), "Round log written");
    }
    if let Some(path) = rankings_path {
        export::write_rankings_csv(path, &results.final_ratings)
            .unwrap_or_else(|e| fatal(format!("Failed to write {}: {e}", path.display())));
        tracing::info!(path = %path.display(), rows = results.final_ratings.len(), "Final scores written");
    }
}

fn print_standings(session: &Session, results: &SessionResults, json: bool) {
    let rows = output::build_rows(results, session.pool());
    if json {
        output::print_json(&rows, results, session.k_factor());
    } else {
        output::print_table(&rows, results);
    }
}

fn run_interactive(args: RunArgs) {
    let cfg = load_config_for(&args.session);
    let config = session_config(&args.session, &cfg);

    let results_path = args.results.clone()
        .or_else(|| cfg.results.as_ref().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from("results.csv"));
    let rankings_path = args.rankings.clone()
        .or_else(|| cfg.rankings.as_ref().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from("rankings.csv"));

    let items = load_items(&args.source);
    if items.is_empty() {
        fatal("No items provided. Use --dir <DIR>, --items <FILE>, or --item <NAME>.");
    }

    let max_rounds = config.max_rounds;
    let mut session = start_session(items, config);
    tracing::info!(
        items = session.pool().len(),
        max_rounds,
        k_factor = session.k_factor(),
        "Starting comparison session"
    );
    if let Some(ref dir) = args.source.dir {
        eprintln!("Items are files in {}", dir.display());
    }

    let mut judge = TerminalJudge::new(io::stdin().lock(), io::stderr(), max_rounds);
    let results = play(&mut session, &mut judge);

    // Persist first, then acknowledge.
    save_results(&results, Some(results_path.as_path()), Some(rankings_path.as_path()));
    eprintln!("\nTest finished. Results saved. Thank you for taking part!");

    print_standings(&session, &results, args.session.json);
}

fn run_simulation(args: SimulateArgs) {
    let cfg = load_config_for(&args.session);
    let config = session_config(&args.session, &cfg);

    if !(0.0..=1.0).contains(&args.noise) {
        fatal(format!("--noise must be between 0.0 and 1.0, got {}", args.noise));
    }

    let items = match args.count {
        Some(count) => (1..=count).map(|i| format!("item_{i:03}")).collect(),
        None => load_items(&args.source),
    };

    let seed = config.seed;
    let mut session = start_session(items, config);
    let mut judge = SimulatedJudge::random(session.pool().all_items(), args.noise, seed);

    tracing::info!(
        items = session.pool().len(),
        max_rounds = session.max_rounds(),
        k_factor = session.k_factor(),
        noise = args.noise,
        "Starting simulated session"
    );

    let results = play(&mut session, &mut judge);
    save_results(&results, args.results.as_deref(), args.rankings.as_deref());

    let agreement = rank_agreement(&results.standings(), &judge.true_order());
    let trailing = trailing_displacement(&results.records, 100);
    tracing::info!(agreement, trailing_displacement = trailing, "Simulation finished");

    print_standings(&session, &results, args.session.json);
    if !args.session.json {
        println!("Rank agreement with hidden strengths (Spearman): {agreement:.3}");
        println!("Mean rank displacement over the last 100 rounds: {trailing:.3}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use elocompare_core::constants::DEFAULT_K_FACTOR;

    fn session_args() -> SessionArgs {
        SessionArgs {
            rounds: None,
            k_factor: None,
            recency_window: None,
            seed: None,
            json: false,
            verbose: false,
            config: None,
        }
    }

    #[test]
    fn test_parse_items_plain_text() {
        let items = parse_item_list("a.png\n\n  b.png  \nc.png\n").unwrap();
        assert_eq!(items, vec!["a.png", "b.png", "c.png"]);
    }

    #[test]
    fn test_parse_items_json_array() {
        let items = parse_item_list(r#"  ["x.jpg", "", " y.jpg "]"#).unwrap();
        assert_eq!(items, vec!["x.jpg", "y.jpg"]);
    }

    #[test]
    fn test_parse_items_rejects_malformed_json() {
        assert!(parse_item_list(r#"["x.jpg", 3]"#).is_err());
    }

    #[test]
    fn test_list_dir_items_sorted_files_only() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("b.jpg"), b"").unwrap();
        std::fs::write(dir.path().join("a.jpg"), b"").unwrap();
        std::fs::write(dir.path().join(".hidden"), b"").unwrap();
        std::fs::create_dir(dir.path().join("subdir")).unwrap();

        assert_eq!(list_dir_items(dir.path()), vec!["a.jpg", "b.jpg"]);
    }

    #[test]
    fn test_session_config_defaults() {
        let config = session_config(&session_args(), &ElocompareConfig::default());
        assert_eq!(config.k_factor, DEFAULT_K_FACTOR);
        assert_eq!(config.max_rounds, 2000);
        assert_eq!(config.recency_window, 10);
        assert_eq!(config.seed, None);
    }

    #[test]
    fn test_cli_flags_override_config() {
        let cfg = ElocompareConfig {
            rounds: Some(300),
            k_factor: Some(16.0),
            recency_window: Some(4),
            ..ElocompareConfig::default()
        };
        let args = SessionArgs { rounds: Some(50), seed: Some(9), ..session_args() };
        let config = session_config(&args, &cfg);
        assert_eq!(config.max_rounds, 50);
        assert_eq!(config.k_factor, 16.0);
        assert_eq!(config.recency_window, 4);
        assert_eq!(config.seed, Some(9));
    }

    #[test]
    fn test_cli_parses_run_command() {
        let cli = Cli::try_parse_from([
            "elocompare", "run", "--dir", "images", "--rounds", "100", "--k-factor", "24",
            "--results", "out.csv",
        ])
        .unwrap();
        match cli.command {
            Commands::Run(args) => {
                assert_eq!(args.source.dir, Some(PathBuf::from("images")));
                assert_eq!(args.session.rounds, Some(100));
                assert_eq!(args.session.k_factor, Some(24.0));
                assert_eq!(args.results, Some(PathBuf::from("out.csv")));
            }
            _ => panic!("expected run command"),
        }
    }
}
