use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use sw_app::{AppConfig, AppError, AppResult, ExpenseForm, ExpenseTracker, parse_cost};
use sw_chart::render_svg;
use sw_core::{NewExpense, RecordId};
use sw_store::{DocumentStore, JsonFileStore};

#[derive(Parser)]
#[command(name = "sw-cli")]
#[command(about = "Spendwheel CLI - expense records and donut chart", long_about = None)]
struct Cli {
    /// Config YAML (defaults to $SPENDWHEEL_CONFIG, then built-in defaults)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Override the store directory
    #[arg(long, global = true)]
    store_dir: Option<PathBuf>,
    /// Override the collection name
    #[arg(long, global = true)]
    collection: Option<String>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add an expense
    Add {
        name: String,
        /// Parsed as a leading integer, e.g. "12.50" is 12
        cost: String,
    },
    /// Replace an existing expense
    Modify {
        id: String,
        name: String,
        cost: String,
    },
    /// Remove an expense by id
    Remove { id: String },
    /// List expenses in store order
    List,
    /// Write the settled chart as SVG
    Render {
        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print changes as they arrive
    Watch {
        /// Stop after this many seconds
        #[arg(long)]
        seconds: Option<u64>,
    },
    /// Write a config file with default values
    InitConfig { path: PathBuf },
}

fn main() -> AppResult<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    if let Commands::InitConfig { path } = &cli.command {
        return cmd_init_config(path);
    }

    let config = load_config(&cli)?;
    let store = JsonFileStore::open(config.store_dir.clone())?;

    match cli.command {
        Commands::Add { name, cost } => cmd_add(&store, &config, name, cost),
        Commands::Modify { id, name, cost } => cmd_modify(&store, &config, &id, name, &cost),
        Commands::Remove { id } => cmd_remove(&store, &config, &id),
        Commands::List => cmd_list(&store, &config),
        Commands::Render { output } => cmd_render(&store, &config, output.as_deref()),
        Commands::Watch { seconds } => cmd_watch(&store, &config, seconds.map(Duration::from_secs)),
        Commands::InitConfig { .. } => Ok(()),
    }
}

fn load_config(cli: &Cli) -> AppResult<AppConfig> {
    let mut config = match &cli.config {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::from_env_or_default()?,
    };
    if let Some(dir) = &cli.store_dir {
        config.store_dir = dir.clone();
    }
    if let Some(collection) = &cli.collection {
        config.collection = collection.clone();
    }
    config.validate()?;
    tracing::debug!(
        store_dir = %config.store_dir.display(),
        collection = %config.collection,
        "config loaded"
    );
    Ok(config)
}

fn parse_id(raw: &str) -> AppResult<RecordId> {
    Ok(RecordId::parse(raw)?)
}

fn cmd_init_config(path: &Path) -> AppResult<()> {
    AppConfig::default().save(path)?;
    println!("✓ Wrote default config to {}", path.display());
    Ok(())
}

fn cmd_add(store: &JsonFileStore, config: &AppConfig, name: String, cost: String) -> AppResult<()> {
    let mut form = ExpenseForm {
        name,
        cost,
        ..Default::default()
    };
    match form.submit_to(store, &config.collection)? {
        Some(id) => {
            println!("✓ Added {id}");
            Ok(())
        }
        None => Err(AppError::InvalidInput(form.error)),
    }
}

fn cmd_modify(
    store: &JsonFileStore,
    config: &AppConfig,
    id: &str,
    name: String,
    cost: &str,
) -> AppResult<()> {
    let id = parse_id(id)?;
    store.set(&config.collection, &id, NewExpense::new(name, parse_cost(cost)))?;
    println!("✓ Modified {id}");
    Ok(())
}

fn cmd_remove(store: &JsonFileStore, config: &AppConfig, id: &str) -> AppResult<()> {
    let id = parse_id(id)?;
    store.delete(&config.collection, &id)?;
    println!("✓ Removed {id}");
    Ok(())
}

fn cmd_list(store: &JsonFileStore, config: &AppConfig) -> AppResult<()> {
    let docs = store.list(&config.collection)?;
    if docs.is_empty() {
        println!("No expenses in '{}'", config.collection);
        return Ok(());
    }

    println!("Expenses in '{}':", config.collection);
    let total: f64 = docs
        .iter()
        .map(|d| d.cost)
        .filter(|c| c.is_finite() && *c > 0.0)
        .sum();
    for doc in &docs {
        let share = if total > 0.0 && doc.cost.is_finite() && doc.cost > 0.0 {
            100.0 * doc.cost / total
        } else {
            0.0
        };
        println!("  {}  {:<20} {:>10} ({:.1}%)", doc.id, doc.name, doc.cost, share);
    }
    Ok(())
}

fn cmd_render(store: &JsonFileStore, config: &AppConfig, output: Option<&Path>) -> AppResult<()> {
    let mut tracker = ExpenseTracker::connect(store, &config.collection, config.chart.clone())?;
    let t0 = Instant::now();
    tracker.pump(t0)?;

    let settled = t0 + config.chart.transition();
    let svg = render_svg(tracker.chart(), settled);

    match output {
        Some(path) => {
            std::fs::write(path, svg)?;
            println!(
                "✓ Rendered {} arc(s) to {}",
                tracker.chart().live_arc_count(),
                path.display()
            );
        }
        None => print!("{svg}"),
    }
    Ok(())
}

fn cmd_watch(store: &JsonFileStore, config: &AppConfig, limit: Option<Duration>) -> AppResult<()> {
    let mut tracker = ExpenseTracker::connect(store, &config.collection, config.chart.clone())?;
    let started = Instant::now();
    println!("Watching '{}' (Ctrl-C to stop)", config.collection);

    loop {
        if limit.is_some_and(|l| started.elapsed() >= l) {
            return Ok(());
        }

        store.refresh()?;
        let report = tracker.pump_wait(config.refresh_interval())?;
        if report.batches == 0 {
            continue;
        }

        println!(
            "{} batch(es): +{} ~{} -{} ({} unmatched)",
            report.batches,
            report.deltas.appended,
            report.deltas.replaced,
            report.deltas.removed,
            report.deltas.unmatched
        );
        for record in tracker.snapshot() {
            println!("  {}  {}  {}", record.id, record.name, record.cost);
        }
    }
}
