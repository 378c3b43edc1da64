use clap::Parser;
use leetwatch::cli::{Cli, Command, DiffArgs, RefreshArgs, ShowArgs};
use leetwatch::config::Config;
use leetwatch::refresh::{Outcome, RefreshError, Refresher};
use leetwatch::remote::LeetCodeClient;
use leetwatch::report;
use leetwatch::store::diff;
use leetwatch::store::JsonStore;
use tracing_subscriber::EnvFilter;

fn init_logging(verbose: bool) {
    let default = if verbose { "leetwatch=debug" } else { "leetwatch=info" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)))
        .init();
}

fn load_config(cli: &Cli, refresh: &RefreshArgs) -> Config {
    Config::from_cli(cli, refresh).unwrap_or_else(|e| {
        tracing::error!("{e}");
        std::process::exit(2);
    })
}

fn refresh(cli: &Cli, args: &RefreshArgs) {
    let config = load_config(cli, args);
    let owner = config.require_username().unwrap_or_else(|e| {
        tracing::error!("{e}");
        std::process::exit(2);
    });

    let store = JsonStore::new(&config.data_file);
    let fetcher = LeetCodeClient::new(config.credentials.clone());
    let notifier = config.notify.build();
    let refresher = Refresher::new(&store, fetcher, notifier, owner).with_ttl(config.ttl);

    match refresher.run_once() {
        Ok(Outcome::Bootstrapped(_)) => tracing::info!("snapshot created"),
        Ok(Outcome::Skipped(_)) => {}
        Ok(Outcome::Refreshed { events, .. }) => tracing::info!(events = events.len(), "refresh complete"),
        Err(e @ RefreshError::Fetch(_)) => {
            tracing::error!("{e}, stored snapshot left unchanged");
            std::process::exit(1);
        }
        Err(e @ RefreshError::Persist(_)) => {
            // continuing would re-announce the same events on the next run
            tracing::error!("{e}, stopping");
            std::process::exit(1);
        }
    }
}

fn show(cli: &Cli, args: &ShowArgs) {
    let config = load_config(cli, &RefreshArgs::default());
    let store = JsonStore::new(&config.data_file);

    match store.load() {
        Ok(snapshot) => report::print(&snapshot, args.json, args.solved),
        Err(e) => {
            eprintln!("{e}. Run 'leetwatch refresh' to create one.");
            std::process::exit(1);
        }
    }
}

fn compare(cli: &Cli, args: &DiffArgs) {
    let config = load_config(cli, &RefreshArgs::default());

    let old = JsonStore::new(&args.against).load().unwrap_or_else(|e| {
        eprintln!("Error loading {}: {e}", args.against.display());
        std::process::exit(1);
    });
    let new = JsonStore::new(&config.data_file).load().unwrap_or_else(|e| {
        eprintln!("Error loading stored snapshot: {e}");
        std::process::exit(1);
    });

    println!("\nComparing snapshots:");
    println!("  From: {} ({})", args.against.display(), old.updated_at.format("%Y-%m-%d %H:%M:%S"));
    println!("  To:   {} ({})", config.data_file.display(), new.updated_at.format("%Y-%m-%d %H:%M:%S"));
    println!();
    print!("{}", report::render_events(&diff::diff(&old, &new)));
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match &cli.command {
        None => refresh(&cli, &RefreshArgs::default()),
        Some(Command::Refresh(args)) => refresh(&cli, args),
        Some(Command::Show(args)) => show(&cli, args),
        Some(Command::Diff(args)) => compare(&cli, args),
    }
}
