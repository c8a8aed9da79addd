//! Boxoffice CLI - price ticket selections and drive checkout sessions
//!
//! Session state lives in a JSON file so a selection saved by `checkout` is
//! restored by later commands, the same way a browser tab keeps it.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use boxoffice_sdk::catalog::{parse_event, parse_event_list, Event};
use boxoffice_sdk::filter::{CatalogFilter, DateWindow};
use boxoffice_sdk::{EventCheckout, FeePolicy, FileStore, Handoff, Session};
use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "boxoffice")]
#[command(about = "Boxoffice ticket order CLI", long_about = None)]
#[command(version)]
struct Cli {
    /// Session file
    #[arg(short, long, env = "BOXOFFICE_SESSION", default_value = ".boxoffice-session.json")]
    session: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Price a selection without saving anything
    Quote {
        /// Event JSON as returned by the events API
        #[arg(short, long)]
        event: PathBuf,
        /// Tier quantity, e.g. `early=2`
        #[arg(long = "select", value_parser = parse_pick)]
        picks: Vec<(String, i64)>,
    },
    /// Save a checkout intent for the event and print it
    Checkout {
        /// Event JSON as returned by the events API
        #[arg(short, long)]
        event: PathBuf,
        /// Tier quantity, e.g. `vip=1`
        #[arg(long = "select", value_parser = parse_pick)]
        picks: Vec<(String, i64)>,
    },
    /// Show the selection saved for an event in this session
    Restore {
        /// Event id
        #[arg(long)]
        event_id: String,
    },
    /// Filter an events list
    Events {
        /// Events list JSON
        #[arg(short, long)]
        catalog: PathBuf,
        #[arg(short, long)]
        query: Option<String>,
        #[arg(long)]
        city: Option<String>,
        /// Comma separated category ids
        #[arg(long)]
        cats: Option<String>,
        #[arg(long)]
        max_price: Option<u64>,
        /// any, today, tomorrow or weekend
        #[arg(long, default_value = "any")]
        date: DateWindow,
    },
    /// Store an auth token for API requests
    Login {
        #[arg(long)]
        token: String,
        /// User profile as JSON
        #[arg(long)]
        user: Option<String>,
    },
    /// Clear the token and every saved checkout
    Logout,
    /// Show fee policy and session information
    Info,
}

fn parse_pick(raw: &str) -> Result<(String, i64), String> {
    let (id, qty) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected TIER=QTY, got `{}`", raw))?;
    let qty = qty
        .trim()
        .parse()
        .map_err(|e| format!("bad quantity in `{}`: {}", raw, e))?;
    Ok((id.trim().to_string(), qty))
}

fn read_json(path: &Path) -> anyhow::Result<serde_json::Value> {
    let raw = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("parsing {}", path.display()))
}

fn load_event(path: &Path) -> anyhow::Result<Event> {
    Ok(parse_event(&read_json(path)?)?)
}

fn open_view(store: &FileStore, path: &Path, picks: &[(String, i64)], policy: FeePolicy) -> anyhow::Result<EventCheckout> {
    let event = load_event(path)?;
    let mut view = EventCheckout::open(store, event, policy);
    for (tier_id, qty) in picks {
        let stored = view.set_quantity(tier_id, *qty);
        debug!(tier_id, requested = qty, stored, "applied selection");
    }
    Ok(view)
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let policy = FeePolicy::from_env()?;
    let mut store = FileStore::new(&cli.session);

    match cli.command {
        Commands::Quote { event, picks } => {
            let view = open_view(&store, &event, &picks, policy)?;
            println!("{}", serde_json::to_string_pretty(view.summary())?);
        }
        Commands::Checkout { event, picks } => {
            let view = open_view(&store, &event, &picks, policy)?;
            let started = view.begin_checkout(&mut store, None)?;
            println!("{}", serde_json::to_string_pretty(&started.intent)?);
            if let Handoff::Navigate(path) = &started.handoff {
                eprintln!("Continue at {}", path);
            }
            if !started.persisted {
                eprintln!("Warning: selection not saved; it will not be restored later");
            }
            eprintln!("Tickets reserved for {} minutes", started.reservation_minutes);
        }
        Commands::Restore { event_id } => {
            let selection = boxoffice_sdk::restore_selection(&store, &event_id);
            println!("{}", serde_json::to_string_pretty(&selection)?);
        }
        Commands::Events {
            catalog,
            query,
            city,
            cats,
            max_price,
            date,
        } => {
            let events = parse_event_list(&read_json(&catalog)?)?;
            let filter = CatalogFilter {
                query,
                city,
                categories: cats
                    .map(|c| c.split(',').map(|s| s.trim().to_lowercase()).filter(|s| !s.is_empty()).collect())
                    .unwrap_or_default(),
                max_price,
                date,
            };
            let today = chrono::Local::now().date_naive();
            let matched = filter.apply(&events, today);
            println!("{}", serde_json::to_string_pretty(&matched)?);
        }
        Commands::Login { token, user } => {
            if token.trim().is_empty() {
                bail!("token must not be empty");
            }
            let user = user
                .map(|raw| serde_json::from_str(&raw))
                .transpose()
                .context("parsing --user")?;
            let mut session = Session::init(store);
            session.login(user, token)?;
            println!("Signed in");
        }
        Commands::Logout => {
            let mut session = Session::init(store);
            session.logout()?;
            println!("Signed out");
        }
        Commands::Info => {
            let session = Session::init(store);
            println!("Boxoffice");
            println!("Fees: {}", policy.formula());
            println!("Currency: {}", policy.currency);
            println!("Reservation window: {} minutes", policy.reservation_minutes);
            println!("Session file: {}", cli.session.display());
            println!("Signed in: {}", if session.is_authenticated() { "yes" } else { "no" });
            println!("Version: {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
