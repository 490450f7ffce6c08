//! # medstock CLI
//!
//! Counter tooling on top of the billing session: stock lookups, the
//! dashboard figures, and quick sales without the UI.
//!
//! ```text
//! medstock stock --search para
//! medstock inventory --search B-2024
//! medstock stats
//! medstock sell --line M1=2@12.50 --line M3=1@30
//! ```
//!
//! Credentials come from `--email`/`--password` or `--token`, or the
//! matching `MEDSTOCK_*` environment variables.

use std::path::PathBuf;
use std::process;
use std::str::FromStr;

use clap::{Args, Parser, Subcommand};
use medstock_client::{
    ApiClient, AuthorizedApi, BillingSession, ClientConfig, ClientError, ClientResult,
    Credentials,
};
use medstock_core::{CartOutcome, CatalogItem, Money};
use tracing::{info, Subscriber};
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is unset or unparseable.
const DEFAULT_LOG_FILTER: &str = "info,medstock=debug";

#[derive(Debug, Parser)]
#[command(name = "medstock", about = "MedStock billing CLI", long_about = None)]
struct Cli {
    /// Config file (defaults to client.toml in the platform config dir)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(flatten)]
    auth: AuthArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Args)]
struct AuthArgs {
    /// Account email
    #[arg(long, env = "MEDSTOCK_EMAIL", global = true)]
    email: Option<String>,

    /// Account password
    #[arg(long, env = "MEDSTOCK_PASSWORD", hide_env_values = true, global = true)]
    password: Option<String>,

    /// Bearer token from the OAuth callback; used instead of email/password
    #[arg(long, env = "MEDSTOCK_TOKEN", hide_env_values = true, global = true)]
    token: Option<String>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Items that can be sold right now
    Stock(SearchArgs),
    /// Full inventory, including out-of-stock items
    Inventory(SearchArgs),
    /// Dashboard figures
    Stats,
    /// Ring up and submit a sale
    Sell(SellArgs),
}

#[derive(Debug, Args)]
struct SearchArgs {
    /// Filter term (name, or batch number for inventory)
    #[arg(long, default_value = "")]
    search: String,
}

#[derive(Debug, Args)]
struct SellArgs {
    /// Sale line as ID=QTY@PRICE (price defaults to 0)
    #[arg(long = "line", required = true)]
    lines: Vec<SaleLine>,
}

/// One `--line` argument.
#[derive(Debug, Clone, PartialEq, Eq)]
struct SaleLine {
    item_id: String,
    quantity: i64,
    unit_price: Money,
}

impl FromStr for SaleLine {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (item_id, rest) = s
            .split_once('=')
            .ok_or_else(|| format!("expected ID=QTY@PRICE, got '{}'", s))?;

        let item_id = item_id.trim();
        if item_id.is_empty() {
            return Err(format!("missing item id in '{}'", s));
        }

        let (quantity, price) = match rest.split_once('@') {
            Some((quantity, price)) => (quantity, Some(price)),
            None => (rest, None),
        };

        let quantity: i64 = quantity
            .trim()
            .parse()
            .map_err(|_| format!("invalid quantity in '{}'", s))?;

        let unit_price = match price {
            Some(price) => price.parse::<Money>().map_err(|e| e.to_string())?,
            None => Money::zero(),
        };

        Ok(SaleLine {
            item_id: item_id.to_string(),
            quantity,
            unit_price,
        })
    }
}

#[tokio::main]
async fn main() {
    init_tracing();

    let cli = Cli::parse();
    if let Err(error) = run(cli).await {
        eprintln!("error: {}", error);
        if error.requires_login() {
            eprintln!("hint: log in again with --email/--password or pass a fresh --token");
        }
        process::exit(1);
    }
}

/// Initializes the tracing subscriber for logging.
///
/// ## Log Levels
/// - ERROR: Unrecoverable errors
/// - WARN: Failed checkouts, stale catalog
/// - INFO: Session and sale lifecycle
/// - DEBUG: Cart refusals, request details
///
/// Override with `RUST_LOG`.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    log_subscriber(filter).init();
}

/// Stderr subscriber gated only by `filter`.
fn log_subscriber(filter: EnvFilter) -> impl Subscriber + Send + Sync + 'static {
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish()
}

async fn run(cli: Cli) -> ClientResult<()> {
    let config = ClientConfig::load(cli.config)?;
    let api = authenticate(&ApiClient::new(&config)?, cli.auth).await?;
    info!(user = api.user().display_name(), "Logged in");

    let mut session = BillingSession::new(api.clone(), api.clone());
    session.refresh_catalog().await?;

    match cli.command {
        Commands::Stock(args) => print_items(&session.addable(&args.search)),
        Commands::Inventory(args) => print_items(&session.search_inventory(&args.search)),
        Commands::Stats => {
            let today = chrono::Local::now().date_naive();
            let stats = session.stats(today, config.stock_policy());
            println!("Total medicines : {}", stats.total_items);
            println!("Low stock       : {}", stats.low_stock);
            println!("Out of stock    : {}", stats.out_of_stock);
            println!("Expiring soon   : {}", stats.expiring_soon);
            println!("Expired         : {}", stats.expired);
        }
        Commands::Sell(args) => {
            for line in &merge_lines(args.lines) {
                ring_up(&mut session, line);
            }

            let receipt = session.checkout().await?;
            println!(
                "Sold {} unit(s) across {} line(s), total {}",
                receipt.request.total_quantity(),
                receipt.request.items.len(),
                receipt.total
            );
            if !receipt.catalog_refreshed {
                eprintln!("warning: sale recorded but stock levels could not be refreshed");
            }
        }
    }

    drop(session);
    api.logout();
    Ok(())
}

async fn authenticate(client: &ApiClient, auth: AuthArgs) -> ClientResult<AuthorizedApi> {
    match (auth.token, auth.email, auth.password) {
        (Some(token), _, _) => client.adopt_token(&token).await,
        (None, Some(email), Some(password)) => client.login(&Credentials::login(email, password)).await,
        _ => Err(ClientError::Unauthorized(
            "provide --token or both --email and --password".to_string(),
        )),
    }
}

/// Folds repeated ids into one line each, in first-seen order.
///
/// Quantities add up and the last price given wins, so `--line M1=2
/// --line M1=3` sells five and a refusal affects the item once.
fn merge_lines(lines: Vec<SaleLine>) -> Vec<SaleLine> {
    let mut merged: Vec<SaleLine> = Vec::with_capacity(lines.len());

    for line in lines {
        match merged.iter_mut().find(|m| m.item_id == line.item_id) {
            Some(existing) => {
                existing.quantity = existing.quantity.saturating_add(line.quantity);
                existing.unit_price = line.unit_price;
            }
            None => merged.push(line),
        }
    }

    merged
}

/// Applies one `--line` to the cart, reporting anything that was refused
/// or clamped.
fn ring_up(session: &mut BillingSession<AuthorizedApi, AuthorizedApi>, line: &SaleLine) {
    let id = line.item_id.as_str();

    match session.add(id) {
        CartOutcome::Applied => {}
        outcome => {
            report_refusal(id, &outcome);
            return;
        }
    }

    if line.quantity != 1 {
        let outcome = session.set_quantity(id, line.quantity);
        if !outcome.is_applied() {
            report_refusal(id, &outcome);
            session.remove(id);
            return;
        }
    }

    if let Some(cart_line) = session.cart().line(id) {
        if cart_line.quantity < line.quantity {
            eprintln!(
                "{}: only {} in stock, selling {}",
                id, cart_line.available_quantity, cart_line.quantity
            );
        }
    }

    let outcome = session.set_unit_price(id, line.unit_price);
    if !outcome.is_applied() {
        report_refusal(id, &outcome);
    }
}

fn report_refusal(item_id: &str, outcome: &CartOutcome) {
    match outcome {
        CartOutcome::Applied => {}
        CartOutcome::StockExceeded { available, .. } => {
            eprintln!("{}: skipped, {} in stock", item_id, available)
        }
        CartOutcome::Rejected(reason) => eprintln!("{}: {}", item_id, reason),
        CartOutcome::NotInCart => eprintln!("{}: not in the catalog", item_id),
    }
}

fn print_items(items: &[&CatalogItem]) {
    if items.is_empty() {
        println!("No medicines found");
        return;
    }

    for item in items {
        let expiry = item
            .expiry_date
            .map(|d| d.to_string())
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:<24} {:<32} {:>6}  {:<14} {}",
            item.id,
            item.name,
            item.available_quantity,
            item.batch_number.as_deref().unwrap_or("-"),
            expiry
        );
    }
}
