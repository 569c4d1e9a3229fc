mod api;

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Result, bail};
use clap::{Parser, Subcommand};
use common::overrides::OVERRIDES_FILE;
use common::{FlagMap, FlagResolver, OverrideStore};
use tracing_subscriber::EnvFilter;

use crate::api::ApiClient;

#[derive(Parser)]
#[command(name = "unborked")]
#[command(about = "Browse the Unborked shop and manage feature flag overrides")]
struct Cli {
    /// Base URL of the shop API.
    #[arg(long, global = true, env = "UNBORKED_API", default_value = "http://localhost:3001")]
    api: String,

    /// Local flag overrides file.
    #[arg(long, global = true, env = "UNBORKED_OVERRIDES")]
    overrides: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print resolved feature flags, or edit local overrides.
    Flags {
        /// Flag override in URL query form, e.g. `DARK_MODE=true`. Repeatable.
        #[arg(long = "param", value_name = "NAME=VALUE")]
        params: Vec<String>,

        #[command(subcommand)]
        action: Option<FlagsAction>,
    },
    /// List products.
    Products {
        /// Search product names and descriptions.
        #[arg(long)]
        search: Option<String>,

        #[arg(long = "param", value_name = "NAME=VALUE")]
        params: Vec<String>,
    },
    /// List products on sale.
    Sale {
        /// Use the single-statement listing.
        #[arg(long)]
        optimized: bool,
    },
}

#[derive(Subcommand)]
enum FlagsAction {
    /// Override a flag locally.
    Set { name: String, value: String },
    /// Remove a local override.
    Unset { name: String },
    /// Remove every local override.
    Clear,
}

fn default_overrides_path() -> PathBuf {
    dirs::config_dir()
        .map(|dir| dir.join("unborked").join(OVERRIDES_FILE))
        .unwrap_or_else(|| PathBuf::from(OVERRIDES_FILE))
}

/// `NAME=VALUE` pairs from repeated `--param` arguments.
fn parse_params(raw: &[String]) -> Vec<(String, String)> {
    raw.iter()
        .flat_map(|param| common::flags::parse_query(param))
        .collect()
}

fn parse_bool(raw: &str) -> Result<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "true" | "1" => Ok(true),
        "false" | "0" => Ok(false),
        _ => bail!("Expected true or false, got '{raw}'"),
    }
}

fn resolve_flags(
    client: &ApiClient,
    store: &OverrideStore,
    params: &[(String, String)],
) -> FlagResolver {
    let mut resolver = FlagResolver::new();
    resolver.resolve(|| client.flag_defaults(), &store.load(), params);
    resolver
}

fn print_flags(flags: &FlagMap, overrides: &FlagMap) {
    let width = flags.keys().map(String::len).max().unwrap_or(0);
    for (name, value) in flags {
        let marker = if overrides.contains_key(name) {
            " (local)"
        } else {
            ""
        };
        println!("{name:<width$}  {value}{marker}");
    }
}

fn run_flags(
    client: &ApiClient,
    store: &OverrideStore,
    params: &[String],
    action: Option<FlagsAction>,
) -> Result<()> {
    let mut resolver = resolve_flags(client, store, &parse_params(params));

    let changed = match action {
        None => None,
        Some(FlagsAction::Set { name, value }) => {
            let value = parse_bool(&value)?;
            store.set(&name, Some(value))?;
            resolver.update_flag(&name, value);
            Some(format!("{name} overridden to {value}"))
        }
        Some(FlagsAction::Unset { name }) => {
            store.set(&name, None)?;
            let default = resolver
                .defaults(|| client.flag_defaults())
                .and_then(|defaults| defaults.get(&name).copied())
                .unwrap_or(false);
            resolver.update_flag(&name, default);
            Some(format!("{name} override removed"))
        }
        Some(FlagsAction::Clear) => {
            let cleared = store.clear()?;
            resolver.reset_to_defaults();
            Some(format!("Cleared {} override(s)", cleared.len()))
        }
    };

    if let Some(changed) = changed {
        println!("{changed} ({})", store.path().display());
    }
    print_flags(resolver.current(), &store.load());
    Ok(())
}

fn run_products(
    client: &ApiClient,
    store: &OverrideStore,
    search: Option<String>,
    params: &[String],
) -> Result<()> {
    let products = match search.as_deref().map(str::trim) {
        Some(term) if !term.is_empty() => client.search(term)?,
        _ => {
            let v2 = resolve_flags(client, store, &parse_params(params))
                .is_enabled("STOREQUERY_V2");
            tracing::debug!(v2, "Listing products");
            client.products(v2)?
        }
    };

    for product in &products {
        println!(
            "{:>4}  {:<32}  {:>9}  {}",
            product.id,
            product.name,
            product.price,
            product.category.as_deref().unwrap_or("-")
        );
    }
    println!("{} product(s)", products.len());
    Ok(())
}

fn run_sale(client: &ApiClient, optimized: bool) -> Result<()> {
    let started = Instant::now();
    let items = client.sale(optimized)?;
    let elapsed = started.elapsed();

    for item in &items {
        let star = if item.featured { "*" } else { " " };
        println!(
            "{star}{:>4}  {:<32}  {:>9} -> {:>9}  {:>6}%  {}",
            item.id,
            item.name,
            item.original_price,
            item.sale_price,
            item.discount.as_deref().unwrap_or("-"),
            item.sale_category.as_deref().unwrap_or("-")
        );
    }
    println!("{} item(s) in {} ms", items.len(), elapsed.as_millis());
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let client = ApiClient::new(&cli.api);
    let store = OverrideStore::new(cli.overrides.unwrap_or_else(default_overrides_path));

    match cli.command {
        Command::Flags { params, action } => run_flags(&client, &store, &params, action),
        Command::Products { search, params } => run_products(&client, &store, search, &params),
        Command::Sale { optimized } => run_sale(&client, optimized),
    }
}
