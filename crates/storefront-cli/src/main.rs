//! Storefront command-line client.
//!
//! Provides the `storefront` binary: browse the catalog, manage the cart
//! and wishlist, and place orders. State lives in a SQLite database, the
//! same key-value layout a browser session would keep in local storage.
//!
//! Output is JSON on stdout. Exit codes: 0 = success, 1 = operation
//! refused, 3 = storage or I/O error.

mod commands;

use std::path::PathBuf;
use std::process;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::Session;

/// Storefront cart and catalog tools.
#[derive(Parser)]
#[command(name = "storefront", about = "Storefront cart and catalog tools")]
struct Cli {
    /// Path to the state database file.
    #[arg(long, global = true, env = "STOREFRONT_DB_PATH", default_value = "storefront.db")]
    db: String,

    /// Static catalog JSON (`{"products": [...], "variants": [...]}`).
    #[arg(long, global = true, env = "STOREFRONT_CATALOG")]
    catalog: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Browse and edit the catalog.
    #[command(subcommand)]
    Catalog(CatalogCommand),

    /// Inspect and change the cart.
    #[command(subcommand)]
    Cart(CartCommand),

    /// Inspect and change the wishlist.
    #[command(subcommand)]
    Wishlist(WishlistCommand),

    /// Place an order for the current cart.
    Checkout(CheckoutArgs),
}

#[derive(Subcommand)]
enum CatalogCommand {
    /// List all products.
    List,

    /// Show one product with its variants.
    Show {
        /// Product slug.
        slug: String,
    },

    /// Store product/variant records that override the static catalog.
    Import {
        /// JSON file in catalog shape.
        file: PathBuf,
    },

    /// Drop all stored overrides.
    Reset,
}

#[derive(Subcommand)]
enum CartCommand {
    /// Print lines and totals.
    Show,

    /// Add a product to the cart.
    Add {
        /// Product id.
        product: String,

        /// Variant id. When omitted the variant is picked by size/color.
        variant: Option<String>,

        #[arg(long)]
        size: Option<String>,

        #[arg(long)]
        color: Option<String>,

        #[arg(short, long, default_value_t = 1, allow_negative_numbers = true)]
        qty: i64,
    },

    /// Set a line's quantity. Below one removes the line.
    Update {
        /// Line id (`<product>-<variant>`).
        line: String,

        #[arg(allow_negative_numbers = true)]
        qty: f64,
    },

    /// Remove a line.
    Remove { line: String },

    /// Empty the cart.
    Clear,

    /// Check every line against the current catalog.
    Validate,
}

#[derive(Subcommand)]
enum WishlistCommand {
    /// Print saved products.
    List,

    /// Save a product.
    Add { product: String },

    /// Remove a saved product.
    Remove { product: String },

    /// Save the product if not saved, remove it otherwise.
    Toggle { product: String },

    /// Remove every saved product.
    Clear,

    /// Move a saved product into the cart.
    Move { product: String },
}

/// Contact and shipping details for checkout.
#[derive(Args)]
pub struct CheckoutArgs {
    #[arg(long)]
    pub email: String,

    #[arg(long)]
    pub first_name: String,

    #[arg(long)]
    pub last_name: String,

    #[arg(long)]
    pub address_line1: String,

    #[arg(long)]
    pub address_line2: Option<String>,

    #[arg(long)]
    pub city: String,

    #[arg(long)]
    pub state: String,

    #[arg(long)]
    pub postal_code: String,

    #[arg(long, default_value = "United States")]
    pub country: String,

    #[arg(long)]
    pub phone: String,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let exit_code = run(cli);
    process::exit(exit_code);
}

/// Opens the session and dispatches the subcommand.
///
/// Returns the process exit code.
fn run(cli: Cli) -> i32 {
    let mut session = match Session::open(&cli.db, cli.catalog.as_deref()) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error: {}", e);
            return e.exit_code();
        }
    };

    let result = match cli.command {
        Commands::Catalog(cmd) => match cmd {
            CatalogCommand::List => commands::run_catalog_list(&session),
            CatalogCommand::Show { slug } => commands::run_catalog_show(&session, &slug),
            CatalogCommand::Import { file } => commands::run_catalog_import(&mut session, &file),
            CatalogCommand::Reset => commands::run_catalog_reset(&mut session),
        },
        Commands::Cart(cmd) => match cmd {
            CartCommand::Show => commands::run_cart_show(&session),
            CartCommand::Add {
                product,
                variant,
                size,
                color,
                qty,
            } => commands::run_cart_add(
                &mut session,
                &product,
                variant.as_deref(),
                size.as_deref(),
                color.as_deref(),
                qty,
            ),
            CartCommand::Update { line, qty } => {
                commands::run_cart_update(&mut session, &line, qty)
            }
            CartCommand::Remove { line } => commands::run_cart_remove(&mut session, &line),
            CartCommand::Clear => commands::run_cart_clear(&mut session),
            CartCommand::Validate => commands::run_cart_validate(&session),
        },
        Commands::Wishlist(cmd) => match cmd {
            WishlistCommand::List => commands::run_wishlist_list(&session),
            WishlistCommand::Add { product } => {
                commands::run_wishlist_add(&mut session, &product)
            }
            WishlistCommand::Remove { product } => {
                commands::run_wishlist_remove(&mut session, &product)
            }
            WishlistCommand::Toggle { product } => {
                commands::run_wishlist_toggle(&mut session, &product)
            }
            WishlistCommand::Clear => commands::run_wishlist_clear(&mut session),
            WishlistCommand::Move { product } => {
                commands::run_wishlist_move(&mut session, &product)
            }
        },
        Commands::Checkout(args) => commands::run_checkout(&mut session, args),
    };

    match result {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("Error: {}", e);
            e.exit_code()
        }
    }
}
