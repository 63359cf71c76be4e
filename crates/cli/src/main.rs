//! Voice Cart CLI - drive the skill's backend flows from a terminal.
//!
//! # Usage
//!
//! ```bash
//! # Search the catalog the way the resolver does
//! vc-cli search "blue mug"
//!
//! # Resolve a product and add it to the configured customer's cart
//! vc-cli add "blue mug" -q 2
//! vc-cli add "blue mug" --sku MUG-BLU
//!
//! # Run one dialogue turn through the intent router
//! vc-cli intent AddToCartByNameIntent --term "blue mug" --quantity 2
//! vc-cli intent LaunchRequest
//! ```
//!
//! # Commands
//!
//! - `search` - Two-stage catalog search
//! - `add` - Resolve and add to cart, failing loudly on backend errors
//! - `intent` - Route a turn and print the speech response as JSON
//!
//! Backend settings come from the same `MAGENTO_*` variables the skill
//! service reads.

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use voicecart_core::{Quantity, Sku};

mod commands;

#[derive(Parser)]
#[command(name = "vc-cli")]
#[command(author, version, about = "Voice Cart CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search the catalog for a spoken term
    Search {
        /// What the shopper said
        term: String,
    },
    /// Resolve a product and add it to the cart
    Add {
        /// What the shopper said
        term: String,

        /// SKU already resolved by the language model
        #[arg(long)]
        sku: Option<Sku>,

        /// Number of items to add
        #[arg(short, long, default_value_t = Quantity::ONE)]
        quantity: Quantity,
    },
    /// Route one dialogue turn
    Intent {
        /// Intent name (e.g. `LaunchRequest`, `AddToCartByNameIntent`)
        name: String,

        /// Raw `SEARCHTERM` slot value
        #[arg(long)]
        term: Option<String>,

        /// Resolved entity id for the `SEARCHTERM` slot
        #[arg(long)]
        sku: Option<String>,

        /// Raw `QUANTITY` slot value
        #[arg(short, long)]
        quantity: Option<String>,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Search { term } => commands::search::run(&term).await?,
        Commands::Add {
            term,
            sku,
            quantity,
        } => commands::cart::add(&term, sku, quantity).await?,
        Commands::Intent {
            name,
            term,
            sku,
            quantity,
        } => {
            let slots = commands::intent::TurnSlots {
                term,
                sku,
                quantity,
            };
            commands::intent::run(&name, slots).await?;
        }
    }
    Ok(())
}
