//! CLI module for the product data access layer
//!
//! Every subcommand goes through the same stack the library exposes:
//! - product commands: cache-aside reads and write-through updates
//! - maintenance commands: schema creation and cache connectivity

pub mod context;
pub mod maintenance;
pub mod products;

use clap::{Parser, Subcommand};

/// Product cache - cache-aside access to the product catalog
#[derive(Parser)]
#[command(name = "product-cache")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Print a single product
    Get {
        /// Product ID
        id: String,
    },

    /// Print one page of products
    List(products::ListArgs),

    /// Create a product under a generated ID
    Create(products::CreateArgs),

    /// Delete a product and its cache entry
    Delete {
        /// Product ID
        id: String,
    },

    /// Overwrite the stock level of a product
    SetStock {
        /// Product ID
        id: String,
        /// New stock level
        stock: u32,
    },

    /// Add to or remove from the stock level of a product
    AdjustStock {
        /// Product ID
        id: String,
        /// Signed change, e.g. 5 or -3
        #[arg(allow_negative_numbers = true)]
        delta: i64,
    },

    /// Create the products table if it does not exist
    InitSchema,

    /// Connect to the cache and report the resulting state
    PingCache,
}
