use clap::Parser;
use product_cache::cli::{self, Cli, Command};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Get { id } => cli::products::get(id).await,
        Command::List(args) => cli::products::list(args).await,
        Command::Create(args) => cli::products::create(args).await,
        Command::Delete { id } => cli::products::delete(id).await,
        Command::SetStock { id, stock } => cli::products::set_stock(id, stock).await,
        Command::AdjustStock { id, delta } => cli::products::adjust_stock(id, delta).await,
        Command::InitSchema => cli::maintenance::init_schema().await,
        Command::PingCache => cli::maintenance::ping_cache().await,
    }
}
