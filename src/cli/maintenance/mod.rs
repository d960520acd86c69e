//! Maintenance commands

use tracing::info;

use super::context::CliContext;

/// Opens the store, which creates the products table when missing
pub async fn init_schema() -> anyhow::Result<()> {
    let context = CliContext::load()?;
    let store = context.store().await?;

    info!(products = store.count().await?, "Schema ready");
    println!("schema ready ({} backend)", context.config().database.backend);

    Ok(())
}

/// Runs the connect retry loop and reports the state it ended in
pub async fn ping_cache() -> anyhow::Result<()> {
    let context = CliContext::load()?;
    let cache = context.cache().await;
    let state = cache.state();

    cache.disconnect().await;
    println!("cache {} ({})", state, context.config().cache.backend);

    if !state.is_available() {
        anyhow::bail!("cache is {}", state);
    }

    Ok(())
}
