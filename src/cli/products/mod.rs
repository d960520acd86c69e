//! Product commands

use clap::Args;
use serde::Serialize;

use crate::domain::product::{PaginationParams, DEFAULT_LIMIT, DEFAULT_PAGE};
use crate::infrastructure::services::{CreateProductRequest, ProductService, UpdateProductRequest};

use super::context::CliContext;

/// Arguments for the list command
#[derive(Args, Clone, Debug)]
pub struct ListArgs {
    /// Page number, starting at 1
    #[arg(long, default_value_t = DEFAULT_PAGE)]
    pub page: u32,

    /// Page size, 1 to 100
    #[arg(long, default_value_t = DEFAULT_LIMIT)]
    pub limit: u32,
}

/// Arguments for the create command
#[derive(Args, Clone, Debug)]
pub struct CreateArgs {
    #[arg(long)]
    pub name: String,

    #[arg(long)]
    pub description: String,

    #[arg(long)]
    pub price: f64,

    #[arg(long, default_value_t = 0)]
    pub stock: u32,

    #[arg(long)]
    pub category: String,

    /// Repeatable
    #[arg(long = "tag")]
    pub tags: Vec<String>,

    /// Repeatable
    #[arg(long = "image")]
    pub images: Vec<String>,
}

impl From<CreateArgs> for CreateProductRequest {
    fn from(args: CreateArgs) -> Self {
        Self {
            name: args.name,
            description: args.description,
            price: args.price,
            stock: args.stock,
            category: args.category,
            tags: args.tags,
            images: args.images,
        }
    }
}

/// Runs `action` against the product stack and always releases the cache
async fn with_service<T, F, Fut>(action: F) -> anyhow::Result<()>
where
    T: Serialize,
    F: FnOnce(ProductService) -> Fut,
    Fut: std::future::Future<Output = anyhow::Result<T>>,
{
    let context = CliContext::load()?;
    let (service, cache) = context.product_service().await?;

    let result = action(service).await;
    cache.disconnect().await;

    print_json(&result?)
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub async fn get(id: String) -> anyhow::Result<()> {
    with_service(|service| async move { anyhow::Ok(service.get_required(&id).await?) }).await
}

pub async fn list(args: ListArgs) -> anyhow::Result<()> {
    let params = PaginationParams::new(args.page, args.limit)?;
    with_service(|service| async move { anyhow::Ok(service.list(params).await?) }).await
}

pub async fn create(args: CreateArgs) -> anyhow::Result<()> {
    with_service(|service| async move { anyhow::Ok(service.create(args.into()).await?) }).await
}

pub async fn delete(id: String) -> anyhow::Result<()> {
    with_service(|service| async move {
        service.delete(&id).await?;
        anyhow::Ok(serde_json::json!({ "deleted": id }))
    })
    .await
}

pub async fn set_stock(id: String, stock: u32) -> anyhow::Result<()> {
    with_service(|service| async move {
        let request = UpdateProductRequest {
            stock: Some(stock),
            ..Default::default()
        };

        anyhow::Ok(service.update(&id, request).await?)
    })
    .await
}

pub async fn adjust_stock(id: String, delta: i64) -> anyhow::Result<()> {
    with_service(|service| async move { anyhow::Ok(service.adjust_stock(&id, delta).await?) }).await
}
