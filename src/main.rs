use std::{process, sync::Arc};

use pantry::{
    application::{
        error::AppError, options::ReadRecipesOptions, recipes::RecipeQueryService,
        repos::RecipesRepo,
    },
    config,
    infra::{memory::InMemoryRecipeStore, telemetry},
};
use serde::Serialize;
use tracing::{Dispatch, Level, dispatcher, error, info};
use tracing_subscriber::fmt as tracing_fmt;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        report_application_error(&error);
        process::exit(error.exit_code());
    }
}

fn report_application_error(error: &AppError) {
    let chain = error.messages().join(": ");
    if dispatcher::has_been_set() {
        error!(error = %chain, "application error");
        return;
    }

    let subscriber = tracing_fmt().with_max_level(Level::ERROR).finish();
    let dispatch = Dispatch::new(subscriber);
    dispatcher::with_default(&dispatch, || {
        error!(error = %chain, "application error");
    });
}

async fn run() -> Result<(), AppError> {
    let (cli_args, settings) = config::load_with_cli()?;

    let command = cli_args
        .command
        .unwrap_or(config::Command::Query(config::QueryArgs::default()));

    telemetry::init(&settings.logging)?;

    let service = build_service(&settings).await?;

    match command {
        config::Command::Query(args) => run_query(&service, &settings, args).await,
        config::Command::Links(args) => run_links(&service, args).await,
    }
}

async fn build_service(settings: &config::Settings) -> Result<RecipeQueryService, AppError> {
    let store = match settings.catalog.seed_file.as_deref() {
        Some(path) => InMemoryRecipeStore::from_seed_file(path).await?,
        None => InMemoryRecipeStore::new(),
    };
    let store: Arc<dyn RecipesRepo> = Arc::new(store);

    info!(
        seed_file = ?settings.catalog.seed_file,
        store_timeout = ?settings.catalog.store_timeout,
        "Recipe catalog ready"
    );

    Ok(RecipeQueryService::new(store).with_store_timeout(settings.catalog.store_timeout))
}

async fn run_query(
    service: &RecipeQueryService,
    settings: &config::Settings,
    args: config::QueryArgs,
) -> Result<(), AppError> {
    let options = ReadRecipesOptions::from_params(
        args.admin,
        args.search.as_deref(),
        args.page.as_deref(),
        args.page_size.as_deref(),
        settings.catalog.default_page_size.get(),
    );

    let page = service.read_recipes(&options).await?;
    info!(
        returned = page.items.len(),
        total_recipes = page.pagination.total_recipes,
        total_pages = page.pagination.total_pages,
        "Query complete"
    );
    print_json(&page)
}

async fn run_links(service: &RecipeQueryService, args: config::LinksArgs) -> Result<(), AppError> {
    let links = service
        .recipe_links(args.admin, args.search.as_deref().unwrap_or_default())
        .await?;
    print_json(&links)
}

fn print_json<T: Serialize>(value: &T) -> Result<(), AppError> {
    let rendered = serde_json::to_string_pretty(value)
        .map_err(|err| AppError::unexpected(format!("failed to serialize output: {err}")))?;
    println!("{rendered}");
    Ok(())
}
