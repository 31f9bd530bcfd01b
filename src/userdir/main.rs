use clap::Parser;
use directories::ProjectDirs;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use userdir::api::{ConfigAction, DirectoryApi, SortOrder, StoreStatus};
use userdir::config::DirectoryConfig;
use userdir::directory::UserStore;
use userdir::error::{DirectoryError, Result};
use userdir::model::UserId;
use userdir::persistence::UserPersistence;
use userdir::query::UserQuery;
use userdir::remote::HttpUserSource;
use userdir::store::fs::FsBlobStore;

mod cli;
use cli::args::{Cli, Commands, SortField, UserFields};
use cli::print::{print_config, print_messages, print_user_details, print_users};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default_directive = if verbose { "userdir=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));
    if let Err(e) = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
    {
        eprintln!("Failed to initialise logging: {}", e);
    }
}

struct AppContext {
    api: DirectoryApi<FsBlobStore, HttpUserSource>,
    online: bool,
    auto_refresh: bool,
}

async fn run(cli: Cli) -> Result<()> {
    let mut ctx = init_context(&cli)?;

    match cli.command {
        Some(Commands::List { search, sort, desc }) => {
            handle_list(&mut ctx, search, sort, desc).await
        }
        Some(Commands::View { id }) => handle_view(&mut ctx, id).await,
        Some(Commands::Add { fields, id, force }) => handle_add(&mut ctx, fields, id, force),
        Some(Commands::Edit { id, fields, force }) => handle_edit(&mut ctx, id, fields, force),
        Some(Commands::Delete { ids }) => handle_delete(&mut ctx, &ids),
        Some(Commands::Refresh) => handle_refresh(&mut ctx).await,
        Some(Commands::Config { key, value }) => handle_config(&ctx, key, value),
        None => handle_list(&mut ctx, None, None, false).await,
    }
}

fn init_context(cli: &Cli) -> Result<AppContext> {
    let data_dir = match &cli.data_dir {
        Some(dir) => dir.clone(),
        None => default_data_dir()?,
    };

    let config = DirectoryConfig::load(&data_dir)?;
    let persistence =
        UserPersistence::with_key(FsBlobStore::new(&data_dir), config.storage_key.clone());
    let store = UserStore::initialize(persistence);
    let source = HttpUserSource::new(&config.api_base_url, config.timeout())?;

    Ok(AppContext {
        api: DirectoryApi::new(store, source, data_dir),
        online: !cli.offline,
        auto_refresh: config.auto_refresh,
    })
}

fn default_data_dir() -> Result<PathBuf> {
    ProjectDirs::from("com", "userdir", "userdir")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .ok_or_else(|| DirectoryError::Config("Could not determine data directory".into()))
}

async fn handle_list(
    ctx: &mut AppContext,
    search: Option<String>,
    sort: Option<SortField>,
    desc: bool,
) -> Result<()> {
    if ctx.online && ctx.auto_refresh {
        let refreshed = ctx.api.refresh().await?;
        // Stay quiet on success; the list itself shows what arrived.
        if ctx.api.store().status() == StoreStatus::Error {
            print_messages(&refreshed.messages);
        }
    }

    let mut query = UserQuery {
        search,
        ..UserQuery::default()
    };
    if let Some(field) = sort {
        let order = if desc {
            SortOrder::Descending
        } else {
            SortOrder::Ascending
        };
        query = query.sort_by(field.into(), order);
    }

    let result = ctx.api.list_users(&query)?;
    print_users(&result.listed_users);
    print_messages(&result.messages);
    Ok(())
}

async fn handle_view(ctx: &mut AppContext, id: UserId) -> Result<()> {
    // An empty directory has never been populated; fill it before looking.
    if ctx.online && ctx.api.store().is_empty() {
        let refreshed = ctx.api.refresh().await?;
        if ctx.api.store().status() == StoreStatus::Error {
            print_messages(&refreshed.messages);
        }
    }

    let result = ctx.api.view_user(id, ctx.online).await?;
    for user in &result.listed_users {
        print_user_details(user);
    }
    print_messages(&result.messages);
    Ok(())
}

fn handle_add(
    ctx: &mut AppContext,
    fields: UserFields,
    id: Option<UserId>,
    force: bool,
) -> Result<()> {
    let result = ctx.api.add_user(fields.into_new_user(id), force)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_edit(ctx: &mut AppContext, id: UserId, fields: UserFields, force: bool) -> Result<()> {
    let result = ctx.api.edit_user(id, &fields.into_patch(), force)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_delete(ctx: &mut AppContext, ids: &[UserId]) -> Result<()> {
    let result = ctx.api.delete_users(ids)?;
    print_messages(&result.messages);
    Ok(())
}

async fn handle_refresh(ctx: &mut AppContext) -> Result<()> {
    if !ctx.online {
        return Err(DirectoryError::Api(
            "Cannot refresh while --offline is set".into(),
        ));
    }
    let result = ctx.api.refresh().await?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_config(ctx: &AppContext, key: Option<String>, value: Option<String>) -> Result<()> {
    let action = match (key, value) {
        (None, _) => ConfigAction::ShowAll,
        (Some(key), None) => ConfigAction::ShowKey(key),
        (Some(key), Some(value)) => ConfigAction::Set(key, value),
    };

    let result = ctx.api.config(action)?;
    if let Some(config) = &result.config {
        print_config(config);
    }
    print_messages(&result.messages);
    Ok(())
}
