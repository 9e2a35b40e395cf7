use salvo::conn::TcpListener;
use salvo::logging::Logger;
use salvo::{Listener, Router};
use medicare_app::app::api::routes;
use medicare_app::config::ConfigHandler;
use medicare_app::db_handler::DbProviderHandler;
use medicare_core::config::load_config;
use medicare_db::db::DbProvider;
use medicare_db::db::connection::create_pool;
use medicare_db::db::migrate::run_migrations;
use medicare_service::kinds::service::seed_builtin_kinds;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, reload, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let (filter_layer, filter_handle) = reload::Layer::new(EnvFilter::new("debug"));

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(
            fmt::layer()
                .with_target(true)
                .with_thread_ids(true)
                .with_file(true)
                .with_line_number(true),
        )
        .init();

    tracing::info!("Starting Medicare care record server");

    let config = load_config()?;

    tracing::info!(
        host = %config.server.host,
        port = config.server.port,
        run_migrations = config.database.run_migrations,
        "Configuration loaded"
    );

    if let Ok(filter) = EnvFilter::try_new(config.logging.level.as_str()) {
        if let Err(e) = filter_handle.modify(|current| *current = filter) {
            tracing::warn!(error = %e, "Failed to update log filter from config");
        }
    } else {
        tracing::warn!(level = %config.logging.level, "Invalid log level in config, keeping debug");
    }

    if config.database.run_migrations {
        run_migrations(&config.database.url).await?;
    }

    let pool = create_pool(
        &config.database.url,
        u32::from(config.database.max_connections),
    )
    .await?;

    {
        let mut conn = pool.get_connection().await?;
        seed_builtin_kinds(&mut conn).await?;
    }

    let config_origin = config.server.origin();
    let bind_addr = format!("{}:{}", config.server.host, config.server.port);
    let acceptor = TcpListener::new(bind_addr.clone()).bind().await;

    let router = Router::new()
        .hoop(Logger::new())
        .hoop(DbProviderHandler::new(pool))
        .hoop(ConfigHandler::new(config))
        .push(routes());

    tracing::info!(origin = %config_origin, "Server listening on {bind_addr}");

    salvo::Server::new(acceptor).serve(router).await;

    Ok(())
}
