use actix_cors::Cors;
use actix_web::middleware::{Compress, DefaultHeaders};
use actix_web::{App, HttpServer, web};
use dotenv::dotenv;
use human_panic::setup_panic;
use tracing::{debug, warn};

use rust_gymsystem_next::config::AppConfig;
use rust_gymsystem_next::routes;
use rust_gymsystem_next::runtime::lifetime;
use rust_gymsystem_next::utils::{json_error_handler, query_error_handler};

// 日志初始化：开发环境输出文件名行号，生产环境输出 JSON
fn init_tracing(config: &AppConfig) -> tracing_appender::non_blocking::WorkerGuard {
    let (writer, guard) = tracing_appender::non_blocking(std::io::stdout());
    let filter = tracing_subscriber::EnvFilter::new(&config.app.log_level);
    let format = tracing_subscriber::fmt::format()
        .with_level(true)
        .with_ansi(true);

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .event_format(format);

    if config.is_development() {
        builder.with_file(true).with_line_number(true).init();
    } else {
        builder.json().init();
    }

    guard
}

// CORS 按配置收紧，allowed_origins 含 "*" 时放开
fn build_cors(config: &AppConfig) -> Cors {
    let mut cors = Cors::default().max_age(config.cors.max_age);

    if config.cors.allowed_origins.iter().any(|o| o == "*") {
        cors = cors.allow_any_origin();
    } else {
        for origin in &config.cors.allowed_origins {
            cors = cors.allowed_origin(origin);
        }
    }

    cors.allowed_methods(config.cors.allowed_methods.iter().map(String::as_str))
        .allowed_headers(config.cors.allowed_headers.iter().map(String::as_str))
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    setup_panic!();

    // 记录启动时间，用于统计预处理耗时
    let started_at = chrono::Utc::now();

    AppConfig::init().expect("Failed to initialize configuration");
    let config = AppConfig::get();

    let _log_guard = init_tracing(config);

    warn!(
        "Starting {} v{} ({})",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION"),
        config.app.environment
    );

    let startup = lifetime::startup::prepare_server_startup().await;
    let storage = startup.storage.clone();
    let queue = startup.queue.clone();

    debug!(
        "Pre-startup processing completed in {} ms",
        chrono::Utc::now()
            .signed_duration_since(started_at)
            .num_milliseconds()
    );

    warn!("Using {} CPU cores for the server", config.server.workers);

    let server = HttpServer::new(move || {
        App::new()
            .wrap(build_cors(config))
            .wrap(Compress::default())
            .wrap(
                DefaultHeaders::new()
                    .add(("Connection", "keep-alive"))
                    .add((
                        "Keep-Alive",
                        format!("timeout={}, max=1000", config.server.timeouts.keep_alive),
                    ))
                    .add(("Cache-Control", "no-cache, no-store, must-revalidate")),
            )
            .app_data(web::QueryConfig::default().error_handler(query_error_handler))
            .app_data(web::JsonConfig::default().error_handler(json_error_handler))
            .app_data(web::Data::new(storage.clone()))
            .app_data(web::Data::new(queue.clone()))
            .app_data(web::PayloadConfig::new(
                config.server.limits.max_payload_size,
            ))
            .configure(routes::configure_auth_routes)
            // 打卡与求助路由挂在学员子路径下，须先于学员路由注册
            .configure(routes::configure_checkins_routes)
            .configure(routes::configure_help_orders_routes)
            .configure(routes::configure_students_routes)
            .configure(routes::configure_plans_routes)
            .configure(routes::configure_enrollments_routes)
    })
    .keep_alive(std::time::Duration::from_secs(
        config.server.timeouts.keep_alive,
    ))
    .client_request_timeout(std::time::Duration::from_millis(
        config.server.timeouts.client_request,
    ))
    .client_disconnect_timeout(std::time::Duration::from_millis(
        config.server.timeouts.client_disconnect,
    ))
    .workers(config.server.workers);

    #[cfg(unix)]
    let server = if let Some(socket_path) = config.unix_socket_path() {
        warn!("Starting server on Unix socket: {}", socket_path);
        if std::path::Path::new(socket_path).exists() {
            std::fs::remove_file(socket_path)?;
        }
        server.bind_uds(socket_path)?
    } else {
        let bind_address = config.server_bind_address();
        warn!("Starting server at http://{}", bind_address);
        server.bind(bind_address)?
    };

    #[cfg(not(unix))]
    let server = {
        let bind_address = config.server_bind_address();
        warn!("Starting server at http://{}", bind_address);
        server.bind(bind_address)?
    };

    tokio::select! {
        res = server.run() => {
            res?;
        }
        _ = lifetime::shutdown::listen_for_shutdown() => {
            warn!("Graceful shutdown: all tasks completed");
        }
    }

    // 停掉后台通知 worker
    startup.worker.abort();

    Ok(())
}
