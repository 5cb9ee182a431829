use std::sync::Arc;

use actix_easy_multipart::MultipartFormConfig;
use actix_files::Files;
use colored::Colorize;
use tokio::task::JoinHandle;
use tracing::{error, info};

use crate::api;
use crate::infrastructure::{config::build_config, telemetry, ServiceProvider};

pub fn run() {
    let runtime = match tokio::runtime::Builder::new_multi_thread().enable_all().build() {
        Ok(x) => x,
        Err(e) => return eprintln!("{}: {}", "Cannot build runtime".red(), e),
    };
    runtime.block_on(async_run());
}

pub async fn async_run() {
    let config = match build_config() {
        Ok(x) => x,
        Err(e) => {
            return eprintln!("{}: {}", "Cannot build config".red(), e);
        }
    };

    let service_provider = match ServiceProvider::build(config) {
        Ok(x) => Arc::new(x),
        Err(e) => {
            return eprintln!("{}: {}", "Cannot build Service Provider".red(), e);
        }
    };
    if let Err(e) = telemetry::initialize_telemetry(&service_provider.config.telemetry) {
        return eprintln!("{}: {}", "Cannot build logger".red(), e);
    };
    let handles = service_provider
        .background_services
        .iter()
        .cloned()
        .map(|x| tokio::spawn(async move { x.run().await }))
        .collect::<Vec<JoinHandle<()>>>();
    tokio::select! {
        _ = initialize_web_host(service_provider) => {

        }
        _ = tokio::signal::ctrl_c() => {
            info!("Stopping services (ctrl-c handling).");
            for handle in handles {
                handle.abort()
            }
            std::process::exit(0);
        }
    }
}

pub async fn initialize_web_host(sp: Arc<ServiceProvider>) {
    let host = sp.config.host.clone();
    let multipart_limit = host.multipart_limit;
    let static_path = host.static_path.clone();
    let app_sp = sp.clone();
    let server = actix_web::HttpServer::new(move || {
        let cors = actix_cors::Cors::default()
            .allow_any_origin()
            .allow_any_header()
            .allow_any_method()
            .max_age(86400);

        actix_web::App::new()
            .wrap(tracing_actix_web::TracingLogger::default())
            .wrap(cors)
            .app_data(MultipartFormConfig::default().total_limit(multipart_limit))
            .app_data(actix_web::web::Data::from(app_sp.clone()))
            .service(api::file_storage::upload)
            .service(api::file_storage::upload_chunk)
            .service(static_files(&static_path))
    });
    let server = match server.bind((host.bind_address.to_owned(), host.bind_port)) {
        Ok(x) => x,
        Err(e) => return error!("Cannot bind web server: {}", e),
    };
    info!("Listening on {}:{}.", host.bind_address, host.bind_port);
    match server.disable_signals().run().await {
        Ok(_) => info!("Web server stopped successfully."),
        Err(e) => error!("Web server ran into error: {}", e),
    }
}

/// Browser uploader and its assets.
fn static_files(path: &str) -> Files {
    Files::new("/static", path).index_file("index.html")
}
