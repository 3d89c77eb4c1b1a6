use actix_web::{dev::Server, middleware::Logger as ActixLogger, App, HttpServer};
use log::info;
use std::{io, net::SocketAddr};

use crate::cors::{build_cors, origins_or_permissive};
use crate::env::ServerConfig;
use crate::handlers::UploadLimits;
use crate::kv_store::KVStore;
use crate::routes;

/// Binds the datastorage server and starts serving `store`.
///
/// Returns the server handle (await it to run until shutdown) and the bound
/// addresses, which matter when binding port 0.
pub fn start(config: &ServerConfig, store: KVStore) -> io::Result<(Server, Vec<SocketAddr>)> {
    let cors_origins = origins_or_permissive(&config.cors_origins_file)?;
    let limits = UploadLimits::from(config.max_upload_bytes);

    let server = HttpServer::new(move || {
        App::new()
            .wrap(ActixLogger::default())
            .wrap(build_cors(&cors_origins))
            .configure(routes::configure(store.clone(), limits))
    })
    .bind(&config.bind_addr)?;

    let addrs = server.addrs();
    info!("Server running at {:?}", addrs);
    Ok((server.run(), addrs))
}
