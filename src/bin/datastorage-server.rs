use datastorage::{
    env::{load_env_file, ServerConfig},
    logger::setup_logger,
    server, KVStore,
};
use log::{error, info, warn};
use std::process::{exit, id as process_id};

#[actix_web::main]
async fn main() {
    setup_logger("info");
    load_env_file();

    let config = ServerConfig::from_env();
    info!("PID: {}", process_id());
    info!("Starting datastorage server with {:?}", config);

    // Created once so a soft restart keeps the stored data.
    let store = KVStore::new();
    let mut failures: u32 = 0;

    loop {
        match run(&config, store.clone()).await {
            Ok(()) => {
                info!("Server stopped with PID: {}", process_id());
                return;
            }
            Err(e) => {
                failures += 1;
                error!("Error occurred serving datastorage (attempt {}): {}", failures, e);
                if config.max_restarts != 0 && failures >= config.max_restarts {
                    error!("Giving up after {} failed attempts", failures);
                    exit(1);
                }
                warn!("Restarting in {:?}", config.restart_delay);
                tokio::time::sleep(config.restart_delay).await;
            }
        }
    }
}

async fn run(config: &ServerConfig, store: KVStore) -> std::io::Result<()> {
    let (server, _addrs) = server::start(config, store)?;
    server.await
}
