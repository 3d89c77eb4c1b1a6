use actix_web::web;

use crate::handlers::{self, UploadLimits};
use crate::kv_store::KVStore;

pub const DATASTORAGE_PATH: &str = "/datastorage";
pub const HEALTH_PATH: &str = "/health";

/// Registers the datastorage and health resources on an `App`, serving from
/// `store`.
///
/// ```ignore
/// App::new().configure(routes::configure(store.clone(), UploadLimits::default()))
/// ```
pub fn configure(store: KVStore, limits: UploadLimits) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg| {
        cfg.app_data(web::Data::new(store))
            .app_data(web::Data::new(limits))
            .service(
                web::resource(DATASTORAGE_PATH)
                    .route(web::get().to(handlers::retrieve_data))
                    .route(web::post().to(handlers::store_data))
                    .route(web::delete().to(handlers::delete_data))
                    .default_service(web::to(handlers::bad_method)),
            )
            .service(
                web::resource(HEALTH_PATH)
                    .route(web::get().to(handlers::health))
                    .default_service(web::to(handlers::bad_method)),
            );
    }
}
