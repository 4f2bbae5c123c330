pub mod domain;
pub mod events;
pub mod grid;
pub mod models;
pub mod pagination;
pub mod repository;
#[cfg(feature = "server")]
pub mod routes;
pub mod services;

#[cfg(feature = "server")]
pub use server::run;

#[cfg(feature = "server")]
mod server {
    use actix_cors::Cors;
    use actix_web::{App, HttpServer, middleware, web};

    use crate::grid::codec::QueryStateCodec;
    use crate::grid::permissions::PermissionSet;
    use crate::models::config::ServerConfig;
    use crate::repository::InMemoryProductRepository;
    use crate::routes::api::api_v1_products;

    /// Builds and runs the Actix-Web HTTP server using the provided configuration.
    pub async fn run(server_config: ServerConfig) -> std::io::Result<()> {
        let repo = InMemoryProductRepository::from_json_file(&server_config.catalog_path)
            .map_err(|e| std::io::Error::other(format!("Failed to load catalog: {e}")))?;

        let codec = QueryStateCodec::new(server_config.grid.default_page_size());
        let permissions = PermissionSet::new(server_config.permissions.clone());

        let bind_address = (server_config.address.clone(), server_config.port);
        log::info!("Listening on {}:{}", bind_address.0, bind_address.1);

        HttpServer::new(move || {
            App::new()
                .wrap(Cors::permissive())
                .wrap(middleware::Compress::default())
                .wrap(middleware::Logger::default())
                .service(web::scope("/api").service(api_v1_products))
                .app_data(web::Data::new(repo.clone()))
                .app_data(web::Data::new(codec))
                .app_data(web::Data::new(permissions.clone()))
        })
        .bind(bind_address)?
        .run()
        .await
    }
}
