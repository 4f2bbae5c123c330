use actix_web::{HttpResponse, Responder, get, web};

use crate::grid::permissions::PermissionSet;
use crate::repository::InMemoryProductRepository;
use crate::routes::GridQuery;
use crate::services::ServiceError;
use crate::services::api as api_service;

#[get("/v1/products")]
pub async fn api_v1_products(
    GridQuery(state): GridQuery,
    repo: web::Data<InMemoryProductRepository>,
    permissions: web::Data<PermissionSet>,
) -> impl Responder {
    match api_service::list_products(repo.get_ref(), permissions.get_ref(), &state) {
        Ok(page) => HttpResponse::Ok().json(page),
        Err(ServiceError::Unauthorized) => HttpResponse::Unauthorized().finish(),
        Err(ServiceError::Validation(message)) => HttpResponse::BadRequest().body(message),
        Err(ServiceError::NotFound) => HttpResponse::NotFound().finish(),
        Err(err) => {
            log::error!("Failed to list products: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}
