use std::future::{Ready, ready};

use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpRequest, web};

use crate::domain::grid::GridQueryState;
use crate::grid::codec::QueryStateCodec;

pub mod api;

/// Grid state decoded from the request's query string.
///
/// Uses the [`QueryStateCodec`] registered as app data, falling back to the
/// default one. Never rejects a request: malformed values become defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct GridQuery(pub GridQueryState);

impl FromRequest for GridQuery {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let codec = req
            .app_data::<web::Data<QueryStateCodec>>()
            .map(|codec| *codec.get_ref())
            .unwrap_or_default();
        ready(Ok(GridQuery(codec.decode_query(req.query_string()))))
    }
}
