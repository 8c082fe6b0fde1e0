use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpMessage, HttpRequest};
use futures_util::future::{ready, Ready};

use crate::auth::claims::AccessClaims;
use crate::error::AppError;

/// Verified token claims for the current request, put into request
/// extensions by the `JwtExtract` middleware. Extracting them on an
/// unguarded route is a 401, not a panic.
impl FromRequest for AccessClaims {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(
            req.extensions()
                .get::<AccessClaims>()
                .cloned()
                .ok_or_else(AppError::unauthorized_missing_bearer),
        )
    }
}
