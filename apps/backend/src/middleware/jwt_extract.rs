//! JWT extraction middleware
//!
//! Extracts the bearer token from the Authorization header (or a `token`
//! query parameter, for clients that cannot set headers), verifies it, and
//! stores the claims in request extensions. Mounted on session-scoped
//! routes only; scope checking against path parameters stays with
//! `auth::authorize` in the handlers.

use std::collections::HashMap;

use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::header;
use actix_web::{web, Error, HttpMessage};
use futures_util::future::{ready, LocalBoxFuture, Ready};

use crate::auth::jwt::verify_access_token;
use crate::error::AppError;
use crate::state::app_state::AppState;

pub struct JwtExtract;

impl<S, B> Transform<S, ServiceRequest> for JwtExtract
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = JwtExtractMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(JwtExtractMiddleware { service }))
    }
}

pub struct JwtExtractMiddleware<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for JwtExtractMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let auth_header = req.headers().get(header::AUTHORIZATION).cloned();
        let app_state = req.app_data::<web::Data<AppState>>().cloned();

        let token = match extract_bearer_from_header(auth_header.as_ref()) {
            Ok(Some(token)) => token,
            Ok(None) => match extract_token_from_query(req.uri().query()) {
                Some(token) => token,
                None => {
                    return Box::pin(async {
                        Err(AppError::unauthorized_missing_bearer().into())
                    })
                }
            },
            Err(err) => {
                return Box::pin(async { Err(err) });
            }
        };

        let app_state = match app_state {
            Some(state) => state,
            None => {
                return Box::pin(async {
                    Err(AppError::internal("AppState not available").into())
                });
            }
        };

        match verify_access_token(&token, &app_state.security) {
            Ok(claims) => {
                // Stash the claims before calling the downstream service so
                // extractors and handlers can read them.
                req.extensions_mut().insert(claims);
                let fut = self.service.call(req);
                Box::pin(fut)
            }
            Err(err) => Box::pin(async move { Err(err.into()) }),
        }
    }
}

fn extract_bearer_from_header(
    header_value: Option<&actix_web::http::header::HeaderValue>,
) -> Result<Option<String>, Error> {
    let auth_value = match header_value {
        Some(value) => value,
        None => return Ok(None),
    };

    let auth_str = match auth_value.to_str() {
        Ok(s) => s,
        Err(_) => return Err(AppError::unauthorized_missing_bearer().into()),
    };

    let parts: Vec<&str> = auth_str.split_whitespace().collect();
    if parts.len() != 2 || parts[0] != "Bearer" {
        return Err(AppError::unauthorized_missing_bearer().into());
    }

    let token_str = parts[1];
    if token_str.is_empty() {
        return Err(AppError::unauthorized_missing_bearer().into());
    }

    Ok(Some(token_str.to_string()))
}

fn extract_token_from_query(query: Option<&str>) -> Option<String> {
    let query_str = query?;
    let params = web::Query::<HashMap<String, String>>::from_query(query_str).ok()?;
    params
        .get("token")
        .cloned()
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bearer_header_parsing() {
        let value = actix_web::http::header::HeaderValue::from_static("Bearer abc.def.ghi");
        let token = extract_bearer_from_header(Some(&value)).unwrap();
        assert_eq!(token.as_deref(), Some("abc.def.ghi"));

        assert!(extract_bearer_from_header(None).unwrap().is_none());

        let bad = actix_web::http::header::HeaderValue::from_static("Basic abc");
        assert!(extract_bearer_from_header(Some(&bad)).is_err());
    }

    #[test]
    fn query_token_fallback() {
        assert_eq!(
            extract_token_from_query(Some("token=abc&x=1")).as_deref(),
            Some("abc")
        );
        assert!(extract_token_from_query(Some("token=")).is_none());
        assert!(extract_token_from_query(None).is_none());
    }
}
