use std::{
    future::{ready, Ready},
    rc::Rc,
};

use actix_web::{
    body::EitherBody,
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::header::{Header, AUTHORIZATION},
    web, Error, HttpMessage,
};
use actix_web_httpauth::headers::authorization::{Authorization, Bearer};
use futures::future::LocalBoxFuture;

use crate::{
    access::context::request_translator,
    app_state::AppState,
    auth::Identity,
    errors::AppError,
    i18n::{MessageKey, Translate},
};

/// Attaches the caller's `Identity` to the request when a bearer token is
/// present. Anonymous requests pass through untouched. A malformed or
/// invalid token, or one whose account no longer exists, is rejected with 401.
pub struct AuthMiddleware;

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = AuthMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService {
            service: Rc::new(service),
        }))
    }
}

pub struct AuthMiddlewareService<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);

        Box::pin(async move {
            if req.headers().contains_key(AUTHORIZATION) {
                match authenticate(&req).await {
                    Ok(identity) => {
                        req.extensions_mut().insert(identity);
                    }
                    Err(err) => return Ok(req.error_response(err).map_into_right_body()),
                }
            }

            let res = service.call(req).await?;
            Ok(res.map_into_left_body())
        })
    }
}

async fn authenticate(req: &ServiceRequest) -> Result<Identity, AppError> {
    let translator = request_translator(req.request());
    let rejected = || AppError::Unauthorized(translator.translate(MessageKey::InvalidToken));

    let state = req.app_data::<web::Data<AppState>>().ok_or_else(|| {
        AppError::InternalError("JWT service not configured".to_string())
    })?;

    let header = Authorization::<Bearer>::parse(req).map_err(|e| {
        log::debug!("Malformed authorization header: {}", e);
        rejected()
    })?;

    let claims = state
        .jwt_service
        .validate_token(header.as_ref().token())
        .map_err(|e| {
            log::debug!("{}", e);
            rejected()
        })?;

    // The stored account decides existence and role, not the token.
    let user = state
        .repositories
        .users
        .find_by_id(&claims.sub)
        .await?
        .ok_or_else(|| {
            log::debug!("Token subject {} no longer exists", claims.sub);
            rejected()
        })?;

    Ok(Identity::from(&user))
}
