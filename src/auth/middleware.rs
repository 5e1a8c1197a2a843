use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::{header, Method},
    web, Error, HttpMessage,
};
use futures::future::{ready, LocalBoxFuture, Ready};

use crate::auth::token::{verify_token, TokenKeys};
use crate::error::AppError;

/// Bearer-token gate for the task routes.
///
/// Reads are open: GET requests pass through untouched. Mutating requests must
/// carry `Authorization: Bearer <token>`; a missing header is 401, a token
/// that fails verification (bad signature, wrong algorithm, expired) is 403.
/// On success the decoded `Claims` are inserted into request extensions for
/// the `AuthenticatedUser` extractor.
pub struct AuthMiddleware;

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = AuthMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService { service }))
    }
}

pub struct AuthMiddlewareService<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
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
        // Task reads are unauthenticated; only mutations need an identity.
        if req.method() == Method::GET {
            let fut = self.service.call(req);
            return Box::pin(fut);
        }

        // Keys are registered as app data at startup; their absence is a
        // wiring mistake, not a client problem.
        let keys = match req.app_data::<web::Data<TokenKeys>>() {
            Some(keys) => keys.clone(),
            None => {
                let err = AppError::InternalServerError("Token keys not configured".into());
                return Box::pin(async move { Err(err.into()) });
            }
        };

        let auth_header = req
            .headers()
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "));

        match auth_header {
            Some(token) => match verify_token(keys.get_ref(), token) {
                Ok(claims) => {
                    req.extensions_mut().insert(claims);
                    let fut = self.service.call(req);
                    Box::pin(fut)
                }
                Err(app_err) => Box::pin(async move { Err(app_err.into()) }),
            },
            None => {
                let app_err = AppError::Unauthorized("Missing bearer token".into());
                Box::pin(async move { Err(app_err.into()) })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::extractors::AuthenticatedUser;
    use crate::auth::token::generate_token;
    use actix_web::{http::StatusCode, test, App, HttpResponse, Responder};

    async fn probe(user: AuthenticatedUser) -> impl Responder {
        HttpResponse::Ok().json(serde_json::json!({ "id": user.id }))
    }

    async fn open_probe() -> impl Responder {
        HttpResponse::Ok().finish()
    }

    fn test_keys() -> TokenKeys {
        TokenKeys::from_secret("middleware-test-secret")
    }

    macro_rules! probe_app {
        ($keys:expr) => {
            test::init_service(
                App::new()
                    .app_data(web::Data::new($keys))
                    .wrap(AuthMiddleware)
                    .route("/probe", web::post().to(probe))
                    .route("/probe", web::get().to(open_probe)),
            )
            .await
        };
    }

    #[actix_rt::test]
    async fn test_missing_token_is_unauthorized() {
        let app = probe_app!(test_keys());

        let req = test::TestRequest::post().uri("/probe").to_request();
        let resp = test::try_call_service(&app, req).await;
        let err = resp.expect_err("request without a token must be rejected");
        assert_eq!(err.error_response().status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_rt::test]
    async fn test_garbled_token_is_forbidden() {
        let app = probe_app!(test_keys());

        let req = test::TestRequest::post()
            .uri("/probe")
            .append_header((header::AUTHORIZATION, "Bearer not.a.jwt"))
            .to_request();
        let resp = test::try_call_service(&app, req).await;
        let err = resp.expect_err("garbled token must be rejected");
        assert_eq!(err.error_response().status(), StatusCode::FORBIDDEN);
    }

    #[actix_rt::test]
    async fn test_token_from_other_secret_is_forbidden() {
        let app = probe_app!(test_keys());
        let foreign_keys = TokenKeys::from_secret("some-other-secret");
        let token = generate_token(&foreign_keys, 7, "intruder").unwrap();

        let req = test::TestRequest::post()
            .uri("/probe")
            .append_header((header::AUTHORIZATION, format!("Bearer {}", token)))
            .to_request();
        let resp = test::try_call_service(&app, req).await;
        let err = resp.expect_err("foreign-signed token must be rejected");
        assert_eq!(err.error_response().status(), StatusCode::FORBIDDEN);
    }

    #[actix_rt::test]
    async fn test_valid_token_reaches_handler_with_identity() {
        let keys = test_keys();
        let token = generate_token(&keys, 42, "alice").unwrap();
        let app = probe_app!(keys);

        let req = test::TestRequest::post()
            .uri("/probe")
            .append_header((header::AUTHORIZATION, format!("Bearer {}", token)))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["id"], 42);
    }

    #[actix_rt::test]
    async fn test_get_requests_pass_without_token() {
        let app = probe_app!(test_keys());

        let req = test::TestRequest::get().uri("/probe").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }
}
