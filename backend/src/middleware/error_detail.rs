//! Expose unredacted internal error messages outside production.
//!
//! Internal failures are always answered with a generic message. When this
//! middleware is enabled the unredacted message is added to the body as
//! `debug`, which eases local troubleshooting.

use std::rc::Rc;
use std::task::{Context, Poll};

use actix_web::body::{BoxBody, MessageBody};
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::{Error, HttpResponse};
use futures_util::future::{LocalBoxFuture, Ready, ready};

use crate::domain::{Error as DomainError, ErrorCode};
use crate::inbound::http::error::ErrorBody;

/// Middleware adding a `debug` field to internal error bodies.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use product_service::middleware::ErrorDetail;
///
/// let app = App::new().wrap(ErrorDetail::new(true));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct ErrorDetail {
    enabled: bool,
}

impl ErrorDetail {
    /// Create the middleware; a disabled instance passes responses through.
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }
}

impl<S, B> Transform<S, ServiceRequest> for ErrorDetail
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: MessageBody + 'static,
{
    type Response = ServiceResponse<BoxBody>;
    type Error = Error;
    type InitError = ();
    type Transform = ErrorDetailMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(ErrorDetailMiddleware {
            service: Rc::new(service),
            enabled: self.enabled,
        }))
    }
}

/// Service wrapper produced by [`ErrorDetail`].
pub struct ErrorDetailMiddleware<S> {
    service: Rc<S>,
    enabled: bool,
}

impl<S, B> Service<ServiceRequest> for ErrorDetailMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: MessageBody + 'static,
{
    type Response = ServiceResponse<BoxBody>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let enabled = self.enabled;
        Box::pin(async move {
            let res = service.call(req).await?;
            if !enabled {
                return Ok(res.map_into_boxed_body());
            }
            let internal = res
                .response()
                .error()
                .and_then(|err| err.as_error::<DomainError>())
                .filter(|err| err.code() == ErrorCode::InternalError)
                .cloned();
            let Some(internal) = internal else {
                return Ok(res.map_into_boxed_body());
            };

            let body = ErrorBody::from_error(&internal).with_debug(&internal);
            let mut replacement = HttpResponse::build(res.status());
            for (name, value) in res.headers() {
                replacement.append_header((name.clone(), value.clone()));
            }
            let response = replacement.json(body);
            let (req, _) = res.into_parts();
            Ok(ServiceResponse::new(req, response))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ApiResult;
    use actix_web::http::StatusCode;
    use actix_web::{App, test, web};
    use rstest::rstest;
    use serde_json::Value;

    async fn failing() -> ApiResult<HttpResponse> {
        Err(DomainError::internal("connection refused by db-1"))
    }

    async fn missing() -> ApiResult<HttpResponse> {
        Err(DomainError::not_found("Product not found"))
    }

    async fn call(enabled: bool, path: &str) -> (StatusCode, Value) {
        let app = test::init_service(
            App::new()
                .wrap(ErrorDetail::new(enabled))
                .route("/boom", web::get().to(failing))
                .route("/missing", web::get().to(missing)),
        )
        .await;
        let res = test::call_service(&app, test::TestRequest::get().uri(path).to_request()).await;
        let status = res.status();
        (status, test::read_body_json(res).await)
    }

    #[rstest]
    #[actix_rt::test]
    async fn enabled_adds_debug_to_internal_errors() {
        let (status, body) = call(true, "/boom").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body.get("error").and_then(Value::as_str),
            Some("Internal server error")
        );
        assert_eq!(
            body.get("debug").and_then(Value::as_str),
            Some("connection refused by db-1")
        );
    }

    #[rstest]
    #[case(false, "/boom")]
    #[case(true, "/missing")]
    #[actix_rt::test]
    async fn other_responses_carry_no_debug(#[case] enabled: bool, #[case] path: &str) {
        let (_, body) = call(enabled, path).await;
        assert!(body.get("debug").is_none());
    }
}
