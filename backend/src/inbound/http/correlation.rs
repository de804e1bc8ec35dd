//! Correlation middleware: adopts the inbound `Correlation-Id` header or
//! generates one, stores it in request extensions, and mirrors it back on
//! the response (`spec.md` §4.6).

use std::task::{Context, Poll};

use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::header::{HeaderName, HeaderValue};
use actix_web::{Error as ActixError, HttpMessage};
use futures_util::future::{ready, LocalBoxFuture, Ready};
use tracing::Instrument;

use crate::domain::{CorrelationId, CORRELATION_ID_HEADER};

/// Actix middleware factory binding a [`CorrelationId`] to every request.
#[derive(Clone, Copy, Default)]
pub struct Correlation;

impl<S, B> Transform<S, ServiceRequest> for Correlation
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = ActixError> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = ActixError;
    type InitError = ();
    type Transform = CorrelationMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(CorrelationMiddleware { service }))
    }
}

/// Service wrapper produced by [`Correlation`]. Not constructed directly.
pub struct CorrelationMiddleware<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for CorrelationMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = ActixError> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = ActixError;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let supplied = req
            .headers()
            .get(CORRELATION_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);
        let correlation_id = CorrelationId::adopt_or_generate(supplied.as_deref());
        req.extensions_mut().insert(correlation_id.clone());

        let span = tracing::info_span!("http_request", correlation_id = %correlation_id);
        let fut = self.service.call(req);
        Box::pin(
            async move {
                let mut res = fut.await?;
                if let Ok(value) = HeaderValue::from_str(correlation_id.as_str()) {
                    res.response_mut().headers_mut().insert(
                        HeaderName::from_static("correlation-id"),
                        value,
                    );
                }
                Ok(res)
            }
            .instrument(span),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{test, web, App, HttpResponse};

    #[actix_web::test]
    async fn mirrors_generated_correlation_id() {
        let app = test::init_service(
            App::new()
                .wrap(Correlation)
                .route("/", web::get().to(|| async { HttpResponse::Ok().finish() })),
        )
        .await;
        let req = test::TestRequest::get().uri("/").to_request();
        let res = test::call_service(&app, req).await;
        assert!(res.headers().contains_key("correlation-id"));
    }

    #[actix_web::test]
    async fn adopts_supplied_correlation_id() {
        let app = test::init_service(
            App::new()
                .wrap(Correlation)
                .route("/", web::get().to(|| async { HttpResponse::Ok().finish() })),
        )
        .await;
        let req = test::TestRequest::get()
            .uri("/")
            .insert_header((CORRELATION_ID_HEADER, "caller-supplied"))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(
            res.headers().get("correlation-id").expect("header present"),
            "caller-supplied"
        );
    }
}
