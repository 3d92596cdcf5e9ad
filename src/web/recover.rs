use actix_web::body::{EitherBody, MessageBody};
use actix_web::dev::{Service, ServiceRequest, ServiceResponse};
use actix_web::{Error, ResponseError};
use futures::future::{Either, FutureExt};
use std::any::Any;
use std::future::Future;
use std::panic::{self, AssertUnwindSafe};

use crate::error::RelayError;

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        msg.to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "handler panicked".to_string()
    }
}

/// `wrap_fn` middleware turning a panicking handler into a 500 `{detail}` response.
pub fn catch_panic<S, B>(
    req: ServiceRequest,
    srv: &S,
) -> impl Future<Output = Result<ServiceResponse<EitherBody<B>>, Error>>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    B: MessageBody,
{
    let http_req = req.request().clone();

    let fut = match panic::catch_unwind(AssertUnwindSafe(|| srv.call(req))) {
        Ok(fut) => Either::Left(AssertUnwindSafe(fut).catch_unwind()),
        Err(payload) => Either::Right(futures::future::ready(Err(payload))),
    };

    async move {
        match fut.await {
            Ok(res) => res.map(ServiceResponse::map_into_left_body),
            Err(payload) => {
                let response = RelayError::Internal(panic_message(&*payload)).error_response();
                Ok(ServiceResponse::new(http_req, response).map_into_right_body())
            }
        }
    }
}
