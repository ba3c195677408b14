//! JSON request bodies whose rejections use the API error shape.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, Request};
use dockwarden_control::ControlError;

use crate::error::ApiError;

/// Like [`Json`], but a body that is missing, malformed, or of the wrong
/// shape is rejected as `400` with a `{ "error": ... }` body.
#[derive(Debug)]
pub struct JsonBody<T>(pub T);

impl<T, S> FromRequest<S> for JsonBody<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    T: Send,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => Err(ApiError::Control(ControlError::InvalidInput {
                message: rejection.body_text(),
            })),
        }
    }
}
