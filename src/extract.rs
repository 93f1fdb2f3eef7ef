use axum::{
    Json,
    extract::{FromRequest, Request, rejection::JsonRejection},
};

use crate::{error::AppError, validation::ValidationError};

/// JSON body extractor that reports rejections in the service's error
/// envelope: a missing or mismatched `Content-Type` is a 415, anything
/// the body parser cannot digest is a 400 malformed-input.
pub struct AppJson<T>(pub T);

impl<S, T> FromRequest<S> for AppJson<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => Err(map_rejection(rejection)),
        }
    }
}

fn map_rejection(rejection: JsonRejection) -> AppError {
    match rejection {
        JsonRejection::MissingJsonContentType(_) => AppError::UnsupportedMediaType(
            "Content-Type must be application/json".to_string(),
        ),
        _ => ValidationError::MalformedInput.into(),
    }
}
