use axum::{
    Form,
    extract::{FromRequest, Request},
};
use serde::de::DeserializeOwned;

use quill_types::api::Validate;

use crate::cookies::back_location;
use crate::error::AppError;

/// A url-encoded form that has been deserialized and validated. Either
/// failure sends the caller back to the page they came from with a notice.
pub struct ValidForm<T>(pub T);

impl<S, T> FromRequest<S> for ValidForm<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate + Send,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let back = back_location(req.headers());
        let Form(value) = Form::<T>::from_request(req, state).await.map_err(|rejection| {
            AppError::Invalid {
                message: rejection.body_text(),
                back: back.clone(),
            }
        })?;

        value
            .validate()
            .map(ValidForm)
            .map_err(|message| AppError::Invalid { message, back })
    }
}
