use axum::{
    async_trait,
    extract::{FromRequest, Request},
    http::{header::CONTENT_TYPE, StatusCode},
    response::{IntoResponse, Response},
    Form, Json,
};
use serde::de::DeserializeOwned;

/// Request body accepted as JSON or as a urlencoded form.
///
/// A missing, unparseable or wrongly-typed body yields `T::default()`, so the
/// handler's own validation decides the response instead of an extractor
/// rejection. Only an oversized body is rejected, with 413.
#[derive(Debug, Clone, Default)]
pub struct Payload<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for Payload<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Default + Send,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_form = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|h| h.to_str().ok())
            .is_some_and(|ct| ct.starts_with("application/x-www-form-urlencoded"));

        let value = if is_form {
            match Form::<T>::from_request(req, state).await {
                Ok(Form(value)) => Some(value),
                Err(rejection) if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE => {
                    return Err(rejection.into_response());
                }
                Err(_) => None,
            }
        } else {
            match Json::<T>::from_request(req, state).await {
                Ok(Json(value)) => Some(value),
                Err(rejection) if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE => {
                    return Err(rejection.into_response());
                }
                Err(_) => None,
            }
        };

        Ok(Self(value.unwrap_or_default()))
    }
}
