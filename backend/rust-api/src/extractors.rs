use axum::{
    extract::{rejection::JsonRejection, FromRequest, Request},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// `Json` wrapper whose rejections are JSON bodies instead of plain text.
pub struct AppJson<T>(pub T);

#[derive(Debug, Serialize)]
pub struct JsonBodyRejection {
    pub message: String,
    pub status: u16,
}

impl From<JsonRejection> for JsonBodyRejection {
    fn from(rejection: JsonRejection) -> Self {
        Self {
            message: format!("Failed to parse JSON request body: {}", rejection.body_text()),
            status: StatusCode::BAD_REQUEST.as_u16(),
        }
    }
}

impl IntoResponse for JsonBodyRejection {
    fn into_response(self) -> Response {
        (StatusCode::BAD_REQUEST, Json(self)).into_response()
    }
}

impl<T, S> FromRequest<S> for AppJson<T>
where
    T: serde::de::DeserializeOwned + 'static,
    S: Send + Sync,
{
    type Rejection = JsonBodyRejection;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(AppJson(value)),
            Err(rejection) => {
                let rejection = JsonBodyRejection::from(rejection);
                tracing::warn!("{}", rejection.message);
                Err(rejection)
            }
        }
    }
}
