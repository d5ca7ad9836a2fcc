use {
  super::*,
  serde::{ser::SerializeStruct, Serializer},
  utoipa::ToSchema,
};

#[derive(Debug, ToSchema)]
pub(crate) enum ApiError {
  /// Internal server error.
  Internal(String),

  /// Bad request.
  BadRequest(String),

  /// Resource not found.
  NotFound(String),

  /// Request conflicts with one in progress.
  Conflict(String),
}

impl ApiError {
  pub(crate) fn code(&self) -> i32 {
    match self {
      Self::Internal(_) => 1,
      Self::BadRequest(_) => 2,
      Self::NotFound(_) => 3,
      Self::Conflict(_) => 4,
    }
  }

  pub(crate) fn not_found<S: ToString>(message: S) -> Self {
    Self::NotFound(message.to_string())
  }

  pub(crate) fn internal<S: ToString>(message: S) -> Self {
    Self::Internal(message.to_string())
  }

  pub(crate) fn bad_request<S: ToString>(message: S) -> Self {
    Self::BadRequest(message.to_string())
  }

  pub(crate) fn conflict<S: ToString>(message: S) -> Self {
    Self::Conflict(message.to_string())
  }
}

impl Serialize for ApiError {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    let mut state = serializer.serialize_struct("ApiError", 2)?;
    match self {
      ApiError::Internal(msg)
      | ApiError::BadRequest(msg)
      | ApiError::NotFound(msg)
      | ApiError::Conflict(msg) => {
        state.serialize_field("code", &self.code())?;
        state.serialize_field("message", &msg)?;
        state.end()
      }
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let status_code = match &self {
      Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
      Self::BadRequest(_) => StatusCode::BAD_REQUEST,
      Self::NotFound(_) => StatusCode::NOT_FOUND,
      Self::Conflict(_) => StatusCode::CONFLICT,
    };

    if let Self::Internal(message) = &self {
      log::error!("error serving request: {message}");
    }

    (status_code, Json(self)).into_response()
  }
}

impl From<anyhow::Error> for ApiError {
  fn from(error: anyhow::Error) -> Self {
    Self::internal(error)
  }
}

impl From<StakeError> for ApiError {
  fn from(error: StakeError) -> Self {
    Self::not_found(error)
  }
}
