//! Success envelopes.

use axum::{
    Json,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use roster_core::PageMeta;

/// `{"success": true, "data": ..., "meta"?: ...}`
#[derive(Debug, Serialize)]
pub struct DataResponse<T> {
    pub success: bool,
    pub data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<PageMeta>,
}

impl<T> DataResponse<T> {
    pub const fn new(data: T) -> Self {
        Self {
            success: true,
            data,
            meta: None,
        }
    }

    #[must_use]
    pub fn with_meta(mut self, meta: Option<PageMeta>) -> Self {
        self.meta = meta;
        self
    }
}

impl<T: Serialize> IntoResponse for DataResponse<T> {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}

/// `{"success": true, "message": ...}`
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: &'static str,
}

impl MessageResponse {
    #[must_use]
    pub const fn new(message: &'static str) -> Self {
        Self {
            success: true,
            message,
        }
    }
}

impl IntoResponse for MessageResponse {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}
