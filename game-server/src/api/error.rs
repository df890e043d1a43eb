// SPDX-License-Identifier: Apache-2.0
//! The `{"code":…,"message":…}` error taxonomy from spec.md §7, collected
//! into one enum so every handler returns the same shape through a single
//! `IntoResponse` impl instead of hand-building JSON at each call site.
//!
//! `MethodNotAllowed` itself is never constructed by a handler — it only
//! exists so [`super::rewrite_method_not_allowed`] can describe axum's own
//! 405 responses (which already carry the correct per-route `Allow`
//! header) in this same JSON shape.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiError {
    InvalidArgument,
    InvalidToken,
    UnknownToken,
    MapNotFound,
    BadRequest,
    MethodNotAllowed,
}

impl ApiError {
    fn code(self) -> &'static str {
        match self {
            Self::InvalidArgument => "invalidArgument",
            Self::InvalidToken => "invalidToken",
            Self::UnknownToken => "unknownToken",
            Self::MapNotFound => "mapNotFound",
            Self::BadRequest => "badRequest",
            Self::MethodNotAllowed => "invalidMethod",
        }
    }

    fn message(self) -> &'static str {
        match self {
            Self::InvalidArgument => "Invalid argument",
            Self::InvalidToken => "Authorization header is missing, malformed or not a 32-hex-character token",
            Self::UnknownToken => "Player token has not been found",
            Self::MapNotFound => "Map not found",
            Self::BadRequest => "Bad request",
            Self::MethodNotAllowed => "Only GET, HEAD and POST methods are expected",
        }
    }

    fn status(self) -> StatusCode {
        match self {
            Self::InvalidArgument | Self::BadRequest => StatusCode::BAD_REQUEST,
            Self::InvalidToken | Self::UnknownToken => StatusCode::UNAUTHORIZED,
            Self::MapNotFound => StatusCode::NOT_FOUND,
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    code: &'static str,
    message: &'static str,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status(),
            super::json_headers(),
            axum::Json(ErrorBody {
                code: self.code(),
                message: self.message(),
            }),
        )
            .into_response()
    }
}
