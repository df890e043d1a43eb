// SPDX-License-Identifier: Apache-2.0
//! Read-only static file responder rooted at `--www-root` (spec.md §6).
//! Plain `tokio::fs` reads plus a hand-rolled extension→MIME lookup table,
//! in the same spirit as the teacher's hand-rolled `hex32` helper in
//! `echo-session-ws-gateway` rather than reaching for a crate.

use std::path::{Component, Path, PathBuf};

use axum::body::Body;
use axum::extract::{Request, State};
use axum::http::{header, HeaderValue, Method, StatusCode};
use axum::response::{IntoResponse, Response};

use crate::api::error::ApiError;
use crate::ApiState;

/// Serves `GET`/`HEAD` requests for any path not under `/api/`. Any other
/// method is rejected the same way an unmatched `/api/...` method would be
/// (spec.md §4.7's global method pre-check applies to every request, not
/// just the API branch). Directory targets resolve to `index.html`;
/// `..`-escapes and symlink escapes are rejected with 400; missing files
/// are 404 `text/plain`.
pub async fn serve(State(state): State<ApiState>, req: Request) -> Response {
    let is_head = req.method() == Method::HEAD;
    if req.method() != Method::GET && !is_head {
        let mut response = ApiError::MethodNotAllowed.into_response();
        response
            .headers_mut()
            .insert(header::ALLOW, HeaderValue::from_static("GET, HEAD"));
        return response;
    }

    let mut response = serve_get(&state, req.uri().path()).await;
    if is_head {
        *response.body_mut() = Body::empty();
    }
    response
}

async fn serve_get(state: &ApiState, raw_path: &str) -> Response {
    let Some(relative) = decode_and_strip_leading_slash(raw_path) else {
        return bad_request("Invalid path");
    };

    let candidate = state.www_root.join(&relative);
    let Some(resolved) = resolve_within_root(&state.www_root, &candidate).await else {
        return bad_request("Invalid path");
    };

    let target = if tokio::fs::metadata(&resolved)
        .await
        .map(|m| m.is_dir())
        .unwrap_or(false)
    {
        resolved.join("index.html")
    } else {
        resolved
    };

    match tokio::fs::read(&target).await {
        Ok(bytes) => {
            let mime = mime_for(&target);
            ([(header::CONTENT_TYPE, mime)], Body::from(bytes)).into_response()
        }
        Err(_) => (
            StatusCode::NOT_FOUND,
            [(header::CONTENT_TYPE, "text/plain")],
            "File not found",
        )
            .into_response(),
    }
}

fn bad_request(message: &'static str) -> Response {
    (
        StatusCode::BAD_REQUEST,
        [(header::CONTENT_TYPE, "text/plain")],
        message,
    )
        .into_response()
}

/// URL-decodes `path` and strips the leading `/`. Rejects paths that
/// don't start with `/` or contain invalid percent-encoding.
fn decode_and_strip_leading_slash(path: &str) -> Option<String> {
    if !path.starts_with('/') {
        return None;
    }
    percent_decode(&path[1..])
}

fn percent_decode(s: &str) -> Option<String> {
    let bytes = s.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'%' => {
                let hex = s.get(i + 1..i + 3)?;
                let byte = u8::from_str_radix(hex, 16).ok()?;
                out.push(byte);
                i += 3;
            }
            b'+' => {
                out.push(b' ');
                i += 1;
            }
            b => {
                out.push(b);
                i += 1;
            }
        }
    }
    String::from_utf8(out).ok()
}

/// Joins `root` with the already-decoded `candidate` and verifies the
/// result stays within `root`, rejecting `..` escapes. Mirrors
/// `IsSubPath` + `weakly_canonical` from the original C++ handler, but
/// walks components instead of requiring the path to exist on disk
/// first (a symlink escape is still caught because `canonicalize`
/// resolves symlinks for any prefix that does exist).
async fn resolve_within_root(root: &Path, candidate: &Path) -> Option<PathBuf> {
    let mut normalized = PathBuf::new();
    for component in candidate.strip_prefix(root).ok()?.components() {
        match component {
            Component::Normal(part) => normalized.push(part),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => return None,
        }
    }

    let joined = root.join(&normalized);
    // Canonicalize whatever prefix of the path exists, so a symlink
    // planted inside www_root can't be used to escape it even though
    // the final path component may not exist yet.
    let mut probe = joined.clone();
    loop {
        if let Ok(canon) = tokio::fs::canonicalize(&probe).await {
            let canon_root = tokio::fs::canonicalize(root).await.ok()?;
            return if canon.starts_with(&canon_root) || canon == canon_root {
                Some(joined)
            } else {
                None
            };
        }
        if !probe.pop() {
            // Nothing on this path exists yet; trust the component walk
            // above, which already rejected any `..`.
            return Some(joined);
        }
    }
}

fn mime_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase();

    match ext.as_str() {
        "html" | "htm" => "text/html",
        "css" => "text/css",
        "txt" => "text/plain",
        "js" => "text/javascript",
        "json" => "application/json",
        "xml" => "application/xml",
        "png" => "image/png",
        "jpg" | "jpeg" | "jpe" => "image/jpeg",
        "gif" => "image/gif",
        "bmp" => "image/bmp",
        "ico" => "image/vnd.microsoft.icon",
        "tiff" | "tif" => "image/tiff",
        "svg" | "svgz" => "image/svg+xml",
        "mp3" => "audio/mpeg",
        _ => "application/octet-stream",
    }
}
