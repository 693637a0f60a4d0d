use crate::body::{self, ResponseBody};
use crate::err::{Error, Rejection};
use crate::share::config::{URL_REMOVE, URL_SSE, URL_UPLOAD};
use hyper::body::{Body, Bytes};
use hyper::header::{HeaderValue, ALLOW, CONTENT_TYPE};
use hyper::{Method, Request, Response, StatusCode};
use percent_encoding::percent_decode_str;
use std::borrow::Cow;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::fs;

mod files;
mod list;
mod remove;
mod upload;

pub struct State {
    /// Canonical read-only root for the UI shell.
    pub static_root: PathBuf,
    /// Canonical read/write root for uploads.
    pub pub_root: PathBuf,
    pub pace: Duration,
}

impl State {
    /// Creates the upload directory if needed and canonicalizes both roots.
    pub async fn open(static_dir: &Path, pub_dir: &Path, pace: Duration) -> Result<Self, Error> {
        fs::create_dir_all(pub_dir)
            .await
            .map_err(|e| format!("Cannot create {}: {}", pub_dir.display(), e))?;
        let static_root = fs::canonicalize(static_dir)
            .await
            .map_err(|e| format!("Cannot open {}: {}", static_dir.display(), e))?;
        let pub_root = fs::canonicalize(pub_dir)
            .await
            .map_err(|e| format!("Cannot open {}: {}", pub_dir.display(), e))?;
        Ok(Self {
            static_root,
            pub_root,
            pace,
        })
    }
}

#[derive(Debug, PartialEq, Eq)]
enum Route {
    Events,
    Static,
    Upload,
    Remove,
    NotFound,
    MethodNotAllowed,
}

impl Route {
    fn of(method: &Method, path: &str) -> Self {
        match *method {
            Method::GET if path == URL_SSE => Route::Events,
            Method::GET => Route::Static,
            Method::POST if path == URL_UPLOAD => Route::Upload,
            Method::POST if path == URL_REMOVE => Route::Remove,
            Method::POST => Route::NotFound,
            _ => Route::MethodNotAllowed,
        }
    }
}

pub async fn respond_to_request<B>(req: Request<B>, state: &State) -> Response<ResponseBody>
where
    B: Body<Data = Bytes> + Unpin,
    B::Error: Into<Error>,
{
    match Route::of(req.method(), req.uri().path()) {
        Route::Events => list::get(req.uri(), state).await,
        Route::Static => files::get(req.uri(), state).await,
        Route::Upload => upload::post(req, state).await,
        Route::Remove => remove::post(req, state).await,
        Route::NotFound => {
            log::warn!("{} {} -> [no such route]", req.method(), req.uri());
            not_found()
        }
        Route::MethodNotAllowed => {
            log::warn!("{} {} -> [method not allowed]", req.method(), req.uri());
            let mut resp = text(
                StatusCode::METHOD_NOT_ALLOWED,
                "Only GET and POST methods are allowed.",
            );
            resp.headers_mut()
                .insert(ALLOW, HeaderValue::from_static("GET, POST"));
            resp
        }
    }
}

/// Percent-decodes a request path, or `None` if it isn't valid UTF-8 once decoded.
fn decode_path(path: &str) -> Option<Cow<'_, str>> {
    percent_decode_str(path).decode_utf8().ok()
}

fn text(status: StatusCode, message: impl Into<Bytes>) -> Response<ResponseBody> {
    let mut resp = Response::new(body::full(message));
    *resp.status_mut() = status;
    resp.headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static("text/plain; charset=utf-8"));
    resp
}

fn not_found() -> Response<ResponseBody> {
    text(StatusCode::NOT_FOUND, "The requested resource was not found.")
}

fn reject(e: &impl Rejection) -> Response<ResponseBody> {
    text(e.status(), e.to_string())
}
