use crate::body::ResponseBody;
use crate::err::{Error, Rejection};
use crate::share::config::MAX_REMOVE_PAYLOAD;
use crate::share::path::resolve_entry;
use crate::share::routes::{reject, text, State};
use http_body_util::{BodyExt, Limited};
use hyper::body::{Body, Bytes};
use hyper::{Request, Response, StatusCode};
use serde::Deserialize;
use std::io;
use std::path::Path;
use thiserror::Error;
use tokio::fs;

#[derive(Debug, Deserialize)]
pub struct RemoveRequest {
    pub files: Vec<String>,
}

#[derive(Debug, Error)]
pub enum RemoveError {
    #[error("Cannot read request body: {0}.")]
    Body(#[source] Error),
    #[error("Malformed request body: {0}.")]
    Payload(#[from] serde_json::Error),
}

impl Rejection for RemoveError {
    fn status(&self) -> StatusCode {
        StatusCode::BAD_REQUEST
    }
}

pub async fn post<B>(req: Request<B>, state: &State) -> Response<ResponseBody>
where
    B: Body<Data = Bytes> + Unpin,
    B::Error: Into<Error>,
{
    let (parts, body) = req.into_parts();
    let payload = match read_payload(body).await {
        Ok(payload) => payload,
        Err(e) => {
            log::warn!("POST {} -> [bad payload] {}", parts.uri, e);
            return reject(&e);
        }
    };

    let total = remove_all(&state.pub_root, &payload.files).await;
    log::info!(
        "POST {} -> [removed {} of {} files]",
        parts.uri,
        total,
        payload.files.len()
    );
    text(StatusCode::OK, format!("Total removed: {total} files."))
}

async fn read_payload<B>(body: B) -> Result<RemoveRequest, RemoveError>
where
    B: Body<Data = Bytes>,
    B::Error: Into<Error>,
{
    let bytes = Limited::new(body, MAX_REMOVE_PAYLOAD)
        .collect()
        .await
        .map_err(RemoveError::Body)?
        .to_bytes();
    Ok(serde_json::from_slice(&bytes)?)
}

/// Removes each named file under `root` in order, returning how many were
/// removed. Names that escape `root` or don't exist are skipped. A symlink is
/// removed itself, never its target.
pub async fn remove_all(root: &Path, files: &[String]) -> usize {
    let mut total = 0;
    for name in files {
        let path = match resolve_entry(root, name).await {
            Ok(path) => path,
            Err(e) => {
                log::debug!("Skipping {:?}: {}", name, e);
                continue;
            }
        };
        match fs::remove_file(&path).await {
            Ok(()) => total += 1,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                log::debug!("Skipping {:?}: already gone", name);
            }
            Err(e) => log::warn!("Failed to remove {}: {}", path.display(), e),
        }
    }
    total
}
