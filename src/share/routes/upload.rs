use crate::body::ResponseBody;
use crate::err::{Error, Rejection};
use crate::share::config::{HEAD_FILENAME, RESERVED_NAMES};
use crate::share::path::{resolve, PathError};
use crate::share::routes::{reject, text, State};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use http_body_util::BodyExt;
use hyper::body::{Body, Bytes};
use hyper::header::HeaderMap;
use hyper::{Request, Response, StatusCode};
use std::io;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use thiserror::Error;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("Missing upload-filename header.")]
    MissingFilename,
    #[error("The upload-filename header is not base64-encoded UTF-8.")]
    InvalidFilename,
    #[error("{0:?} cannot be overwritten.")]
    Reserved(String),
    #[error("Invalid target path: {0}.")]
    Path(#[from] PathError),
    #[error("Upload failed: {0}.")]
    Write(#[source] io::Error),
    #[error("Upload interrupted: {0}.")]
    Body(#[source] Error),
}

impl Rejection for UploadError {
    fn status(&self) -> StatusCode {
        match self {
            UploadError::MissingFilename | UploadError::InvalidFilename => StatusCode::BAD_REQUEST,
            UploadError::Path(PathError::Io(_)) => StatusCode::BAD_REQUEST,
            UploadError::Reserved(_) | UploadError::Path(PathError::Traversal) => {
                StatusCode::FORBIDDEN
            }
            UploadError::Body(_) => StatusCode::BAD_REQUEST,
            UploadError::Write(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

pub async fn post<B>(req: Request<B>, state: &State) -> Response<ResponseBody>
where
    B: Body<Data = Bytes> + Unpin,
    B::Error: Into<Error>,
{
    let (parts, body) = req.into_parts();
    log::debug!("POST {} -> [start upload]", parts.uri);
    match receive(&parts.headers, body, &state.pub_root).await {
        Ok((path, len)) => {
            log::info!("POST {} -> [uploaded {} bytes to {}]", parts.uri, len, path.display());
            text(StatusCode::OK, "Uploaded.")
        }
        Err(e) => {
            log::warn!("POST {} -> [upload rejected] {}", parts.uri, e);
            reject(&e)
        }
    }
}

/// Writes the request body to the file named by the `upload-filename` header,
/// creating or replacing it. The body lands in a temporary file next to the
/// target, which only replaces the target once the transfer completes, so a
/// failed transfer leaves the previous content (or nothing) behind.
async fn receive<B>(
    headers: &HeaderMap,
    body: B,
    root: &Path,
) -> Result<(PathBuf, u64), UploadError>
where
    B: Body<Data = Bytes> + Unpin,
    B::Error: Into<Error>,
{
    let filename = decode_filename(headers)?;
    let path = resolve(root, &filename).await?;
    if path == root {
        return Err(UploadError::InvalidFilename);
    }
    if RESERVED_NAMES.iter().any(|name| path == root.join(name)) {
        return Err(UploadError::Reserved(filename));
    }

    let dir = path.parent().ok_or(UploadError::InvalidFilename)?;
    let (file, temp_path) = NamedTempFile::new_in(dir)
        .map_err(UploadError::Write)?
        .into_parts();

    // dropping `temp_path` on any early return deletes the partial file
    let mut file = File::from_std(file);
    let len = copy_body(body, &mut file).await?;
    drop(file);

    temp_path
        .persist(&path)
        .map_err(|e| UploadError::Write(e.error))?;
    Ok((path, len))
}

fn decode_filename(headers: &HeaderMap) -> Result<String, UploadError> {
    let encoded = headers
        .get(HEAD_FILENAME)
        .ok_or(UploadError::MissingFilename)?;
    let raw = STANDARD
        .decode(encoded.as_bytes())
        .map_err(|_| UploadError::InvalidFilename)?;
    String::from_utf8(raw).map_err(|_| UploadError::InvalidFilename)
}

async fn copy_body<B>(mut body: B, file: &mut File) -> Result<u64, UploadError>
where
    B: Body<Data = Bytes> + Unpin,
    B::Error: Into<Error>,
{
    let mut len = 0;
    while let Some(frame) = body.frame().await {
        let frame = frame.map_err(|e| UploadError::Body(e.into()))?;
        if let Some(bytes) = frame.data_ref() {
            file.write_all(bytes).await.map_err(UploadError::Write)?;
            len += bytes.len() as u64;
        }
    }
    file.flush().await.map_err(UploadError::Write)?;
    Ok(len)
}
