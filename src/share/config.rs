use std::time::Duration;

pub const URL_SSE: &str = "/sse/";
pub const URL_UPLOAD: &str = "/upload/";
pub const URL_REMOVE: &str = "/remove/";

/// Carries the base64-encoded UTF-8 name of an uploaded file.
pub const HEAD_FILENAME: &str = "upload-filename";

/// Names that uploads may never replace, since they make up the UI shell.
pub const RESERVED_NAMES: [&str; 2] = ["index.html", "favicon.ico"];

/// Payload of the final event of a listing.
pub const SSE_CLOSE: &str = "close";

pub const DEFAULT_PACE: Duration = Duration::from_millis(200);

pub const MAX_REMOVE_PAYLOAD: usize = 1024 * 1024;
