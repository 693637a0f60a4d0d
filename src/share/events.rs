//! Server-sent event framing for directory listings.

use crate::share::config::SSE_CLOSE;
use futures::{stream, Stream};
use hyper::body::Bytes;
use std::io;
use std::path::Path;
use std::time::Duration;
use tokio::fs;
use tokio::time::sleep;

/// Frames `data` as a single event. Each line of a multi-line payload gets its
/// own `data:` field, which clients join back together with `\n`.
pub fn event(data: &str) -> Bytes {
    let mut frame = String::with_capacity(data.len() + 8);
    for line in data.split('\n') {
        frame.push_str("data: ");
        frame.push_str(line.trim_end_matches('\r'));
        frame.push('\n');
    }
    frame.push('\n');
    Bytes::from(frame)
}

/// Names of the entries directly inside `dir`, sorted.
pub async fn snapshot(dir: &Path) -> io::Result<Vec<String>> {
    let mut entries = fs::read_dir(dir).await?;
    let mut names = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        names.push(entry.file_name().to_string_lossy().into_owned());
    }
    names.sort();
    Ok(names)
}

/// One event per name followed by the close marker, waiting `pace` before every
/// event but the first. Dropping the stream cancels a pending wait.
pub fn listing(names: Vec<String>, pace: Duration) -> impl Stream<Item = Bytes> + Send {
    stream::unfold(Some((names.into_iter(), false)), move |state| async move {
        let (mut names, started) = state?;
        if started && !pace.is_zero() {
            sleep(pace).await;
        }
        Some(match names.next() {
            Some(name) => (event(&name), Some((names, true))),
            None => (event(SSE_CLOSE), None),
        })
    })
}
