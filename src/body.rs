use crate::config::COPY_BUFFER_SIZE;
use crate::err::Error;
use futures::{Stream, TryStreamExt};
use http_body_util::combinators::UnsyncBoxBody;
use http_body_util::{BodyExt, Full, StreamBody};
use hyper::body::{Bytes, Frame};
use std::path::PathBuf;
use tokio::fs::File;
use tokio_util::io::ReaderStream;

pub type ResponseBody = UnsyncBoxBody<Bytes, Error>;

pub fn full(data: impl Into<Bytes>) -> ResponseBody {
    Full::new(data.into())
        .map_err(|never| match never {})
        .boxed_unsync()
}

pub fn from_stream<S, E>(stream: S) -> ResponseBody
where
    S: Stream<Item = Result<Frame<Bytes>, E>> + Send + 'static,
    E: Into<Error> + 'static,
{
    StreamBody::new(stream.map_err(Into::<Error>::into)).boxed_unsync()
}

/// Streams `file` in chunks. A read error ends the body early, which aborts the
/// response on the wire; it's logged here since the client never sees it.
pub fn from_file(file: File, path: PathBuf) -> ResponseBody {
    let stream = ReaderStream::with_capacity(file, COPY_BUFFER_SIZE)
        .map_ok(Frame::data)
        .inspect_err(move |e| log::warn!("Error streaming {}: {}", path.display(), e));
    from_stream(stream)
}
