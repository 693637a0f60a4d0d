use crate::body::{self, ResponseBody};
use crate::share::events;
use crate::share::routes::{text, State};
use futures::StreamExt;
use headers::{CacheControl, HeaderMapExt};
use hyper::body::Frame;
use hyper::header::{HeaderValue, CONTENT_TYPE};
use hyper::{Response, StatusCode, Uri};
use std::convert::Infallible;

pub async fn get(uri: &Uri, state: &State) -> Response<ResponseBody> {
    let names = match events::snapshot(&state.pub_root).await {
        Ok(names) => names,
        Err(e) => {
            log::error!("GET {} -> [listing error] {}", uri, e);
            return text(
                StatusCode::INTERNAL_SERVER_ERROR,
                "The file list is unavailable.",
            );
        }
    };

    log::info!("GET {} -> [streaming {} entries]", uri, names.len());
    let frames = events::listing(names, state.pace)
        .map(|event| Ok::<_, Infallible>(Frame::data(event)));
    let mut resp = Response::new(body::from_stream(frames));
    resp.headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static("text/event-stream"));
    resp.headers_mut()
        .typed_insert(CacheControl::new().with_no_cache());
    resp
}

#[cfg(test)]
mod tests {
    use crate::share::config::URL_SSE;
    use crate::share::routes::respond_to_request;
    use crate::share::routes::tests::{read, request, roots};
    use hyper::header::{CACHE_CONTROL, CONTENT_TYPE};
    use hyper::{Method, StatusCode};

    #[tokio::test]
    async fn empty_directory_only_closes() {
        let roots = roots().await;
        let resp = respond_to_request(request(Method::GET, URL_SSE, b""), &roots.state).await;
        assert_eq!(resp.headers()[CONTENT_TYPE], "text/event-stream");
        assert_eq!(resp.headers()[CACHE_CONTROL], "no-cache");
        let (status, body) = read(resp).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "data: close\n\n");
    }

    #[tokio::test]
    async fn streams_each_entry() {
        let roots = roots().await;
        std::fs::write(roots.pub_dir.path().join("b.txt"), "").unwrap();
        std::fs::write(roots.pub_dir.path().join("a b.txt"), "").unwrap();

        let resp = respond_to_request(request(Method::GET, URL_SSE, b""), &roots.state).await;
        let (status, body) = read(resp).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "data: a b.txt\n\ndata: b.txt\n\ndata: close\n\n");
    }

    #[tokio::test]
    async fn missing_directory_is_server_error() {
        let roots = roots().await;
        std::fs::remove_dir(roots.pub_dir.path()).unwrap();

        let resp = respond_to_request(request(Method::GET, URL_SSE, b""), &roots.state).await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
