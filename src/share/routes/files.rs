use crate::body::{self, ResponseBody};
use crate::share::mime::{mime_type, OCTET_STREAM};
use crate::share::path::resolve;
use crate::share::routes::{decode_path, not_found, State};
use headers::{ContentLength, HeaderMapExt};
use hyper::header::{HeaderValue, CONTENT_TYPE};
use hyper::{Response, Uri};
use tokio::fs::{self, File};

pub async fn get(uri: &Uri, state: &State) -> Response<ResponseBody> {
    let Some(requested) = decode_path(uri.path()) else {
        log::warn!("GET {} -> [undecodable path]", uri);
        return not_found();
    };

    let path = match resolve(&state.static_root, &requested).await {
        Ok(path) => path,
        Err(e) => {
            log::warn!("GET {} -> [rejected] {}", uri, e);
            return not_found();
        }
    };

    // only regular files: directories, sockets and fifos are all "not found"
    let len = match fs::metadata(&path).await {
        Ok(meta) if meta.is_file() => meta.len(),
        Ok(_) => {
            log::info!("GET {} -> [not a file]", uri);
            return not_found();
        }
        Err(e) => {
            log::info!("GET {} -> [not found] {}", uri, e);
            return not_found();
        }
    };

    let file = match File::open(&path).await {
        Ok(file) => file,
        Err(e) => {
            log::warn!("GET {} -> [file error] {} : {}", uri, path.display(), e);
            return not_found();
        }
    };

    let content_type = path
        .file_name()
        .and_then(|name| name.to_str())
        .map_or(OCTET_STREAM, mime_type);

    log::info!("GET {} -> {} ({} bytes)", uri, path.display(), len);
    let mut resp = Response::new(body::from_file(file, path));
    resp.headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
    resp.headers_mut().typed_insert(ContentLength(len));
    resp
}

#[cfg(test)]
mod tests {
    use crate::share::routes::respond_to_request;
    use crate::share::routes::tests::{read, request, roots};
    use hyper::header::{CONTENT_LENGTH, CONTENT_TYPE};
    use hyper::{Method, StatusCode};

    #[tokio::test]
    async fn serves_file_with_type() {
        let roots = roots().await;
        std::fs::write(roots.static_dir.path().join("index.html"), "<p>hi</p>").unwrap();

        let resp = respond_to_request(request(Method::GET, "/index.html", b""), &roots.state).await;
        assert_eq!(resp.headers()[CONTENT_TYPE], "text/html");
        assert_eq!(resp.headers()[CONTENT_LENGTH], "9");
        let (status, body) = read(resp).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "<p>hi</p>");
    }

    #[tokio::test]
    async fn serves_nested_and_encoded_paths() {
        let roots = roots().await;
        let js = roots.static_dir.path().join("js");
        std::fs::create_dir(&js).unwrap();
        std::fs::write(js.join("main app.JS"), "run()").unwrap();

        let resp = respond_to_request(
            request(Method::GET, "/js/main%20app.JS?v=2", b""),
            &roots.state,
        )
        .await;
        assert_eq!(resp.headers()[CONTENT_TYPE], "text/javascript");
        let (status, body) = read(resp).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "run()");
    }

    #[tokio::test]
    async fn missing_file_and_directories_are_not_found() {
        let roots = roots().await;
        std::fs::create_dir(roots.static_dir.path().join("js")).unwrap();

        for uri in ["/nope.txt", "/", "/js", "/js/"] {
            let resp = respond_to_request(request(Method::GET, uri, b""), &roots.state).await;
            let (status, body) = read(resp).await;
            assert_eq!(status, StatusCode::NOT_FOUND, "{}", uri);
            assert_eq!(body, "The requested resource was not found.");
        }
    }

    #[tokio::test]
    async fn traversal_is_not_found() {
        let roots = roots().await;
        let outside = roots.pub_dir.path().join("secret.txt");
        std::fs::write(&outside, "secret").unwrap();
        let escape = format!(
            "/../{}/secret.txt",
            roots.pub_dir.path().file_name().unwrap().to_str().unwrap()
        );

        for uri in [escape.as_str(), "/%2e%2e/%2e%2e/etc/passwd"] {
            let resp = respond_to_request(request(Method::GET, uri, b""), &roots.state).await;
            let (status, body) = read(resp).await;
            assert_eq!(status, StatusCode::NOT_FOUND, "{}", uri);
            assert!(!body.contains("secret"));
        }
    }

    #[tokio::test]
    async fn unknown_extension_is_binary() {
        let roots = roots().await;
        std::fs::write(roots.static_dir.path().join("blob"), [0u8, 1, 2]).unwrap();

        let resp = respond_to_request(request(Method::GET, "/blob", b""), &roots.state).await;
        assert_eq!(resp.headers()[CONTENT_TYPE], "application/octet-stream");
    }
}
