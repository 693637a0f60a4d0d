pub const OCTET_STREAM: &str = "application/octet-stream";

/// Content type for `filename`, from the text after its last `.`, ignoring case.
pub fn mime_type(filename: &str) -> &'static str {
    let Some((_, ext)) = filename.rsplit_once('.') else {
        return OCTET_STREAM;
    };
    match ext.to_ascii_lowercase().as_str() {
        "css" => "text/css",
        "htm" | "html" => "text/html",
        "js" | "mjs" => "text/javascript",
        "json" => "application/json",
        "txt" => "text/plain",
        "xml" => "text/xml",
        "gif" => "image/gif",
        "ico" => "image/vnd.microsoft.icon",
        "jpeg" | "jpg" => "image/jpeg",
        "png" => "image/png",
        "svg" => "image/svg+xml",
        "mp3" => "audio/mpeg",
        "mp4" => "video/mp4",
        "pdf" => "application/pdf",
        "woff" => "font/woff",
        "woff2" => "font/woff2",
        _ => OCTET_STREAM,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_extensions() {
        assert_eq!(mime_type("index.html"), "text/html");
        assert_eq!(mime_type("app.mjs"), "text/javascript");
        assert_eq!(mime_type("favicon.ico"), "image/vnd.microsoft.icon");
        assert_eq!(mime_type("font.woff2"), "font/woff2");
        assert_eq!(mime_type("archive.tar.pdf"), "application/pdf");
    }

    #[test]
    fn ignores_case() {
        assert_eq!(mime_type("a.JPG"), mime_type("a.jpg"));
        assert_eq!(mime_type("a.JPG"), "image/jpeg");
        assert_eq!(mime_type("Notes.TxT"), "text/plain");
    }

    #[test]
    fn falls_back_to_binary() {
        assert_eq!(mime_type("a"), OCTET_STREAM);
        assert_eq!(mime_type("a.unknownext"), OCTET_STREAM);
        assert_eq!(mime_type("trailing."), OCTET_STREAM);
        assert_eq!(mime_type("data.bin"), OCTET_STREAM);
        assert_eq!(mime_type(""), OCTET_STREAM);
    }
}
