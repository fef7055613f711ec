//! Filesystem indexing helper.
//!
//! # Responsibilities
//! - Walk a content root recursively
//! - Register one `FilePage` per regular file, keyed by its path
//!   relative to the root
//! - Infer mimetypes from file extensions
//!
//! # Design Decisions
//! - Consumes only the router's registration interface; no protocol
//!   behavior of its own
//! - `index.gmi` is additionally registered at its directory path, so
//!   `/dir/` serves `/dir/index.gmi`
//! - File contents are read at request time, so edits after indexing
//!   are served without re-indexing; a file deleted after indexing
//!   answers 51

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use rustls_pki_types::CertificateDer;

use crate::error::HandlerError;
use crate::net::connection::Connection;
use crate::protocol::Status;
use crate::routing::{Handler, Router};
use std::sync::Arc;

/// The directory index file name.
const INDEX_FILE: &str = "index.gmi";

/// Serves one file from disk, read at request time.
pub struct FilePage {
    path: PathBuf,
    mime: &'static str,
}

impl FilePage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let mime = mimetype(&path);
        Self { path, mime }
    }
}

#[async_trait]
impl Handler for FilePage {
    async fn handle(
        &self,
        conn: &mut Connection,
        _cert: Option<&CertificateDer<'static>>,
        _input: &str,
    ) -> Result<(), HandlerError> {
        match tokio::fs::read(&self.path).await {
            Ok(body) => {
                conn.send_header(Status::Success, self.mime).await?;
                conn.send(&body).await?;
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                conn.send_header(Status::NotFound, "Not found").await?;
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }
}

/// Walk `root` recursively and register a handler per regular file.
///
/// Returns the number of routes registered. Symlinks are followed by
/// the underlying filesystem calls; special files are skipped.
pub async fn index_directory(router: &Router, root: &Path) -> std::io::Result<usize> {
    let mut registered = 0;
    let mut pending = vec![root.to_path_buf()];

    while let Some(dir) = pending.pop() {
        let mut entries = tokio::fs::read_dir(&dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            let file_type = entry.file_type().await?;

            if file_type.is_dir() {
                pending.push(path);
                continue;
            }
            if !file_type.is_file() {
                continue;
            }

            let route = route_for(root, &path);
            let handler: Arc<dyn Handler> = Arc::new(FilePage::new(&path));

            if path.file_name().and_then(|n| n.to_str()) == Some(INDEX_FILE) {
                let dir_route = route
                    .strip_suffix(INDEX_FILE)
                    .unwrap_or(&route)
                    .to_string();
                router.register(dir_route, Arc::clone(&handler));
                registered += 1;
            }

            router.register(route, handler);
            registered += 1;
        }
    }

    Ok(registered)
}

/// Route path for a file: `/` + its path relative to the root.
fn route_for(root: &Path, path: &Path) -> String {
    let rel = path.strip_prefix(root).unwrap_or(path);
    let joined = rel
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/");
    format!("/{joined}")
}

/// Mimetype inferred from the file extension.
///
/// Unknown extensions fall back to `application/octet-stream`.
pub fn mimetype(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    match ext.as_deref() {
        Some("gmi") | Some("gemini") => "text/gemini",
        Some("txt") => "text/plain",
        Some("md") => "text/markdown",
        Some("html") | Some("htm") => "text/html",
        Some("xml") => "text/xml",
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("svg") => "image/svg+xml",
        Some("webp") => "image/webp",
        Some("mp3") => "audio/mpeg",
        Some("ogg") => "audio/ogg",
        Some("flac") => "audio/flac",
        Some("mp4") => "video/mp4",
        Some("webm") => "video/webm",
        Some("pdf") => "application/pdf",
        Some("zip") => "application/zip",
        Some("gz") => "application/gzip",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::AsyncReadExt;

    async fn render(handler: Arc<dyn Handler>) -> Vec<u8> {
        let (server_side, mut client_side) = tokio::io::duplex(64 * 1024);
        let mut conn = Connection::in_memory(server_side, None);
        handler.handle(&mut conn, None, "").await.unwrap();
        conn.close().await.unwrap();

        let mut out = Vec::new();
        client_side.read_to_end(&mut out).await.unwrap();
        out
    }

    #[test]
    fn mimetype_table() {
        assert_eq!(mimetype(Path::new("a.gmi")), "text/gemini");
        assert_eq!(mimetype(Path::new("a.GMI")), "text/gemini");
        assert_eq!(mimetype(Path::new("a.txt")), "text/plain");
        assert_eq!(mimetype(Path::new("a.png")), "image/png");
        assert_eq!(mimetype(Path::new("a.weird")), "application/octet-stream");
        assert_eq!(mimetype(Path::new("noext")), "application/octet-stream");
    }

    #[tokio::test]
    async fn indexes_nested_files_at_relative_paths() {
        let root = tempfile::tempdir().unwrap();
        std::fs::create_dir(root.path().join("sub")).unwrap();
        std::fs::write(root.path().join("index.gmi"), "# home").unwrap();
        std::fs::write(root.path().join("sub/page.txt"), "text").unwrap();

        let router = Router::new();
        let count = index_directory(&router, root.path()).await.unwrap();
        // index.gmi registers twice: at "/" and at "/index.gmi".
        assert_eq!(count, 3);

        let out = render(router.lookup("/")).await;
        assert_eq!(out, b"20 text/gemini\r\n# home");

        let out = render(router.lookup("/index.gmi")).await;
        assert_eq!(out, b"20 text/gemini\r\n# home");

        let out = render(router.lookup("/sub/page.txt")).await;
        assert_eq!(out, b"20 text/plain\r\ntext");
    }

    #[tokio::test]
    async fn nested_index_maps_to_directory_path() {
        let root = tempfile::tempdir().unwrap();
        std::fs::create_dir(root.path().join("docs")).unwrap();
        std::fs::write(root.path().join("docs/index.gmi"), "docs").unwrap();

        let router = Router::new();
        index_directory(&router, root.path()).await.unwrap();

        let out = render(router.lookup("/docs/")).await;
        assert_eq!(out, b"20 text/gemini\r\ndocs");
    }

    #[tokio::test]
    async fn deleted_file_answers_not_found() {
        let root = tempfile::tempdir().unwrap();
        let file = root.path().join("gone.txt");
        std::fs::write(&file, "soon gone").unwrap();

        let router = Router::new();
        index_directory(&router, root.path()).await.unwrap();
        std::fs::remove_file(&file).unwrap();

        let out = render(router.lookup("/gone.txt")).await;
        assert_eq!(out, b"51 Not found\r\n");
    }
}
