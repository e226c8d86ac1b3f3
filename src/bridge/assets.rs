//! Static files for everything outside the protocol endpoints.
use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;

use axum::body::{self, Body};
use axum::http::{header, Method, Request, StatusCode};
use tower::ServiceExt;
use tower_http::services::ServeDir;

use super::http::Reply;

const MAX_ASSET_BYTES: usize = 8 * 1024 * 1024;

pub type AssetFuture<'a> = Pin<Box<dyn Future<Output = AssetLookup> + Send + 'a>>;

/// What a resolver did with a path. `note` is logged by the bridge at
/// debug verbosity.
#[derive(Debug)]
pub struct AssetLookup {
    pub reply: Reply,
    pub note: Option<String>,
}

impl AssetLookup {
    fn found(reply: Reply) -> Self {
        Self { reply, note: None }
    }

    fn missing(note: impl Into<String>) -> Self {
        Self {
            reply: Reply::NotFound,
            note: Some(note.into()),
        }
    }
}

/// Resolves non-protocol request paths. Never fails: anything it cannot
/// serve is [`Reply::NotFound`].
pub trait StaticResolver: Send + Sync {
    fn resolve<'a>(&'a self, path: &'a str) -> AssetFuture<'a>;
}

/// Files below a root directory, served through `tower_http::services::ServeDir`.
#[derive(Debug, Clone)]
pub struct FileAssets {
    root: PathBuf,
}

impl FileAssets {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    async fn load(&self, path: &str) -> AssetLookup {
        // ServeDir only answers GET/HEAD; the bridge has already filtered methods.
        let request = match Request::builder()
            .method(Method::GET)
            .uri(path)
            .body(Body::empty())
        {
            Ok(request) => request,
            Err(e) => return AssetLookup::missing(format!("bad asset path {}: {}", path, e)),
        };

        let response = match ServeDir::new(&self.root).oneshot(request).await {
            Ok(response) => response,
            Err(never) => match never {},
        };
        if response.status() != StatusCode::OK {
            return AssetLookup::missing(format!("no asset at {} ({})", path, response.status()));
        }

        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("application/octet-stream")
            .to_string();
        match body::to_bytes(Body::new(response.into_body()), MAX_ASSET_BYTES).await {
            Ok(bytes) => AssetLookup::found(Reply::Asset {
                content_type,
                body: bytes.to_vec(),
            }),
            Err(e) => AssetLookup::missing(format!("asset {} not served: {}", path, e)),
        }
    }
}

impl StaticResolver for FileAssets {
    fn resolve<'a>(&'a self, path: &'a str) -> AssetFuture<'a> {
        Box::pin(self.load(path))
    }
}

/// Serves nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoAssets;

impl StaticResolver for NoAssets {
    fn resolve<'a>(&'a self, path: &'a str) -> AssetFuture<'a> {
        Box::pin(async move { AssetLookup::missing(format!("no asset root for {}", path)) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn serves_index_and_misses_cleanly() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("index.html"), "<html></html>").unwrap();
        std::fs::write(dir.path().join("game.css"), "body {}").unwrap();
        let assets = FileAssets::new(dir.path());

        match assets.resolve("/").await.reply {
            Reply::Asset { content_type, body } => {
                assert!(content_type.starts_with("text/html"), "{}", content_type);
                assert_eq!(body, b"<html></html>");
            }
            other => panic!("unexpected reply {:?}", other),
        }
        match assets.resolve("/game.css").await.reply {
            Reply::Asset { content_type, .. } => assert!(content_type.starts_with("text/css")),
            other => panic!("unexpected reply {:?}", other),
        }
        let missing = assets.resolve("/missing.css").await;
        assert_eq!(missing.reply, Reply::NotFound);
        assert!(missing.note.is_some());
    }

    #[tokio::test]
    async fn paths_cannot_leave_the_root() {
        let outer = tempfile::tempdir().unwrap();
        std::fs::write(outer.path().join("secret.txt"), "hidden").unwrap();
        let root = outer.path().join("htdocs");
        std::fs::create_dir(&root).unwrap();
        let assets = FileAssets::new(&root);

        for path in ["/../secret.txt", "/%2e%2e/secret.txt", "/a/../../secret.txt"] {
            assert_eq!(assets.resolve(path).await.reply, Reply::NotFound, "{}", path);
        }
    }

    #[tokio::test]
    async fn no_assets_answers_not_found() {
        assert_eq!(NoAssets.resolve("/").await.reply, Reply::NotFound);
    }
}
