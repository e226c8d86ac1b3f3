//! Messages exchanged between the HTTP front end and the bridge.
use axum::http::{header, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use tokio::sync::oneshot;

/// A request as the bridge sees it: body already read to completion.
#[derive(Debug, Clone)]
pub struct NetRequest {
    pub method: Method,
    pub path: String,
    pub body: String,
}

impl NetRequest {
    pub fn get(path: &str) -> Self {
        Self {
            method: Method::GET,
            path: path.to_string(),
            body: String::new(),
        }
    }

    pub fn post(path: &str, body: &str) -> Self {
        Self {
            method: Method::POST,
            path: path.to_string(),
            body: body.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Protocol reply: header, rendered output, footer.
    Fragment(String),
    Asset {
        content_type: String,
        body: Vec<u8>,
    },
    NotFound,
}

impl IntoResponse for Reply {
    fn into_response(self) -> Response {
        match self {
            Reply::Fragment(body) => (
                [
                    (header::CONTENT_TYPE, "text/html; charset=utf-8"),
                    (header::CACHE_CONTROL, "no-store"),
                ],
                body,
            )
                .into_response(),
            Reply::Asset { content_type, body } => {
                ([(header::CONTENT_TYPE, content_type)], body).into_response()
            }
            Reply::NotFound => (StatusCode::NOT_FOUND, "Not Found").into_response(),
        }
    }
}

/// Where the reply to one request goes. Dropping it unanswered yields a 503.
pub type Responder = oneshot::Sender<Reply>;

/// One network event: the request plus the slot for its reply.
#[derive(Debug)]
pub struct NetEvent {
    pub request: NetRequest,
    pub responder: Responder,
}

impl NetEvent {
    pub fn new(request: NetRequest) -> (Self, oneshot::Receiver<Reply>) {
        let (responder, reply) = oneshot::channel();
        (Self { request, responder }, reply)
    }
}
