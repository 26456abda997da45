use axum::{
    Json,
    response::{IntoResponse, Response},
};
use serde::Serialize;

/// Everything the presentation layer needs to render one page.
#[derive(Debug, Serialize)]
pub struct Page<T> {
    pub template: &'static str,
    /// One-shot notifications queued while handling this request
    pub messages: Vec<String>,
    pub data: T,
}

impl<T> Page<T> {
    pub fn new(template: &'static str, data: T) -> Self {
        Self {
            template,
            messages: Vec::new(),
            data,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.messages.push(message.into());
        self
    }
}

impl Page<()> {
    pub fn home() -> Self {
        Self::new("pages/home.html", ())
    }

    pub fn not_found() -> Self {
        Self::new("errors/404.html", ())
    }

    pub fn server_error() -> Self {
        Self::new("errors/500.html", ())
    }
}

impl<T: Serialize> IntoResponse for Page<T> {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}
