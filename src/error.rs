use rocket::http::Status;
use rocket::request::Request;
use rocket::response::{self, Responder};
use thiserror::Error;

/// Faults surfaced by the HTTP layer. Inference failures are opaque to
/// the caller: the detail is logged server-side and the response is a
/// bare 500.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("inference failed: {0}")]
    Inference(#[from] anyhow::Error),
}

impl<'r> Responder<'r, 'static> for ApiError {
    fn respond_to(self, req: &'r Request<'_>) -> response::Result<'static> {
        eprintln!("[api] {self}");
        Status::InternalServerError.respond_to(req)
    }
}
