use serde::Serialize;

/// `{"message": ...}` body returned by mutations that have nothing else to say.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

impl MessageResponse {
    pub fn new(message: &'static str) -> Self {
        Self { message }
    }
}
