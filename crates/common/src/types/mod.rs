use serde::Serialize;

/// Content type stamped on every HTTP response.
pub const JSON_CONTENT_TYPE: &str = "application/json";

#[derive(Serialize, Debug)]
pub struct Health {
    pub status: &'static str,
}

impl Health {
    pub fn ok() -> Self {
        Self { status: "ok" }
    }
}
