pub mod actors;
pub mod movies;

use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct CreatedResponse {
    pub success: bool,
    pub created: i64,
}

impl CreatedResponse {
    pub fn new(created: i64) -> Self {
        Self {
            success: true,
            created,
        }
    }
}
