use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct FeedCard {
    pub index: usize,
    pub name: String,
    pub url: String,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
}
