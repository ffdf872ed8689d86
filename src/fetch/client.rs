use async_trait::async_trait;
use reqwest::{Request, Response};

/// Transport used to retrieve a remote readings source.
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn execute(&self, req: Request) -> reqwest::Result<Response>;
}
