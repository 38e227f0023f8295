use crate::config::Config;
use crate::error::GatewayError;
use crate::models::{
    LeaderboardResponse, QuestionsResponse, ReviewResponse, SubmitPayload, SubmitResponse,
};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;
use tracing::{debug, error};

/// Quiz backend as seen by the client.
#[async_trait]
pub trait QuizGateway: Send + Sync {
    async fn questions(&self) -> Result<QuestionsResponse, GatewayError>;
    async fn submit(&self, payload: &SubmitPayload) -> Result<SubmitResponse, GatewayError>;
    async fn leaderboard(&self, limit: Option<u32>) -> Result<LeaderboardResponse, GatewayError>;
    async fn clear_leaderboard(&self) -> Result<(), GatewayError>;
    async fn review(&self, id: &str) -> Result<ReviewResponse, GatewayError>;
    async fn delete_entry(&self, id: &str) -> Result<(), GatewayError>;
}

#[derive(Debug, Clone)]
pub struct HttpGateway {
    client: Client,
    base_url: Url,
    admin_token: Option<String>,
}

impl HttpGateway {
    pub fn new(config: &Config) -> Result<Self, GatewayError> {
        let client = Client::builder().timeout(config.http_timeout).build()?;
        Ok(Self::with_client(
            client,
            config.api_url.clone(),
            config.admin_token.clone(),
        ))
    }

    pub fn with_client(client: Client, base_url: Url, admin_token: Option<String>) -> Self {
        Self {
            client,
            base_url,
            admin_token,
        }
    }

    /// `{base}/{segments...}/` with every segment path-escaped.
    pub fn endpoint(&self, segments: &[&str]) -> Result<Url, GatewayError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| GatewayError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments)
            .push("");
        Ok(url)
    }

    fn admin(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.admin_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn expect_success(response: Response) -> Result<Response, GatewayError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "No response body".to_string());
        let message = extract_detail(&body).unwrap_or(body);
        error!("Quiz api request failed: {} - {}", status, message);
        Err(GatewayError::Api(status, message))
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, GatewayError> {
        let response = Self::expect_success(response).await?;
        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}

/// Backend validation errors arrive as `{"detail": ...}` where detail is a
/// string or a list of strings.
fn extract_detail(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    match value.get("detail")? {
        serde_json::Value::String(s) => Some(s.clone()),
        serde_json::Value::Array(items) => Some(
            items
                .iter()
                .map(|item| match item {
                    serde_json::Value::String(s) => s.clone(),
                    other => other.to_string(),
                })
                .collect::<Vec<_>>()
                .join("; "),
        ),
        other => Some(other.to_string()),
    }
}

#[async_trait]
impl QuizGateway for HttpGateway {
    async fn questions(&self) -> Result<QuestionsResponse, GatewayError> {
        let url = self.endpoint(&["questions"])?;
        debug!(%url, "GET questions");
        let response = self.client.get(url).send().await?;
        Self::decode(response).await
    }

    async fn submit(&self, payload: &SubmitPayload) -> Result<SubmitResponse, GatewayError> {
        let url = self.endpoint(&["submit"])?;
        debug!(%url, name = %payload.name, time_ms = payload.time_ms, "POST submit");
        let response = self.client.post(url).json(payload).send().await?;
        Self::decode(response).await
    }

    async fn leaderboard(&self, limit: Option<u32>) -> Result<LeaderboardResponse, GatewayError> {
        let url = self.endpoint(&["leaderboard"])?;
        debug!(%url, ?limit, "GET leaderboard");
        let mut request = self.client.get(url);
        if let Some(limit) = limit {
            request = request.query(&[("limit", limit)]);
        }
        let response = request.send().await?;
        Self::decode(response).await
    }

    async fn clear_leaderboard(&self) -> Result<(), GatewayError> {
        let url = self.endpoint(&["leaderboard"])?;
        debug!(%url, "DELETE leaderboard");
        let response = self.admin(self.client.delete(url)).send().await?;
        Self::expect_success(response).await?;
        Ok(())
    }

    async fn review(&self, id: &str) -> Result<ReviewResponse, GatewayError> {
        let url = self.endpoint(&["leaderboard", id])?;
        debug!(%url, "GET review");
        let response = self.client.get(url).send().await?;
        Self::decode(response).await
    }

    async fn delete_entry(&self, id: &str) -> Result<(), GatewayError> {
        let url = self.endpoint(&["leaderboard", id])?;
        debug!(%url, "DELETE entry");
        let response = self.admin(self.client.delete(url)).send().await?;
        Self::expect_success(response).await?;
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod mock {
    use super::*;
    use std::sync::Mutex;

    /// Canned gateway for tests. Each call pops the next queued result for
    /// its endpoint and records the call.
    #[derive(Default)]
    pub struct MockGateway {
        pub questions: Mutex<Vec<Result<QuestionsResponse, GatewayError>>>,
        pub submits: Mutex<Vec<Result<SubmitResponse, GatewayError>>>,
        pub leaderboards: Mutex<Vec<Result<LeaderboardResponse, GatewayError>>>,
        pub reviews: Mutex<Vec<Result<ReviewResponse, GatewayError>>>,
        pub deletes: Mutex<Vec<Result<(), GatewayError>>>,
        pub clears: Mutex<Vec<Result<(), GatewayError>>>,
        pub calls: Mutex<Vec<String>>,
    }

    fn api_error() -> GatewayError {
        GatewayError::Api(reqwest::StatusCode::SERVICE_UNAVAILABLE, "mock exhausted".into())
    }

    fn pop<T>(queue: &Mutex<Vec<Result<T, GatewayError>>>) -> Result<T, GatewayError> {
        let mut queue = queue.lock().unwrap();
        if queue.is_empty() {
            Err(api_error())
        } else {
            queue.remove(0)
        }
    }

    impl MockGateway {
        fn record(&self, call: String) {
            self.calls.lock().unwrap().push(call);
        }
    }

    #[async_trait]
    impl QuizGateway for MockGateway {
        async fn questions(&self) -> Result<QuestionsResponse, GatewayError> {
            self.record("questions".into());
            pop(&self.questions)
        }

        async fn submit(&self, payload: &SubmitPayload) -> Result<SubmitResponse, GatewayError> {
            self.record(format!("submit:{}", payload.name));
            pop(&self.submits)
        }

        async fn leaderboard(
            &self,
            limit: Option<u32>,
        ) -> Result<LeaderboardResponse, GatewayError> {
            self.record(format!("leaderboard:{:?}", limit));
            pop(&self.leaderboards)
        }

        async fn clear_leaderboard(&self) -> Result<(), GatewayError> {
            self.record("clear".into());
            pop(&self.clears)
        }

        async fn review(&self, id: &str) -> Result<ReviewResponse, GatewayError> {
            self.record(format!("review:{}", id));
            pop(&self.reviews)
        }

        async fn delete_entry(&self, id: &str) -> Result<(), GatewayError> {
            self.record(format!("delete:{}", id));
            pop(&self.deletes)
        }
    }
}
