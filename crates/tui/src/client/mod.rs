mod convert;
#[cfg(test)]
pub(crate) mod fake;

use std::time::Duration;

use api_types::{
    ErrorResponse, RecordId,
    budget::{BudgetLimitView, BudgetUpdate},
    chat::ChatReply,
    expense::{ExpensePayload, ExpenseView},
    profile::ProfileView,
    reward::{Redemption, RewardTotal, RewardView},
};
use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, Response, Url, multipart};
use serde::{Serialize, de::DeserializeOwned};
use thiserror::Error;

use crate::error::{AppError, Result};

pub use convert::{
    cents_to_decimal, decimal_to_cents, expense_from_view, goal_to_view, goals_from_views,
    limits_from_views, limits_to_update, payload_from_valid,
};

pub type ClientResult<T> = std::result::Result<T, ClientError>;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("unauthorized")]
    Unauthorized,
    #[error("forbidden")]
    Forbidden,
    #[error("not found")]
    NotFound,
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("server error: {0}")]
    Server(String),
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
}

impl ClientError {
    /// Message sent by the server, when the response carried one.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Conflict(message) | Self::Validation(message) | Self::Server(message) => {
                Some(message.as_str()).filter(|m| *m != UNKNOWN_ERROR)
            }
            _ => None,
        }
    }
}

const UNKNOWN_ERROR: &str = "unknown error";

/// A file picked for upload to the chatbot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl Attachment {
    pub async fn read(path: &str) -> Result<Self> {
        let path = std::path::Path::new(path.trim());
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());
        Ok(Self { file_name, bytes })
    }
}

/// Multipart body of a chatbot request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatUpload {
    pub message: String,
    pub image: Option<Attachment>,
    pub file: Option<Attachment>,
}

/// Operations of the SDG Finance API. Every call carries the bearer token of
/// the current session.
#[async_trait]
pub trait FinanceApi: Send + Sync {
    async fn get_expenses(&self, token: &str) -> ClientResult<Vec<ExpenseView>>;
    async fn add_expense(&self, token: &str, payload: &ExpensePayload)
    -> ClientResult<ExpenseView>;
    async fn update_expense(
        &self,
        token: &str,
        id: &RecordId,
        payload: &ExpensePayload,
    ) -> ClientResult<ExpenseView>;
    async fn delete_expense(&self, token: &str, id: &RecordId) -> ClientResult<()>;
    async fn get_budgets(
        &self,
        token: &str,
        month: u32,
        year: i32,
    ) -> ClientResult<Vec<BudgetLimitView>>;
    async fn update_budgets(&self, token: &str, update: &BudgetUpdate) -> ClientResult<()>;
    async fn get_profile(&self, token: &str) -> ClientResult<ProfileView>;
    async fn update_profile(&self, token: &str, profile: &ProfileView)
    -> ClientResult<ProfileView>;
    async fn get_rewards(&self, token: &str) -> ClientResult<Vec<RewardView>>;
    async fn redeem_reward(&self, token: &str, id: &RecordId) -> ClientResult<Redemption>;
    async fn get_total_rewards(&self, token: &str) -> ClientResult<RewardTotal>;
    async fn send_chat(&self, token: &str, upload: &ChatUpload) -> ClientResult<ChatReply>;
}

#[derive(Debug, Clone)]
pub struct Client {
    base_url: Url,
    http: reqwest::Client,
}

impl Client {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        // Relative joins keep a path prefix only when it ends with a slash.
        let mut raw = base_url.trim().to_string();
        if !raw.ends_with('/') {
            raw.push('/');
        }
        let base_url = Url::parse(&raw)
            .map_err(|err| AppError::Terminal(format!("invalid base_url: {err}")))?;
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { base_url, http })
    }

    fn request(&self, method: Method, path: &str, token: &str) -> ClientResult<RequestBuilder> {
        let endpoint = self
            .base_url
            .join(path.trim_start_matches('/'))
            .map_err(|err| ClientError::Server(format!("invalid base_url: {err}")))?;
        tracing::debug!(%method, %endpoint, "api request");
        Ok(self.http.request(method, endpoint).bearer_auth(token))
    }

    async fn json<T: DeserializeOwned>(&self, req: RequestBuilder) -> ClientResult<T> {
        let res = checked(req.send().await?).await?;
        Ok(res.json::<T>().await?)
    }

    async fn unit(&self, req: RequestBuilder) -> ClientResult<()> {
        checked(req.send().await?).await?;
        Ok(())
    }

    async fn send_json<B: Serialize + ?Sized + Sync, T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        token: &str,
        body: &B,
    ) -> ClientResult<T> {
        let req = self.request(method, path, token)?.json(body);
        self.json(req).await
    }
}

/// Passes successful responses through and maps the rest onto
/// [`ClientError`].
async fn checked(res: Response) -> ClientResult<Response> {
    if res.status().is_success() {
        return Ok(res);
    }

    let status = res.status();
    let body = res
        .json::<ErrorResponse>()
        .await
        .ok()
        .and_then(ErrorResponse::into_message)
        .unwrap_or_else(|| UNKNOWN_ERROR.to_string());
    tracing::warn!(status = status.as_u16(), message = %body, "api request failed");

    let err = match status.as_u16() {
        401 => ClientError::Unauthorized,
        403 => ClientError::Forbidden,
        404 => ClientError::NotFound,
        409 => ClientError::Conflict(body),
        422 => ClientError::Validation(body),
        _ => ClientError::Server(body),
    };
    Err(err)
}

#[async_trait]
impl FinanceApi for Client {
    async fn get_expenses(&self, token: &str) -> ClientResult<Vec<ExpenseView>> {
        let req = self.request(Method::GET, "api/expenses", token)?;
        self.json(req).await
    }

    async fn add_expense(
        &self,
        token: &str,
        payload: &ExpensePayload,
    ) -> ClientResult<ExpenseView> {
        self.send_json(Method::POST, "api/expenses", token, payload)
            .await
    }

    async fn update_expense(
        &self,
        token: &str,
        id: &RecordId,
        payload: &ExpensePayload,
    ) -> ClientResult<ExpenseView> {
        let path = format!("api/expenses/{id}");
        self.send_json(Method::PUT, &path, token, payload).await
    }

    async fn delete_expense(&self, token: &str, id: &RecordId) -> ClientResult<()> {
        let path = format!("api/expenses/{id}");
        let req = self.request(Method::DELETE, &path, token)?;
        self.unit(req).await
    }

    async fn get_budgets(
        &self,
        token: &str,
        month: u32,
        year: i32,
    ) -> ClientResult<Vec<BudgetLimitView>> {
        let req = self
            .request(Method::GET, "api/budgets", token)?
            .query(&[("month", month.to_string()), ("year", year.to_string())]);
        self.json(req).await
    }

    async fn update_budgets(&self, token: &str, update: &BudgetUpdate) -> ClientResult<()> {
        let req = self.request(Method::PUT, "api/budgets", token)?.json(update);
        self.unit(req).await
    }

    async fn get_profile(&self, token: &str) -> ClientResult<ProfileView> {
        let req = self.request(Method::GET, "api/profile", token)?;
        self.json(req).await
    }

    async fn update_profile(
        &self,
        token: &str,
        profile: &ProfileView,
    ) -> ClientResult<ProfileView> {
        self.send_json(Method::PUT, "api/profile", token, profile)
            .await
    }

    async fn get_rewards(&self, token: &str) -> ClientResult<Vec<RewardView>> {
        let req = self.request(Method::GET, "api/rewards", token)?;
        self.json(req).await
    }

    async fn redeem_reward(&self, token: &str, id: &RecordId) -> ClientResult<Redemption> {
        let path = format!("api/rewards/{id}/redeem");
        let req = self.request(Method::POST, &path, token)?;
        self.json(req).await
    }

    async fn get_total_rewards(&self, token: &str) -> ClientResult<RewardTotal> {
        let req = self.request(Method::GET, "api/rewards/total", token)?;
        self.json(req).await
    }

    async fn send_chat(&self, token: &str, upload: &ChatUpload) -> ClientResult<ChatReply> {
        let mut form = multipart::Form::new().text("message", upload.message.clone());
        if let Some(image) = &upload.image {
            form = form.part(
                "image",
                multipart::Part::bytes(image.bytes.clone()).file_name(image.file_name.clone()),
            );
        }
        if let Some(file) = &upload.file {
            form = form.part(
                "file",
                multipart::Part::bytes(file.bytes.clone()).file_name(file.file_name.clone()),
            );
        }
        let req = self.request(Method::POST, "api/chatbot", token)?.multipart(form);
        self.json(req).await
    }
}
