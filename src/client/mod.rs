pub mod factory;
mod refresh;
pub mod store;

pub use refresh::RefreshError;
pub use store::{FileTokenStore, MemoryTokenStore, TokenStore};

use std::sync::Arc;

use anyhow::{bail, Result};
use log::{debug, info, warn};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Method, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

use crate::types::app::{ApiKey, CreateAppRequest, DeveloperApp, UpdateAppRequest};
use crate::types::auth::{
    LoginRequest, PasswordResetRequest, RegisterRequest, RegisteredUser, ResetPasswordRequest,
    ResetToken, VerifyOtpRequest, VerifyResetOtpRequest,
};
use crate::types::link::{
    CreatePaymentLinkRequest, PaymentLink, PublicPaymentReceipt, UpdatePaymentLinkRequest,
};
use crate::types::payment::{PaymentTransaction, ProcessPaymentRequest};
use crate::types::request::Payload;
use crate::types::response::{ResponseEnvelope, MIME_JSON};
use crate::types::token::{RefreshTokenRequest, TokenPair};
use crate::types::wallet::Wallet;

use refresh::{RefreshGate, RefreshTicket};

const REFRESH_PATH: &str = "/auth/refresh-token";

/// HTTP client for the SharePay API. Attaches the stored bearer token to
/// every request, maps response envelopes to typed results, and on a 401
/// performs one coalesced token refresh followed by a single retry.
pub struct Client {
    url: String,
    http: reqwest::Client,
    store: Arc<dyn TokenStore>,
    refresh: RefreshGate,
}

/// Typed application failure: non-2xx statuses and `success: false`
/// envelopes both map here. `payload` keeps the raw body for diagnostics.
#[derive(Debug, Clone)]
pub struct ApiError {
    pub status: u16,
    pub code: Option<String>,
    pub message: String,
    pub payload: Option<serde_json::Value>,
}

impl ApiError {
    fn from_response(status: u16, is_json: bool, text: &str) -> Self {
        let payload = if is_json {
            serde_json::from_str::<serde_json::Value>(text).ok()
        } else {
            None
        };
        let message = payload
            .as_ref()
            .and_then(|p| p.get("message"))
            .and_then(|m| m.as_str())
            .map(String::from)
            .unwrap_or_else(|| format!("Request failed ({status})"));
        let code = payload
            .as_ref()
            .and_then(|p| p.get("code"))
            .and_then(|c| c.as_str())
            .map(String::from);
        Self {
            status,
            code,
            message,
            payload,
        }
    }
}

#[derive(Error, Debug)]
pub enum RequestError {
    #[error("network error: {0}")]
    Network(#[source] anyhow::Error),

    #[error("client error: {0}")]
    Client(String),

    #[error("server error: status {}, {}", .0.status, .0.message)]
    Api(ApiError),

    #[error("token refresh failed: {0}")]
    Refresh(RefreshError),

    #[error("token store error: {0}")]
    Store(#[source] anyhow::Error),

    #[error("server returned invalid json: {0:?}")]
    InvalidJson(String),

    #[error("unexpected error: {0}")]
    Unexpected(&'static str),
}

impl RequestError {
    /// Transport or application status, when the server produced one.
    /// Enough to tell credential problems apart from everything else without
    /// inspecting message text.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api(err) => Some(err.status),
            Self::Refresh(err) => err.status,
            _ => None,
        }
    }

    pub fn code(&self) -> Option<&str> {
        match self {
            Self::Api(err) => err.code.as_deref(),
            Self::Refresh(err) => err.code.as_deref(),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(StatusCode::UNAUTHORIZED.as_u16())
    }
}

/// How a single wire call authenticates.
enum Credential {
    /// Bearer token from the store, when one is present.
    FromStore,
    /// Explicit token, used by post-refresh retries. Overrides everything.
    Token(String),
    /// No Authorization header, used by public endpoints and the refresh
    /// call itself.
    Anonymous,
}

enum RefreshAttempt {
    Token(TokenPair),
    LeadFailed(RefreshError),
    WaitFailed(RefreshError),
}

impl Client {
    pub fn connect(url: &str, store: Arc<dyn TokenStore>) -> Result<Self> {
        let url = url.trim_end_matches('/');
        let parsed = match Url::parse(url) {
            Ok(parsed) => parsed,
            Err(_) => bail!("invalid server url '{url}'"),
        };
        match parsed.scheme() {
            "http" | "https" => {}
            _ => bail!(
                "invalid url scheme, expect 'http' or 'https', not '{}'",
                parsed.scheme()
            ),
        }

        Ok(Self {
            url: url.to_string(),
            http: reqwest::Client::new(),
            store,
            refresh: RefreshGate::new(),
        })
    }

    /// Perform one logical request. On a first-attempt 401 the client
    /// refreshes the token (coalesced across concurrent requests) and
    /// retries once; a 401 on the retry is terminal.
    pub async fn request<T>(
        &self,
        method: Method,
        path: &str,
        payload: Payload,
    ) -> Result<ResponseEnvelope<T>, RequestError>
    where
        T: Serialize + DeserializeOwned,
    {
        self.request_with_headers(method, path, payload, HeaderMap::new())
            .await
    }

    /// Like [`request`](Self::request), with extra headers merged in.
    /// Caller headers override the JSON defaults; a caller-supplied
    /// `Authorization` suppresses the stored token.
    pub async fn request_with_headers<T>(
        &self,
        method: Method,
        path: &str,
        payload: Payload,
        headers: HeaderMap,
    ) -> Result<ResponseEnvelope<T>, RequestError>
    where
        T: Serialize + DeserializeOwned,
    {
        let first = self
            .execute(
                method.clone(),
                path,
                payload.clone(),
                &headers,
                Credential::FromStore,
            )
            .await;

        let original = match first {
            Err(RequestError::Api(err))
                if err.status == StatusCode::UNAUTHORIZED.as_u16() =>
            {
                err
            }
            other => return other,
        };

        match self.refresh_access_token().await {
            RefreshAttempt::Token(pair) => {
                debug!("Retrying {method} {path} with refreshed token");
                self.execute(
                    method,
                    path,
                    payload,
                    &headers,
                    Credential::Token(pair.access_token),
                )
                .await
            }
            // The leader's own 401 propagates as a normal failure; the
            // refresh error itself goes to the requests queued behind it.
            RefreshAttempt::LeadFailed(_) => Err(RequestError::Api(original)),
            RefreshAttempt::WaitFailed(err) => Err(RequestError::Refresh(err)),
        }
    }

    /// Request without any Authorization header, for the public
    /// payment-collection endpoints. Never enters the refresh path.
    pub async fn request_anonymous<T>(
        &self,
        method: Method,
        path: &str,
        payload: Payload,
    ) -> Result<ResponseEnvelope<T>, RequestError>
    where
        T: Serialize + DeserializeOwned,
    {
        self.execute(method, path, payload, &HeaderMap::new(), Credential::Anonymous)
            .await
    }

    async fn refresh_access_token(&self) -> RefreshAttempt {
        match self.refresh.join().await {
            RefreshTicket::Wait(mut rx) => match rx.recv().await {
                Ok(Ok(pair)) => RefreshAttempt::Token(pair),
                Ok(Err(err)) => RefreshAttempt::WaitFailed(err),
                Err(_) => {
                    RefreshAttempt::WaitFailed(RefreshError::new("refresh settled without outcome"))
                }
            },
            RefreshTicket::Lead(tx) => {
                let outcome = self.refresh_once().await;
                if outcome.is_err() {
                    // One failed refresh logs the session out everywhere.
                    if let Err(err) = self.store.clear() {
                        warn!("Failed to clear token store after refresh failure: {err:#}");
                    }
                }
                let attempt = match &outcome {
                    Ok(pair) => RefreshAttempt::Token(pair.clone()),
                    Err(err) => RefreshAttempt::LeadFailed(err.clone()),
                };
                self.refresh.settle(tx, outcome).await;
                attempt
            }
        }
    }

    /// The single wire call to the refresh endpoint. Goes through `execute`
    /// directly, so it can never recurse into the refresh path, and carries
    /// no Authorization header.
    async fn refresh_once(&self) -> Result<TokenPair, RefreshError> {
        let pair = self
            .store
            .get()
            .map_err(|err| RefreshError::new(format!("token store: {err:#}")))?;
        let refresh_token = match pair {
            Some(pair) if !pair.refresh_token.is_empty() => pair.refresh_token,
            _ => return Err(RefreshError::unavailable()),
        };

        info!("Access token rejected by server, refreshing");
        let body = Payload::json(&RefreshTokenRequest { refresh_token });
        let resp: ResponseEnvelope<TokenPair> = self
            .execute(
                Method::POST,
                REFRESH_PATH,
                body,
                &HeaderMap::new(),
                Credential::Anonymous,
            )
            .await
            .map_err(RefreshError::from_request)?;

        let pair = match resp.data {
            Some(pair) if !pair.access_token.is_empty() => pair,
            _ => return Err(RefreshError::new("refresh response missing access token")),
        };

        // Written before the gate settles, so every queued retry reads the
        // new pair, never the stale one.
        self.store
            .replace(pair.clone())
            .map_err(|err| RefreshError::new(format!("token store: {err:#}")))?;
        Ok(pair)
    }

    async fn execute<T>(
        &self,
        method: Method,
        path: &str,
        payload: Payload,
        headers: &HeaderMap,
        cred: Credential,
    ) -> Result<ResponseEnvelope<T>, RequestError>
    where
        T: Serialize + DeserializeOwned,
    {
        let url = if path.starts_with("http") {
            path.to_string()
        } else {
            format!("{}{}", self.url, path)
        };
        debug!("Request {method} {url}");

        let mut hmap = HeaderMap::new();
        hmap.insert(ACCEPT, HeaderValue::from_static(MIME_JSON));
        let mut req = self.http.request(method, &url);
        if let Payload::Json(body) = payload {
            hmap.insert(CONTENT_TYPE, HeaderValue::from_static(MIME_JSON));
            req = req.body(body);
        }
        for (name, value) in headers.iter() {
            hmap.insert(name, value.clone());
        }

        match cred {
            Credential::Token(token) => {
                let value = HeaderValue::from_str(&format!("Bearer {token}"))
                    .map_err(|err| RequestError::Client(format!("invalid auth header: {err}")))?;
                hmap.insert(AUTHORIZATION, value);
            }
            Credential::FromStore if !hmap.contains_key(AUTHORIZATION) => {
                if let Some(pair) = self.store.get().map_err(RequestError::Store)? {
                    if !pair.access_token.is_empty() {
                        let value = HeaderValue::from_str(&pair.authorization()).map_err(|err| {
                            RequestError::Client(format!("invalid auth header: {err}"))
                        })?;
                        hmap.insert(AUTHORIZATION, value);
                    }
                }
            }
            _ => {}
        }

        let req = match req.headers(hmap).build() {
            Ok(req) => req,
            Err(err) => return Err(RequestError::Client(format!("build request: {err}"))),
        };

        let resp = match self.http.execute(req).await {
            Ok(resp) => resp,
            Err(err) => return Err(RequestError::Network(err.into())),
        };

        let status = resp.status();
        let is_json = resp
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|ct| ct.to_str().ok())
            .unwrap_or_default()
            .contains(MIME_JSON);
        let text = match resp.text().await {
            Ok(text) => text,
            Err(err) => return Err(RequestError::Network(err.into())),
        };

        if !status.is_success() {
            return Err(RequestError::Api(ApiError::from_response(
                status.as_u16(),
                is_json,
                &text,
            )));
        }

        if text.is_empty()
            && matches!(status, StatusCode::NO_CONTENT | StatusCode::RESET_CONTENT)
        {
            return Ok(ResponseEnvelope::no_content());
        }

        if !is_json {
            return Err(RequestError::Unexpected("server returned unknown content type"));
        }

        let envelope: ResponseEnvelope<T> = match serde_json::from_str(&text) {
            Ok(envelope) => envelope,
            Err(_) => return Err(RequestError::InvalidJson(text)),
        };

        if !envelope.success {
            let message = if envelope.message.is_empty() {
                String::from("Request failed")
            } else {
                envelope.message.clone()
            };
            return Err(RequestError::Api(ApiError {
                status: status.as_u16(),
                code: envelope.code.clone(),
                message,
                payload: serde_json::from_str(&text).ok(),
            }));
        }

        Ok(envelope)
    }

    async fn request_data<T>(
        &self,
        method: Method,
        path: &str,
        payload: Payload,
    ) -> Result<T, RequestError>
    where
        T: Serialize + DeserializeOwned,
    {
        let resp: ResponseEnvelope<T> = self.request(method, path, payload).await?;
        match resp.data {
            Some(data) => Ok(data),
            None => Err(RequestError::Unexpected("server didn't return data in json")),
        }
    }

    async fn request_operation(
        &self,
        method: Method,
        path: &str,
        payload: Payload,
    ) -> Result<(), RequestError> {
        let _: ResponseEnvelope<serde_json::Value> = self.request(method, path, payload).await?;
        Ok(())
    }
}

// Auth endpoints.
impl Client {
    pub async fn register(&self, req: &RegisterRequest) -> Result<RegisteredUser, RequestError> {
        self.request_data(Method::POST, "/auth/register", Payload::json(req))
            .await
    }

    pub async fn verify_otp(&self, email: &str, otp_code: &str) -> Result<(), RequestError> {
        let req = VerifyOtpRequest {
            email: email.to_string(),
            otp_code: otp_code.to_string(),
        };
        self.request_operation(Method::POST, "/auth/verify-otp", Payload::json(&req))
            .await
    }

    /// Log in and store the issued pair: durably when `persist` is set,
    /// session-scoped otherwise.
    pub async fn login(
        &self,
        email: &str,
        password: &str,
        persist: bool,
    ) -> Result<TokenPair, RequestError> {
        let req = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let pair: TokenPair = self
            .request_data(Method::POST, "/auth/login", Payload::json(&req))
            .await?;
        self.store
            .set(pair.clone(), persist)
            .map_err(RequestError::Store)?;
        info!("Logged in as '{email}'");
        Ok(pair)
    }

    /// Force a token refresh now, coalesced with any in-flight one.
    pub async fn refresh(&self) -> Result<TokenPair, RequestError> {
        match self.refresh_access_token().await {
            RefreshAttempt::Token(pair) => Ok(pair),
            RefreshAttempt::LeadFailed(err) | RefreshAttempt::WaitFailed(err) => {
                Err(RequestError::Refresh(err))
            }
        }
    }

    /// Revoke the refresh token server-side when possible; local tokens are
    /// cleared no matter what.
    pub async fn logout(&self) -> Result<(), RequestError> {
        if let Some(pair) = self.store.get().map_err(RequestError::Store)? {
            let req = RefreshTokenRequest {
                refresh_token: pair.refresh_token,
            };
            if let Err(err) = self
                .request_operation(Method::POST, "/auth/logout", Payload::json(&req))
                .await
            {
                warn!("Logout request failed: {err}, clearing local tokens anyway");
            }
        }
        self.store.clear().map_err(RequestError::Store)
    }

    pub async fn request_password_reset(&self, email: &str) -> Result<(), RequestError> {
        let req = PasswordResetRequest {
            email: email.to_string(),
        };
        self.request_operation(
            Method::POST,
            "/auth/request-password-reset",
            Payload::json(&req),
        )
        .await
    }

    pub async fn verify_reset_otp(
        &self,
        email: &str,
        otp_code: &str,
    ) -> Result<String, RequestError> {
        let req = VerifyResetOtpRequest {
            email: email.to_string(),
            otp_code: otp_code.to_string(),
        };
        let token: ResetToken = self
            .request_data(Method::POST, "/auth/verify-reset-otp", Payload::json(&req))
            .await?;
        Ok(token.reset_token)
    }

    pub async fn reset_password(&self, req: &ResetPasswordRequest) -> Result<(), RequestError> {
        self.request_operation(Method::POST, "/auth/reset-password", Payload::json(req))
            .await
    }
}

// Developer app endpoints.
impl Client {
    pub async fn list_apps(&self) -> Result<Vec<DeveloperApp>, RequestError> {
        self.request_data(Method::GET, "/merchants/apps", Payload::None)
            .await
    }

    pub async fn get_app(&self, id: &str) -> Result<DeveloperApp, RequestError> {
        self.request_data(Method::GET, &format!("/merchants/apps/{id}"), Payload::None)
            .await
    }

    pub async fn create_app(&self, req: &CreateAppRequest) -> Result<DeveloperApp, RequestError> {
        self.request_data(Method::POST, "/merchants/apps", Payload::json(req))
            .await
    }

    pub async fn update_app(
        &self,
        id: &str,
        req: &UpdateAppRequest,
    ) -> Result<DeveloperApp, RequestError> {
        self.request_data(
            Method::PUT,
            &format!("/merchants/apps/{id}"),
            Payload::json(req),
        )
        .await
    }

    pub async fn suspend_app(&self, id: &str) -> Result<DeveloperApp, RequestError> {
        self.request_data(
            Method::POST,
            &format!("/merchants/apps/{id}/suspend"),
            Payload::None,
        )
        .await
    }

    pub async fn activate_app(&self, id: &str) -> Result<DeveloperApp, RequestError> {
        self.request_data(
            Method::POST,
            &format!("/merchants/apps/{id}/activate"),
            Payload::None,
        )
        .await
    }

    pub async fn delete_app(&self, id: &str) -> Result<(), RequestError> {
        self.request_operation(
            Method::DELETE,
            &format!("/merchants/apps/{id}"),
            Payload::None,
        )
        .await
    }

    pub async fn create_api_key(&self, id: &str) -> Result<ApiKey, RequestError> {
        self.request_data(
            Method::POST,
            &format!("/merchants/apps/{id}/api-keys"),
            Payload::None,
        )
        .await
    }

    pub async fn rotate_api_key(&self, id: &str) -> Result<ApiKey, RequestError> {
        self.request_data(
            Method::POST,
            &format!("/merchants/apps/{id}/api-keys/rotate"),
            Payload::None,
        )
        .await
    }
}

// Payment link, payment and wallet endpoints.
impl Client {
    pub async fn list_payment_links(&self) -> Result<Vec<PaymentLink>, RequestError> {
        self.request_data(Method::GET, "/merchants/payment-links", Payload::None)
            .await
    }

    pub async fn get_payment_link(&self, id: &str) -> Result<PaymentLink, RequestError> {
        self.request_data(
            Method::GET,
            &format!("/merchants/payment-links/{id}"),
            Payload::None,
        )
        .await
    }

    pub async fn create_payment_link(
        &self,
        req: &CreatePaymentLinkRequest,
    ) -> Result<PaymentLink, RequestError> {
        if req.app_id.is_empty() {
            return Err(RequestError::Client(String::from(
                "appId is required to create a payment link",
            )));
        }
        self.request_data(Method::POST, "/merchants/payment-links", Payload::json(req))
            .await
    }

    pub async fn update_payment_link(
        &self,
        id: &str,
        req: &UpdatePaymentLinkRequest,
    ) -> Result<PaymentLink, RequestError> {
        self.request_data(
            Method::PUT,
            &format!("/merchants/payment-links/{id}"),
            Payload::json(req),
        )
        .await
    }

    pub async fn delete_payment_link(&self, id: &str) -> Result<(), RequestError> {
        self.request_operation(
            Method::DELETE,
            &format!("/merchants/payment-links/{id}"),
            Payload::None,
        )
        .await
    }

    /// Public collection page payload; no credentials attached.
    pub async fn get_public_payment_link(
        &self,
        token: &str,
    ) -> Result<PaymentLink, RequestError> {
        let resp: ResponseEnvelope<PaymentLink> = self
            .request_anonymous(
                Method::GET,
                &format!("/merchants/payment-links/public/{token}"),
                Payload::None,
            )
            .await?;
        match resp.data {
            Some(data) => Ok(data),
            None => Err(RequestError::Unexpected("server didn't return data in json")),
        }
    }

    /// Unauthenticated payment against a public link.
    pub async fn pay_public_payment_link(
        &self,
        token: &str,
        payment: &serde_json::Value,
    ) -> Result<PublicPaymentReceipt, RequestError> {
        let resp: ResponseEnvelope<PublicPaymentReceipt> = self
            .request_anonymous(
                Method::POST,
                &format!("/merchants/payment-links/public/{token}/pay"),
                Payload::json(payment),
            )
            .await?;
        match resp.data {
            Some(data) => Ok(data),
            None => Err(RequestError::Unexpected("server didn't return data in json")),
        }
    }

    pub async fn process_payment(
        &self,
        req: &ProcessPaymentRequest,
    ) -> Result<PaymentTransaction, RequestError> {
        self.request_data(Method::POST, "/payments/process", Payload::json(req))
            .await
    }

    pub async fn my_wallets(&self) -> Result<Vec<Wallet>, RequestError> {
        self.request_data(Method::GET, "/wallets/me", Payload::None)
            .await
    }
}
