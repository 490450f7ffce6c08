//! # Pharmacy REST API
//!
//! HTTP binding of the catalog and checkout seams.
//!
//! ## Client States
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   ApiClient (anonymous)                 AuthorizedApi (owns Session)    │
//! │   ─────────────────────                 ────────────────────────────    │
//! │   login(&Credentials)      ──────────►  GET  /medicines                 │
//! │   register(&Credentials)   ──────────►  POST /medicines/sell            │
//! │   adopt_token(token)       ──────────►  session(), user()               │
//! │                            ◄──────────  logout(self)                    │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Response Envelope
//! Every endpoint answers `{ "success": bool, "data": ..., "message": ... }`.
//! Validation failures put `[{ "message": ... }, ...]` in `data`.

use async_trait::async_trait;
use chrono::NaiveDate;
use medstock_core::{CatalogItem, CheckoutItem, CheckoutRequest};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::{DeserializeOwned, IgnoredAny};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};
use crate::service::{CatalogProvider, CheckoutService};
use crate::session::{Credentials, Session, UserProfile};

// =============================================================================
// Wire Types
// =============================================================================

#[derive(Debug, Deserialize)]
struct ApiEnvelope<T> {
    #[serde(default)]
    success: bool,
    data: Option<T>,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    data: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct AuthData {
    token: String,
    #[serde(default)]
    user: UserProfile,
}

#[derive(Debug, Deserialize)]
struct MeData {
    #[serde(default)]
    user: UserProfile,
}

/// A medicine as the API lists it. Only the fields billing and the
/// dashboard read are kept.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MedicineDto {
    id: String,
    name: String,
    #[serde(default)]
    quantity: i64,
    #[serde(default)]
    batch_number: Option<String>,
    #[serde(default)]
    expiry_date: Option<String>,
}

impl From<MedicineDto> for CatalogItem {
    fn from(dto: MedicineDto) -> Self {
        let expiry_date = dto.expiry_date.as_deref().and_then(parse_expiry_date);
        CatalogItem {
            available_quantity: dto.quantity.max(0),
            batch_number: dto.batch_number.filter(|b| !b.is_empty()),
            expiry_date,
            id: dto.id,
            name: dto.name,
        }
    }
}

/// Accepts `2026-03-01` as well as full timestamps like
/// `2026-03-01T00:00:00.000Z`.
fn parse_expiry_date(raw: &str) -> Option<NaiveDate> {
    let date_part = raw.get(..10)?;
    match NaiveDate::parse_from_str(date_part, "%Y-%m-%d") {
        Ok(date) => Some(date),
        Err(_) => {
            warn!(value = %raw, "Ignoring unparseable expiry date");
            None
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SellItem<'a> {
    medicine_id: &'a str,
    quantity: i64,
    /// Major units; the API stores prices as plain numbers.
    price: f64,
}

impl<'a> From<&'a CheckoutItem> for SellItem<'a> {
    fn from(item: &'a CheckoutItem) -> Self {
        SellItem {
            medicine_id: &item.item_id,
            quantity: item.quantity,
            price: item.unit_price.to_major_f64(),
        }
    }
}

#[derive(Debug, Serialize)]
struct SellRequest<'a> {
    items: Vec<SellItem<'a>>,
}

impl<'a> From<&'a CheckoutRequest> for SellRequest<'a> {
    fn from(request: &'a CheckoutRequest) -> Self {
        SellRequest {
            items: request.items.iter().map(SellItem::from).collect(),
        }
    }
}

// =============================================================================
// Response Handling
// =============================================================================

/// Best human-readable message in an error body.
fn error_message(body: &str) -> Option<String> {
    let parsed: ErrorBody = serde_json::from_str(body).ok()?;

    let details: Vec<String> = parsed
        .data
        .as_ref()
        .and_then(|data| data.as_array())
        .map(|entries| {
            entries
                .iter()
                .filter_map(|e| e.get("message").and_then(|m| m.as_str()))
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    if !details.is_empty() {
        Some(details.join(", "))
    } else {
        parsed.message
    }
}

/// Turns a status and body into the envelope's `data`.
fn parse_envelope<T: DeserializeOwned>(status: StatusCode, body: &str) -> ClientResult<Option<T>> {
    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        return Err(ClientError::Unauthorized(
            error_message(body).unwrap_or_else(|| status.to_string()),
        ));
    }

    if !status.is_success() {
        return Err(ClientError::Api {
            status: status.as_u16(),
            message: error_message(body).unwrap_or_else(|| status.to_string()),
        });
    }

    let envelope: ApiEnvelope<T> = serde_json::from_str(body)
        .map_err(|e| ClientError::Http(format!("Malformed response body: {}", e)))?;

    if !envelope.success {
        return Err(ClientError::Api {
            status: status.as_u16(),
            message: envelope
                .message
                .unwrap_or_else(|| "Request was not successful".to_string()),
        });
    }

    Ok(envelope.data)
}

fn require_data<T>(data: Option<T>, endpoint: &str) -> ClientResult<T> {
    data.ok_or_else(|| ClientError::Http(format!("Response from {} carried no data", endpoint)))
}

async fn send<T: DeserializeOwned>(request: RequestBuilder) -> ClientResult<Option<T>> {
    let response = request.send().await?;
    let status = response.status();
    let body = response.text().await?;
    parse_envelope(status, &body)
}

// =============================================================================
// Anonymous Client
// =============================================================================

/// API client without a session. Can only authenticate.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        let http = Client::builder().timeout(config.timeout()).build()?;
        Ok(ApiClient {
            http,
            base_url: config.base_url().to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// `POST /auth/login`.
    pub async fn login(&self, credentials: &Credentials) -> ClientResult<AuthorizedApi> {
        self.authenticate("/auth/login", credentials).await
    }

    /// `POST /auth/register`; the new account is logged in straight away.
    pub async fn register(&self, credentials: &Credentials) -> ClientResult<AuthorizedApi> {
        self.authenticate("/auth/register", credentials).await
    }

    async fn authenticate(&self, path: &str, credentials: &Credentials) -> ClientResult<AuthorizedApi> {
        debug!(endpoint = path, email = %credentials.email, "Authenticating");

        let data: Option<AuthData> = send(self.http.post(self.url(path)).json(credentials)).await?;
        let auth = require_data(data, path)?;

        let session = Session::new(auth.token, auth.user)?;
        Ok(self.authorize(session))
    }

    /// Adopts a token handed over by the OAuth callback, fetching the
    /// profile it belongs to from `GET /auth/me`.
    pub async fn adopt_token(&self, token: &str) -> ClientResult<AuthorizedApi> {
        // Fail on an unreadable or expired token before going to the network.
        let provisional = Session::new(token, UserProfile::default())?;
        provisional.ensure_valid()?;

        let data: Option<MeData> = send(
            self.http
                .get(self.url("/auth/me"))
                .header(reqwest::header::AUTHORIZATION, provisional.bearer()),
        )
        .await?;
        let me = require_data(data, "/auth/me")?;

        let session = Session::new(token, me.user)?;
        Ok(self.authorize(session))
    }

    fn authorize(&self, session: Session) -> AuthorizedApi {
        info!(
            user = session.user().display_name(),
            expires_at = ?session.expires_at(),
            "Session acquired"
        );
        AuthorizedApi {
            client: self.clone(),
            session,
        }
    }
}

// =============================================================================
// Authorized Client
// =============================================================================

/// API client holding a live [`Session`].
#[derive(Debug, Clone)]
pub struct AuthorizedApi {
    client: ApiClient,
    session: Session,
}

impl AuthorizedApi {
    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn user(&self) -> &UserProfile {
        self.session.user()
    }

    /// Drops the session and hands back the anonymous client.
    pub fn logout(self) -> ApiClient {
        info!(user = self.session.user().display_name(), "Session invalidated");
        self.client
    }

    fn authorized(&self, request: RequestBuilder) -> ClientResult<RequestBuilder> {
        self.session.ensure_valid()?;
        Ok(request.header(reqwest::header::AUTHORIZATION, self.session.bearer()))
    }
}

#[async_trait]
impl CatalogProvider for AuthorizedApi {
    async fn list_available_items(&self) -> ClientResult<Vec<CatalogItem>> {
        let request = self.authorized(self.client.http.get(self.client.url("/medicines")))?;
        let data: Option<Vec<MedicineDto>> = send(request).await?;

        let items: Vec<CatalogItem> = data
            .unwrap_or_default()
            .into_iter()
            .map(CatalogItem::from)
            .collect();

        debug!(count = items.len(), "Fetched medicines");
        Ok(items)
    }
}

#[async_trait]
impl CheckoutService for AuthorizedApi {
    async fn submit(&self, request: &CheckoutRequest) -> ClientResult<()> {
        let body = SellRequest::from(request);
        let http = self
            .client
            .http
            .post(self.client.url("/medicines/sell"))
            .json(&body);

        let _: Option<IgnoredAny> = send(self.authorized(http)?).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use medstock_core::Money;
    use serde_json::json;

    #[tokio::test]
    async fn test_truncated_body_is_a_transport_error() {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = [0u8; 4096];
            let _ = socket.read(&mut request).await;
            // Declares 64 bytes, sends 15, then hangs up.
            socket
                .write_all(
                    b"HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: 64\r\n\r\n{\"success\":true",
                )
                .await
                .unwrap();
        });

        let request = reqwest::Client::new().get(format!("http://{}/medicines", addr));
        let err = send::<serde_json::Value>(request).await.unwrap_err();

        match err {
            ClientError::Http(message) => {
                assert!(!message.contains("Malformed"), "body error was masked: {}", message)
            }
            other => panic!("expected a transport error, got {:?}", other),
        }
    }

    #[test]
    fn test_medicine_maps_to_catalog_item() {
        let dto: MedicineDto = serde_json::from_value(json!({
            "id": "m1",
            "name": "Paracetamol",
            "batchNumber": "B-2024-07",
            "expiryDate": "2026-03-01T00:00:00.000Z",
            "quantity": 5,
            "location": "Shelf A",
            "supplierId": "s1"
        }))
        .unwrap();

        let item = CatalogItem::from(dto);
        assert_eq!(item.id, "m1");
        assert_eq!(item.name, "Paracetamol");
        assert_eq!(item.available_quantity, 5);
        assert_eq!(item.batch_number.as_deref(), Some("B-2024-07"));
        assert_eq!(item.expiry_date, NaiveDate::from_ymd_opt(2026, 3, 1));
    }

    #[test]
    fn test_medicine_with_missing_or_bad_fields() {
        let dto: MedicineDto = serde_json::from_value(json!({
            "id": "m2",
            "name": "Ibuprofen",
            "quantity": -3,
            "batchNumber": "",
            "expiryDate": "soon"
        }))
        .unwrap();

        let item = CatalogItem::from(dto);
        assert_eq!(item.id, "m2");
        assert_eq!(item.available_quantity, 0);
        assert_eq!(item.batch_number, None);
        assert_eq!(item.expiry_date, None);
    }

    #[test]
    fn test_sell_payload_shape() {
        let request = CheckoutRequest {
            items: vec![CheckoutItem {
                item_id: "m1".into(),
                quantity: 2,
                unit_price: Money::from_cents(1250),
            }],
        };

        let payload = serde_json::to_value(SellRequest::from(&request)).unwrap();
        assert_eq!(
            payload,
            json!({"items": [{"medicineId": "m1", "quantity": 2, "price": 12.5}]})
        );
    }

    #[test]
    fn test_parse_envelope_success() {
        let body = r#"{"success":true,"data":{"token":"t","user":{"name":"City Pharmacy"}}}"#;
        let data: Option<AuthData> = parse_envelope(StatusCode::OK, body).unwrap();
        let auth = data.unwrap();
        assert_eq!(auth.token, "t");
        assert_eq!(auth.user.display_name(), "City Pharmacy");

        let empty: Option<IgnoredAny> = parse_envelope(StatusCode::OK, r#"{"success":true}"#).unwrap();
        assert!(empty.is_none());
    }

    #[test]
    fn test_parse_envelope_unsuccessful() {
        let body = r#"{"success":false,"message":"Insufficient stock for Paracetamol"}"#;
        let err = parse_envelope::<IgnoredAny>(StatusCode::OK, body).unwrap_err();
        match err {
            ClientError::Api { status, message } => {
                assert_eq!(status, 200);
                assert_eq!(message, "Insufficient stock for Paracetamol");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_parse_envelope_error_statuses() {
        let err = parse_envelope::<IgnoredAny>(
            StatusCode::UNAUTHORIZED,
            r#"{"success":false,"message":"Not authorized, token failed"}"#,
        )
        .unwrap_err();
        assert!(err.requires_login());
        assert_eq!(err.to_string(), "Not authorized: Not authorized, token failed");

        let err = parse_envelope::<IgnoredAny>(StatusCode::BAD_GATEWAY, "<html>").unwrap_err();
        assert!(err.is_retryable());
    }

    #[test]
    fn test_validation_messages_are_joined() {
        let body = r#"{"success":false,"data":[{"message":"Email is invalid"},{"message":"Password too short"}]}"#;
        let err = parse_envelope::<IgnoredAny>(StatusCode::BAD_REQUEST, body).unwrap_err();
        match err {
            ClientError::Api { status, message } => {
                assert_eq!(status, 400);
                assert_eq!(message, "Email is invalid, Password too short");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_require_data() {
        assert_eq!(require_data(Some(3), "/x").unwrap(), 3);
        assert!(require_data::<i32>(None, "/x").is_err());
    }

    #[test]
    fn test_client_trims_trailing_slash() {
        let mut config = ClientConfig::default();
        config.api.base_url = "http://localhost:5000/api/".into();
        let client = ApiClient::new(&config).unwrap();
        assert_eq!(client.url("/medicines"), "http://localhost:5000/api/medicines");
    }
}
