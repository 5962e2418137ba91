//! Contact form channel: field validation, fixed-window rate limiting, and
//! HTML-escaped notification rendering handed to a delivery seam.

mod rate_limit;

pub use rate_limit::{FixedWindowLimiter, RetryAfter};

use std::sync::Arc;

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::warn;

pub const MAX_CONTACT_NAME: usize = 100;
pub const MAX_CONTACT_EMAIL: usize = 255;
pub const MAX_CONTACT_MESSAGE: usize = 1000;

pub const RATE_LIMIT_MAX: u32 = 3;
pub const RATE_LIMIT_WINDOW_MINUTES: i64 = 60;

/// Raw contact form payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContactRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub message: String,
}

/// Rendered notification passed to the delivery seam. `html_body` has every
/// user-supplied value escaped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactNotification {
    pub name: String,
    pub reply_to: String,
    pub subject: String,
    pub html_body: String,
}

/// Delivery seam, e.g. an email provider adapter. Fire-and-forget: failures
/// surface to the caller and are not retried.
pub trait NotificationPublisher: Send + Sync {
    fn publish(&self, notification: ContactNotification) -> Result<(), NotificationError>;
}

#[derive(Debug, thiserror::Error)]
pub enum NotificationError {
    #[error("notification transport unavailable: {0}")]
    Transport(String),
}

#[derive(Debug, thiserror::Error)]
pub enum ContactError {
    #[error("name is required and must be at most {MAX_CONTACT_NAME} characters")]
    InvalidName,
    #[error("email address is invalid or longer than {MAX_CONTACT_EMAIL} characters")]
    InvalidEmail,
    #[error("message is required and must be at most {MAX_CONTACT_MESSAGE} characters")]
    InvalidMessage,
    #[error("too many submissions, please try again in {retry_after_minutes} minutes")]
    RateLimited { retry_after_minutes: i64 },
    #[error(transparent)]
    Delivery(#[from] NotificationError),
}

/// Contact channel: rate limit per source, validate, render, deliver.
pub struct ContactService<N> {
    limiter: FixedWindowLimiter,
    publisher: Arc<N>,
}

impl<N> ContactService<N>
where
    N: NotificationPublisher + 'static,
{
    pub fn new(publisher: Arc<N>) -> Self {
        Self::with_limiter(
            publisher,
            FixedWindowLimiter::new(RATE_LIMIT_MAX, Duration::minutes(RATE_LIMIT_WINDOW_MINUTES)),
        )
    }

    pub fn with_limiter(publisher: Arc<N>, limiter: FixedWindowLimiter) -> Self {
        Self { limiter, publisher }
    }

    pub fn handle(
        &self,
        request: ContactRequest,
        source: &str,
        now: DateTime<Utc>,
    ) -> Result<(), ContactError> {
        if let Err(retry) = self.limiter.check(source, now) {
            warn!(%source, retry_after_minutes = retry.minutes, "contact rate limit exceeded");
            return Err(ContactError::RateLimited {
                retry_after_minutes: retry.minutes,
            });
        }

        let notification = render_notification(&validate_request(&request)?);
        self.publisher.publish(notification)?;
        Ok(())
    }
}

/// Validated contact fields, trimmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactMessage {
    pub name: String,
    pub email: String,
    pub message: String,
}

pub fn validate_request(request: &ContactRequest) -> Result<ContactMessage, ContactError> {
    let name = request.name.trim();
    if name.is_empty() || name.chars().count() > MAX_CONTACT_NAME {
        return Err(ContactError::InvalidName);
    }

    let email = request.email.trim();
    if email.chars().count() > MAX_CONTACT_EMAIL || !email_shape_ok(email) {
        return Err(ContactError::InvalidEmail);
    }

    let message = request.message.trim();
    if message.is_empty() || message.chars().count() > MAX_CONTACT_MESSAGE {
        return Err(ContactError::InvalidMessage);
    }

    Ok(ContactMessage {
        name: name.to_string(),
        email: email.to_string(),
        message: message.to_string(),
    })
}

fn email_shape_ok(value: &str) -> bool {
    if value.is_empty() || value.chars().any(char::is_whitespace) {
        return false;
    }
    let mut parts = value.splitn(2, '@');
    let local = parts.next().unwrap_or_default();
    let domain = parts.next().unwrap_or_default();
    if local.is_empty() || domain.is_empty() || domain.contains('@') {
        return false;
    }
    domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.')
}

fn render_notification(message: &ContactMessage) -> ContactNotification {
    let html_body = format!(
        "<h2>New Contact Form Submission</h2>\
         <p><strong>Name:</strong> {}</p>\
         <p><strong>Email:</strong> {}</p>\
         <p><strong>Message:</strong></p>\
         <p>{}</p>",
        escape_html(&message.name),
        escape_html(&message.email),
        escape_html(&message.message).replace('\n', "<br>"),
    );

    ContactNotification {
        name: message.name.clone(),
        reply_to: message.email.clone(),
        subject: format!("New Contact Form Submission from {}", message.name),
        html_body,
    }
}

/// Escape user text before interpolating it into notification HTML.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            '/' => escaped.push_str("&#x2F;"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// Router exposing the contact endpoint.
pub fn contact_router<N>(service: Arc<ContactService<N>>) -> Router
where
    N: NotificationPublisher + 'static,
{
    Router::new()
        .route("/api/v1/contact", post(contact_handler::<N>))
        .with_state(service)
}

/// Source identifier for rate limiting, taken from proxy headers the way the
/// source function did.
pub(crate) fn source_from_headers(headers: &HeaderMap) -> String {
    headers
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .or_else(|| {
            headers
                .get("x-real-ip")
                .and_then(|value| value.to_str().ok())
        })
        .unwrap_or("unknown")
        .to_string()
}

pub(crate) async fn contact_handler<N>(
    State(service): State<Arc<ContactService<N>>>,
    headers: HeaderMap,
    axum::Json(request): axum::Json<ContactRequest>,
) -> Response
where
    N: NotificationPublisher + 'static,
{
    let source = source_from_headers(&headers);
    match service.handle(request, &source, Utc::now()) {
        Ok(()) => (StatusCode::OK, axum::Json(json!({ "status": "sent" }))).into_response(),
        Err(error @ ContactError::RateLimited {
            retry_after_minutes,
        }) => {
            let payload = json!({
                "error": error.to_string(),
                "retry_after_minutes": retry_after_minutes,
            });
            (StatusCode::TOO_MANY_REQUESTS, axum::Json(payload)).into_response()
        }
        Err(error @ ContactError::Delivery(_)) => {
            let payload = json!({ "error": error.to_string() });
            (StatusCode::BAD_GATEWAY, axum::Json(payload)).into_response()
        }
        Err(error) => {
            let payload = json!({ "error": error.to_string() });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
        }
    }
}
