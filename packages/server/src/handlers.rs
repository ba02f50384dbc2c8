//! Request handlers. Each one forwards to [`api::QueueService`].

use std::convert::Infallible;
use std::time::Duration;

use api::{Entry, QueueEvent};
use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::{HeaderMap, StatusCode, header::AUTHORIZATION},
    response::{
        Sse,
        sse::{Event, KeepAlive},
    },
};
use chrono::{DateTime, Utc};
use futures_util::stream::{self, Stream};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tokio::sync::broadcast::error::RecvError;

use crate::AppState;
use crate::error::{ApiError, ApiResult};

const SSE_KEEPALIVE_SECS: u64 = 15;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinBody {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub student_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginBody {
    #[serde(default)]
    pub password: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Credential from `Authorization: Bearer <credential>`, empty when absent.
pub(crate) fn bearer(headers: &HeaderMap) -> &str {
    headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.trim().split_once(' '))
        .filter(|(scheme, _)| scheme.eq_ignore_ascii_case("bearer"))
        .map(|(_, credential)| credential.trim())
        .unwrap_or("")
}

pub async fn health(State(state): State<AppState>) -> ApiResult<Json<Value>> {
    state.service.health().await?;
    Ok(Json(json!({ "status": "ok" })))
}

pub async fn list(State(state): State<AppState>) -> ApiResult<Json<Vec<Entry>>> {
    Ok(Json(state.service.list().await?))
}

pub async fn join(
    State(state): State<AppState>,
    body: Result<Json<JoinBody>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Entry>)> {
    let Json(body) = body?;
    let entry = state.service.join(body.name, body.student_id).await?;
    Ok((StatusCode::CREATED, Json(entry)))
}

pub async fn complete(
    State(state): State<AppState>,
    Path(entry_id): Path<String>,
    headers: HeaderMap,
) -> ApiResult<Json<Value>> {
    let removed = state
        .service
        .remove_by_id(&entry_id, bearer(&headers))
        .await?;
    Ok(Json(json!({ "removedId": removed })))
}

pub async fn clear(State(state): State<AppState>, headers: HeaderMap) -> ApiResult<Json<Value>> {
    let removed = state.service.clear(bearer(&headers)).await?;
    Ok(Json(json!({ "ok": true, "removed": removed })))
}

pub async fn login(
    State(state): State<AppState>,
    body: Result<Json<LoginBody>, JsonRejection>,
) -> ApiResult<Json<LoginResponse>> {
    let Json(body) = body?;
    let password = body
        .password
        .filter(|p| !p.is_empty())
        .ok_or_else(|| ApiError::BadRequest("password required".into()))?;

    let session = state.service.issue_session(&password)?;
    Ok(Json(LoginResponse {
        token: session.token,
        expires_at: session.expires_at,
    }))
}

/// Stream every committed queue change as a server-sent event.
///
/// The event name is the change kind; the data is the JSON-encoded
/// [`QueueEvent`]. A subscriber that falls behind gets a `lagged` event and
/// should refetch the list.
pub async fn events(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    tracing::info!("SSE subscriber connected");
    let rx = state.service.subscribe();

    let stream = stream::unfold(rx, |mut rx| async move {
        match rx.recv().await {
            Ok(event) => Some((Ok(sse_event(&event)), rx)),
            Err(RecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "SSE subscriber lagged");
                let event = Event::default()
                    .event("lagged")
                    .data(json!({ "skipped": skipped }).to_string());
                Some((Ok(event), rx))
            }
            Err(RecvError::Closed) => None,
        }
    });

    Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(SSE_KEEPALIVE_SECS))
            .text("ping"),
    )
}

fn sse_event(event: &QueueEvent) -> Event {
    let json = serde_json::to_string(event).unwrap_or_else(|_| "{}".to_string());
    Event::default().event(event.kind()).data(json)
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn bearer_extraction() {
        assert_eq!(bearer(&headers("Bearer abc")), "abc");
        assert_eq!(bearer(&headers("bearer abc")), "abc");
        assert_eq!(bearer(&headers("BEARER  abc ")), "abc");
        assert_eq!(bearer(&headers("Basic abc")), "");
        assert_eq!(bearer(&headers("abc")), "");
        assert_eq!(bearer(&HeaderMap::new()), "");
    }
}
