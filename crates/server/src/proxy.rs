//! Transparent forward of RPC calls, with CORS headers on every response.
//!
//! Plain HTTP requests are replayed with `reqwest`; WebSocket upgrades are
//! bridged frame by frame to the upstream node. The upstream WebSocket is
//! connected before the client upgrade is accepted so a dead node surfaces as
//! a 500 instead of a socket that closes immediately.
use std::future::Future;
use std::sync::Arc;

use anyhow::Context;
use axum::Router;
use axum::body::{Body, to_bytes};
use axum::extract::ws::{self, WebSocket, WebSocketUpgrade};
use axum::extract::{Request, State};
use axum::http::{HeaderMap, HeaderValue, Method, StatusCode, header};
use axum::middleware;
use axum::response::{IntoResponse, Response};
use futures_util::{SinkExt, StreamExt};
use tokio::net::{TcpListener, TcpStream};
use tokio_tungstenite::tungstenite::protocol::CloseFrame;
use tokio_tungstenite::tungstenite::protocol::frame::coding::CloseCode;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, tungstenite};
use tracing::{debug, info};

use crate::config::ProxyConfig;
use crate::error::ProxyError;

/// Headers never copied between the two connections.
const STRIPPED_HEADERS: &[&str] = &[
    // hop-by-hop
    "connection",
    "keep-alive",
    "proxy-authenticate",
    "proxy-authorization",
    "te",
    "trailer",
    "transfer-encoding",
    "upgrade",
    // recomputed or browser-identifying
    "content-length",
    "host",
    "origin",
    "referer",
];

#[derive(Clone)]
struct ProxyState {
    config: Arc<ProxyConfig>,
    http: reqwest::Client,
}

/// Build the proxy service for `config`.
pub fn router(config: ProxyConfig) -> Result<Router, ProxyError> {
    let http = reqwest::Client::builder()
        .timeout(config.upstream_timeout)
        .build()?;
    let state = ProxyState {
        config: Arc::new(config),
        http,
    };

    Ok(Router::new()
        .fallback(forward)
        .with_state(state)
        .layer(middleware::map_response(with_cors)))
}

/// Serve on `listener` until `shutdown` resolves.
pub async fn serve_on<F>(listener: TcpListener, config: ProxyConfig, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let local = listener.local_addr()?;
    info!(
        listen = %local,
        upstream = %config.upstream,
        prefix = %config.path_prefix,
        "RPC proxy listening"
    );

    let app = router(config).context("Failed to build proxy")?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .context("Proxy server failed")
}

/// Bind the configured address and serve until Ctrl-C.
pub async fn serve(config: ProxyConfig) -> anyhow::Result<()> {
    let listener = TcpListener::bind(config.listen_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.listen_addr))?;

    serve_on(listener, config, async {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Shutting down RPC proxy");
        }
    })
    .await
}

async fn forward(
    State(state): State<ProxyState>,
    upgrade: Option<WebSocketUpgrade>,
    request: Request,
) -> Response {
    if request.method() == Method::OPTIONS {
        return StatusCode::NO_CONTENT.into_response();
    }

    let Some(rest) = state.config.strip_prefix(request.uri().path()) else {
        debug!(path = %request.uri().path(), "Outside proxy prefix");
        return StatusCode::NOT_FOUND.into_response();
    };
    let path_and_query = match request.uri().query() {
        Some(query) => format!("{rest}?{query}"),
        None => rest.to_string(),
    };

    let result = match upgrade {
        Some(upgrade) => forward_ws(&state, &path_and_query, upgrade).await,
        None => forward_http(&state, &path_and_query, request).await,
    };
    result.unwrap_or_else(IntoResponse::into_response)
}

async fn forward_http(
    state: &ProxyState,
    path_and_query: &str,
    request: Request,
) -> Result<Response, ProxyError> {
    let (parts, body) = request.into_parts();
    let body = to_bytes(body, state.config.body_limit)
        .await
        .map_err(ProxyError::RequestBody)?;

    let url = state.config.http_target(path_and_query);
    debug!(method = %parts.method, %url, "Forwarding request");

    let mut outgoing = state
        .http
        .request(parts.method, &url)
        .headers(forwardable(&parts.headers));
    if !body.is_empty() {
        outgoing = outgoing.body(body);
    }
    let upstream = outgoing.send().await?;

    let status = upstream.status();
    let headers = forwardable(upstream.headers());
    let bytes = upstream.bytes().await?;

    let mut response = Response::new(Body::from(bytes));
    *response.status_mut() = status;
    *response.headers_mut() = headers;
    Ok(response)
}

async fn forward_ws(
    state: &ProxyState,
    path_and_query: &str,
    upgrade: WebSocketUpgrade,
) -> Result<Response, ProxyError> {
    let url = state.config.ws_target(path_and_query);
    debug!(%url, "Bridging websocket");

    let timeout = state.config.upstream_timeout;
    let (upstream, _) = tokio::time::timeout(timeout, tokio_tungstenite::connect_async(url.as_str()))
        .await
        .map_err(|_| ProxyError::Timeout(timeout))??;

    Ok(upgrade.on_upgrade(move |client| bridge(client, upstream)))
}

/// Pump frames both ways until either side closes or fails.
async fn bridge(client: WebSocket, upstream: WebSocketStream<MaybeTlsStream<TcpStream>>) {
    let (mut client_tx, mut client_rx) = client.split();
    let (mut upstream_tx, mut upstream_rx) = upstream.split();

    let to_upstream = async {
        while let Some(Ok(message)) = client_rx.next().await {
            let closing = matches!(message, ws::Message::Close(_));
            if upstream_tx.send(into_upstream(message)).await.is_err() || closing {
                break;
            }
        }
    };
    let to_client = async {
        while let Some(Ok(message)) = upstream_rx.next().await {
            let Some(message) = into_client(message) else {
                continue;
            };
            let closing = matches!(message, ws::Message::Close(_));
            if client_tx.send(message).await.is_err() || closing {
                break;
            }
        }
    };

    tokio::select! {
        _ = to_upstream => debug!("Client side closed"),
        _ = to_client => debug!("Upstream side closed"),
    }
}

fn into_upstream(message: ws::Message) -> tungstenite::Message {
    match message {
        ws::Message::Text(text) => tungstenite::Message::Text(text),
        ws::Message::Binary(data) => tungstenite::Message::Binary(data),
        ws::Message::Ping(data) => tungstenite::Message::Ping(data),
        ws::Message::Pong(data) => tungstenite::Message::Pong(data),
        ws::Message::Close(frame) => tungstenite::Message::Close(frame.map(|frame| CloseFrame {
            code: CloseCode::from(frame.code),
            reason: frame.reason,
        })),
    }
}

fn into_client(message: tungstenite::Message) -> Option<ws::Message> {
    let message = match message {
        tungstenite::Message::Text(text) => ws::Message::Text(text),
        tungstenite::Message::Binary(data) => ws::Message::Binary(data),
        tungstenite::Message::Ping(data) => ws::Message::Ping(data),
        tungstenite::Message::Pong(data) => ws::Message::Pong(data),
        tungstenite::Message::Close(frame) => ws::Message::Close(frame.map(|frame| ws::CloseFrame {
            code: frame.code.into(),
            reason: frame.reason,
        })),
        // Raw frames only show up when writing
        tungstenite::Message::Frame(_) => return None,
    };
    Some(message)
}

fn forwardable(headers: &HeaderMap) -> HeaderMap {
    headers
        .iter()
        .filter(|(name, _)| !STRIPPED_HEADERS.contains(&name.as_str()))
        .map(|(name, value)| (name.clone(), value.clone()))
        .collect()
}

async fn with_cors(mut response: Response) -> Response {
    let headers = response.headers_mut();
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static("*"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static("GET, POST, OPTIONS"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static("Content-Type, Authorization"),
    );
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn browser_and_hop_headers_are_dropped() {
        let mut headers = HeaderMap::new();
        headers.insert(header::HOST, HeaderValue::from_static("localhost:3001"));
        headers.insert(header::ORIGIN, HeaderValue::from_static("http://localhost:3000"));
        headers.insert(header::REFERER, HeaderValue::from_static("http://localhost:3000/"));
        headers.insert(header::CONNECTION, HeaderValue::from_static("keep-alive"));
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.append("x-trace", HeaderValue::from_static("a"));
        headers.append("x-trace", HeaderValue::from_static("b"));

        let kept = forwardable(&headers);
        assert_eq!(kept.len(), 3);
        assert_eq!(kept[header::CONTENT_TYPE], "application/json");
        assert_eq!(kept.get_all("x-trace").iter().count(), 2);
    }

    #[test]
    fn close_frames_keep_code_and_reason() {
        let upstream = into_upstream(ws::Message::Close(Some(ws::CloseFrame {
            code: 1001,
            reason: "going away".into(),
        })));
        match into_client(upstream) {
            Some(ws::Message::Close(Some(frame))) => {
                assert_eq!(frame.code, 1001);
                assert_eq!(frame.reason, "going away");
            }
            other => panic!("unexpected {other:?}"),
        }
    }
}
