//! Chat WebSocket connection sessions.
//!
//! One session per socket, running authenticate → authorize → join →
//! message loop → leave. Authentication and authorization complete before
//! the session ever touches the fabric; a rejected connection is closed
//! with a reason code and never joins, persists, or broadcasts. Teardown
//! leaves the fabric unconditionally, on every exit path.

use axum::{
    extract::{
        ws::{CloseFrame, Message, WebSocket},
        Path, State, WebSocketUpgrade,
    },
    http::HeaderMap,
    response::Response,
};
use futures_util::{SinkExt, StreamExt};
use std::sync::Arc;
use tracing::{debug, info, warn};

use pourpal_chat::{close_code, InboundEvent};
use pourpal_users::{AuthOutcome, Identity};

use crate::middleware::session_token_from_headers;
use crate::state::GatewayState;

/// Outcome of the pre-accept checks.
enum Gate {
    Allow(Identity),
    Deny(u16, &'static str),
}

/// Chat WebSocket connection handler
pub async fn chat_websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<GatewayState>>,
    Path(hangout_id): Path<i64>,
    headers: HeaderMap,
) -> Response {
    match gate_connection(&state, &headers, hangout_id).await {
        Gate::Allow(identity) => {
            ws.on_upgrade(move |socket| run_session(socket, state, identity, hangout_id))
        }
        Gate::Deny(code, reason) => ws.on_upgrade(move |socket| reject(socket, code, reason)),
    }
}

/// Authenticate and authorize before the session exists. Both checks absorb
/// their own store failures (anonymous / not-authorized), so any other
/// fault here maps to the generic internal close code.
async fn gate_connection(state: &GatewayState, headers: &HeaderMap, hangout_id: i64) -> Gate {
    let token = session_token_from_headers(headers, &state.session_cookie);

    let identity = match state.authenticator.resolve(token.as_deref()).await {
        AuthOutcome::Authenticated(identity) => identity,
        AuthOutcome::Anonymous => {
            info!(hangout_id, "rejecting unauthenticated chat connection");
            return Gate::Deny(close_code::UNAUTHENTICATED, "unauthenticated");
        }
    };

    if !state.guard.authorize(identity.user_id, hangout_id).await {
        info!(
            hangout_id,
            user_id = identity.user_id,
            "rejecting chat connection, not a participant"
        );
        return Gate::Deny(close_code::FORBIDDEN, "forbidden");
    }

    Gate::Allow(identity)
}

/// Close a just-upgraded socket with a reason code, without ever joining.
async fn reject(mut socket: WebSocket, code: u16, reason: &'static str) {
    let _ = socket
        .send(Message::Close(Some(CloseFrame {
            code,
            reason: reason.into(),
        })))
        .await;
}

/// The steady-state session: join the fabric, pump events both ways, leave.
async fn run_session(
    socket: WebSocket,
    state: Arc<GatewayState>,
    identity: Identity,
    hangout_id: i64,
) {
    let (mut sink, mut stream) = socket.split();

    let session = state.fabric.next_session_id();
    let mut delivery = state.fabric.join(hangout_id, session).await;

    info!(
        hangout_id,
        user_id = identity.user_id,
        "chat session joined"
    );

    // Forward fabric deliveries to the socket until the channel or the
    // socket closes.
    let forwarder = tokio::spawn(async move {
        while let Some(event) = delivery.recv().await {
            let text = match serde_json::to_string(&event) {
                Ok(text) => text,
                Err(error) => {
                    warn!(%error, "failed to encode outbound chat event");
                    continue;
                }
            };
            if sink.send(Message::Text(text)).await.is_err() {
                break;
            }
        }
        let _ = sink
            .send(Message::Close(Some(CloseFrame {
                code: close_code::INTERNAL_ERROR,
                reason: "delivery channel closed".into(),
            })))
            .await;
    });

    // One inbound frame at a time: the persist-then-publish step for a
    // frame completes before the next frame is read.
    while let Some(message) = stream.next().await {
        let message = match message {
            Ok(message) => message,
            Err(error) => {
                debug!(%error, hangout_id, "chat socket transport error");
                break;
            }
        };

        match message {
            Message::Text(text) => handle_inbound(&state, &identity, hangout_id, &text).await,
            Message::Close(_) => break,
            // Ping/pong are answered by the transport; binary frames are
            // not part of the chat contract.
            _ => {}
        }
    }

    // Unconditional leave: publishes racing this call either deliver before
    // the membership entry is gone or not at all.
    state.fabric.leave(hangout_id, session).await;
    forwarder.abort();

    info!(
        hangout_id,
        user_id = identity.user_id,
        "chat session closed"
    );
}

/// Validate, persist, broadcast. Malformed frames and blank bodies are
/// dropped without an ack; a persistence failure drops the message and
/// keeps the connection open.
async fn handle_inbound(state: &GatewayState, identity: &Identity, hangout_id: i64, text: &str) {
    let event = match serde_json::from_str::<InboundEvent>(text) {
        Ok(event) => event,
        Err(_) => {
            debug!(hangout_id, "ignoring malformed chat frame");
            return;
        }
    };

    let InboundEvent::Text { message } = event;

    if message.trim().is_empty() {
        return;
    }

    if let Err(error) = state
        .chat_service
        .post_message(hangout_id, identity, &message)
        .await
    {
        warn!(
            %error,
            hangout_id,
            user_id = identity.user_id,
            "failed to persist chat message, dropping"
        );
    }
}
