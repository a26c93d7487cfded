use crate::interface_adapters::protocol::{AckDto, ClientFrame, ServerMessage};
use crate::interface_adapters::state::AppState;
use crate::interface_adapters::utils::rng::next_connection_id;
use crate::use_cases::{ClientEvent, RoomBroadcast, RoomRegistry, Session};

use axum::{
    Error,
    extract::{
        State,
        ws::{CloseFrame, Message, WebSocket, WebSocketUpgrade, close_code},
    },
    response::IntoResponse,
};
use futures::{FutureExt, SinkExt};
use std::{
    panic::AssertUnwindSafe,
    sync::Arc,
    time::{Duration, Instant},
};
use tokio::sync::mpsc;
use tracing::{Instrument, debug, error, info, info_span, warn};

#[derive(Debug)]
enum NetError {
    // Categorizes send failures so the loop can log and disconnect.
    #[allow(dead_code)]
    Ws(axum::Error),
    #[allow(dead_code)]
    Serialization(serde_json::Error),
}

enum LoopControl {
    Continue,
    Disconnect(&'static str),
}

const LOG_THROTTLE: Duration = Duration::from_secs(2);
const MAX_INVALID_JSON: u32 = 10;

pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    let registry = state.room_registry.clone();
    let outbound_capacity = state.outbound_capacity;
    ws.on_upgrade(move |socket| {
        // Separate connection id; also the player id inside rooms.
        let conn_id = next_connection_id();
        handle_socket(socket, conn_id, registry, outbound_capacity)
            .instrument(info_span!("conn", conn_id))
    })
}

struct ConnCtx {
    session: Session,

    msgs_in: u64,
    msgs_out: u64,
    bytes_in: u64,
    bytes_out: u64,

    invalid_json: u32,
    dropped_panics: u32,

    last_invalid_input_log: Instant,

    close_frame: Option<CloseFrame>,
}

async fn handle_socket(
    mut socket: WebSocket,
    conn_id: u64,
    registry: Arc<RoomRegistry>,
    outbound_capacity: usize,
) {
    // Room broadcasts for this connection are queued here by the rooms it joins.
    let (outbound_tx, mut outbound_rx) = mpsc::channel::<RoomBroadcast>(outbound_capacity);
    let mut ctx = ConnCtx {
        session: Session::new(conn_id, registry, outbound_tx),
        msgs_in: 0,
        msgs_out: 0,
        bytes_in: 0,
        bytes_out: 0,
        invalid_json: 0,
        dropped_panics: 0,
        last_invalid_input_log: Instant::now() - LOG_THROTTLE,
        close_frame: None,
    };
    info!("client connected");

    let reason = run_client_loop(&mut socket, &mut outbound_rx, &mut ctx).await;

    // Leaving drops the rooms' senders, so nothing else arrives after this.
    ctx.session.disconnect(reason).await;
    debug!(
        msgs_in = ctx.msgs_in,
        msgs_out = ctx.msgs_out,
        bytes_in = ctx.bytes_in,
        bytes_out = ctx.bytes_out,
        invalid_json = ctx.invalid_json,
        dropped_panics = ctx.dropped_panics,
        "connection stats"
    );
}

async fn run_client_loop(
    socket: &mut WebSocket,
    outbound_rx: &mut mpsc::Receiver<RoomBroadcast>,
    ctx: &mut ConnCtx,
) -> &'static str {
    loop {
        let control = tokio::select! {
            // Incoming event from the client
            incoming = socket.recv() => handle_incoming_ws(socket, incoming, ctx).await,

            // Outgoing room broadcast
            Some(msg) = outbound_rx.recv() => forward_broadcast(socket, msg, ctx).await,
        };

        if let LoopControl::Disconnect(reason) = control {
            if let Some(frame) = ctx.close_frame.take() {
                let _ = socket.send(Message::Close(Some(frame))).await;
            }
            if let Err(err) = socket.close().await {
                debug!(error = ?err, "socket close error");
            }
            return reason;
        }
    }
}

async fn send_message(socket: &mut WebSocket, msg: &ServerMessage) -> Result<usize, NetError> {
    let txt = serde_json::to_string(msg).map_err(NetError::Serialization)?;
    let bytes = txt.len();
    socket
        .send(Message::Text(txt.into()))
        .await
        .map_err(NetError::Ws)?;
    Ok(bytes)
}

fn should_log(last: &mut Instant) -> bool {
    if last.elapsed() >= LOG_THROTTLE {
        *last = Instant::now();
        true
    } else {
        false
    }
}

async fn handle_incoming_ws(
    socket: &mut WebSocket,
    incoming: Option<Result<Message, Error>>,
    ctx: &mut ConnCtx,
) -> LoopControl {
    match incoming {
        Some(Ok(msg)) => match msg {
            Message::Text(text) => {
                ctx.msgs_in += 1;
                ctx.bytes_in += text.len() as u64;

                match serde_json::from_str::<ClientFrame>(&text) {
                    Ok(frame) => dispatch_frame(socket, frame, ctx).await,
                    Err(parse_err) => {
                        ctx.invalid_json += 1;
                        if should_log(&mut ctx.last_invalid_input_log) {
                            warn!(
                                bytes = text.len(),
                                error = %parse_err,
                                "failed to parse client frame"
                            );
                        }

                        if ctx.invalid_json > MAX_INVALID_JSON {
                            ctx.close_frame = Some(CloseFrame {
                                code: close_code::POLICY,
                                reason: "too many invalid messages".into(),
                            });
                            return LoopControl::Disconnect("too many invalid messages");
                        }

                        LoopControl::Continue
                    }
                }
            }
            Message::Binary(_) => {
                ctx.close_frame = Some(CloseFrame {
                    code: close_code::UNSUPPORTED,
                    reason: "binary messages not supported".into(),
                });
                LoopControl::Disconnect("binary message")
            }
            Message::Ping(_) | Message::Pong(_) => LoopControl::Continue,
            Message::Close(_) => LoopControl::Disconnect("client close"),
        },
        Some(Err(e)) => {
            warn!(error = %e, "websocket recv error");
            LoopControl::Disconnect("transport error")
        }
        None => LoopControl::Disconnect("transport close"),
    }
}

async fn dispatch_frame(socket: &mut WebSocket, frame: ClientFrame, ctx: &mut ConnCtx) -> LoopControl {
    let ack_id = frame.ack;
    let event = match ClientEvent::try_from(frame) {
        Ok(event) => event,
        Err(e) => {
            if should_log(&mut ctx.last_invalid_input_log) {
                warn!(error = %e, "ignoring client event");
            }
            return LoopControl::Continue;
        }
    };

    // A failing handler must not take the connection (or the server) down.
    let reply = match AssertUnwindSafe(ctx.session.handle(event)).catch_unwind().await {
        Ok(reply) => reply,
        Err(_) => {
            ctx.dropped_panics += 1;
            error!("event handler panicked; continuing");
            return LoopControl::Continue;
        }
    };

    let (Some(id), Some(reply)) = (ack_id, reply) else {
        return LoopControl::Continue;
    };
    let msg = ServerMessage::Ack(AckDto::new(id, reply));
    match send_message(socket, &msg).await {
        Ok(bytes) => {
            ctx.msgs_out += 1;
            ctx.bytes_out += bytes as u64;
            LoopControl::Continue
        }
        Err(err) => {
            warn!(error = ?err, "failed to send ack");
            LoopControl::Disconnect("send failed")
        }
    }
}

async fn forward_broadcast(
    socket: &mut WebSocket,
    msg: RoomBroadcast,
    ctx: &mut ConnCtx,
) -> LoopControl {
    match send_message(socket, &ServerMessage::from(msg)).await {
        Ok(bytes) => {
            ctx.msgs_out += 1;
            ctx.bytes_out += bytes as u64;
            LoopControl::Continue
        }
        Err(err) => {
            // Log unexpected send failures; disconnect will follow immediately.
            warn!(error = ?err, "failed to send room broadcast");
            LoopControl::Disconnect("send failed")
        }
    }
}
