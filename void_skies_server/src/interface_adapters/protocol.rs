// Wire protocol DTOs and conversions for the room event channel.
// Field names are camelCase to match browser clients.

use crate::domain::state::{Boss, Enemy, EnemyBehavior, Knockback, Player, PlayerUpdate};
use crate::use_cases::{Ack, ClientEvent, GameStateSnapshot, RoomBroadcast, RoomSummary};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// One inbound frame: an event name, its payload, and an optional ack id.
#[derive(Debug, Clone, Deserialize)]
pub struct ClientFrame {
    pub event: String,
    #[serde(default)]
    pub data: Value,
    #[serde(default)]
    pub ack: Option<u64>,
}

#[derive(Debug)]
pub enum FrameError {
    UnknownEvent(String),
}

impl fmt::Display for FrameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FrameError::UnknownEvent(name) => write!(f, "unknown event {name:?}"),
        }
    }
}

impl TryFrom<ClientFrame> for ClientEvent {
    type Error = FrameError;

    fn try_from(frame: ClientFrame) -> Result<Self, Self::Error> {
        let event = match frame.event.as_str() {
            "setPlayerName" => ClientEvent::SetPlayerName(text_payload(frame.data)),
            "createRoom" => ClientEvent::CreateRoom(text_payload(frame.data)),
            "joinRoom" => ClientEvent::JoinRoom(text_payload(frame.data)),
            "getRoomNames" => ClientEvent::GetRoomNames,
            "startGame" => ClientEvent::StartGame,
            "playerInput" => ClientEvent::PlayerInput(
                serde_json::from_value::<PlayerInputDto>(frame.data)
                    .unwrap_or_default()
                    .into(),
            ),
            "leaveRoom" => ClientEvent::LeaveRoom,
            _ => return Err(FrameError::UnknownEvent(frame.event)),
        };
        Ok(event)
    }
}

// String payloads are coerced the way loosely typed clients send them.
fn text_payload(data: Value) -> String {
    match data {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Player input; a missing or non-numeric field leaves the player unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlayerInputDto {
    #[serde(default)]
    pub x: Option<Value>,
    #[serde(default)]
    pub y: Option<Value>,
    #[serde(default)]
    pub hp: Option<Value>,
    #[serde(default)]
    pub score: Option<Value>,
}

impl From<PlayerInputDto> for PlayerUpdate {
    fn from(input: PlayerInputDto) -> Self {
        let number = |v: Option<Value>| v.as_ref().and_then(Value::as_f64);
        Self {
            x: number(input.x),
            y: number(input.y),
            hp: number(input.hp),
            score: number(input.score),
        }
    }
}

/// Messages the server sends to connected clients.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum ServerMessage {
    PlayerJoined(PlayerJoinedDto),
    GameState(GameStateDto),
    GameStart(GameStartDto),
    Ack(AckDto),
}

impl From<RoomBroadcast> for ServerMessage {
    fn from(msg: RoomBroadcast) -> Self {
        match msg {
            RoomBroadcast::PlayerJoined { id, name } => ServerMessage::PlayerJoined(PlayerJoinedDto {
                id: id.to_string(),
                player: JoinedPlayerDto { name },
            }),
            RoomBroadcast::GameStart { seed, start_time } => {
                ServerMessage::GameStart(GameStartDto {
                    seed: seed.to_string(),
                    start_time,
                })
            }
            RoomBroadcast::GameState(state) => ServerMessage::GameState(state.as_ref().into()),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PlayerJoinedDto {
    pub id: String,
    pub player: JoinedPlayerDto,
}

#[derive(Debug, Clone, Serialize)]
pub struct JoinedPlayerDto {
    pub name: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameStartDto {
    pub seed: String,
    pub start_time: u64,
}

/// Reply to an event that carried an ack id.
#[derive(Debug, Clone, Serialize)]
pub struct AckDto {
    pub id: u64,
    pub result: AckResult,
}

/// createRoom answers an id or null; joinRoom null or a reason string;
/// getRoomNames the joinable room list.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum AckResult {
    Text(String),
    Rooms(Vec<RoomSummaryDto>),
    Null,
}

impl AckDto {
    pub fn new(id: u64, ack: Ack) -> Self {
        let result = match ack {
            Ack::RoomCreated(Some(room_id)) => AckResult::Text(room_id.to_string()),
            Ack::RoomCreated(None) | Ack::Joined(Ok(())) => AckResult::Null,
            Ack::Joined(Err(e)) => AckResult::Text(e.to_string()),
            Ack::RoomNames(rooms) => {
                AckResult::Rooms(rooms.iter().map(RoomSummaryDto::from).collect())
            }
        };
        Self { id, result }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RoomSummaryDto {
    pub name: String,
    pub id: String,
}

impl From<&RoomSummary> for RoomSummaryDto {
    fn from(room: &RoomSummary) -> Self {
        Self {
            name: room.name.clone(),
            id: room.id.to_string(),
        }
    }
}

/// Full room snapshot sent every tick.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameStateDto {
    pub wave: u32,
    pub wave_start_time: u64,
    pub enemies: Vec<EnemyDto>,
    pub boss: Option<BossDto>,
    pub players: BTreeMap<String, PlayerDto>,
}

impl From<&GameStateSnapshot> for GameStateDto {
    fn from(state: &GameStateSnapshot) -> Self {
        Self {
            wave: state.wave,
            wave_start_time: state.wave_start_time,
            enemies: state.enemies.iter().map(EnemyDto::from).collect(),
            boss: state.boss.as_ref().map(BossDto::from),
            players: state
                .players
                .iter()
                .map(|p| (p.id.to_string(), PlayerDto::from(p)))
                .collect(),
        }
    }
}

/// Flattened enemy; kind-specific fields are omitted for other kinds.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnemyDto {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub id: u64,
    pub x: f64,
    pub y: f64,
    pub r: f64,
    pub v: f64,
    pub hp: f64,
    pub hp_max: f64,
    pub color: &'static str,
    pub xp: u32,
    pub score: u32,
    pub shards: u32,
    pub fire_rate_chance: f64,
    pub t: f64,
    #[serde(rename = "fireT")]
    pub fire_t: f64,
    pub stun_timer: f64,
    pub knockback: Option<KnockbackDto>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phase: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attack_phase: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_x: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amplitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frequency: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dodge_cooldown: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_dodging: Option<bool>,
}

impl From<&Enemy> for EnemyDto {
    fn from(e: &Enemy) -> Self {
        let mut dto = Self {
            kind: e.kind().as_str(),
            id: e.id,
            x: e.x,
            y: e.y,
            r: e.radius,
            v: e.speed,
            hp: e.hp,
            hp_max: e.hp_max,
            color: e.color,
            xp: e.xp,
            score: e.score,
            shards: e.shards,
            fire_rate_chance: e.fire_chance,
            t: e.age,
            fire_t: e.fire_cooldown,
            stun_timer: e.stun_timer,
            knockback: e.knockback.map(KnockbackDto::from),
            phase: None,
            attack_phase: None,
            start_x: None,
            amplitude: None,
            frequency: None,
            dodge_cooldown: None,
            is_dodging: None,
        };
        match e.behavior {
            EnemyBehavior::Phantom { phased } => dto.phase = Some(phased),
            EnemyBehavior::Mech { attack_phase } => dto.attack_phase = Some(attack_phase),
            EnemyBehavior::Manta(manta) => {
                dto.start_x = Some(manta.start_x);
                dto.amplitude = Some(manta.amplitude);
                dto.frequency = Some(manta.frequency);
                dto.dodge_cooldown = Some(manta.dodge_cooldown);
                dto.is_dodging = Some(manta.dodging);
            }
            EnemyBehavior::Drone | EnemyBehavior::Hunter | EnemyBehavior::Angler => {}
        }
        dto
    }
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct KnockbackDto {
    pub vx: f64,
    pub vy: f64,
}

impl From<Knockback> for KnockbackDto {
    fn from(k: Knockback) -> Self {
        Self { vx: k.vx, vy: k.vy }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BossDto {
    pub x: f64,
    pub y: f64,
    pub r: f64,
    pub hp: f64,
    pub hp_max: f64,
    pub t: f64,
}

impl From<&Boss> for BossDto {
    fn from(b: &Boss) -> Self {
        Self {
            x: b.x,
            y: b.y,
            r: b.radius,
            hp: b.hp,
            hp_max: b.hp_max,
            t: b.age,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PlayerDto {
    pub id: String,
    pub name: String,
    pub x: f64,
    pub y: f64,
    pub hp: f64,
    pub score: f64,
}

impl From<&Player> for PlayerDto {
    fn from(p: &Player) -> Self {
        Self {
            id: p.id.to_string(),
            name: p.name.clone(),
            x: p.x,
            y: p.y,
            hp: p.hp,
            score: p.score,
        }
    }
}
