// Wire protocol DTOs and conversions for the public WebSocket messages.
// Every message is an envelope: {"type": <event>, "data": <payload>}.

use crate::domain::{Building, Quat, Vec3, VehicleInput, VehicleSnapshot};
use crate::use_cases::{ServerState, SimStatus, WorldInit, WorldUpdate};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use serde_json::value::RawValue;
use std::collections::BTreeMap;

/// Messages the server sends to connected clients over the WebSocket.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", content = "data", rename_all = "camelCase")]
pub enum ServerMessage {
    // Static city description, sent once after the vehicle exists.
    WorldInit(WorldInitDto),
    // Authoritative transforms keyed by connection id, sent every tick.
    State(BTreeMap<String, VehicleStateDto>),
}

/// Messages the client sends to the server over the WebSocket.
///
/// Only the event name is strict. Any payload shape is accepted and degrades to
/// neutral input rather than rejecting the message.
#[derive(Debug, Clone, Deserialize)]
#[serde(from = "ClientEnvelope")]
pub enum ClientMessage {
    Input(VehicleInputDto),
    Reset,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
enum ClientEvent {
    Input,
    Reset,
}

// Payload kept raw so number literals are never range-checked by the parser.
#[derive(Deserialize)]
struct ClientEnvelope {
    #[serde(rename = "type")]
    event: ClientEvent,
    #[serde(default)]
    data: Option<Box<RawValue>>,
}

impl From<ClientEnvelope> for ClientMessage {
    fn from(envelope: ClientEnvelope) -> Self {
        match envelope.event {
            ClientEvent::Reset => ClientMessage::Reset,
            ClientEvent::Input => ClientMessage::Input(
                envelope
                    .data
                    .and_then(|raw| serde_json::from_str(raw.get()).ok())
                    .unwrap_or_default(),
            ),
        }
    }
}

/// Driver input as received; anything malformed degrades to a neutral value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VehicleInputDto {
    #[serde(default, deserialize_with = "lenient_axis")]
    pub forward: f32,
    #[serde(default, deserialize_with = "lenient_axis")]
    pub turn: f32,
    #[serde(default, deserialize_with = "truthy")]
    pub brake: bool,
}

fn lenient_axis<'de, D>(deserializer: D) -> Result<f32, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Box::<RawValue>::deserialize(deserializer)?;
    Ok(axis_from_json(raw.get()))
}

// Number literals are clamped to [-1, 1], overflowing ones included; every
// other JSON value reads as 0.
fn axis_from_json(text: &str) -> f32 {
    match text.trim().parse::<f64>() {
        Ok(n) if !n.is_nan() => n.clamp(-1.0, 1.0) as f32,
        _ => 0.0,
    }
}

fn truthy<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Box::<RawValue>::deserialize(deserializer)?;
    Ok(truthy_json(raw.get()))
}

// Loose truthiness: false, null, 0 and "" are false; everything else is true.
fn truthy_json(text: &str) -> bool {
    match serde_json::from_str::<Value>(text) {
        Ok(Value::Null) => false,
        Ok(Value::Bool(b)) => b,
        Ok(Value::Number(n)) => n.as_f64().is_some_and(|n| n != 0.0),
        Ok(Value::String(s)) => !s.is_empty(),
        Ok(Value::Array(_) | Value::Object(_)) => true,
        // Valid JSON that fails here is an overflowing, hence non-zero, number.
        Err(_) => true,
    }
}

impl From<VehicleInputDto> for VehicleInput {
    fn from(input: VehicleInputDto) -> Self {
        Self {
            forward: input.forward,
            turn: input.turn,
            brake: input.brake,
        }
        .sanitized()
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GridDto {
    pub spacing: f32,
    pub road_half: f32,
}

#[derive(Debug, Clone, Serialize)]
pub struct BuildingDto {
    pub id: u32,
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
    pub h: f32,
    pub d: f32,
}

impl From<&Building> for BuildingDto {
    fn from(b: &Building) -> Self {
        Self {
            id: b.id,
            x: b.x,
            y: b.y,
            z: b.z,
            w: b.width,
            h: b.height,
            d: b.depth,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct WorldInitDto {
    pub id: String,
    pub grid: GridDto,
    pub buildings: Vec<BuildingDto>,
}

impl From<&WorldInit> for WorldInitDto {
    fn from(init: &WorldInit) -> Self {
        Self {
            id: init.connection_id.to_string(),
            grid: GridDto {
                spacing: init.grid.spacing,
                road_half: init.grid.road_half,
            },
            buildings: init.buildings.iter().map(BuildingDto::from).collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct PositionDto {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl From<Vec3> for PositionDto {
    fn from(v: Vec3) -> Self {
        Self {
            x: v.x,
            y: v.y,
            z: v.z,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct QuaternionDto {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
}

impl From<Quat> for QuaternionDto {
    fn from(q: Quat) -> Self {
        Self {
            x: q.x,
            y: q.y,
            z: q.z,
            w: q.w,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct VehicleStateDto {
    pub position: PositionDto,
    pub quaternion: QuaternionDto,
}

impl From<&VehicleSnapshot> for VehicleStateDto {
    fn from(v: &VehicleSnapshot) -> Self {
        Self {
            position: v.position.into(),
            quaternion: v.rotation.into(),
        }
    }
}

impl From<&WorldUpdate> for ServerMessage {
    fn from(update: &WorldUpdate) -> Self {
        ServerMessage::State(
            update
                .vehicles
                .iter()
                .map(|v| (v.connection_id.to_string(), VehicleStateDto::from(v)))
                .collect(),
        )
    }
}

/// Body of `GET /status`.
#[derive(Debug, Clone, Serialize)]
pub struct StatusDto {
    pub state: ServerStateDto,
    pub tick: u64,
    pub sessions: usize,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub enum ServerStateDto {
    Idle,
    Running,
}

impl From<SimStatus> for StatusDto {
    fn from(status: SimStatus) -> Self {
        Self {
            state: match status.state {
                ServerState::Idle => ServerStateDto::Idle,
                ServerState::Running => ServerStateDto::Running,
            },
            tick: status.tick,
            sessions: status.sessions,
        }
    }
}
