// Session lifecycle: maps connection identity to exactly one vehicle in the world.

use crate::domain::spawn::SpawnAllocator;
use crate::domain::{ConnectionId, PhysicsError, VehicleInput};
use crate::use_cases::{VehicleEntity, VehicleFactory, WorldInit, WorldState};
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("connection {0} already has a session")]
    AlreadyConnected(ConnectionId),
    #[error("failed to create vehicle: {0}")]
    VehicleConstruction(#[from] PhysicsError),
    #[error("simulation is not running")]
    SimulationUnavailable,
}

#[derive(Debug)]
pub struct Session {
    pub connection_id: ConnectionId,
    pub vehicle: VehicleEntity,
}

/// Owns every session and, through them, every vehicle in the world.
///
/// All calls happen on the simulation task, between ticks.
pub struct SessionRegistry {
    sessions: BTreeMap<ConnectionId, Session>,
    spawns: SpawnAllocator,
    factory: VehicleFactory,
}

impl SessionRegistry {
    pub fn new(spawns: SpawnAllocator, factory: VehicleFactory) -> Self {
        Self {
            sessions: BTreeMap::new(),
            spawns,
            factory,
        }
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    pub fn get(&self, connection_id: ConnectionId) -> Option<&Session> {
        self.sessions.get(&connection_id)
    }

    /// Sessions in stable connection-id order.
    pub fn iter(&self) -> impl Iterator<Item = &Session> {
        self.sessions.values()
    }

    pub fn on_connect(
        &mut self,
        world: &mut WorldState,
        connection_id: ConnectionId,
    ) -> Result<WorldInit, SessionError> {
        if self.sessions.contains_key(&connection_id) {
            return Err(SessionError::AlreadyConnected(connection_id));
        }

        let spawn = self.spawns.next();
        let vehicle = self.factory.create_vehicle(world, spawn)?;
        info!(connection_id, vehicle = ?vehicle.id, x = spawn.x, z = spawn.z, "vehicle spawned");

        self.sessions.insert(
            connection_id,
            Session {
                connection_id,
                vehicle,
            },
        );

        Ok(WorldInit {
            connection_id,
            grid: world.grid(),
            buildings: world.buildings(),
        })
    }

    /// Stores the clamped input; unknown connections are ignored.
    pub fn on_input(&mut self, connection_id: ConnectionId, input: VehicleInput) {
        if let Some(session) = self.sessions.get_mut(&connection_id) {
            session.vehicle.input = input.sanitized();
        }
    }

    /// Moves the vehicle to a fresh spawn point, at rest and upright.
    pub fn on_reset(&mut self, world: &mut WorldState, connection_id: ConnectionId) {
        let Some(session) = self.sessions.get(&connection_id) else {
            debug!(connection_id, "reset for unknown session ignored");
            return;
        };

        let spawn = self.spawns.next();
        world.teleport(session.vehicle.id, self.factory.spawn_position(spawn));
        info!(connection_id, x = spawn.x, z = spawn.z, "vehicle reset");
    }

    pub fn on_disconnect(&mut self, world: &mut WorldState, connection_id: ConnectionId) {
        match self.sessions.remove(&connection_id) {
            Some(session) => {
                world.remove_vehicle(session.vehicle.id);
                info!(connection_id, "vehicle removed");
            }
            None => debug!(connection_id, "disconnect for unknown session ignored"),
        }

        if self.sessions.len() != world.vehicle_count() {
            warn!(
                sessions = self.sessions.len(),
                vehicles = world.vehicle_count(),
                "session and vehicle counts diverged"
            );
        }
    }
}
