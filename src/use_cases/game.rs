use super::types::{GameEvent, ServerState, SimStatus, WorldUpdate};
use crate::domain::VehicleSnapshot;
use crate::domain::systems::{drive, stabilize};
use crate::domain::tuning::DriveTuning;
use crate::use_cases::{SessionRegistry, WorldState};
use std::time::Duration;
use tokio::sync::mpsc::error::TryRecvError;
use tokio::sync::{broadcast, mpsc, watch};
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

/// Authoritative simulation: the world, its sessions and the fixed-step tick.
pub struct Simulation {
    world: WorldState,
    sessions: SessionRegistry,
    drive: DriveTuning,
    dt: f32,
    tick: u64,
}

impl Simulation {
    pub fn new(world: WorldState, sessions: SessionRegistry, drive: DriveTuning, dt: f32) -> Self {
        Self {
            world,
            sessions,
            drive,
            dt,
            tick: 0,
        }
    }

    pub fn world(&self) -> &WorldState {
        &self.world
    }

    pub fn sessions(&self) -> &SessionRegistry {
        &self.sessions
    }

    pub fn tick_count(&self) -> u64 {
        self.tick
    }

    /// Applies one network event. Only ever called between ticks.
    pub fn handle_event(&mut self, event: GameEvent) {
        match event {
            GameEvent::Connect {
                connection_id,
                reply,
            } => {
                let result = self.sessions.on_connect(&mut self.world, connection_id);
                if let Err(e) = &result {
                    warn!(connection_id, error = %e, "failed to create session");
                }
                if let Err(Ok(_)) = reply.send(result) {
                    // The socket went away while we were spawning; undo the join.
                    debug!(connection_id, "connection gone before world init; removing vehicle");
                    self.sessions.on_disconnect(&mut self.world, connection_id);
                }
            }
            GameEvent::Input {
                connection_id,
                input,
            } => self.sessions.on_input(connection_id, input),
            GameEvent::Reset { connection_id } => {
                self.sessions.on_reset(&mut self.world, connection_id);
            }
            GameEvent::Disconnect { connection_id } => {
                self.sessions.on_disconnect(&mut self.world, connection_id);
            }
        }
    }

    /// Runs one fixed-length tick and returns the snapshot to broadcast.
    pub fn tick(&mut self) -> WorldUpdate {
        for session in self.sessions.iter() {
            let vehicle = &session.vehicle;
            let controls = drive::wheel_controls(vehicle.input, &vehicle.wheels, &self.drive);
            self.world.set_wheel_controls(vehicle.id, &controls);

            if let Some(body) = self.world.body_state(vehicle.id) {
                let torque = stabilize::upright_torque(body.rotation, self.drive.upright_torque_gain);
                self.world.add_torque(vehicle.id, torque);
            }
        }

        self.world.step(self.dt);
        self.tick += 1;

        let vehicles = self
            .sessions
            .iter()
            .filter_map(|session| {
                let body = self.world.body_state(session.vehicle.id)?;
                Some(VehicleSnapshot {
                    connection_id: session.connection_id,
                    position: body.position,
                    rotation: body.rotation,
                })
            })
            .collect();

        WorldUpdate {
            tick: self.tick,
            vehicles,
        }
    }

    /// Idle until the first tick has run.
    pub fn status(&self) -> SimStatus {
        let state = if self.tick == 0 {
            ServerState::Idle
        } else {
            ServerState::Running
        };
        SimStatus {
            state,
            tick: self.tick,
            sessions: self.sessions.len(),
        }
    }
}

pub async fn world_task(
    mut simulation: Simulation,
    mut input_rx: mpsc::Receiver<GameEvent>,
    world_tx: broadcast::Sender<WorldUpdate>,
    status_tx: watch::Sender<SimStatus>,
    tick_interval: Duration,
) {
    // A late tick delays the schedule; it never runs two steps back to back.
    let mut interval = tokio::time::interval(tick_interval);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    info!(tick_ms = tick_interval.as_millis() as u64, "simulation running");

    loop {
        interval.tick().await;

        // Everything queued before this tick is applied in this tick.
        loop {
            match input_rx.try_recv() {
                Ok(event) => simulation.handle_event(event),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    info!(tick = simulation.tick_count(), "event channel closed; simulation stopping");
                    return;
                }
            }
        }

        let update = simulation.tick();
        status_tx.send_replace(simulation.status());
        // No receivers just means nobody is connected.
        let _ = world_tx.send(update);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::spawn::SpawnAllocator;
    use crate::domain::tuning::SpawnTuning;
    use crate::domain::{Vec3, VehicleInput};
    use crate::use_cases::test_support::RecordingPhysics;
    use crate::use_cases::{GridInfo, SessionError, VehicleFactory, WorldInit};
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use tokio::sync::oneshot;

    const DT: f32 = 1.0 / 60.0;

    fn simulation(physics: &RecordingPhysics) -> Simulation {
        let world = WorldState::create_static_world(
            Box::new(physics.clone()),
            GridInfo {
                spacing: 36.0,
                road_half: 7.0,
            },
            Vec::new(),
        );
        let spawns = SpawnAllocator::new(&SpawnTuning::default(), StdRng::seed_from_u64(9));
        let sessions = SessionRegistry::new(spawns, VehicleFactory::default());
        Simulation::new(world, sessions, DriveTuning::default(), DT)
    }

    fn connect(sim: &mut Simulation, connection_id: u64) -> Result<WorldInit, SessionError> {
        let (reply, mut rx) = oneshot::channel();
        sim.handle_event(GameEvent::Connect {
            connection_id,
            reply,
        });
        rx.try_recv().expect("connect should reply")
    }

    #[test]
    fn tick_applies_input_steps_once_and_snapshots_every_session() {
        let physics = RecordingPhysics::new();
        let mut sim = simulation(&physics);
        connect(&mut sim, 1).expect("connect should succeed");
        connect(&mut sim, 2).expect("connect should succeed");
        sim.handle_event(GameEvent::Input {
            connection_id: 1,
            input: VehicleInput {
                forward: 1.0,
                turn: 0.0,
                brake: false,
            },
        });

        let update = sim.tick();

        let log = physics.log();
        assert_eq!(log.steps, vec![DT]);
        assert_eq!(log.torques.len(), 2);
        let vehicle = sim.sessions().get(1).expect("session should exist").vehicle.id;
        assert_eq!(log.controls[&vehicle][2].engine_force, 7200.0);
        assert_eq!(update.tick, 1);
        let ids: Vec<u64> = update.vehicles.iter().map(|v| v.connection_id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn status_turns_running_after_the_first_tick() {
        let physics = RecordingPhysics::new();
        let mut sim = simulation(&physics);
        connect(&mut sim, 1).expect("connect should succeed");
        assert_eq!(sim.status().state, ServerState::Idle);

        sim.tick();

        let status = sim.status();
        assert_eq!(status.state, ServerState::Running);
        assert_eq!(status.tick, 1);
        assert_eq!(status.sessions, 1);
    }

    #[test]
    fn upright_vehicles_get_a_near_zero_upright_torque_every_tick() {
        let physics = RecordingPhysics::new();
        let mut sim = simulation(&physics);
        connect(&mut sim, 1).expect("connect should succeed");

        for _ in 0..3 {
            sim.tick();
        }

        let torques = physics.log().torques;
        assert_eq!(torques.len(), 3);
        assert!(torques.iter().all(|(_, t)| t.length() < 1e-6));
    }

    #[test]
    fn disconnected_session_never_appears_in_later_snapshots() {
        let physics = RecordingPhysics::new();
        let mut sim = simulation(&physics);
        connect(&mut sim, 1).expect("connect should succeed");
        connect(&mut sim, 2).expect("connect should succeed");
        sim.tick();

        sim.handle_event(GameEvent::Disconnect { connection_id: 1 });
        sim.handle_event(GameEvent::Disconnect { connection_id: 1 });

        for _ in 0..3 {
            let update = sim.tick();
            assert!(update.vehicles.iter().all(|v| v.connection_id != 1));
            assert_eq!(update.vehicles.len(), 1);
        }
    }

    #[test]
    fn failed_connect_replies_with_error_and_keeps_other_sessions() {
        let physics = RecordingPhysics::new().failing_construction();
        let mut sim = simulation(&physics);

        let result = connect(&mut sim, 1);

        assert!(result.is_err());
        assert!(sim.tick().vehicles.is_empty());
    }

    #[test]
    fn connect_after_the_socket_left_is_rolled_back() {
        let physics = RecordingPhysics::new();
        let mut sim = simulation(&physics);
        let (reply, rx) = oneshot::channel();
        drop(rx);

        sim.handle_event(GameEvent::Connect {
            connection_id: 5,
            reply,
        });

        assert!(sim.sessions().is_empty());
        assert_eq!(sim.world().vehicle_count(), 0);
    }

    #[test]
    fn reset_event_moves_vehicle_to_next_spawn() {
        let physics = RecordingPhysics::new();
        let mut sim = simulation(&physics);
        connect(&mut sim, 1).expect("connect should succeed");
        let before = sim.tick().vehicles[0].position;

        sim.handle_event(GameEvent::Reset { connection_id: 1 });
        let after = sim.tick().vehicles[0].position;

        assert!((after - before).length() > 30.0);
        assert_eq!(after.y, 1.8);
        assert_ne!(after, Vec3::ZERO);
    }

    #[tokio::test]
    async fn world_task_drains_events_before_each_tick() {
        let physics = RecordingPhysics::new();
        let sim = simulation(&physics);
        let (input_tx, input_rx) = mpsc::channel(16);
        let (world_tx, mut world_rx) = broadcast::channel(16);
        let (status_tx, mut status_rx) = watch::channel(SimStatus::default());

        let (reply, reply_rx) = oneshot::channel();
        input_tx
            .send(GameEvent::Connect {
                connection_id: 4,
                reply,
            })
            .await
            .expect("queue event");

        tokio::spawn(world_task(
            sim,
            input_rx,
            world_tx,
            status_tx,
            Duration::from_millis(16),
        ));

        let init = reply_rx.await.expect("reply").expect("connect should succeed");
        assert_eq!(init.connection_id, 4);

        let update = world_rx.recv().await.expect("first update");
        assert_eq!(update.tick, 1);
        assert_eq!(update.vehicles.len(), 1);

        status_rx.changed().await.expect("status update");
        assert_eq!(status_rx.borrow().state, ServerState::Running);
    }
}
