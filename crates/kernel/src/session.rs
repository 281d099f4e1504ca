//! The game session: one player, one ground, a stream of obstacles.

use crate::body::{BodyDesc, RigidBox};
use crate::camera::FollowCamera;
use crate::collision::intersects;
use crate::config::{ControlScheme, SessionConfig};
use crate::controls::{heading_relative_velocity, screen_relative_velocity, turn};
use crate::error::{ConfigError, LifecycleError};
use crate::events::SessionEvent;
use crate::lifecycle::{SessionState, UiSignal, UiSink};
use crate::rng::SpawnRng;
use crate::schedule::{FrameScheduler, FrameToken};
use boxdodge_common::{EntityId, EntityKind};
use boxdodge_input::{Action, InputSnapshot};

/// Authoritative state of one game.
///
/// The session is driven from outside: the platform calls [`Session::on_frame`]
/// with the token it was handed, plus the input snapshot for that frame.
/// Collaborators observe it through [`Session::drain_events`] (scene
/// add/remove) and [`Session::dispatch_signals`] (menus).
#[derive(Debug)]
pub struct Session {
    config: SessionConfig,
    player: RigidBox,
    ground: RigidBox,
    /// Spawn order.
    obstacles: Vec<RigidBox>,
    frame: u64,
    spawn_interval: u64,
    state: SessionState,
    game_over_latched: bool,
    heading: f32,
    camera: FollowCamera,
    rng: SpawnRng,
    scheduler: FrameScheduler,
    /// Player and ground are registered with the scene.
    in_scene: bool,
    pause_held: bool,
    events: Vec<SessionEvent>,
    signals: Vec<UiSignal>,
}

impl Session {
    /// Validate `config` and build an idle session. The player and ground are
    /// announced through [`SessionEvent::Spawned`] right away.
    pub fn new(config: SessionConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let player = RigidBox::new(EntityKind::Player, config.player)?;
        let ground = RigidBox::new(EntityKind::Ground, config.ground)?;
        let mut session = Self {
            camera: FollowCamera::fixed(&config.camera),
            rng: SpawnRng::new(config.seed),
            spawn_interval: config.spawn.initial_interval,
            config,
            player,
            ground,
            obstacles: Vec::new(),
            frame: 0,
            state: SessionState::Idle,
            game_over_latched: false,
            heading: 0.0,
            scheduler: FrameScheduler::new(),
            in_scene: false,
            pause_held: false,
            events: Vec::new(),
            signals: Vec::new(),
        };
        session.enter_scene();
        tracing::info!(
            "session created (scheme={:?}, seed={})",
            session.config.scheme,
            session.config.seed
        );
        Ok(session)
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Ticks completed in the current run.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn spawn_interval(&self) -> u64 {
        self.spawn_interval
    }

    pub fn player(&self) -> &RigidBox {
        &self.player
    }

    pub fn ground(&self) -> &RigidBox {
        &self.ground
    }

    pub fn obstacles(&self) -> &[RigidBox] {
        &self.obstacles
    }

    /// Every box currently in the scene: player, ground, then obstacles.
    pub fn bodies(&self) -> impl Iterator<Item = &RigidBox> {
        let fixed = if self.in_scene {
            [Some(&self.player), Some(&self.ground)]
        } else {
            [None, None]
        };
        fixed.into_iter().flatten().chain(self.obstacles.iter())
    }

    /// Player heading in radians. Stays zero under the screen-relative scheme.
    pub fn heading(&self) -> f32 {
        self.heading
    }

    pub fn camera(&self) -> &FollowCamera {
        &self.camera
    }

    pub fn is_frame_pending(&self) -> bool {
        self.scheduler.is_pending()
    }

    /// Pending scene events, oldest first.
    pub fn events(&self) -> &[SessionEvent] {
        &self.events
    }

    pub fn drain_events(&mut self) -> Vec<SessionEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn drain_signals(&mut self) -> Vec<UiSignal> {
        std::mem::take(&mut self.signals)
    }

    /// Deliver every queued UI signal to `sink`, oldest first.
    pub fn dispatch_signals(&mut self, sink: &mut dyn UiSink) {
        for signal in self.drain_signals() {
            signal.deliver(sink);
        }
    }

    // --- lifecycle ---

    /// Begin a fresh run from Idle or GameOver.
    pub fn start(&mut self) -> Result<FrameToken, LifecycleError> {
        self.expect_state("start", &[SessionState::Idle, SessionState::GameOver])?;
        self.reset_run();
        self.enter_scene();
        self.set_state(SessionState::Running);
        tracing::info!("run started");
        Ok(self.scheduler.request())
    }

    pub fn pause(&mut self) -> Result<(), LifecycleError> {
        self.expect_state("pause", &[SessionState::Running])?;
        self.enter_pause();
        Ok(())
    }

    fn enter_pause(&mut self) {
        self.scheduler.cancel();
        self.set_state(SessionState::Paused);
        self.signals.push(UiSignal::Pause);
        tracing::info!("paused at frame {}", self.frame);
    }

    pub fn resume(&mut self) -> Result<FrameToken, LifecycleError> {
        self.expect_state("resume", &[SessionState::Paused])?;
        self.set_state(SessionState::Running);
        self.signals.push(UiSignal::Resume);
        tracing::info!("resumed at frame {}", self.frame);
        Ok(self.scheduler.request())
    }

    /// Throw away the current run and start another immediately.
    pub fn restart(&mut self) -> Result<FrameToken, LifecycleError> {
        self.expect_state(
            "restart",
            &[
                SessionState::Running,
                SessionState::Paused,
                SessionState::GameOver,
            ],
        )?;
        self.scheduler.cancel();
        self.reset_run();
        self.set_state(SessionState::Idle);
        self.set_state(SessionState::Running);
        self.signals.push(UiSignal::Resume);
        tracing::info!("run restarted");
        Ok(self.scheduler.request())
    }

    /// Back to Idle: obstacles cleared, player and counters restored. The
    /// ground stays in the scene.
    pub fn reset(&mut self) -> Result<(), LifecycleError> {
        self.expect_state(
            "reset",
            &[
                SessionState::Running,
                SessionState::Paused,
                SessionState::GameOver,
            ],
        )?;
        self.scheduler.cancel();
        self.reset_run();
        self.set_state(SessionState::Idle);
        tracing::info!("session reset");
        Ok(())
    }

    /// Stop from any state and release every entity back to the renderer.
    pub fn quit(&mut self) {
        self.scheduler.cancel();
        self.clear_obstacles();
        if self.in_scene {
            for (id, kind) in [
                (self.player.id(), EntityKind::Player),
                (self.ground.id(), EntityKind::Ground),
            ] {
                self.events.push(SessionEvent::Despawned { id, kind });
            }
            self.in_scene = false;
        }
        self.set_state(SessionState::Idle);
        self.signals.push(UiSignal::Quit);
        tracing::info!("session quit after {} frames", self.frame);
    }

    fn expect_state(
        &self,
        op: &'static str,
        allowed: &[SessionState],
    ) -> Result<(), LifecycleError> {
        if allowed.contains(&self.state) {
            return Ok(());
        }
        tracing::warn!("rejected {op} while {}", self.state);
        Err(LifecycleError::InvalidTransition {
            op,
            from: self.state,
        })
    }

    fn set_state(&mut self, to: SessionState) {
        let from = self.state;
        if from != to {
            self.state = to;
            self.events.push(SessionEvent::StateChanged { from, to });
        }
    }

    fn reset_run(&mut self) {
        self.clear_obstacles();
        self.player.reset_from(&self.config.player);
        self.ground.reset_from(&self.config.ground);
        self.frame = 0;
        self.spawn_interval = self.config.spawn.initial_interval;
        self.game_over_latched = false;
        self.heading = 0.0;
        self.pause_held = false;
        self.camera = FollowCamera::fixed(&self.config.camera);
    }

    fn enter_scene(&mut self) {
        if self.in_scene {
            return;
        }
        for body in [&self.player, &self.ground] {
            self.events.push(SessionEvent::Spawned {
                id: body.id(),
                kind: body.kind(),
                transform: body.transform(),
            });
        }
        self.in_scene = true;
    }

    fn clear_obstacles(&mut self) {
        for obstacle in self.obstacles.drain(..) {
            self.events.push(SessionEvent::Despawned {
                id: obstacle.id(),
                kind: EntityKind::Obstacle,
            });
        }
    }

    fn game_over(&mut self) {
        if self.game_over_latched {
            return;
        }
        self.game_over_latched = true;
        self.scheduler.cancel();
        self.set_state(SessionState::GameOver);
        self.signals.push(UiSignal::GameOver);
        tracing::info!("game over at frame {}", self.frame);
    }

    // --- loop ---

    /// Frame callback. Runs one tick if `token` is the pending request and
    /// returns the token for the next frame, or `None` once the loop stopped.
    pub fn on_frame(&mut self, token: FrameToken, input: &InputSnapshot) -> Option<FrameToken> {
        if !self.scheduler.claim(token) {
            tracing::debug!("ignoring stale frame token {}", token.generation());
            return None;
        }
        let next = self.scheduler.request();
        self.tick(input);
        self.scheduler.is_pending().then_some(next)
    }

    /// One simulation tick. A no-op unless Running.
    pub fn tick(&mut self, input: &InputSnapshot) {
        if self.state != SessionState::Running {
            return;
        }
        let pause_pressed = input.is_pressed(Action::Pause);
        let pause_edge = pause_pressed && !self.pause_held;
        self.pause_held = pause_pressed;
        if pause_edge {
            self.enter_pause();
            return;
        }

        self.update_player(input);
        self.update_obstacles();
        self.spawn_obstacles();
        self.frame += 1;
    }

    fn update_player(&mut self, input: &InputSnapshot) {
        let speed = self.config.movement_speed;
        let horizontal = match self.config.scheme {
            ControlScheme::ScreenRelative => screen_relative_velocity(input, speed),
            ControlScheme::HeadingRelative => {
                self.heading = turn(input, self.heading, self.config.rotation_speed);
                self.player.yaw = self.heading;
                heading_relative_velocity(input, self.heading, speed)
            }
        };
        self.player.velocity.x = horizontal.x;
        self.player.velocity.z = horizontal.z;

        self.player.recompute_bounds();
        self.ground.recompute_bounds();
        if input.is_pressed(Action::Jump) && self.player.bounds().bottom <= self.ground.bounds().top
        {
            self.player.velocity.y = self.config.jump_impulse;
        }

        self.player.step(&self.ground);

        if self.config.scheme == ControlScheme::HeadingRelative {
            self.camera
                .follow(&self.config.camera, self.player.position, self.heading);
        }
    }

    fn update_obstacles(&mut self) {
        let cull_z = self.player.position.z + self.config.obstacle.cull_distance;
        let mut kept = Vec::with_capacity(self.obstacles.len());
        for mut obstacle in std::mem::take(&mut self.obstacles) {
            obstacle.step(&self.ground);
            if obstacle.position.z > cull_z || obstacle.is_faulted() {
                tracing::debug!(
                    "culled obstacle {} at z={:.2}",
                    obstacle.id().short(),
                    obstacle.position.z
                );
                self.events.push(SessionEvent::Despawned {
                    id: obstacle.id(),
                    kind: EntityKind::Obstacle,
                });
                continue;
            }
            if intersects(&self.player, &obstacle) {
                self.game_over();
            }
            kept.push(obstacle);
        }
        self.obstacles = kept;
    }

    fn spawn_obstacles(&mut self) {
        if self.frame % self.spawn_interval != 0 {
            return;
        }
        let x = (self.rng.next_f32() - 0.5) * self.config.obstacle.lateral_band;
        let desc = self.config.obstacle.desc_at(x);
        if let Err(err) = self.spawn_obstacle(desc) {
            tracing::error!("obstacle spawn failed: {err}");
        }
        let spawn = self.config.spawn;
        self.spawn_interval = self
            .spawn_interval
            .saturating_sub(spawn.interval_step)
            .max(spawn.interval_floor);
    }

    /// Add an obstacle to the scene outside the spawn schedule.
    pub fn spawn_obstacle(&mut self, desc: BodyDesc) -> Result<EntityId, ConfigError> {
        let obstacle = RigidBox::new(EntityKind::Obstacle, desc)?;
        let id = obstacle.id();
        tracing::debug!(
            "spawned obstacle {} at ({:.2}, {:.2}, {:.2})",
            id.short(),
            desc.position.x,
            desc.position.y,
            desc.position.z
        );
        self.events.push(SessionEvent::Spawned {
            id,
            kind: EntityKind::Obstacle,
            transform: obstacle.transform(),
        });
        self.obstacles.push(obstacle);
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::body::{Axis, Dimensions, MotionMode};
    use glam::Vec3;

    /// Obstacles park far away so random spawns never reach the player.
    fn quiet_config() -> SessionConfig {
        let mut c = SessionConfig::default();
        c.obstacle.spawn_depth = -500.0;
        c.obstacle.velocity = Vec3::ZERO;
        c.obstacle.gravity = 0.0;
        c.obstacle.motion = MotionMode::Direct;
        c
    }

    fn running(config: SessionConfig) -> (Session, FrameToken) {
        let mut s = Session::new(config).unwrap();
        let token = s.start().unwrap();
        s.drain_events();
        (s, token)
    }

    fn idle() -> InputSnapshot {
        InputSnapshot::empty()
    }

    #[derive(Default)]
    struct Menus {
        game_over: u32,
        pause: u32,
        resume: u32,
        quit: u32,
    }

    impl UiSink for Menus {
        fn on_game_over(&mut self) {
            self.game_over += 1;
        }
        fn on_pause(&mut self) {
            self.pause += 1;
        }
        fn on_resume(&mut self) {
            self.resume += 1;
        }
        fn on_quit(&mut self) {
            self.quit += 1;
        }
    }

    #[test]
    fn new_announces_player_and_ground() {
        let mut s = Session::new(SessionConfig::default()).unwrap();
        let kinds: Vec<_> = s
            .drain_events()
            .into_iter()
            .filter_map(|e| match e {
                SessionEvent::Spawned { kind, .. } => Some(kind),
                _ => None,
            })
            .collect();
        assert_eq!(kinds, vec![EntityKind::Player, EntityKind::Ground]);
        assert_eq!(s.state(), SessionState::Idle);
        assert_eq!(s.bodies().count(), 2);
    }

    #[test]
    fn invalid_config_is_rejected() {
        let mut c = SessionConfig::default();
        c.spawn.interval_floor = 0;
        assert!(matches!(Session::new(c), Err(ConfigError::ZeroSpawnFloor)));
    }

    #[test]
    fn player_settles_on_ground() {
        let (mut s, _) = running(quiet_config());
        for _ in 0..2000 {
            s.tick(&idle());
        }
        assert_eq!(s.state(), SessionState::Running);
        let resting = s.ground().bounds().top + 0.5;
        assert!((s.player().position.y - resting).abs() < 1e-5);
        assert_eq!(s.player().velocity.y, 0.0);
    }

    #[test]
    fn first_tick_spawns_and_shrinks_interval() {
        let (mut s, _) = running(SessionConfig::default());
        s.tick(&idle());
        assert_eq!(s.obstacles().len(), 1);
        assert_eq!(s.spawn_interval(), 190);
        assert_eq!(s.frame(), 1);
        let o = &s.obstacles()[0];
        assert!((-15.0..15.0).contains(&o.position.x));
        assert_eq!(o.position.z, -35.0);
        assert!(s.events().iter().any(|e| matches!(
            e,
            SessionEvent::Spawned {
                kind: EntityKind::Obstacle,
                ..
            }
        )));
    }

    #[test]
    fn spawn_interval_bottoms_out_at_floor() {
        let mut c = SessionConfig::default();
        // Wide ground, player far to the side of the spawn band.
        c.ground.dimensions = Dimensions::new(200.0, 0.1, 200.0);
        c.player.position.x = 40.0;
        let (mut s, _) = running(c);
        let mut last = s.spawn_interval();
        for _ in 0..5000 {
            s.tick(&idle());
            assert!(s.spawn_interval() <= last);
            assert!(s.spawn_interval() >= 20);
            last = s.spawn_interval();
        }
        assert_eq!(s.state(), SessionState::Running);
        assert_eq!(s.spawn_interval(), 20);
    }

    #[test]
    fn obstacles_behind_player_are_culled() {
        let (mut s, _) = running(quiet_config());
        let behind = BodyDesc::default()
            .at(Vec3::new(5.0, 0.0, 10.5))
            .with_gravity(0.0);
        let ahead = BodyDesc::default()
            .at(Vec3::new(5.0, 0.0, 9.5))
            .with_gravity(0.0);
        let gone = s.spawn_obstacle(behind).unwrap();
        let kept = s.spawn_obstacle(ahead).unwrap();
        s.drain_events();
        s.tick(&idle());
        assert!(s.obstacles().iter().all(|o| o.id() != gone));
        assert!(s.obstacles().iter().any(|o| o.id() == kept));
        assert!(s.drain_events().contains(&SessionEvent::Despawned {
            id: gone,
            kind: EntityKind::Obstacle
        }));
    }

    #[test]
    fn game_over_signals_once() {
        let (mut s, token) = running(quiet_config());
        let on_player = BodyDesc::default().with_gravity(0.0);
        s.spawn_obstacle(on_player).unwrap();
        s.spawn_obstacle(on_player).unwrap();

        assert_eq!(s.on_frame(token, &idle()), None);
        assert_eq!(s.state(), SessionState::GameOver);
        assert!(!s.is_frame_pending());
        s.tick(&idle());

        let mut menus = Menus::default();
        s.dispatch_signals(&mut menus);
        assert_eq!(menus.game_over, 1);
        assert_eq!(s.frame(), 1);
    }

    #[test]
    fn scheduled_obstacle_reaches_player() {
        let mut c = SessionConfig::default();
        c.obstacle.lateral_band = 0.0;
        let (mut s, token) = running(c);
        let mut next = Some(token);
        while let Some(t) = next {
            assert!(s.frame() < 2000, "obstacle never reached the player");
            next = s.on_frame(t, &idle());
        }
        assert_eq!(s.state(), SessionState::GameOver);
        assert!(s.frame() > 1);
        assert_eq!(s.drain_signals(), vec![UiSignal::GameOver]);
    }

    #[test]
    fn faulted_obstacle_is_culled() {
        let (mut s, _) = running(quiet_config());
        let runaway = BodyDesc::default()
            .at(Vec3::new(5.0, 0.0, -20.0))
            .with_gravity(0.0)
            .with_motion(MotionMode::Creep {
                axis: Axis::X,
                increment: f32::MAX / 4.0,
            });
        let id = s.spawn_obstacle(runaway).unwrap();
        s.drain_events();
        let mut events = Vec::new();
        for _ in 0..5 {
            s.tick(&idle());
            events.extend(s.drain_events());
        }
        assert_eq!(s.state(), SessionState::Running);
        assert!(s.obstacles().iter().all(|o| o.id() != id));
        assert!(events.contains(&SessionEvent::Despawned {
            id,
            kind: EntityKind::Obstacle
        }));
    }

    #[test]
    fn jump_only_from_ground() {
        let (mut s, _) = running(quiet_config());
        for _ in 0..2000 {
            s.tick(&idle());
        }
        let jump = InputSnapshot::with(&[Action::Jump]);
        s.tick(&jump);
        assert!((s.player().velocity.y - 0.095).abs() < 1e-6);
        s.tick(&jump);
        assert!((s.player().velocity.y - 0.09).abs() < 1e-6);
    }

    #[test]
    fn no_jump_while_hovering_just_above_ground() {
        let mut c = quiet_config();
        c.player.position.y = -1.449;
        c.player.velocity = Vec3::ZERO;
        c.player.gravity = 0.0;
        let (mut s, _) = running(c);
        s.tick(&InputSnapshot::with(&[Action::Jump]));
        assert_eq!(s.player().velocity.y, 0.0);
    }

    #[test]
    fn screen_relative_moves_along_world_axes() {
        let (mut s, _) = running(quiet_config());
        s.tick(&InputSnapshot::with(&[Action::Left, Action::Forward]));
        assert_eq!(s.player().velocity.x, -0.05);
        assert_eq!(s.player().velocity.z, -0.05);
        assert_eq!(s.camera().eye, Vec3::new(1.0, 2.0, 7.0));
        s.tick(&idle());
        assert_eq!(s.player().velocity.x, 0.0);
    }

    #[test]
    fn heading_scheme_turns_player_and_camera() {
        let mut c = quiet_config();
        c.scheme = ControlScheme::HeadingRelative;
        let (mut s, _) = running(c);
        s.tick(&InputSnapshot::with(&[Action::Forward]));
        assert!((s.player().velocity.z + 0.05).abs() < 1e-6);
        let p = s.player().position;
        assert!((s.camera().eye - (p + Vec3::new(0.0, 2.0, 5.0))).length() < 1e-5);
        assert_eq!(s.camera().target, p);

        for _ in 0..10 {
            s.tick(&InputSnapshot::with(&[Action::RotateLeft]));
        }
        assert!((s.heading() - 0.3).abs() < 1e-5);
        assert_eq!(s.player().yaw, s.heading());
    }

    #[test]
    fn stale_token_after_pause_does_not_tick() {
        let (mut s, token) = running(quiet_config());
        let token = s.on_frame(token, &idle()).unwrap();
        assert_eq!(s.frame(), 1);
        s.pause().unwrap();
        assert_eq!(s.on_frame(token, &idle()), None);
        assert_eq!(s.frame(), 1);

        let fresh = s.resume().unwrap();
        assert!(s.on_frame(token, &idle()).is_none());
        assert!(s.on_frame(fresh, &idle()).is_some());
        assert_eq!(s.frame(), 2);
    }

    #[test]
    fn pause_action_fires_on_press_edge() {
        let (mut s, _) = running(quiet_config());
        let held = InputSnapshot::with(&[Action::Pause]);
        s.tick(&held);
        assert_eq!(s.state(), SessionState::Paused);
        s.resume().unwrap();
        s.tick(&held);
        assert_eq!(s.state(), SessionState::Running);
        s.tick(&idle());
        s.tick(&held);
        assert_eq!(s.state(), SessionState::Paused);
        assert_eq!(
            s.drain_signals(),
            vec![UiSignal::Pause, UiSignal::Resume, UiSignal::Pause]
        );
    }

    #[test]
    fn invalid_transitions_leave_state_alone() {
        let mut s = Session::new(quiet_config()).unwrap();
        assert_eq!(
            s.pause(),
            Err(LifecycleError::InvalidTransition {
                op: "pause",
                from: SessionState::Idle
            })
        );
        assert!(s.resume().is_err());
        assert!(s.restart().is_err());
        assert!(s.reset().is_err());
        s.start().unwrap();
        assert!(s.start().is_err());
        assert!(s.resume().is_err());
        assert_eq!(s.state(), SessionState::Running);
        s.pause().unwrap();
        assert!(s.pause().is_err());
        assert_eq!(s.state(), SessionState::Paused);
    }

    #[test]
    fn restart_after_game_over_begins_fresh_run() {
        let (mut s, token) = running(quiet_config());
        s.spawn_obstacle(BodyDesc::default().with_gravity(0.0))
            .unwrap();
        s.on_frame(token, &idle());
        assert_eq!(s.state(), SessionState::GameOver);
        s.drain_signals();

        let token = s.restart().unwrap();
        assert_eq!(s.state(), SessionState::Running);
        assert_eq!(s.frame(), 0);
        assert!(s.obstacles().is_empty());
        assert_eq!(s.player().position, Vec3::ZERO);
        assert_eq!(s.drain_signals(), vec![UiSignal::Resume]);
        assert!(s.on_frame(token, &idle()).is_some());
    }

    #[test]
    fn restart_while_paused_invalidates_old_token() {
        let (mut s, token) = running(quiet_config());
        let token = s.on_frame(token, &idle()).unwrap();
        let token = s.on_frame(token, &idle()).unwrap();
        assert_eq!(s.frame(), 2);
        s.pause().unwrap();

        let fresh = s.restart().unwrap();
        assert_eq!(s.state(), SessionState::Running);
        assert_eq!(s.frame(), 0);
        assert_eq!(s.on_frame(token, &idle()), None);
        assert_eq!(s.frame(), 0);
        assert!(s.on_frame(fresh, &idle()).is_some());
        assert_eq!(s.frame(), 1);
    }

    #[test]
    fn restart_while_running_begins_fresh_run() {
        let (mut s, token) = running(quiet_config());
        let stale = s.on_frame(token, &idle()).unwrap();
        let fresh = s.restart().unwrap();
        assert_eq!(s.frame(), 0);
        assert!(s.obstacles().is_empty());
        assert_eq!(s.on_frame(stale, &idle()), None);
        assert!(s.on_frame(fresh, &idle()).is_some());
    }

    #[test]
    fn reset_keeps_ground_in_scene() {
        let (mut s, _) = running(quiet_config());
        for _ in 0..5 {
            s.tick(&idle());
        }
        let ground = s.ground().id();
        s.reset().unwrap();
        assert_eq!(s.state(), SessionState::Idle);
        assert!(s.obstacles().is_empty());
        assert_eq!(s.spawn_interval(), 200);
        let events = s.drain_events();
        assert!(!events.iter().any(|e| e.entity() == Some(ground)));
        assert!(events.iter().any(|e| matches!(
            e,
            SessionEvent::Despawned {
                kind: EntityKind::Obstacle,
                ..
            }
        )));
    }

    #[test]
    fn quit_releases_everything_and_start_readds() {
        let (mut s, token) = running(quiet_config());
        let token = s.on_frame(token, &idle()).unwrap();
        s.quit();
        assert_eq!(s.state(), SessionState::Idle);
        assert_eq!(s.on_frame(token, &idle()), None);
        assert_eq!(s.bodies().count(), 0);

        let despawned = s
            .drain_events()
            .iter()
            .filter(|e| matches!(e, SessionEvent::Despawned { .. }))
            .count();
        // player, ground and the obstacle spawned on the first frame
        assert_eq!(despawned, 3);
        let mut menus = Menus::default();
        s.dispatch_signals(&mut menus);
        assert_eq!(menus.quit, 1);

        s.start().unwrap();
        let spawned = s
            .drain_events()
            .iter()
            .filter(|e| matches!(e, SessionEvent::Spawned { .. }))
            .count();
        assert_eq!(spawned, 2);
    }

    #[test]
    fn same_seed_replays_same_spawns() {
        let xs = |seed| {
            let mut c = SessionConfig::default();
            c.seed = seed;
            c.spawn.initial_interval = 20;
            c.obstacle.spawn_depth = -500.0;
            let (mut s, _) = running(c);
            for _ in 0..100 {
                s.tick(&idle());
            }
            s.obstacles().iter().map(|o| o.position.x).collect::<Vec<_>>()
        };
        assert_eq!(xs(7), xs(7));
        assert_ne!(xs(7), xs(8));
    }
}
