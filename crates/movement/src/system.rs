use crate::animation::{AnimationPlayer, IDLE_CLIP, clip_for};
use crate::collision::{self, Collision, CollisionKind};
use crate::config::MovementConfig;
use focustown_common::{CharacterState, Direction};
use focustown_kernel::{Character, TownMap, TownState};
use glam::Vec2;

/// Player box used for every collision query.
pub const CHARACTER_SIZE: Vec2 = Character::SIZE;
/// Below this speed the character is considered stopped.
pub const MIN_MOVEMENT_THRESHOLD: f32 = 0.1;
/// Position changes smaller than this are not reported.
pub const POSITION_EPSILON: f32 = 0.1;

/// Kinematic state carried between frames.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MovementState {
    pub position: Vec2,
    pub velocity: Vec2,
    pub current_speed: f32,
    pub facing: Direction,
    pub state: CharacterState,
    pub moving: bool,
    pub running: bool,
}

/// Edge-triggered notifications, drained by the caller after each update.
#[derive(Debug, Clone, PartialEq)]
pub enum MovementEvent {
    PositionChanged { from: Vec2, to: Vec2 },
    DirectionChanged { from: Direction, to: Direction },
    StateChanged { from: CharacterState, to: CharacterState },
    Collided(Collision),
}

/// Turns per-frame input into a validated character position.
///
/// The system owns only its kinematic state. The town is borrowed for the
/// length of each call and the resolved position, facing and locomotion
/// state are written back to its character.
#[derive(Debug, Clone)]
pub struct MovementSystem {
    config: MovementConfig,
    state: MovementState,
    character_size: Vec2,
    events: Vec<MovementEvent>,
    current_clip: Option<&'static str>,
}

impl MovementSystem {
    pub fn new(config: MovementConfig, town: &TownState) -> Self {
        let character = town.character();
        Self {
            config: config.sanitized(),
            state: MovementState {
                position: character.position,
                facing: character.facing,
                state: character.state,
                ..MovementState::default()
            },
            character_size: CHARACTER_SIZE,
            events: Vec::new(),
            current_clip: None,
        }
    }

    /// Advance one frame.
    ///
    /// `input` is the raw direction with each axis in `{-1, 0, 1}`; diagonals
    /// are normalised here. `run` is the held run modifier.
    pub fn update(&mut self, dt: f32, input: Vec2, run: bool, town: &mut TownState) {
        let dt = dt.max(0.0);
        let previous = self.state;

        let direction = if input.length() > 1.0 {
            input.normalize()
        } else {
            input
        };
        self.apply_input(direction, run);
        self.apply_velocity(direction, dt);

        let desired = self.state.position + self.state.velocity * dt;
        let (resolved, hit) = self.resolve_collision(town.town_map(), desired, dt);
        if let Some(hit) = hit {
            tracing::trace!(id = %hit.object_id, kind = ?hit.kind, "movement blocked");
            self.events.push(MovementEvent::Collided(hit));
        }
        self.state.position = resolved;

        self.state.current_speed = self.state.velocity.length();
        if self.state.current_speed < MIN_MOVEMENT_THRESHOLD {
            self.state.velocity = Vec2::ZERO;
            self.state.current_speed = 0.0;
            self.state.moving = false;
            self.state.state = CharacterState::Idle;
        }

        self.write_back(town);
        self.emit_changes(&previous);
    }

    fn apply_input(&mut self, direction: Vec2, run: bool) {
        self.state.running = self.config.enable_running && run;
        if direction != Vec2::ZERO {
            self.state.facing = Direction::dominant(direction);
            self.state.moving = true;
            self.state.state = CharacterState::Walking;
        } else {
            self.state.moving = false;
            self.state.state = CharacterState::Idle;
        }
    }

    fn apply_velocity(&mut self, direction: Vec2, dt: f32) {
        let target = direction * self.max_speed();
        self.state.velocity = if !self.config.enable_smoothing {
            target
        } else if self.state.moving {
            approach(self.state.velocity, target, self.config.acceleration, dt)
        } else {
            approach(
                self.state.velocity,
                Vec2::ZERO,
                self.config.deceleration,
                dt,
            )
        };
    }

    fn write_back(&self, town: &mut TownState) {
        let character = town.character_mut();
        character.position = self.state.position;
        character.facing = self.state.facing;
        character.state = self.state.state;
    }

    fn emit_changes(&mut self, previous: &MovementState) {
        if previous.position.distance(self.state.position) > POSITION_EPSILON {
            self.events.push(MovementEvent::PositionChanged {
                from: previous.position,
                to: self.state.position,
            });
        }
        if previous.facing != self.state.facing {
            self.events.push(MovementEvent::DirectionChanged {
                from: previous.facing,
                to: self.state.facing,
            });
        }
        if previous.state != self.state.state {
            tracing::debug!(
                from = previous.state.as_str(),
                to = self.state.state.as_str(),
                "locomotion state changed"
            );
            self.events.push(MovementEvent::StateChanged {
                from: previous.state,
                to: self.state.state,
            });
        }
    }

    /// Where a move to `desired` actually ends up, and what blocked it.
    ///
    /// A building hit with sliding enabled tries the velocity with its
    /// normal component removed. Anything else clamps to the map. A
    /// candidate that is still blocked keeps the current position.
    pub fn resolve_collision(
        &self,
        map: &TownMap,
        desired: Vec2,
        dt: f32,
    ) -> (Vec2, Option<Collision>) {
        let size = self.character_size;
        let Some(hit) = collision::check_collision(map, desired, size) else {
            return (desired, None);
        };
        let candidate =
            if hit.kind == CollisionKind::Building && self.config.enable_collision_sliding {
                let slide = collision::slide_along(self.state.velocity, hit.normal);
                self.state.position + slide * dt
            } else {
                map.clamp_to_map(desired, size)
            };
        let resolved = if self.is_valid_position(map, candidate) {
            candidate
        } else {
            self.state.position
        };
        (resolved, Some(hit))
    }

    pub fn check_collision(&self, map: &TownMap, position: Vec2) -> Option<Collision> {
        collision::check_collision(map, position, self.character_size)
    }

    pub fn is_valid_position(&self, map: &TownMap, position: Vec2) -> bool {
        self.check_collision(map, position).is_none()
    }

    pub fn clamp_to_boundaries(&self, map: &TownMap, position: Vec2) -> Vec2 {
        map.clamp_to_map(position, self.character_size)
    }

    /// Move without simulating, keeping velocity. Returns false and leaves
    /// everything untouched when the clamped target is blocked.
    pub fn set_position(&mut self, position: Vec2, town: &mut TownState) -> bool {
        let target = self.clamp_to_boundaries(town.town_map(), position);
        if !self.is_valid_position(town.town_map(), target) {
            return false;
        }
        self.state.position = target;
        self.write_back(town);
        true
    }

    /// Like [`set_position`](Self::set_position) but also stops the character.
    pub fn teleport(&mut self, position: Vec2, town: &mut TownState) -> bool {
        let target = self.clamp_to_boundaries(town.town_map(), position);
        if !self.is_valid_position(town.town_map(), target) {
            return false;
        }
        tracing::debug!(x = target.x, y = target.y, "teleport");
        self.state.position = target;
        self.stop();
        self.write_back(town);
        true
    }

    /// Set velocity directly, capped at `max_velocity`.
    pub fn set_velocity(&mut self, velocity: Vec2) {
        self.state.velocity = velocity.clamp_length_max(self.config.max_velocity);
        self.state.current_speed = self.state.velocity.length();
    }

    pub fn stop(&mut self) {
        self.state.velocity = Vec2::ZERO;
        self.state.current_speed = 0.0;
        self.state.moving = false;
        self.state.running = false;
        self.state.state = CharacterState::Idle;
    }

    /// Current speed ceiling: base speed, times the run multiplier while
    /// running, never above `max_velocity`.
    pub fn max_speed(&self) -> f32 {
        let mut speed = self.config.base_speed;
        if self.state.running && self.config.enable_running {
            speed *= self.config.run_speed_multiplier;
        }
        speed.min(self.config.max_velocity)
    }

    pub fn config(&self) -> &MovementConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: MovementConfig) {
        self.config = config.sanitized();
        if !self.config.enable_running {
            self.state.running = false;
        }
    }

    pub fn set_base_speed(&mut self, speed: f32) {
        self.config.base_speed = speed.max(0.0);
    }

    pub fn enable_running(&mut self, enable: bool) {
        self.config.enable_running = enable;
        if !enable {
            self.state.running = false;
        }
    }

    pub fn enable_smoothing(&mut self, enable: bool) {
        self.config.enable_smoothing = enable;
    }

    pub fn enable_collision_sliding(&mut self, enable: bool) {
        self.config.enable_collision_sliding = enable;
    }

    pub fn state(&self) -> &MovementState {
        &self.state
    }

    pub fn position(&self) -> Vec2 {
        self.state.position
    }

    pub fn velocity(&self) -> Vec2 {
        self.state.velocity
    }

    pub fn facing(&self) -> Direction {
        self.state.facing
    }

    pub fn character_state(&self) -> CharacterState {
        self.state.state
    }

    pub fn is_moving(&self) -> bool {
        self.state.moving
    }

    pub fn is_running(&self) -> bool {
        self.state.running
    }

    pub fn character_size(&self) -> Vec2 {
        self.character_size
    }

    pub fn set_character_size(&mut self, size: Vec2) {
        self.character_size = size.max(Vec2::ZERO);
    }

    pub fn events(&self) -> &[MovementEvent] {
        &self.events
    }

    pub fn drain_events(&mut self) -> Vec<MovementEvent> {
        std::mem::take(&mut self.events)
    }

    /// Clip that matches the current locomotion state.
    pub fn animation_clip(&self) -> &'static str {
        clip_for(self.state.state, self.state.facing)
    }

    /// Request the clip for the current state (falling back to idle when the
    /// player lacks it) and advance playback by `dt`. Only clip changes are
    /// forwarded to `play_animation`.
    pub fn drive_animation<P: AnimationPlayer + ?Sized>(&mut self, player: &mut P, dt: f32) {
        let wanted = self.animation_clip();
        let clip = if player.has_animation(wanted) {
            wanted
        } else {
            IDLE_CLIP
        };
        if self.current_clip != Some(clip) {
            player.play_animation(clip);
            self.current_clip = Some(clip);
        }
        player.update(dt);
    }

    pub fn debug_info(&self) -> Vec<String> {
        let s = &self.state;
        let c = &self.config;
        vec![
            "=== Movement ===".to_string(),
            format!("Position: ({:.1}, {:.1})", s.position.x, s.position.y),
            format!("Velocity: ({:.1}, {:.1})", s.velocity.x, s.velocity.y),
            format!("Speed: {:.1} / {:.1}", s.current_speed, self.max_speed()),
            format!("State: {}", s.state.as_str()),
            format!("Direction: {}", s.facing.as_str()),
            format!("Moving: {}", yes_no(s.moving)),
            format!("Running: {}", yes_no(s.running)),
            "=== Configuration ===".to_string(),
            format!("Base Speed: {:.1}", c.base_speed),
            format!("Run Multiplier: {:.2}", c.run_speed_multiplier),
            format!("Acceleration: {:.1}", c.acceleration),
            format!("Deceleration: {:.1}", c.deceleration),
            format!("Max Velocity: {:.1}", c.max_velocity),
            format!("Running Enabled: {}", yes_no(c.enable_running)),
            format!("Smoothing Enabled: {}", yes_no(c.enable_smoothing)),
            format!("Collision Sliding: {}", yes_no(c.enable_collision_sliding)),
        ]
    }
}

fn yes_no(flag: bool) -> &'static str {
    if flag { "Yes" } else { "No" }
}

/// Step `current` toward `target` by at most `rate * dt`, snapping once the
/// remainder fits. A non-positive rate snaps immediately.
fn approach(current: Vec2, target: Vec2, rate: f32, dt: f32) -> Vec2 {
    if rate <= 0.0 {
        return target;
    }
    let budget = rate * dt;
    let delta = target - current;
    if delta.length() <= budget {
        target
    } else {
        current + delta.normalize() * budget
    }
}
