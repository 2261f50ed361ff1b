//! Component kinds stored by the [`World`](crate::World).
//!
//! Each kind is an independent plain-data struct; an entity may carry any
//! subset. Derived rectangles (`Hitbox::bounds`, `InteractionZone::bounds`)
//! are kept in world space and refreshed by [`crate::systems::sync_bounds`].

use focustown_common::{Rect, Rgba, SceneId};
use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Opaque reference to a texture owned by the render layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TextureHandle(pub u64);

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn to_vec2(self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }
}

impl From<Vec2> for Position {
    fn from(v: Vec2) -> Self {
        Self { x: v.x, y: v.y }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sprite {
    pub texture_path: String,
    /// Filled in by the render layer once the texture is resident.
    pub texture: Option<TextureHandle>,
    pub width: u32,
    pub height: u32,
    pub tint: Rgba,
    pub loaded: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Hitbox {
    pub width: f32,
    pub height: f32,
    pub bounds: Rect,
    pub colliding: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Animation {
    pub frame_count: u32,
    pub current_frame: u32,
    /// Seconds each frame stays on screen.
    pub frame_time: f32,
    /// Seconds left on the current frame.
    pub timer: f32,
    pub frame_width: u32,
    pub frame_height: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlayerInput {
    pub speed: f32,
    pub controlled: bool,
    pub frozen: bool,
}

/// Marks an enterable building and the interior scene it leads to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildingLink {
    pub display_name: String,
    pub interior_scene: SceneId,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeechBubble {
    pub text: String,
    pub active: bool,
    pub offset: Vec2,
    pub lifetime: f32,
    pub elapsed: f32,
    pub alpha: f32,
    pub fade_in: f32,
    pub fade_out: f32,
}

impl SpeechBubble {
    pub const DEFAULT_OFFSET: Vec2 = Vec2::new(0.0, -32.0);

    pub fn new(text: impl Into<String>, offset: Vec2) -> Self {
        Self {
            text: text.into(),
            active: false,
            offset,
            lifetime: 0.0,
            elapsed: 0.0,
            alpha: 1.0,
            fade_in: 0.08,
            fade_out: 0.08,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scene {
    pub scene: SceneId,
}

/// Marker for the player-controlled entity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player;

/// Non-blocking trigger area, offset from the owner's position.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct InteractionZone {
    pub width: f32,
    pub height: f32,
    pub offset: Vec2,
    pub bounds: Rect,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GuiKind {
    #[default]
    None,
    Pomodoro,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildingInterior {
    pub gui: GuiKind,
    pub gui_background: String,
    pub gui_color: Rgba,
    pub game_background: String,
    pub game_color: Rgba,
    pub background: Option<TextureHandle>,
    pub textures_loaded: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AiWander {
    pub speed: f32,
    pub move_timer: f32,
    pub current_move_time: f32,
    pub min_move_time: f32,
    pub max_move_time: f32,
    pub direction: Vec2,
    pub moving: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExitDoor {
    pub display_text: String,
    pub player_near: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Interactable {
    pub name: String,
    pub prompt: String,
    /// Free-form tag such as `librarian`, `desk` or `barista`.
    pub kind: String,
    pub player_near: bool,
}

/// Reading-room state for the library interior.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LibraryData {
    pub ebook_paths: Vec<String>,
    pub ebook_titles: Vec<String>,
    pub selected_index: usize,
    pub scroll_offset: usize,
    pub showing_ui: bool,
    pub search: String,
}

/// Task list state for the bulletin board interior.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TodoListData {
    pub tasks: Vec<String>,
    pub completed: Vec<bool>,
    pub selected_index: usize,
    pub scroll_offset: usize,
    pub showing_ui: bool,
    pub adding_new: bool,
    pub input: String,
}

impl TodoListData {
    pub fn push_task(&mut self, task: impl Into<String>) {
        self.tasks.push(task.into());
        self.completed.push(false);
    }

    /// Flip completion for `index`. Returns the new state, or `None` when out of range.
    pub fn toggle(&mut self, index: usize) -> Option<bool> {
        let done = self.completed.get_mut(index)?;
        *done = !*done;
        Some(*done)
    }
}
