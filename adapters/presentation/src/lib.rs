#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared presentation contracts for Delivery Rush adapters.

use anyhow::Result as AnyResult;
use delivery_rush_core::{Bounds, EnemyKind, Event, FinalStats, WorldPoint, WELCOME_BANNER};
use delivery_rush_system_scoring::HighScoreStore;
use delivery_rush_system_session::{Scene, Session};
use delivery_rush_system_world_extension::{Decoration, DecorationKind};
use delivery_rush_world::{query, World, VIEWPORT_WIDTH, WORLD_HEIGHT};
use glam::Vec2;
use std::time::Duration;

/// Camera shake played when the defense takes a hit.
pub const HIT_SHAKE_DURATION: Duration = Duration::from_millis(150);
/// Intensity of the hit camera shake.
pub const HIT_SHAKE_INTENSITY: f32 = 0.01;
/// Tint of the defense while invincible.
pub const DEFENSE_HIT_TINT: Color = Color::from_hex(0xff_44_44);
/// Regular tint of the defense.
pub const DEFENSE_TINT: Color = Color::from_hex(0xff_cc_00);

const PLAYER_TINT: Color = Color::from_hex(0xff_ff_ff);
const HOUSE_TINT: Color = Color::from_hex(0xff_aa_00);
#[allow(dead_code)]
const INDICATOR_TINT: Color = Color::from_hex(0xff_ee_00);
const INDICATOR_OFFSET: Vec2 = Vec2::new(-20.0, -80.0);

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }

    /// Creates an opaque color from a `0xRRGGBB` literal.
    #[must_use]
    pub const fn from_hex(rgb: u32) -> Self {
        Self::from_rgb_u8((rgb >> 16) as u8, (rgb >> 8) as u8, rgb as u8)
    }

    /// Packs the color back into a `0xRRGGBB` value.
    #[must_use]
    pub fn to_hex(self) -> u32 {
        let channel = |value: f32| (value.clamp(0.0, 1.0) * 255.0).round() as u32;
        (channel(self.red) << 16) | (channel(self.green) << 8) | channel(self.blue)
    }
}

/// Fill color of an enemy kind.
#[must_use]
pub const fn enemy_color(kind: EnemyKind) -> Color {
    match kind {
        EnemyKind::SmallRobber => Color::from_hex(0x22_22_cc),
        EnemyKind::LargeRobber => Color::from_hex(0x44_44_ff),
        EnemyKind::FastThief => Color::from_hex(0x22_cc_22),
        EnemyKind::MasterThief => Color::from_hex(0xcc_22_22),
    }
}

/// Axis-aligned rectangle drawn by a backend.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sprite {
    /// Centre of the rectangle in world units.
    pub center: Vec2,
    /// Width and height of the rectangle.
    pub size: Vec2,
    /// Fill color.
    pub color: Color,
    /// Draw depth; lower values are drawn first.
    pub depth: i8,
}

impl Sprite {
    /// Creates a sprite covering the provided bounds.
    #[must_use]
    pub fn from_bounds(bounds: Bounds, color: Color, depth: i8) -> Self {
        let min = Vec2::new(bounds.left(), bounds.top());
        let max = Vec2::new(bounds.right(), bounds.bottom());
        Self {
            center: (min + max) / 2.0,
            size: max - min,
            color,
            depth,
        }
    }

    /// Creates a sprite for a scenery element.
    #[must_use]
    pub fn from_decoration(decoration: &Decoration) -> Self {
        Self {
            center: to_vec2(decoration.center),
            size: Vec2::new(decoration.extent.width(), decoration.extent.height()),
            color: Color::from_hex(decoration.kind.color()),
            depth: decoration.kind.depth(),
        }
    }

    /// Reports whether any part of the sprite lies within the horizontal span.
    #[must_use]
    pub fn overlaps_span(&self, left: f32, right: f32) -> bool {
        let half = self.size.x / 2.0;
        self.center.x + half >= left && self.center.x - half <= right
    }
}

/// Converts a world point into a presentation vector.
#[must_use]
pub fn to_vec2(point: WorldPoint) -> Vec2 {
    Vec2::new(point.x(), point.y())
}

/// Heads-up display values shown while a level runs.
#[derive(Clone, Debug, PartialEq)]
pub struct HudSnapshot {
    /// Whole distance units travelled in the level.
    pub distance: u64,
    /// Run total including the distance of the live level.
    pub total_score: u64,
    /// Highest known score.
    pub high_score: u64,
    /// Lives left.
    pub lives: u32,
    /// Current wave.
    pub wave: u32,
    /// Waves in the level.
    pub max_waves: u32,
    /// Current level.
    pub level: u32,
    /// Speed multiplier applied to enemies.
    pub speed_multiplier: f32,
    /// Status line shown under the counters.
    pub banner: String,
}

impl HudSnapshot {
    /// Captures the HUD of a session.
    #[must_use]
    pub fn capture<S: HighScoreStore>(session: &Session<S>) -> Self {
        let state = query::level_state(session.world());
        let run = session.run();
        Self {
            distance: state.distance.max(0.0).floor() as u64,
            total_score: session.provisional_total(),
            high_score: run.high_score(),
            lives: state.lives,
            wave: state.wave,
            max_waves: state.max_waves,
            level: state.level,
            speed_multiplier: session.difficulty().speed_multiplier,
            banner: banner_text(
                state.wave,
                state.max_waves,
                query::house_position(session.world()).is_some(),
            ),
        }
    }

    /// Renders the HUD as display lines.
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        vec![
            format!("Distance: {}m", self.distance),
            format!("Score: {}", self.total_score),
            format!("High Score: {}", self.high_score),
            format!("Lives: {}", self.lives),
            format!(
                "Level: {}  Speed: x{:.1}",
                self.level, self.speed_multiplier
            ),
            self.banner.clone(),
        ]
    }
}

/// Status line describing wave progress or the pending delivery.
#[must_use]
pub fn banner_text(wave: u32, max_waves: u32, house_spawned: bool) -> String {
    if house_spawned {
        "Deliver to the house!".to_owned()
    } else {
        format!("Wave: {wave}/{max_waves}")
    }
}

/// Lines summarising a finished level.
#[must_use]
pub fn summary_lines(stats: &FinalStats, game_over: bool) -> Vec<String> {
    let heading = if game_over { "Game Over" } else { "Level Complete!" };
    let mut lines = vec![
        heading.to_owned(),
        format!("Distance: {}m", stats.distance),
    ];
    if !game_over {
        lines.push(format!("Lives Left: {}", stats.lives));
        lines.push(format!("Bonus: {}", stats.bonus));
    }
    lines.push(format!("Level Score: {}", stats.level_score));
    lines.push(format!("Total Score: {}", stats.score));
    lines.push(format!("Level Reached: {}", stats.level));
    if stats.is_new_high_score() {
        lines.push("New High Score!".to_owned());
    } else {
        lines.push(format!("High Score: {}", stats.high_score));
    }
    lines
}

/// One-shot effect requested by the simulation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Cue {
    /// Shake the camera.
    CameraShake {
        /// How long the shake lasts.
        duration: Duration,
        /// Shake strength relative to the viewport.
        intensity: f32,
    },
    /// Recolor the defense box.
    DefenseTint(Color),
    /// Play the life lost sound.
    LoseLife,
    /// Point the player at the delivery house.
    DeliveryIndicator {
        /// Where the indicator should be drawn.
        position: Vec2,
    },
}

/// Translates simulation events into presentation cues.
#[must_use]
pub fn cues_for(events: &[Event]) -> Vec<Cue> {
    let mut cues = Vec::new();
    for event in events {
        match event {
            Event::DefenseHit { .. } => {
                cues.push(Cue::CameraShake {
                    duration: HIT_SHAKE_DURATION,
                    intensity: HIT_SHAKE_INTENSITY,
                });
                cues.push(Cue::DefenseTint(DEFENSE_HIT_TINT));
                cues.push(Cue::LoseLife);
            }
            Event::InvincibilityEnded => cues.push(Cue::DefenseTint(DEFENSE_TINT)),
            Event::DeliveryHouseSpawned { position } => cues.push(Cue::DeliveryIndicator {
                position: to_vec2(*position) + INDICATOR_OFFSET,
            }),
            _ => {}
        }
    }
    cues
}

/// Everything a backend needs to draw one frame.
#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
    /// Left edge of the camera in world units.
    pub camera_left: f32,
    /// Sprites inside the viewport sorted by depth.
    pub sprites: Vec<Sprite>,
}

impl Frame {
    /// Captures the visible part of the world together with its scenery.
    #[must_use]
    pub fn capture(world: &World, scenery: &[Decoration]) -> Self {
        let camera_right = query::camera_right_edge(world);
        let camera_left = camera_right - VIEWPORT_WIDTH;
        let state = query::level_state(world);
        let defense_tint = if state.invincible {
            DEFENSE_HIT_TINT
        } else {
            DEFENSE_TINT
        };

        let mut sprites: Vec<Sprite> = scenery.iter().map(Sprite::from_decoration).collect();
        if let Some(house) = query::house_bounds(world) {
            sprites.push(Sprite::from_bounds(house, HOUSE_TINT, 0));
        }
        for enemy in query::enemy_view(world).iter() {
            let bounds = Bounds::centered(enemy.position, enemy.kind.extent());
            sprites.push(Sprite::from_bounds(bounds, enemy_color(enemy.kind), 1));
        }
        sprites.push(Sprite::from_bounds(
            query::player_bounds(world),
            PLAYER_TINT,
            2,
        ));
        sprites.push(Sprite::from_bounds(
            query::defense_bounds(world),
            defense_tint,
            3,
        ));

        sprites.retain(|sprite| sprite.overlaps_span(camera_left, camera_right));
        sprites.sort_by_key(|sprite| sprite.depth);
        Self {
            camera_left,
            sprites,
        }
    }

    /// Number of visible sprites on the provided depth layer.
    #[must_use]
    pub fn layer_len(&self, depth: i8) -> usize {
        self.sprites
            .iter()
            .filter(|sprite| sprite.depth == depth)
            .count()
    }
}

/// Presentation descriptor consumed by backends.
#[derive(Clone, Debug, PartialEq)]
pub struct Presentation {
    /// Title used by the created window.
    pub window_title: String,
    /// Size of the viewport in world units.
    pub viewport: Vec2,
    /// Solid color used to clear each frame.
    pub clear_color: Color,
}

impl Default for Presentation {
    fn default() -> Self {
        Self {
            window_title: WELCOME_BANNER.to_owned(),
            viewport: Vec2::new(VIEWPORT_WIDTH, WORLD_HEIGHT),
            clear_color: Color::from_hex(0x87_ce_eb),
        }
    }
}

/// What a backend shows for the current scene.
#[derive(Clone, Debug, PartialEq)]
pub enum View {
    /// Title screen.
    Menu,
    /// A running or paused level.
    Level {
        /// Visible world.
        frame: Frame,
        /// Counters shown on top.
        hud: HudSnapshot,
        /// Effects triggered during the last step.
        cues: Vec<Cue>,
        /// Whether time stands still.
        paused: bool,
    },
    /// Summary of a finished level.
    Summary {
        /// Final statistics.
        stats: FinalStats,
        /// Whether the run ended.
        game_over: bool,
    },
}

impl View {
    /// Builds the view of a session.
    #[must_use]
    pub fn capture<S: HighScoreStore>(session: &Session<S>, scenery: &[Decoration]) -> Self {
        match session.scene() {
            Scene::MainMenu => Self::Menu,
            Scene::Playing | Scene::Paused => Self::Level {
                frame: Frame::capture(session.world(), scenery),
                hud: HudSnapshot::capture(session),
                cues: cues_for(session.tick_events()),
                paused: session.scene() == Scene::Paused,
            },
            Scene::LevelComplete(stats) => Self::Summary {
                stats,
                game_over: false,
            },
            Scene::GameOver(stats) => Self::Summary {
                stats,
                game_over: true,
            },
        }
    }
}

/// Backend capable of presenting Delivery Rush views.
pub trait PresentationBackend {
    /// Presents a single view.
    fn present(&mut self, presentation: &Presentation, view: &View) -> AnyResult<()>;
}

/// Depth of the scenery layer drawn closest to the street.
#[must_use]
pub const fn ground_depth() -> i8 {
    DecorationKind::Grass.depth()
}
