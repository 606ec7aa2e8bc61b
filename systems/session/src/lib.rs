#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Tick pipeline that drives the world and every system in a fixed order.

mod config;
mod events;

use std::time::Duration;

use delivery_rush_core::{
    Command, Difficulty, EnemyView, Event, FinalStats, HandoffPayload, LevelHandoff,
    MovementIntent, TimerKind, WorldSegment,
};
use delivery_rush_system_combat::CombatResolver;
use delivery_rush_system_difficulty::difficulty;
use delivery_rush_system_level_flow::{self as level_flow, LevelFlow, LevelPhase};
use delivery_rush_system_scoring::{HighScoreStore, RunState, ScoreLedger};
use delivery_rush_system_waves::WaveController;
use delivery_rush_system_world_extension::WorldExtender;
use delivery_rush_world::{self as world, query, World, INITIAL_WORLD_WIDTH};
use log::info;

use events::{EventLog, Reader};

pub use config::{ConfigError, SessionConfig};

/// Screen the session is on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Scene {
    /// No level is loaded.
    MainMenu,
    /// A level is running.
    Playing,
    /// A level is loaded but time stands still.
    Paused,
    /// The player delivered; waiting for the next level request.
    LevelComplete(FinalStats),
    /// The run is over.
    GameOver(FinalStats),
}

/// Requests to move between scenes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SceneRequest {
    /// Starts a fresh run at the first level.
    StartGame,
    /// Abandons the current level and starts a fresh run.
    Restart,
    /// Starts the level described by the payload; missing data falls back
    /// to the first level with no score.
    NextLevel(Option<HandoffPayload>),
    /// Abandons the current level and returns to the menu.
    MainMenu,
}

/// Terminal outcome of a level.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Transition {
    /// The player reached the delivery house.
    LevelComplete(FinalStats),
    /// The defense ran out of lives.
    GameOver(FinalStats),
}

impl Transition {
    /// Final statistics of the level.
    #[must_use]
    pub const fn stats(&self) -> FinalStats {
        match self {
            Self::LevelComplete(stats) | Self::GameOver(stats) => *stats,
        }
    }
}

/// Single-threaded game session owning the world and every system.
#[derive(Debug)]
pub struct Session<S> {
    config: SessionConfig,
    scene: Scene,
    intent: MovementIntent,
    world: World,
    flow: LevelFlow,
    waves: WaveController,
    extender: WorldExtender,
    combat: CombatResolver,
    ledger: ScoreLedger<S>,
    log: EventLog,
    new_segments: Vec<WorldSegment>,
}

impl<S: HighScoreStore> Session<S> {
    /// Creates a session resting on the main menu.
    pub fn new(config: SessionConfig, store: S) -> Result<Self, ConfigError> {
        config.validate()?;
        let handoff = LevelHandoff::FIRST_LEVEL;
        Ok(Self {
            config,
            scene: Scene::MainMenu,
            intent: MovementIntent::Idle,
            world: World::new(),
            flow: LevelFlow::new(level_flow::Config::new(
                config.intro_delay(),
                config.wave_gap(),
                config.max_waves,
            )),
            waves: WaveController::new(config.global_seed, handoff.level()),
            extender: WorldExtender::new(INITIAL_WORLD_WIDTH),
            combat: CombatResolver::new(config.invincibility()),
            ledger: ScoreLedger::new(store, handoff),
            log: EventLog::default(),
            new_segments: Vec::new(),
        })
    }

    /// Current scene.
    #[must_use]
    pub const fn scene(&self) -> Scene {
        self.scene
    }

    /// Configuration the session runs with.
    #[must_use]
    pub const fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Read-only access to the world for queries.
    #[must_use]
    pub const fn world(&self) -> &World {
        &self.world
    }

    /// Current phase of the level.
    #[must_use]
    pub fn phase(&self) -> LevelPhase {
        self.flow.phase()
    }

    /// Score state of the run.
    #[must_use]
    pub fn run(&self) -> RunState {
        self.ledger.run()
    }

    /// Run total including the whole distance of the live level.
    #[must_use]
    pub fn provisional_total(&self) -> u64 {
        self.ledger.provisional_total()
    }

    /// Difficulty of the live level.
    #[must_use]
    pub fn difficulty(&self) -> Difficulty {
        difficulty(query::level_state(&self.world).level)
    }

    /// Borrows the high score store.
    #[must_use]
    pub fn store(&self) -> &S {
        self.ledger.store()
    }

    /// Events emitted during the most recent step.
    #[must_use]
    pub fn tick_events(&self) -> &[Event] {
        self.log.current_tick()
    }

    /// Hands out world segments added since the previous call.
    pub fn take_new_segments(&mut self) -> Vec<WorldSegment> {
        std::mem::take(&mut self.new_segments)
    }

    /// Handles a scene transition request.
    pub fn request(&mut self, request: SceneRequest) {
        match request {
            SceneRequest::StartGame | SceneRequest::Restart => {
                self.ledger.reset_run();
                self.begin_level(LevelHandoff::FIRST_LEVEL);
            }
            SceneRequest::NextLevel(payload) => {
                self.begin_level(LevelHandoff::from_payload(payload.as_ref()));
            }
            SceneRequest::MainMenu => {
                self.log.reset();
                self.new_segments.clear();
                self.world = World::new();
                self.scene = Scene::MainMenu;
                info!("returned to main menu");
            }
        }
    }

    /// Freezes a running level.
    pub fn pause(&mut self) {
        if self.scene == Scene::Playing {
            self.scene = Scene::Paused;
        }
    }

    /// Resumes a paused level.
    pub fn resume(&mut self) {
        if self.scene == Scene::Paused {
            self.scene = Scene::Playing;
        }
    }

    /// Advances the running level by `dt` with the provided movement intent.
    ///
    /// Returns the terminal transition when the level ends during this step.
    /// Steps outside a running level are ignored.
    pub fn step(&mut self, dt: Duration, intent: MovementIntent) -> Option<Transition> {
        if self.scene != Scene::Playing {
            return None;
        }

        self.log.begin_tick();
        let mut commands = Vec::new();

        // clock, movement and timers
        if intent != self.intent {
            self.intent = intent;
            commands.push(Command::SetMovementIntent { intent });
        }
        commands.push(Command::Tick { dt });
        self.apply(&mut commands);
        self.react_to_timers(&mut commands);
        self.apply(&mut commands);

        // world extension
        let range = self.log.unread(Reader::Extender);
        let player_x = query::player_position(&self.world).x();
        if let Some(segment) = self.extender.handle(
            self.log.slice(range),
            player_x,
            query::world_width(&self.world),
            &mut commands,
        ) {
            self.new_segments.push(segment);
        }
        self.apply(&mut commands);

        // enemies
        commands.push(Command::AdvanceEnemies { dt });
        self.apply(&mut commands);

        // collisions
        let range = self.log.unread(Reader::Combat);
        let enemies = query::enemy_view(&self.world);
        self.combat.handle(
            self.log.slice(range),
            query::defense_bounds(&self.world),
            query::player_bounds(&self.world),
            &enemies,
            &mut commands,
        );
        self.apply(&mut commands);

        // distance
        let moving_right = query::player_velocity_x(&self.world) > 0.0;
        let amount = self.ledger.tick(dt, moving_right);
        commands.push(Command::AccrueDistance { amount });
        self.apply(&mut commands);
        let range = self.log.unread(Reader::Ledger);
        let early_stats = self.ledger.handle(self.log.slice(range));

        // wave completion
        let range = self.log.unread(Reader::Waves);
        let enemies = query::enemy_view(&self.world);
        let player_x = query::player_position(&self.world).x();
        let _ = self
            .waves
            .handle(self.log.slice(range), player_x, &enemies, &mut commands);
        self.apply(&mut commands);

        // level completion
        let range = self.log.unread(Reader::Flow);
        self.flow.handle(self.log.slice(range), &mut commands);
        self.flow.check_delivery(
            query::player_bounds(&self.world),
            query::house_bounds(&self.world),
            &mut commands,
        );
        self.apply(&mut commands);
        let range = self.log.unread(Reader::Ledger);
        let stats = self.ledger.handle(self.log.slice(range)).or(early_stats);

        stats.map(|stats| self.finish(stats))
    }

    fn react_to_timers(&mut self, commands: &mut Vec<Command>) {
        let range = self.log.unread(Reader::Flow);
        let events = self.log.slice(range);
        let waves: Vec<u32> = events
            .iter()
            .filter_map(|event| match event {
                Event::TimerFired {
                    timer: TimerKind::WaveStart { wave },
                } => Some(*wave),
                _ => None,
            })
            .collect();
        self.flow.handle(events, commands);

        if waves.is_empty() {
            return;
        }

        let level = query::level_state(&self.world).level;
        let player = query::player_position(&self.world);
        let camera_right = query::camera_right_edge(&self.world);
        for wave in waves {
            self.waves
                .start_wave(wave, level, player, camera_right, commands);
        }
    }

    fn begin_level(&mut self, handoff: LevelHandoff) {
        self.ledger.begin_level(handoff);
        self.log.reset();
        self.new_segments.clear();
        self.intent = MovementIntent::Idle;

        let mut commands = vec![Command::BeginLevel {
            level: handoff.level(),
            lives: self.config.starting_lives,
            max_waves: self.config.max_waves,
        }];
        self.apply(&mut commands);

        let player_x = query::player_position(&self.world).x();
        let width = query::world_width(&self.world);
        let range = self.log.unread(Reader::Flow);
        self.flow.handle(self.log.slice(range), &mut commands);
        let range = self.log.unread(Reader::Waves);
        let _ = self.waves.handle(
            self.log.slice(range),
            player_x,
            &EnemyView::default(),
            &mut commands,
        );
        let range = self.log.unread(Reader::Extender);
        let _ = self
            .extender
            .handle(self.log.slice(range), player_x, width, &mut commands);
        let range = self.log.unread(Reader::Combat);
        self.combat.handle(
            self.log.slice(range),
            query::defense_bounds(&self.world),
            query::player_bounds(&self.world),
            &EnemyView::default(),
            &mut commands,
        );
        let range = self.log.unread(Reader::Ledger);
        let _ = self.ledger.handle(self.log.slice(range));
        self.apply(&mut commands);

        self.scene = Scene::Playing;
        info!(
            "session entered level {} carrying {} points",
            handoff.level(),
            handoff.total_score()
        );
    }

    fn finish(&mut self, stats: FinalStats) -> Transition {
        let state = query::level_state(&self.world);
        if state.game_over {
            self.scene = Scene::GameOver(stats);
            Transition::GameOver(stats)
        } else {
            self.scene = Scene::LevelComplete(stats);
            Transition::LevelComplete(stats)
        }
    }

    fn apply(&mut self, commands: &mut Vec<Command>) {
        for command in commands.drain(..) {
            world::apply(&mut self.world, command, self.log.sink());
        }
    }
}
