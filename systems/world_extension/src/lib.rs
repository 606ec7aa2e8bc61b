#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Extends the world ahead of the player and describes the scenery of new segments.

use delivery_rush_core::{Command, Event, Extent, WorldPoint, WorldSegment};
use log::debug;

/// Distance from the right edge at which the world grows.
pub const EXTENSION_TRIGGER_DISTANCE: u32 = 1_200;
/// Width added by every extension.
pub const EXTENSION_INCREMENT: u32 = 1_600;

const SLOT_WIDTH: u32 = 100;

/// Pure system that grows the world once the player approaches its edge.
#[derive(Debug)]
pub struct WorldExtender {
    frontier: u32,
}

impl WorldExtender {
    /// Creates an extender for a world that starts with the provided width.
    #[must_use]
    pub const fn new(initial_width: u32) -> Self {
        Self {
            frontier: initial_width,
        }
    }

    /// Right edge of the widest segment handed out so far.
    #[must_use]
    pub const fn frontier(&self) -> u32 {
        self.frontier
    }

    /// Evaluates whether the world must grow.
    ///
    /// Returns the resulting width together with the freshly added segment.
    /// A width behind the remembered frontier is treated as the frontier, so
    /// repeated checks without player progress extend at most once.
    pub fn maybe_extend(
        &mut self,
        player_x: f32,
        current_width: u32,
    ) -> (u32, Option<WorldSegment>) {
        let width = current_width.max(self.frontier);
        let threshold = width.saturating_sub(EXTENSION_TRIGGER_DISTANCE);
        if player_x <= threshold as f32 {
            return (width, None);
        }

        let extended = width.saturating_add(EXTENSION_INCREMENT);
        self.frontier = extended;
        (extended, Some(WorldSegment::new(width, extended)))
    }

    /// Consumes world events and emits an extension command when required.
    ///
    /// Returns the segment that needs decorating, if the world grew.
    pub fn handle(
        &mut self,
        events: &[Event],
        player_x: f32,
        current_width: u32,
        out: &mut Vec<Command>,
    ) -> Option<WorldSegment> {
        for event in events {
            if let Event::LevelStarted { world_width, .. } = event {
                self.frontier = *world_width;
            }
        }

        let (width, segment) = self.maybe_extend(player_x, current_width);
        if let Some(segment) = segment {
            debug!(
                "player at x = {player_x:.1} triggered extension {}..{}",
                segment.start(),
                segment.end()
            );
            out.push(Command::ExtendWorld { width });
        }
        segment
    }
}

/// Scenery element placed along the street.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DecorationKind {
    /// Distant house in the back row.
    FarHouse,
    /// House bordering the street.
    NearHouse,
    /// Fence in front of a near house.
    Fence,
    /// Driveway next to a near house.
    Driveway,
    /// Car parked on a driveway.
    Car,
    /// Grass strip spanning the segment.
    Grass,
    /// Sidewalk strip spanning the segment.
    Sidewalk,
}

impl DecorationKind {
    /// Fill colour encoded as `0xRRGGBB`.
    #[must_use]
    pub const fn color(self) -> u32 {
        match self {
            Self::FarHouse => 0x99_bb_ff,
            Self::NearHouse => 0xff_e0_66,
            Self::Fence => 0xcc_cc_cc,
            Self::Driveway => 0x88_88_88,
            Self::Car => 0x33_66_cc,
            Self::Grass => 0x77_cc_77,
            Self::Sidewalk => 0xdd_dd_dd,
        }
    }

    /// Draw depth; lower values are further back.
    #[must_use]
    pub const fn depth(self) -> i8 {
        match self {
            Self::FarHouse => -3,
            Self::NearHouse | Self::Fence | Self::Driveway | Self::Car => -2,
            Self::Grass | Self::Sidewalk => -1,
        }
    }
}

/// Scenery rectangle centred on `center`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Decoration {
    /// Kind of scenery.
    pub kind: DecorationKind,
    /// Centre of the rectangle.
    pub center: WorldPoint,
    /// Rectangle dimensions.
    pub extent: Extent,
}

/// Produces the scenery for the provided segment.
#[must_use]
pub fn decorations_for(segment: WorldSegment) -> Vec<Decoration> {
    if segment.is_empty() {
        return Vec::new();
    }

    let first_slot = segment.start() / SLOT_WIDTH;
    let last_slot = segment.end() / SLOT_WIDTH;
    let mut decorations = Vec::new();

    for slot in first_slot..last_slot {
        let x = (slot * SLOT_WIDTH) as f32;
        decorations.push(decoration(DecorationKind::FarHouse, x + 10.0, 120.0, 80.0, 60.0));
    }

    for slot in first_slot..last_slot {
        let x = (slot * SLOT_WIDTH) as f32;
        decorations.push(decoration(DecorationKind::NearHouse, x + 20.0, 220.0, 60.0, 60.0));
        if slot % 2 == 0 {
            decorations.push(decoration(DecorationKind::Fence, x + 20.0, 280.0, 60.0, 8.0));
        }
        if slot % 3 == 0 {
            decorations.push(decoration(DecorationKind::Driveway, x + 60.0, 280.0, 20.0, 20.0));
            decorations.push(decoration(DecorationKind::Car, x + 65.0, 285.0, 10.0, 10.0));
        }
    }

    let span = segment.len() as f32;
    let middle = segment.start() as f32 + span / 2.0;
    decorations.push(decoration(DecorationKind::Grass, middle, 370.0, span, 60.0));
    decorations.push(decoration(DecorationKind::Sidewalk, middle, 420.0, span, 40.0));
    decorations
}

fn decoration(kind: DecorationKind, x: f32, y: f32, width: f32, height: f32) -> Decoration {
    Decoration {
        kind,
        center: WorldPoint::new(x, y),
        extent: Extent::new(width, height),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn count(decorations: &[Decoration], kind: DecorationKind) -> usize {
        decorations
            .iter()
            .filter(|decoration| decoration.kind == kind)
            .count()
    }

    #[test]
    fn extension_waits_for_threshold() {
        let mut extender = WorldExtender::new(1_600);
        assert_eq!(extender.maybe_extend(400.0, 1_600), (1_600, None));
        assert_eq!(extender.maybe_extend(399.0, 1_600), (1_600, None));
    }

    #[test]
    fn extension_returns_new_segment() {
        let mut extender = WorldExtender::new(1_600);
        assert_eq!(
            extender.maybe_extend(401.0, 1_600),
            (3_200, Some(WorldSegment::new(1_600, 3_200)))
        );
        assert_eq!(extender.frontier(), 3_200);
    }

    #[test]
    fn repeated_check_with_stale_width_extends_once() {
        let mut extender = WorldExtender::new(1_600);
        let (_, first) = extender.maybe_extend(500.0, 1_600);
        let (width, second) = extender.maybe_extend(500.0, 1_600);

        assert!(first.is_some());
        assert_eq!(second, None);
        assert_eq!(width, 3_200);
    }

    #[test]
    fn decorations_follow_slot_pattern() {
        let decorations = decorations_for(WorldSegment::new(1_600, 3_200));

        assert_eq!(count(&decorations, DecorationKind::FarHouse), 16);
        assert_eq!(count(&decorations, DecorationKind::NearHouse), 16);
        assert_eq!(count(&decorations, DecorationKind::Fence), 8);
        // slots 18, 21, 24, 27 and 30 fall on multiples of three
        assert_eq!(count(&decorations, DecorationKind::Driveway), 5);
        assert_eq!(count(&decorations, DecorationKind::Car), 5);
        assert_eq!(count(&decorations, DecorationKind::Grass), 1);

        let sidewalk = decorations
            .iter()
            .find(|decoration| decoration.kind == DecorationKind::Sidewalk)
            .copied();
        assert_eq!(
            sidewalk,
            Some(decoration(DecorationKind::Sidewalk, 2_400.0, 420.0, 1_600.0, 40.0))
        );
    }

    #[test]
    fn empty_segment_has_no_scenery() {
        assert!(decorations_for(WorldSegment::new(800, 800)).is_empty());
    }
}
