//! Procedural placement of scenery
//!
//! Every object kind follows one row of the placement table below: roadside
//! kinds (trees, flags) go left or right of the road and must not overlap
//! each other; in-road kinds (barriers, people) go anywhere inside the road
//! and may overlap freely.
//!
//! Initial placement scatters objects over a band three viewports tall
//! (one above, the viewport itself, one below) so they scroll in staggered.
//! Respawns anchor the object just above the viewport so it re-enters from
//! the top.

use std::fmt;

use glam::Vec2;
use rand::Rng;

use super::entity::{EnvironmentObject, ObjectKind};
use super::geometry::{Rect, any_overlap};
use crate::config::Config;
use crate::consts::{PLACEMENT_ATTEMPTS, RESPAWN_JITTER, ROAD_MARGIN};

/// Horizontal placement policy for a kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lane {
    /// Beside the road, a random gap (inclusive range) away from the edge
    Roadside { min_gap: i32, max_gap: i32 },
    /// Inside the road band, `ROAD_MARGIN` from either edge
    InRoad,
}

/// One row of the placement table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlacementRule {
    pub lane: Lane,
    /// Candidates are rejected while they overlap other roadside objects
    pub overlap_checked: bool,
}

impl ObjectKind {
    /// Placement rule for this kind
    pub fn rule(self) -> PlacementRule {
        match self {
            ObjectKind::Tree => PlacementRule {
                lane: Lane::Roadside {
                    min_gap: 10,
                    max_gap: 50,
                },
                overlap_checked: true,
            },
            ObjectKind::Flag => PlacementRule {
                lane: Lane::Roadside {
                    min_gap: 5,
                    max_gap: 30,
                },
                overlap_checked: true,
            },
            ObjectKind::Barrier | ObjectKind::Person => PlacementRule {
                lane: Lane::InRoad,
                overlap_checked: false,
            },
        }
    }
}

/// Where the y coordinate of a placement is drawn from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    /// Anywhere in `[-height, 2 * height]` (world setup)
    Field,
    /// Just above the viewport top (respawn)
    AboveViewport,
}

/// No overlap-free spot was found within the attempt budget
#[derive(Debug, Clone, PartialEq)]
pub struct PlacementExhausted {
    pub kind: ObjectKind,
    pub attempts: u32,
    /// The final rejected candidate
    pub last: Vec2,
}

impl fmt::Display for PlacementExhausted {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "could not place {} without overlap after {} attempts",
            self.kind.as_str(),
            self.attempts
        )
    }
}

impl std::error::Error for PlacementExhausted {}

/// Draw a candidate x (left edge) for `kind`
pub fn candidate_x<R: Rng>(kind: ObjectKind, config: &Config, rng: &mut R) -> f32 {
    let width = kind.size(config).x;
    let road_x = config.road_x();
    match kind.rule().lane {
        Lane::Roadside { min_gap, max_gap } => {
            let gap = rng.random_range(min_gap..=max_gap) as f32;
            if rng.random_bool(0.5) {
                road_x - width - gap
            } else {
                config.road_right() + gap
            }
        }
        Lane::InRoad => {
            let lo = (road_x + ROAD_MARGIN) as i32;
            let hi = ((config.road_right() - width - ROAD_MARGIN) as i32).max(lo);
            rng.random_range(lo..=hi) as f32
        }
    }
}

/// Draw a candidate y (top edge) for an object of the given height
pub fn candidate_y<R: Rng>(
    anchor: Anchor,
    object_height: f32,
    config: &Config,
    rng: &mut R,
) -> f32 {
    match anchor {
        Anchor::Field => {
            let h = config.height as i32;
            rng.random_range(-h..=2 * h) as f32
        }
        Anchor::AboveViewport => -object_height - rng.random_range(0..=RESPAWN_JITTER) as f32,
    }
}

/// Find a position for `kind`, retrying up to `max_attempts` times while the
/// candidate overlaps `existing` (overlap-checked kinds only).
///
/// Kinds without an overlap rule succeed on the first draw.
pub fn place_with_retries<R: Rng>(
    kind: ObjectKind,
    anchor: Anchor,
    existing: &[Rect],
    max_attempts: u32,
    config: &Config,
    rng: &mut R,
) -> Result<Vec2, PlacementExhausted> {
    let size = kind.size(config);
    let check = kind.rule().overlap_checked;

    let mut last = Vec2::ZERO;
    for _ in 0..max_attempts.max(1) {
        let x = candidate_x(kind, config, rng);
        let y = candidate_y(anchor, size.y, config, rng);
        last = Vec2::new(x, y);

        let rect = Rect::from_pos_size(last, size);
        if !check || !any_overlap(&rect, existing.iter().copied()) {
            return Ok(last);
        }
    }

    Err(PlacementExhausted {
        kind,
        attempts: max_attempts.max(1),
        last,
    })
}

/// Build the initial scenery.
///
/// Roadside objects that cannot be placed without overlap are skipped.
/// Barriers always appear; each person slot is filled by chance.
pub fn setup_environment<R: Rng>(config: &Config, rng: &mut R) -> Vec<EnvironmentObject> {
    let mut objects = Vec::new();
    let mut side_rects: Vec<Rect> = Vec::new();

    let side_kinds = [
        (ObjectKind::Tree, config.tree_count),
        (ObjectKind::Flag, config.flag_count),
    ];
    for (kind, count) in side_kinds {
        for _ in 0..count {
            match place_with_retries(
                kind,
                Anchor::Field,
                &side_rects,
                PLACEMENT_ATTEMPTS,
                config,
                rng,
            ) {
                Ok(pos) => {
                    let obj = EnvironmentObject::new(kind, pos, config);
                    side_rects.push(obj.bounds());
                    objects.push(obj);
                }
                Err(e) => log::warn!("{} - skipping", e),
            }
        }
    }

    for _ in 0..config.barrier_count {
        push_unchecked(&mut objects, ObjectKind::Barrier, config, rng);
    }

    for _ in 0..config.person_slots {
        if rng.random_bool(config.person_chance.clamp(0.0, 1.0)) {
            push_unchecked(&mut objects, ObjectKind::Person, config, rng);
        }
    }

    log::debug!("Placed {} scenery objects", objects.len());
    objects
}

fn push_unchecked<R: Rng>(
    objects: &mut Vec<EnvironmentObject>,
    kind: ObjectKind,
    config: &Config,
    rng: &mut R,
) {
    let pos = Vec2::new(
        candidate_x(kind, config, rng),
        candidate_y(Anchor::Field, kind.size(config).y, config, rng),
    );
    objects.push(EnvironmentObject::new(kind, pos, config));
}

/// Recycle `objects[index]` to just above the viewport.
///
/// Roadside objects avoid the other roadside objects; when no clear spot is
/// found the last candidate is used anyway so the scenery keeps flowing.
pub fn respawn<R: Rng>(
    objects: &mut [EnvironmentObject],
    index: usize,
    config: &Config,
    rng: &mut R,
) {
    let kind = objects[index].kind;

    let others: Vec<Rect> = if kind.rule().overlap_checked {
        objects
            .iter()
            .enumerate()
            .filter(|(i, o)| *i != index && o.kind.is_side_group())
            .map(|(_, o)| o.bounds())
            .collect()
    } else {
        Vec::new()
    };

    let pos = match place_with_retries(
        kind,
        Anchor::AboveViewport,
        &others,
        PLACEMENT_ATTEMPTS,
        config,
        rng,
    ) {
        Ok(pos) => pos,
        Err(e) => {
            log::warn!("{} - placing anyway", e);
            let size = kind.size(config);
            Vec2::new(e.last.x, candidate_y(Anchor::AboveViewport, size.y, config, rng))
        }
    };

    log::trace!("Recycled {} to ({}, {})", kind.as_str(), pos.x, pos.y);
    objects[index].pos = pos;
}
