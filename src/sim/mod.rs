//! Deterministic simulation module
//!
//! All gameplay logic lives here. Given the same seed, inputs and clock
//! readings, a session plays out identically:
//! - Seeded RNG only
//! - Stable iteration order (placement order for scenery, spawn order for cars)
//! - No rendering or platform dependencies (audio goes through `AudioSink`)

pub mod collision;
pub mod entity;
pub mod geometry;
pub mod placement;
pub mod state;
pub mod tick;

pub use collision::{CollisionOutcome, detect_collision, resolve_collisions};
pub use entity::{Car, EnvironmentObject, ObjectKind, Steering};
pub use geometry::{Rect, any_overlap, overlaps};
pub use placement::{Anchor, PlacementExhausted, place_with_retries, respawn, setup_environment};
pub use state::GameState;
pub use tick::{Command, TickInput, tick};
