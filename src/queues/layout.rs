/*!
 * Slot Layout
 * Derives target slot positions for every queued process
 *
 * The core owns a logical canvas; the rendering collaborator maps it to real
 * pixels and animates processes toward their targets. Layout is recomputed
 * from full queue contents after every mutation, never incrementally.
 */

use super::{QueueKind, QueueSet};
use crate::process::Vec2;

/// Logical canvas dimensions
pub const CANVAS_WIDTH: f32 = 1080.0;
const MARGIN_TOP: f32 = 150.0;
const QUEUE_BAND_HEIGHT: f32 = 380.0;
const QUEUE_SPACING: f32 = 20.0;

const SLOTS_PER_ROW: usize = 3;
const SLOT_SPACING: f32 = 15.0;
const SLOT_WIDTH: f32 = (CANVAS_WIDTH - (SLOTS_PER_ROW as f32 + 1.0) * SLOT_SPACING) / SLOTS_PER_ROW as f32;
const SLOT_HEIGHT: f32 = 160.0;
// Vertical room reserved for the queue title and capacity readout
const HEADER_HEIGHT: f32 = 90.0;

/// Top edge of a queue's band on the canvas. Bands are stacked in the order
/// the player sees them: new, running, ready, blocked.
fn band_top(kind: QueueKind) -> f32 {
    let index = match kind {
        QueueKind::New => 0.0,
        QueueKind::Running => 1.0,
        QueueKind::Ready => 2.0,
        QueueKind::Blocked => 3.0,
    };
    MARGIN_TOP + index * (QUEUE_BAND_HEIGHT + QUEUE_SPACING)
}

/// Center of slot `index` inside the band for `kind`
pub fn slot_center(kind: QueueKind, index: usize) -> Vec2 {
    let row = index / SLOTS_PER_ROW;
    let col = index % SLOTS_PER_ROW;
    let x = SLOT_SPACING + col as f32 * (SLOT_WIDTH + SLOT_SPACING) + SLOT_WIDTH / 2.0;
    let y = band_top(kind)
        + HEADER_HEIGHT
        + SLOT_SPACING
        + row as f32 * (SLOT_HEIGHT + SLOT_SPACING)
        + SLOT_HEIGHT / 2.0;
    Vec2::new(x, y)
}

/// Reserved center-canvas position where emergency arrivals appear
pub fn emergency_spawn() -> Vec2 {
    Vec2::new(CANVAS_WIDTH / 2.0, band_top(QueueKind::Blocked) - QUEUE_SPACING / 2.0)
}

/// Recompute target slots for every process in every queue from the full
/// queue contents
pub fn assign_targets(queues: &mut QueueSet) {
    for kind in QueueKind::ALL {
        for (index, process) in queues.queue_mut(kind).iter_mut().enumerate() {
            process.set_target(slot_center(kind, index));
        }
    }
}
