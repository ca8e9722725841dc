//! Overlay visibility computation.
//!
//! Driven by the video player's time updates: given the current playback
//! position and the event list of the active analysis, decide which
//! bounding boxes render right now. This runs on every position update
//! during playback, so it is a single pass over the event list with no
//! allocation beyond the result.

use serde::{Deserialize, Serialize};

use crate::timecode::parse_timestamp;
use crate::{BoundingBox, DetectionEvent};

/// Default seconds a box stays visible after its event's timestamp.
pub const DEFAULT_WINDOW_SECS: f64 = 3.0;

/// Overlay tuning. The model reports a point-in-time timestamp, not a
/// duration, so each box dwells for a constant window after its timestamp.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct OverlaySettings {
    /// Visibility window in seconds. Must be > 0.
    pub window_secs: f64,
}

impl Default for OverlaySettings {
    fn default() -> Self {
        Self {
            window_secs: DEFAULT_WINDOW_SECS,
        }
    }
}

/// One box that renders at the queried position, paired with its source
/// event. `bounds` is already clamped into the unit frame.
#[derive(Clone, Copy, Debug)]
pub struct OverlayBox<'a> {
    pub event: &'a DetectionEvent,
    pub bounds: BoundingBox,
}

/// Events whose boxes are visible at `position_secs`, in event-list order.
///
/// A box renders iff its event's timestamp parses, the position falls in
/// the half-open window `[t, t + window)`, and the clamped box still has
/// area. The window is half-open on purpose: at exactly `t` the box
/// appears, at exactly `t + window` it is gone, so adjacent windows meet
/// without flicker. Events without a box never participate, and a
/// malformed timestamp means the event is simply never visible.
pub fn visible_boxes<'a>(
    events: &'a [DetectionEvent],
    position_secs: f64,
    settings: &OverlaySettings,
) -> Vec<OverlayBox<'a>> {
    events
        .iter()
        .filter_map(|event| {
            let bounds = event.bounds.as_ref()?.clamped()?;
            let t = parse_timestamp(&event.time)? as f64;
            if position_secs >= t && position_secs < t + settings.window_secs {
                Some(OverlayBox { event, bounds })
            } else {
                None
            }
        })
        .collect()
}
