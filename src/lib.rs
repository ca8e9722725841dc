//! SkyScan AI analysis core.
//!
//! This crate owns everything between an inspection scenario's prompt and a
//! rendered report: the structural contract imposed on the external
//! generative model, the request/response client, and the small amount of
//! timeline math that maps returned event timestamps onto live playback.
//!
//! # Architecture
//!
//! 1. **Schema Definition**: the exact response shape the model must
//!    return, sent with every request and enforced again on the reply.
//! 2. **Analysis Client**: prompt assembly, the schema-constrained model
//!    call, and classification of every failure into one boundary error.
//! 3. **Playback Synchronizer**: which detection boxes are visible at a
//!    given playback position.
//! 4. **Timecode Parser**: `MM:SS` event timestamps to comparable seconds.
//!
//! # Module Structure
//!
//! - `schema`: response-shape constraint and strict payload validation
//! - `gemini`: external-service client, shared handle, entry point
//! - `timecode` / `overlay`: timestamp parsing and overlay visibility
//! - `scenarios` / `report`: the scenario catalog and report segmentation
//! - `config` / `render`: runtime configuration and CLI text output

use serde::{Deserialize, Serialize};

pub mod config;
pub mod error;
pub mod gemini;
pub mod overlay;
pub mod render;
pub mod report;
pub mod scenarios;
pub mod schema;
pub mod timecode;

pub use error::AnalysisError;
pub use gemini::{generate_analysis_report, GeminiClient, Transport, TransportReply};
pub use overlay::{visible_boxes, OverlayBox, OverlaySettings};
pub use report::{segment_report, ReportBlock};
pub use scenarios::Scenario;
pub use timecode::parse_timestamp;

// -------------------- Severity --------------------

/// Severity tag carried by every detection event.
///
/// Closed vocabulary: consumers key icons, timeline styling, and overlay
/// tinting off this tag and nothing else.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Alert,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Alert => "alert",
        }
    }
}

// -------------------- Bounding Boxes --------------------

/// Normalized detection rectangle: `x`/`y` are the top-left corner, all
/// four values are fractions of frame width/height in [0, 1].
///
/// Values originate from model text and are untrusted. `x + width <= 1`
/// and `y + height <= 1` are expected but not guaranteed on the wire, so
/// rendering paths go through [`BoundingBox::clamped`] first.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl BoundingBox {
    /// Clamp the rectangle into the unit frame.
    ///
    /// Returns `None` when nothing renderable remains: non-finite input, or
    /// zero area once the corner and extents are pulled back in range.
    pub fn clamped(&self) -> Option<BoundingBox> {
        if !(self.x.is_finite()
            && self.y.is_finite()
            && self.width.is_finite()
            && self.height.is_finite())
        {
            return None;
        }
        let x = self.x.clamp(0.0, 1.0);
        let y = self.y.clamp(0.0, 1.0);
        let width = self.width.clamp(0.0, 1.0).min(1.0 - x);
        let height = self.height.clamp(0.0, 1.0).min(1.0 - y);
        if width <= 0.0 || height <= 0.0 {
            return None;
        }
        Some(BoundingBox {
            x,
            y,
            width,
            height,
        })
    }
}

// -------------------- Events and Metrics --------------------

/// One observation on the source video's timeline.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DetectionEvent {
    /// Position in the video as `MM:SS` text (untrusted; see `timecode`).
    pub time: String,
    pub description: String,
    #[serde(rename = "type")]
    pub severity: Severity,
    /// Present only when the model localized the detection in-frame.
    /// Narrative-only events carry no box and never reach the overlay.
    #[serde(rename = "box", default, skip_serializing_if = "Option::is_none")]
    pub bounds: Option<BoundingBox>,
}

/// Named scalar reported by the model. The contract fixes no units or
/// range; dashboards render values as percentages.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Metric {
    pub name: String,
    pub value: f64,
}

/// Fully validated output of one analysis invocation. Immutable once
/// constructed; a new invocation produces a fresh value, never a merge.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub report: String,
    pub metrics: Vec<Metric>,
    pub events: Vec<DetectionEvent>,
}
