use serde::{Deserialize, Serialize};

use crate::shared_str::SharedStr;
use crate::theme::ThemeToken;
use crate::types::{Point, Rect};

/// A single, stateless render instruction.
///
/// Core views emit a `Vec<RenderCommand>` for a layout; the egui canvas,
/// the SVG exporter and JS hosts behind the wasm bridge all consume the same
/// list in order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum RenderCommand {
    /// Filled rectangle, optionally labelled. `entry_id` marks the rect as a
    /// hit target for the experience entry it represents.
    DrawRect {
        rect: Rect,
        color: ThemeToken,
        border_color: Option<ThemeToken>,
        label: Option<SharedStr>,
        entry_id: Option<SharedStr>,
    },

    /// Filled circle (timeline axis markers, tree joints).
    DrawCircle {
        center: Point,
        radius: f64,
        color: ThemeToken,
    },

    DrawText {
        position: Point,
        text: SharedStr,
        color: ThemeToken,
        font_size: f64,
        align: TextAlign,
    },

    DrawLine {
        from: Point,
        to: Point,
        color: ThemeToken,
        width: f64,
    },

    /// Restrict subsequent drawing to a rectangular region.
    SetClip { rect: Rect },

    ClearClip,

    /// Push an affine transform applied to every command until the matching
    /// `PopTransform`.
    PushTransform { translate: Point, scale: Point },

    PopTransform,

    /// Begin a logical group (a whole view, or one root's subtree).
    BeginGroup {
        id: SharedStr,
        label: Option<SharedStr>,
    },

    EndGroup,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextAlign {
    Left,
    Center,
    Right,
}

impl RenderCommand {
    /// The entry id carried by a hit-testable rect, if any.
    pub fn entry_id(&self) -> Option<&SharedStr> {
        match self {
            Self::DrawRect { entry_id, .. } => entry_id.as_ref(),
            _ => None,
        }
    }
}
