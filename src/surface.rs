//! Rendering surface abstraction.
//!
//! The engine only needs an abstract 2D region with a known height onto
//! which it can create positioned, styled labels, adjust their opacity and
//! animation pace, and remove them. A real frontend implements
//! [`RenderSurface`] over its widget layer; [`HeadlessSurface`] is the
//! windowless implementation used by tests and the demo binary.

use crate::item::Origin;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::time::Duration;

/// Label height in surface units, used for vertical placement.
pub const LABEL_HEIGHT: f32 = 30.0;

/// Opaque id of one on-surface label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SurfaceHandle(pub u64);

/// Visual parameters for one origin class.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabelStyle {
    /// Text color as 0xRRGGBB.
    pub color: u32,
    pub font_size: f32,
    pub bold: bool,
}

impl LabelStyle {
    /// AI commentary is gold and bold; everything else renders white.
    pub fn for_origin(origin: Origin) -> Self {
        match origin {
            Origin::Ai => Self {
                color: 0xFFD700,
                font_size: 18.0,
                bold: true,
            },
            Origin::User | Origin::ServerCommentary => Self {
                color: 0xFFFFFF,
                font_size: 16.0,
                bold: false,
            },
        }
    }
}

/// Everything the surface needs to materialize one label.
#[derive(Debug, Clone)]
pub struct LabelSpec {
    pub text: String,
    pub style: LabelStyle,
    /// Vertical offset from the top of the surface, in surface units.
    pub top: f32,
    /// Scroll animation duration at creation time.
    pub animation: Duration,
}

pub trait RenderSurface {
    /// Height of the drawable region in surface units.
    fn height(&self) -> f32;

    /// Create a label; it stays on the surface until removed.
    fn create_label(&self, spec: &LabelSpec) -> SurfaceHandle;

    /// Set a label's opacity in `[0, 1]`.
    fn set_opacity(&self, handle: SurfaceHandle, opacity: f32);

    /// Change a label's animation pace without restarting the animation.
    fn set_animation_duration(&self, handle: SurfaceHandle, duration: Duration);

    /// Detach a label from the surface. Unknown handles are ignored.
    fn remove_label(&self, handle: SurfaceHandle);
}

/// A label as recorded by [`HeadlessSurface`].
#[derive(Debug, Clone)]
pub struct HeadlessLabel {
    pub text: String,
    pub style: LabelStyle,
    pub top: f32,
    pub animation: Duration,
    pub opacity: f32,
}

/// Surface that draws nothing and records label state for inspection.
#[derive(Debug)]
pub struct HeadlessSurface {
    height: f32,
    labels: RefCell<HashMap<u64, HeadlessLabel>>,
    next_id: Cell<u64>,
    /// Total `remove_label` calls that detached a live label.
    removed: Cell<usize>,
}

impl HeadlessSurface {
    pub fn new(height: f32) -> Self {
        Self {
            height,
            labels: RefCell::new(HashMap::new()),
            next_id: Cell::new(1),
            removed: Cell::new(0),
        }
    }

    pub fn label_count(&self) -> usize {
        self.labels.borrow().len()
    }

    pub fn label(&self, handle: SurfaceHandle) -> Option<HeadlessLabel> {
        self.labels.borrow().get(&handle.0).cloned()
    }

    pub fn labels(&self) -> Vec<HeadlessLabel> {
        self.labels.borrow().values().cloned().collect()
    }

    /// How many labels have been detached over the surface's lifetime.
    pub fn removed_count(&self) -> usize {
        self.removed.get()
    }
}

impl RenderSurface for HeadlessSurface {
    fn height(&self) -> f32 {
        self.height
    }

    fn create_label(&self, spec: &LabelSpec) -> SurfaceHandle {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        tracing::debug!(id, text = %spec.text, top = spec.top, "label created");
        self.labels.borrow_mut().insert(
            id,
            HeadlessLabel {
                text: spec.text.clone(),
                style: spec.style,
                top: spec.top,
                animation: spec.animation,
                opacity: 1.0,
            },
        );
        SurfaceHandle(id)
    }

    fn set_opacity(&self, handle: SurfaceHandle, opacity: f32) {
        if let Some(label) = self.labels.borrow_mut().get_mut(&handle.0) {
            label.opacity = opacity;
        }
    }

    fn set_animation_duration(&self, handle: SurfaceHandle, duration: Duration) {
        if let Some(label) = self.labels.borrow_mut().get_mut(&handle.0) {
            label.animation = duration;
        }
    }

    fn remove_label(&self, handle: SurfaceHandle) {
        if self.labels.borrow_mut().remove(&handle.0).is_some() {
            self.removed.set(self.removed.get() + 1);
            tracing::debug!(id = handle.0, "label removed");
        }
    }
}
