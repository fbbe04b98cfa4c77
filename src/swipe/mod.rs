//! # Swipe gestures
//!
//! The card controller is a small state machine:
//!
//! ```text
//!            pointer_down              pointer_up (|dx| > threshold)
//!   Idle ───────────────► Dragging ─────────────────────────────► Animating
//!    ▲                       │                                        │
//!    │   pointer_up (short)  │                                        │
//!    ├───────────────────────┘        animation_finished              │
//!    └────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Transitions consume the current [`GestureState`] and return the next one,
//! so they can be tested without a pointer device. [`CardDeck`] wraps the
//! machine together with the cards, the current index, and the transform a
//! renderer should apply to the top card.
//!
//! - [`client`]: HTTP client used by the terminal swiper
//! - [`terminal`]: ratatui front-end (`petmatch swipe`)

pub mod client;
pub mod terminal;

use crate::store::ActionKind;

// ─────────────────────────────────────────────────────────────────────────────
// Geometry
// ─────────────────────────────────────────────────────────────────────────────

/// Pointer position in pixels
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Tunables for gesture recognition
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SwipeSettings {
    /// Horizontal release distance that commits, strictly greater than
    pub threshold_px: f32,
    /// Degrees of rotation per pixel of horizontal drag
    pub rotation_per_px: f32,
    /// Horizontal drag at which opacity reaches zero
    pub fade_distance_px: f32,
    /// Displacement at or below this is still a tap
    pub tap_slop_px: f32,
}

impl Default for SwipeSettings {
    fn default() -> Self {
        Self {
            threshold_px: 100.0,
            rotation_per_px: 0.1,
            fade_distance_px: 300.0,
            tap_slop_px: 5.0,
        }
    }
}

/// Visual transform for the top card
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CardTransform {
    pub offset_x: f32,
    pub rotation_deg: f32,
    /// Always within `[0, 1]`
    pub opacity: f32,
}

impl CardTransform {
    pub const IDENTITY: Self = Self {
        offset_x: 0.0,
        rotation_deg: 0.0,
        opacity: 1.0,
    };

    /// Transform for a horizontal drag of `dx` pixels
    pub fn for_drag(dx: f32, settings: &SwipeSettings) -> Self {
        let opacity = if settings.fade_distance_px > 0.0 {
            1.0 - dx.abs() / settings.fade_distance_px
        } else {
            1.0
        };

        Self {
            offset_x: dx,
            rotation_deg: dx * settings.rotation_per_px,
            opacity: opacity.clamp(0.0, 1.0),
        }
    }

    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }
}

impl Default for CardTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// State machine
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum GestureState {
    #[default]
    Idle,
    Dragging {
        origin: Point,
        current: Point,
        /// Set once the pointer leaves the tap slop; never cleared during the drag
        moved: bool,
    },
    Animating {
        action: ActionKind,
    },
}

/// What a pointer release resolved to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Release {
    /// Past the threshold: the card flies out
    Commit(ActionKind),
    /// Dragged, but not far enough: the card snaps back
    Cancel,
    /// Pointer never moved: open the details view
    Tap,
}

impl GestureState {
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    pub fn is_animating(&self) -> bool {
        matches!(self, Self::Animating { .. })
    }

    /// Start a drag. Ignored unless idle.
    pub fn pointer_down(self, at: Point) -> Self {
        match self {
            Self::Idle => Self::Dragging {
                origin: at,
                current: at,
                moved: false,
            },
            other => other,
        }
    }

    /// Track the pointer. Returns a transform only when the drag is mostly
    /// horizontal; vertical-dominant moves leave the card where it is.
    pub fn pointer_move(self, to: Point, settings: &SwipeSettings) -> (Self, Option<CardTransform>) {
        let Self::Dragging { origin, moved, .. } = self else {
            return (self, None);
        };

        let dx = to.x - origin.x;
        let dy = to.y - origin.y;
        let moved = moved || dx.abs() > settings.tap_slop_px || dy.abs() > settings.tap_slop_px;

        let transform = (dx.abs() > dy.abs()).then(|| CardTransform::for_drag(dx, settings));

        (
            Self::Dragging {
                origin,
                current: to,
                moved,
            },
            transform,
        )
    }

    /// Finish a drag. The release point is folded in as a last move.
    pub fn pointer_up(self, at: Point, settings: &SwipeSettings) -> (Self, Option<Release>) {
        let (state, _) = self.pointer_move(at, settings);
        let Self::Dragging {
            origin,
            current,
            moved,
        } = state
        else {
            return (state, None);
        };

        let dx = current.x - origin.x;
        if dx.abs() > settings.threshold_px {
            let action = if dx > 0.0 {
                ActionKind::Adopt
            } else {
                ActionKind::Reject
            };
            (Self::Animating { action }, Some(Release::Commit(action)))
        } else if moved {
            (Self::Idle, Some(Release::Cancel))
        } else {
            (Self::Idle, Some(Release::Tap))
        }
    }

    /// Button or keyboard decision. Only accepted while idle.
    pub fn commit(self, action: ActionKind) -> (Self, bool) {
        match self {
            Self::Idle => (Self::Animating { action }, true),
            other => (other, false),
        }
    }

    /// Fly-out done. Returns the action that was animating, if any.
    pub fn animation_finished(self) -> (Self, Option<ActionKind>) {
        match self {
            Self::Animating { action } => (Self::Idle, Some(action)),
            other => (other, None),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Keyboard shortcuts
// ─────────────────────────────────────────────────────────────────────────────

/// Decision bound to a key, if any: ←/a reject, →/d/space adopt
pub fn shortcut(key: &str) -> Option<ActionKind> {
    match key {
        "ArrowLeft" | "a" | "A" => Some(ActionKind::Reject),
        "ArrowRight" | "d" | "D" | " " => Some(ActionKind::Adopt),
        _ => None,
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Card deck
// ─────────────────────────────────────────────────────────────────────────────

/// Cards plus the gesture machine driving the top one.
///
/// An empty deck ignores every input.
#[derive(Debug, Clone)]
pub struct CardDeck<T> {
    items: Vec<T>,
    index: usize,
    state: GestureState,
    transform: CardTransform,
    settings: SwipeSettings,
}

impl<T> CardDeck<T> {
    pub fn new(items: Vec<T>, settings: SwipeSettings) -> Self {
        Self {
            items,
            index: 0,
            state: GestureState::Idle,
            transform: CardTransform::IDENTITY,
            settings,
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn current(&self) -> Option<&T> {
        self.items.get(self.index)
    }

    pub fn state(&self) -> GestureState {
        self.state
    }

    pub fn transform(&self) -> CardTransform {
        self.transform
    }

    pub fn settings(&self) -> &SwipeSettings {
        &self.settings
    }

    /// Swap the cards, e.g. after a refetch. Resets to the first card.
    pub fn replace_items(&mut self, items: Vec<T>) {
        self.items = items;
        self.index = 0;
        self.state = GestureState::Idle;
        self.transform = CardTransform::IDENTITY;
    }

    pub fn pointer_down(&mut self, at: Point) {
        if self.is_empty() {
            return;
        }
        self.state = self.state.pointer_down(at);
    }

    pub fn pointer_move(&mut self, to: Point) {
        if self.is_empty() {
            return;
        }
        let (state, transform) = self.state.pointer_move(to, &self.settings);
        self.state = state;
        if let Some(transform) = transform {
            self.transform = transform;
        }
    }

    /// Release the pointer. The transform always resets; a commit then plays
    /// out through [`CardDeck::animation_finished`].
    pub fn pointer_up(&mut self, at: Point) -> Option<Release> {
        if self.is_empty() {
            return None;
        }
        let (state, release) = self.state.pointer_up(at, &self.settings);
        self.state = state;
        if release.is_some() {
            self.transform = CardTransform::IDENTITY;
        }
        release
    }

    /// Button or keyboard decision on the top card
    pub fn commit(&mut self, action: ActionKind) -> bool {
        if self.is_empty() {
            return false;
        }
        let (state, accepted) = self.state.commit(action);
        self.state = state;
        accepted
    }

    /// End the fly-out and advance cyclically. Returns the decision and the
    /// card it applied to.
    pub fn animation_finished(&mut self) -> Option<(ActionKind, &T)> {
        if self.is_empty() {
            return None;
        }
        let (state, action) = self.state.animation_finished();
        self.state = state;
        let action = action?;

        let decided = self.index;
        self.index = (self.index + 1) % self.items.len();
        self.items.get(decided).map(|card| (action, card))
    }
}
