//! Pointer interaction with chart elements.
//!
//! Every interactive element implements [`PointerHandler`]. The chart session
//! routes events to elements through [`Target`]s, so the state machines can be
//! driven by any surface (SVG page, terminal UI, tests).

use samplingviz_stats::histogram::HistogramBin;

pub const DEFAULT_FILL: &str = "steelblue";
pub const HIGHLIGHT_FILL: &str = "red";
pub const MEAN_BUTTON_FILL: &str = "gray";
pub const MEAN_BUTTON_ACTIVE_FILL: &str = "#c45149";
pub const RESET_BUTTON_FILL: &str = "#e3732d";

pub const SHOW_MEAN_LABEL: &str = "Show true mean";
pub const HIDE_MEAN_LABEL: &str = "Hide true mean";
pub const RESET_LABEL: &str = "Reset plot";

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum PointerEvent {
    Enter,
    Leave,
    Click,
}

/// Identifies an interactive element of a chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Target {
    Bin(usize),
    MeanToggle,
    Reset,
}

/// Handlers for the pointer events an element reacts to.
pub trait PointerHandler {
    fn on_enter(&mut self);
    fn on_leave(&mut self);
    fn on_click(&mut self);

    fn handle(&mut self, event: PointerEvent) {
        match event {
            PointerEvent::Enter => self.on_enter(),
            PointerEvent::Leave => self.on_leave(),
            PointerEvent::Click => self.on_click(),
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum BinState {
    #[default]
    Default,
    Hovered,
    Locked,
}

impl BinState {
    /// Hovered and locked bins are both drawn highlighted and count as selected.
    #[must_use]
    pub fn is_active(self) -> bool {
        !self.is_default()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cursor {
    Default,
    Pointer,
}

impl Cursor {
    /// Value of the SVG/CSS `cursor` property.
    #[must_use]
    pub fn as_css(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Pointer => "pointer",
        }
    }
}

/// Visual attributes of a bar, derived from its [`BinState`] alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BarStyle {
    pub fill: &'static str,
    pub show_count: bool,
    pub cursor: Cursor,
}

/// A rendered histogram bar together with its data and interaction state.
#[derive(Debug, Clone, PartialEq)]
pub struct BinBar {
    pub index: usize,
    pub bin: HistogramBin,
    state: BinState,
}

impl BinBar {
    #[must_use]
    pub fn new(index: usize, bin: HistogramBin) -> Self {
        Self {
            index,
            bin,
            state: BinState::Default,
        }
    }

    #[must_use]
    pub fn state(&self) -> BinState {
        self.state
    }

    #[must_use]
    pub fn is_selected(&self) -> bool {
        self.state.is_active()
    }

    #[must_use]
    pub fn style(&self) -> BarStyle {
        let active = self.state.is_active();
        BarStyle {
            fill: if active { HIGHLIGHT_FILL } else { DEFAULT_FILL },
            show_count: active,
            cursor: if active { Cursor::Pointer } else { Cursor::Default },
        }
    }

    /// Drops the lock without touching the hover state. Used by reset before
    /// synthesizing a leave.
    pub fn unlock(&mut self) {
        if self.state.is_locked() {
            self.state = BinState::Hovered;
        }
    }
}

impl PointerHandler for BinBar {
    fn on_enter(&mut self) {
        if self.state.is_default() {
            self.state = BinState::Hovered;
        }
    }

    fn on_leave(&mut self) {
        // Locked bars ignore leave
        if self.state.is_hovered() {
            self.state = BinState::Default;
        }
    }

    fn on_click(&mut self) {
        if self.state.is_locked() {
            self.state = BinState::Default;
        } else {
            self.on_enter();
            self.state = BinState::Locked;
        }
        tracing::debug!(bin = self.index, state = ?self.state, "bin clicked");
    }
}

/// The "Show true mean" button and the mean line it controls.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct MeanToggle {
    shown: bool,
    hovered: bool,
}

impl MeanToggle {
    #[must_use]
    pub fn is_shown(&self) -> bool {
        self.shown
    }

    #[must_use]
    pub fn label(&self) -> &'static str {
        if self.shown { HIDE_MEAN_LABEL } else { SHOW_MEAN_LABEL }
    }

    #[must_use]
    pub fn fill(&self) -> &'static str {
        if self.shown {
            MEAN_BUTTON_ACTIVE_FILL
        } else {
            MEAN_BUTTON_FILL
        }
    }

    #[must_use]
    pub fn cursor(&self) -> Cursor {
        if self.hovered { Cursor::Pointer } else { Cursor::Default }
    }

    pub fn hide(&mut self) {
        self.shown = false;
    }
}

impl PointerHandler for MeanToggle {
    fn on_enter(&mut self) {
        self.hovered = true;
    }

    fn on_leave(&mut self) {
        self.hovered = false;
    }

    fn on_click(&mut self) {
        self.shown = !self.shown;
        tracing::debug!(shown = self.shown, "mean overlay toggled");
    }
}
