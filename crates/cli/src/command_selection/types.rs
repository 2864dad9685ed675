//! Type definitions for the built-in picker.
//!
//! This module defines the state the terminal picker keeps between key
//! presses: which row is highlighted, which slice of the list is visible and
//! what the user has typed so far.

/// Direction to cycle through candidates in the picker.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CycleDirection {
    Up,
    Down,
}

/// What a key press asks the picker to do.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PickerAction {
    /// Keep going with an updated state
    Update(UiState),
    /// Move the highlight
    Move(CycleDirection),
    /// Accept the highlighted candidate
    Accept,
    /// Leave without choosing
    Cancel,
    /// Nothing to do
    Ignore,
}

/// State for the UI viewport.
///
/// Tracks the visible portion of the candidate list when there are more
/// candidates than can fit on screen.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct ViewportState {
    pub offset: usize,
    pub height: u16,
    pub width: u16,
}

/// Complete UI state for the picker.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct UiState {
    /// Position of the highlighted row within the filtered candidates
    pub selected_index: usize,
    /// Viewport state for scrolling
    pub viewport: ViewportState,
    /// Current filter text
    pub filter_text: String,
}

impl UiState {
    #[must_use]
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            selected_index: 0,
            viewport: ViewportState {
                offset: 0,
                // Header and filter line take two rows
                height: height.saturating_sub(2),
                width,
            },
            filter_text: String::new(),
        }
    }
}
