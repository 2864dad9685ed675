use std::fmt::Display;
use std::io::{stderr, Stderr, Write};
use std::time::Duration;

use crossterm::cursor::MoveTo;
use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::style::Color::{DarkBlue, DarkGreen, Red, Reset, Yellow};
use crossterm::style::{Attribute, Print, SetAttribute, SetBackgroundColor, SetForegroundColor};
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::{cursor, event, queue, terminal, ExecutableCommand};
use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;

use super::types::CycleDirection::{Down, Up};
use super::types::{CycleDirection, PickerAction, UiState, ViewportState};
use super::Selector;
use mita_core::error::Result;

/// In-process fuzzy picker drawn on stderr.
///
/// Stdout is left untouched so the chosen command can still be captured by
/// the calling shell.
pub struct TerminalSelector;

struct RawModeGuard;

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        // Disable raw mode on drop
        let _ = disable_raw_mode();
        let mut stderr = stderr();
        let _ = stderr.execute(cursor::Show);
        let _ = stderr.execute(LeaveAlternateScreen);
    }
}

impl Selector for TerminalSelector {
    fn select_one(&self, prompt: &str, candidates: &[String]) -> Result<Option<String>> {
        if candidates.is_empty() {
            return Ok(None);
        }

        let mut stderr = stderr();
        stderr.execute(EnterAlternateScreen)?;
        enable_raw_mode()?;
        let _raw_mode_guard = RawModeGuard; // When this goes out of scope, raw mode is disabled
        stderr.execute(cursor::Hide)?;

        let (width, height) = terminal::size()?;
        let mut ui_state = UiState::new(width, height);
        let mut matching = filter_candidates(candidates, &ui_state.filter_text);
        let mut should_redraw = true;

        loop {
            if should_redraw {
                redraw_ui(&mut stderr, prompt, &ui_state, candidates, &matching)?;
                should_redraw = false;
            }

            if !event::poll(Duration::from_millis(500))? {
                continue;
            }

            let new_ui_state = match event::read()? {
                Event::Key(key_event) if key_event.kind == KeyEventKind::Press => {
                    match handle_key_event(key_event, &ui_state) {
                        PickerAction::Accept => {
                            if let Some(&index) = matching.get(ui_state.selected_index) {
                                return Ok(Some(candidates[index].clone()));
                            }
                            None
                        }
                        PickerAction::Cancel => return Ok(None),
                        PickerAction::Move(direction) => Some(move_selected_index(
                            &ui_state,
                            matching.len(),
                            direction,
                        )),
                        PickerAction::Update(state) => Some(state),
                        PickerAction::Ignore => None,
                    }
                }
                Event::Resize(width, height) => {
                    Some(handle_resize(width, height, &ui_state, matching.len()))
                }
                _ => None,
            };

            if let Some(mut new_ui_state) = new_ui_state {
                if new_ui_state.filter_text != ui_state.filter_text {
                    matching = filter_candidates(candidates, &new_ui_state.filter_text);
                    new_ui_state.selected_index = 0;
                    new_ui_state.viewport.offset = 0;
                }

                should_redraw = new_ui_state != ui_state;
                ui_state = new_ui_state;
            }
        }
    }
}

fn redraw_ui(
    stderr: &mut Stderr,
    prompt: &str,
    ui_state: &UiState,
    candidates: &[String],
    matching: &[usize],
) -> Result<()> {
    queue!(stderr, Clear(ClearType::All), MoveTo(0, 0))?;

    print_header(stderr, prompt, ui_state, matching.len())?;

    if matching.is_empty() {
        queue!(
            stderr,
            MoveTo(0, 1),
            SetForegroundColor(Red),
            Print("No matches!"),
            SetAttribute(Attribute::Reset),
        )?;
    } else {
        print_candidates_with_selection(stderr, ui_state, candidates, matching)?;
    }

    queue!(
        stderr,
        MoveTo(0, ui_state.viewport.height + 1),
        SetAttribute(Attribute::Bold),
        Print(format!("> {}", ui_state.filter_text)),
        SetAttribute(Attribute::Reset)
    )?;

    stderr.flush()?;
    Ok(())
}

/// Handle keyboard events in the picker
fn handle_key_event(key_event: KeyEvent, ui_state: &UiState) -> PickerAction {
    let control = key_event.modifiers.contains(KeyModifiers::CONTROL);

    match key_event.code {
        KeyCode::Up => PickerAction::Move(Up),
        KeyCode::Down => PickerAction::Move(Down),
        KeyCode::Char('p' | 'k') if control => PickerAction::Move(Up),
        KeyCode::Char('n' | 'j') if control => PickerAction::Move(Down),
        KeyCode::Char('c') if control => PickerAction::Cancel,
        KeyCode::Esc => PickerAction::Cancel,
        KeyCode::Enter => PickerAction::Accept,
        KeyCode::Backspace if !ui_state.filter_text.is_empty() => {
            let mut updated_state = ui_state.clone();
            updated_state.filter_text.pop();
            PickerAction::Update(updated_state)
        }
        KeyCode::Char(c) if !control => {
            let mut updated_state = ui_state.clone();
            updated_state.filter_text.push(c);
            PickerAction::Update(updated_state)
        }
        _ => PickerAction::Ignore,
    }
}

/// Handle window resize events
fn handle_resize(width: u16, height: u16, ui_state: &UiState, matching_count: usize) -> UiState {
    let new_height = height.saturating_sub(2);
    let mut ui_state = ui_state.clone();
    let mut new_viewport = ViewportState {
        width,
        height: new_height,
        offset: ui_state.viewport.offset,
    };

    // If growing taller, try to show more items above current selection
    match new_height.cmp(&ui_state.viewport.height) {
        std::cmp::Ordering::Greater if new_viewport.offset > 0 => {
            let height_increase = new_height - ui_state.viewport.height;
            new_viewport.offset = new_viewport.offset.saturating_sub(height_increase as usize);
        }
        std::cmp::Ordering::Less
            if ui_state.selected_index >= new_viewport.offset + new_height as usize =>
        {
            new_viewport.offset = ui_state
                .selected_index
                .saturating_sub((new_height as usize).saturating_sub(1));

            if new_viewport.offset + new_height as usize > matching_count {
                new_viewport.offset = matching_count.saturating_sub(new_height as usize);
            }
        }
        _ => {}
    }

    ui_state.viewport = new_viewport;
    ui_state
}

/// Print the header for the picker
fn print_header(
    stderr: &mut Stderr,
    prompt: &str,
    ui_state: &UiState,
    matching_count: usize,
) -> Result<()> {
    let left_padding_size = 2usize;
    let left_padding = " ".repeat(left_padding_size);

    let instructions = format!(
        "{prompt}   |   {}/{}   |   <esc>: Cancel",
        pad_to_width_of(
            ui_state.selected_index + usize::from(matching_count > 0),
            matching_count
        ),
        matching_count
    );

    let right_padding = " ".repeat(
        (ui_state.viewport.width as usize)
            .saturating_sub(left_padding_size)
            .saturating_sub(instructions.chars().count()),
    );

    queue!(
        stderr,
        MoveTo(0, 0),
        SetBackgroundColor(DarkGreen),
        Print(left_padding),
        Print(instructions),
        Print(right_padding),
        SetBackgroundColor(Reset),
        SetForegroundColor(Reset),
    )?;

    Ok(())
}

/// Pad a value to match the width of the largest value
fn pad_to_width_of<T: Display>(value: T, max_number: usize) -> String {
    let width = format!("{max_number}").len();
    format!("{:>width$}", value.to_string())
}

/// Print the visible candidates with the selected one highlighted
fn print_candidates_with_selection(
    stderr: &mut Stderr,
    ui_state: &UiState,
    candidates: &[String],
    matching: &[usize],
) -> Result<()> {
    let viewport = &ui_state.viewport;

    let visible = matching
        .iter()
        .enumerate()
        .skip(viewport.offset)
        .take(viewport.height as usize);

    for (row, (position, &index)) in visible.enumerate() {
        let content: String = candidates[index]
            .chars()
            .take(viewport.width as usize)
            .collect();
        let padding = " ".repeat((viewport.width as usize).saturating_sub(content.chars().count()));

        queue!(stderr, MoveTo(0, row as u16 + 1), Clear(ClearType::CurrentLine))?;

        if position == ui_state.selected_index {
            queue!(
                stderr,
                SetAttribute(Attribute::Bold),
                SetBackgroundColor(DarkBlue),
                SetForegroundColor(Yellow),
            )?;
        }

        queue!(
            stderr,
            Print(content),
            Print(padding),
            SetAttribute(Attribute::Reset),
            SetBackgroundColor(Reset),
            SetForegroundColor(Reset),
        )?;
    }

    Ok(())
}

/// Move the selected index in the given direction
fn move_selected_index(
    ui_state: &UiState,
    matching_count: usize,
    direction: CycleDirection,
) -> UiState {
    if matching_count == 0 {
        return ui_state.clone();
    }

    let mut new_index = ui_state.selected_index;
    let mut ui_state = ui_state.clone();
    let visible_rows = ui_state.viewport.height as usize;

    match direction {
        Up => {
            if new_index == 0 {
                new_index = matching_count - 1;
                ui_state.viewport.offset = new_index.saturating_sub(visible_rows.saturating_sub(1));
            } else {
                new_index -= 1;
                if new_index < ui_state.viewport.offset {
                    ui_state.viewport.offset = new_index;
                }
            }
        }
        Down => {
            new_index = (new_index + 1) % matching_count;
            if new_index < ui_state.selected_index {
                ui_state.viewport.offset = 0;
            } else if new_index >= ui_state.viewport.offset + visible_rows {
                ui_state.viewport.offset = (new_index + 1).saturating_sub(visible_rows);
            }
        }
    }

    ui_state.selected_index = new_index;
    ui_state
}

/// Indexes of the candidates matching `filter`, in display order
fn filter_candidates(candidates: &[String], filter: &str) -> Vec<usize> {
    if filter.is_empty() {
        return (0..candidates.len()).collect();
    }

    let matcher = SkimMatcherV2::default();

    candidates
        .iter()
        .enumerate()
        .filter_map(|(i, candidate)| matcher.fuzzy_match(candidate, filter).map(|_| i))
        .collect()
}
