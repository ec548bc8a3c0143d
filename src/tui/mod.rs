// TUI module for the interactive panel
pub mod colors;
pub mod input;

// Re-exports
pub use colors::*;
pub use input::{handle_key_event, KeyAction};

use crate::cooldown;
use crate::error::Result;
use crate::store::Profile;
use crate::worker::{PickState, PickSummary, PickWorker};
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, List, ListItem, ListState, Paragraph},
    Frame, Terminal,
};
use std::{io, time::Duration};

/// UI view state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewState {
    /// Main root-list view
    Browsing,
    /// Help overlay visible
    Help,
}

/// Everything the panel renders from
pub struct PanelState {
    pub profile: Profile,
    pub root_ids: Vec<String>,
    pub selected: usize,
    pub status: String,
}

impl PanelState {
    pub fn new(profile: Profile) -> Self {
        let root_ids: Vec<String> = profile.roots.keys().cloned().collect();
        let selected = profile
            .last_selected
            .as_ref()
            .and_then(|id| root_ids.iter().position(|r| r == id))
            .unwrap_or(0);
        Self {
            profile,
            root_ids,
            selected,
            status: String::from("Enter opens a random file, ? shows help"),
        }
    }

    /// Swaps in a freshly loaded profile, keeping the highlight stable
    pub fn refresh(&mut self, profile: Profile) {
        let current = self.selected_root().map(str::to_string);
        self.profile = profile;
        self.root_ids = self.profile.roots.keys().cloned().collect();
        self.selected = current
            .and_then(|id| self.root_ids.iter().position(|r| *r == id))
            .unwrap_or_else(|| self.selected.min(self.root_ids.len().saturating_sub(1)));
    }

    pub fn next(&mut self) {
        if self.selected + 1 < self.root_ids.len() {
            self.selected += 1;
        }
    }

    pub fn previous(&mut self) {
        if self.selected > 0 {
            self.selected -= 1;
        }
    }

    pub fn selected_root(&self) -> Option<&str> {
        self.root_ids.get(self.selected).map(String::as_str)
    }
}

/// Status line text for a finished pick
pub fn status_for(summary: &PickSummary) -> String {
    let mut status = match &summary.file_name {
        Some(file) => format!("Opening {}/{}", summary.folder_name, file),
        None => format!("No media files in {}", summary.folder_name),
    };
    if summary.cooldown_notice {
        status = format!("All folders on cooldown, {}", lowercase_first(&status));
    }
    if let Some(note) = &summary.launch_note {
        status.push_str(" (");
        status.push_str(note);
        status.push(')');
    }
    status
}

fn lowercase_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

/// Runs the interactive panel until the user quits.
pub fn run() -> Result<()> {
    let profile = Profile::load()?;
    let mut state = PanelState::new(profile);
    let mut worker = PickWorker::new();

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_loop(&mut terminal, &mut state, &mut worker);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_loop<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    state: &mut PanelState,
    worker: &mut PickWorker,
) -> Result<()> {
    let mut view_state = ViewState::Browsing;

    loop {
        // Pull in a finished pick before drawing
        if let Some(done) = worker.take_result() {
            match done {
                PickState::Finished(summary) => {
                    state.status = status_for(&summary);
                    // The worker saved cooldown changes; pick them up
                    if let Ok(profile) = Profile::load() {
                        state.refresh(profile);
                    }
                }
                PickState::Failed(message) => state.status = message,
                _ => {}
            }
        }

        terminal.draw(|frame| {
            render(frame, state, worker.is_busy());
            if view_state == ViewState::Help {
                render_help_overlay(frame);
            }
        })?;

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if view_state == ViewState::Help {
                    // Any key closes help
                    view_state = ViewState::Browsing;
                    continue;
                }

                match handle_key_event(key) {
                    KeyAction::Quit => break,
                    KeyAction::Next => state.next(),
                    KeyAction::Previous => state.previous(),
                    KeyAction::Pick => fire_pick(state, worker)?,
                    KeyAction::ToggleComic => toggle_comic(state)?,
                    KeyAction::Help => view_state = ViewState::Help,
                    KeyAction::None => {}
                }
            }
        }
    }

    Ok(())
}

fn fire_pick(state: &mut PanelState, worker: &mut PickWorker) -> Result<()> {
    let Some(root_id) = state.selected_root().map(str::to_string) else {
        state.status = "No roots configured. Add one with 'mshuf add <path>'.".to_string();
        return Ok(());
    };

    if worker.is_busy() {
        state.status = "Still picking, hold on".to_string();
        return Ok(());
    }

    // Remember the choice for the next bare invocation
    state.profile.select(&root_id)?;
    state.profile.save()?;

    if worker.request(&root_id) {
        state.status = format!("Picking from {}", state.profile.display_name(&root_id));
    } else {
        state.status = "Still picking, hold on".to_string();
    }
    Ok(())
}

fn toggle_comic(state: &mut PanelState) -> Result<()> {
    let Some(root_id) = state.selected_root().map(str::to_string) else {
        return Ok(());
    };
    let enabled = !state.profile.record(&root_id)?.comic_mode;
    state.profile.set_comic_mode(&root_id, enabled)?;
    state.profile.save()?;
    state.status = format!(
        "Comic mode {} for {}",
        if enabled { "on" } else { "off" },
        state.profile.display_name(&root_id)
    );
    Ok(())
}

/// Renders the panel
pub fn render(frame: &mut Frame, state: &PanelState, busy: bool) {
    let list_height = state.profile.settings.panel_rows.saturating_add(2);
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),        // Header
            Constraint::Max(list_height), // Root list
            Constraint::Min(0),           // Spacer
            Constraint::Length(3),        // Status
        ])
        .split(frame.area());

    render_header(frame, chunks[0], state);
    render_roots(frame, chunks[1], state);
    render_status(frame, chunks[3], state, busy);
}

fn render_header(frame: &mut Frame, area: Rect, state: &PanelState) {
    let title = Line::from(vec![
        Span::styled(
            " mshuf ",
            Style::default()
                .fg(ACCENT_HIGHLIGHT)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("{} root(s)", state.root_ids.len()),
            Style::default().fg(TEXT_SECONDARY),
        ),
    ]);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded);
    let paragraph = Paragraph::new(title).block(block);
    frame.render_widget(paragraph, area);
}

fn render_roots(frame: &mut Frame, area: Rect, state: &PanelState) {
    let block = Block::default()
        .title(" Roots ")
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded);

    if state.root_ids.is_empty() {
        let empty = Paragraph::new(Line::from(Span::styled(
            "Nothing here yet. Run 'mshuf add <path>' first.",
            Style::default().fg(TEXT_SECONDARY),
        )))
        .alignment(Alignment::Center)
        .block(block);
        frame.render_widget(empty, area);
        return;
    }

    let now_ms = cooldown::now_millis();
    let items: Vec<ListItem> = state
        .root_ids
        .iter()
        .map(|id| {
            let record = state.profile.roots.get(id);
            let mut spans = vec![Span::styled(
                state.profile.display_name(id),
                Style::default().fg(TEXT_PRIMARY),
            )];
            if let Some(record) = record {
                if record.comic_mode {
                    spans.push(Span::styled(
                        "  [comic]",
                        Style::default().fg(ACCENT_SECONDARY),
                    ));
                }
                if !record.excluded.is_empty() {
                    spans.push(Span::styled(
                        format!("  ({} excluded)", record.excluded.len()),
                        Style::default().fg(TEXT_SECONDARY),
                    ));
                }
                let cooling = cooldown::cooling_count(&state.profile, id, now_ms);
                if cooling > 0 {
                    spans.push(Span::styled(
                        format!("  ({cooling} cooling down)"),
                        Style::default().fg(ACCENT_PRIMARY),
                    ));
                }
            }
            spans.push(Span::styled(
                format!("  {id}"),
                Style::default().fg(TEXT_SECONDARY),
            ));
            ListItem::new(Line::from(spans))
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(
            Style::default()
                .fg(ACCENT_HIGHLIGHT)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");

    let mut list_state = ListState::default();
    list_state.select(Some(state.selected));
    frame.render_stateful_widget(list, area, &mut list_state);
}

fn render_status(frame: &mut Frame, area: Rect, state: &PanelState, busy: bool) {
    let text = if busy {
        format!("{} ...", state.status)
    } else {
        state.status.clone()
    };
    let style = if busy {
        Style::default().fg(ACCENT_PRIMARY)
    } else {
        Style::default().fg(TEXT_PRIMARY)
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded);
    let paragraph = Paragraph::new(Line::from(Span::styled(text, style))).block(block);
    frame.render_widget(paragraph, area);
}

/// Renders the help overlay
pub fn render_help_overlay(frame: &mut Frame) {
    let area = frame.area();
    let help_area = centered_rect(50, 60, area);

    // Clear background
    frame.render_widget(Clear, help_area);

    let block = Block::default()
        .title(" Help ")
        .title_alignment(Alignment::Center)
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(ACCENT_HIGHLIGHT))
        .style(Style::default().bg(BG_DARK));

    let inner = block.inner(help_area);
    frame.render_widget(block, help_area);

    let key = |k: &str, what: &str| {
        Line::from(vec![
            Span::styled(format!("  {k:<12}"), Style::default().fg(ACCENT_SECONDARY)),
            Span::raw(what.to_string()),
        ])
    };

    let help_lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "Keyboard Shortcuts",
            Style::default()
                .fg(ACCENT_HIGHLIGHT)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        key("Enter/Space", "Open a random file from the root"),
        key("Up/Down j/k", "Move between roots"),
        key("c", "Toggle comic mode"),
        key("?", "This overlay"),
        key("q/Esc", "Quit"),
        Line::from(""),
        Line::from(Span::styled(
            "Press any key to close",
            Style::default().fg(TEXT_SECONDARY),
        )),
    ];

    let paragraph = Paragraph::new(help_lines).style(Style::default().fg(TEXT_PRIMARY));
    frame.render_widget(paragraph, inner);
}

/// Centers a rect of the given percentage size inside `r`
fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
