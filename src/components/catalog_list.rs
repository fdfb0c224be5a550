use crossterm::event::{KeyCode, MouseButton, MouseEventKind};
use ratatui::{
    layout::{Alignment, Constraint, Layout, Position, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};
use tui_dispatch::EventKind;

use super::{format_name, Component};
use crate::action::Action;
use crate::state::CatalogState;
use crate::theme::{
    ACCENT_GOLD, ACCENT_TEAL, BG_BASE, BG_PANEL, HOVER_YELLOW, TEXT_DIM, TEXT_MAIN, WARNING_RED,
};

const SPINNER: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];
const WELCOME: &str = "Welcome to pokedex !";

const PLACEHOLDER: [&str; 6] = [
    "Call https://pokeapi.co/api/v2/pokemon and list every pokemon name.",
    "Show a loader while the request is in flight.",
    "Hovering a name turns it yellow.",
    "Clicking a name opens its stats in an overlay.",
    "A search bar above the list filters on every keystroke.",
    "The stat table sorts by base stat and pages three rows at a time.",
];

pub struct CatalogView {
    list_state: ListState,
    list_area: Option<Rect>,
}

pub struct CatalogViewProps<'a> {
    pub catalog: &'a CatalogState,
    pub is_focused: bool,
}

impl Default for CatalogView {
    fn default() -> Self {
        Self {
            list_state: ListState::default(),
            list_area: None,
        }
    }
}

impl CatalogView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Maps a screen position to a row of the filtered list.
    fn row_at(&self, column: u16, row: u16, catalog: &CatalogState) -> Option<usize> {
        let area = self.list_area?;
        if !area.contains(Position::new(column, row)) {
            return None;
        }
        let index = self.list_state.offset() + (row - area.y) as usize;
        (index < catalog.filtered_indices.len()).then_some(index)
    }
}

impl Component<Action> for CatalogView {
    type Props<'a> = CatalogViewProps<'a>;

    fn handle_event(
        &mut self,
        event: &EventKind,
        props: Self::Props<'_>,
    ) -> impl IntoIterator<Item = Action> {
        if !props.is_focused {
            return Vec::new();
        }
        let catalog = props.catalog;

        if catalog.search.active {
            let EventKind::Key(key) = event else {
                return Vec::new();
            };
            return match key.code {
                KeyCode::Esc => vec![Action::SearchCancel],
                KeyCode::Enter => vec![Action::SearchSubmit],
                KeyCode::Backspace => vec![Action::SearchBackspace],
                KeyCode::Char(ch) => vec![Action::SearchInput(ch)],
                _ => Vec::new(),
            };
        }

        match event {
            EventKind::Key(key) => match key.code {
                KeyCode::Esc if !catalog.search.query.is_empty() => vec![Action::SearchCancel],
                KeyCode::Esc => vec![Action::CatalogLeave],
                _ if !catalog.entries.is_loaded() => Vec::new(),
                KeyCode::Up | KeyCode::Char('k') => vec![Action::CatalogHoverMove(-1)],
                KeyCode::Down | KeyCode::Char('j') => vec![Action::CatalogHoverMove(1)],
                KeyCode::PageUp => vec![Action::CatalogHoverMove(-10)],
                KeyCode::PageDown => vec![Action::CatalogHoverMove(10)],
                KeyCode::Char('/') => vec![Action::SearchStart],
                KeyCode::Enter => catalog
                    .hovered
                    .map(|row| vec![Action::DetailSelect(row)])
                    .unwrap_or_default(),
                _ => Vec::new(),
            },
            EventKind::Mouse(mouse) => {
                let Some(row) = self.row_at(mouse.column, mouse.row, catalog) else {
                    return Vec::new();
                };
                match mouse.kind {
                    MouseEventKind::Down(MouseButton::Left) => vec![Action::DetailSelect(row)],
                    MouseEventKind::Moved if catalog.hovered != Some(row) => {
                        vec![Action::CatalogHover(row)]
                    }
                    _ => Vec::new(),
                }
            }
            EventKind::Scroll { delta, .. } if catalog.entries.is_loaded() => {
                vec![Action::CatalogHoverMove((*delta).signum() as i16)]
            }
            _ => Vec::new(),
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let catalog = props.catalog;
        let block = Block::default()
            .borders(Borders::ALL)
            .title("POKEDEX")
            .style(Style::default().bg(BG_BASE).fg(TEXT_MAIN))
            .border_style(if props.is_focused {
                Style::default().fg(ACCENT_TEAL)
            } else {
                Style::default().fg(TEXT_DIM)
            });
        let inner = block.inner(area);
        frame.render_widget(block, area);
        self.list_area = None;

        if catalog.is_loading() || catalog.entries.is_empty() {
            render_spinner(frame, inner, catalog.spinner_frame);
            return;
        }
        if let Some(error) = catalog.entries.error() {
            render_error(frame, inner, error);
            return;
        }

        let show_search = catalog.search.active || !catalog.search.query.is_empty();
        let [header, search, body] = Layout::vertical([
            Constraint::Length(2),
            Constraint::Length(if show_search { 3 } else { 0 }),
            Constraint::Min(1),
        ])
        .areas(inner);

        frame.render_widget(
            Paragraph::new(WELCOME)
                .alignment(Alignment::Center)
                .style(Style::default().fg(ACCENT_GOLD).add_modifier(Modifier::BOLD)),
            header,
        );
        if show_search {
            render_search(frame, search, catalog);
        }

        if catalog.list().is_empty() {
            render_placeholder(frame, body);
            return;
        }
        if catalog.filtered_indices.is_empty() {
            frame.render_widget(
                Paragraph::new(format!("No pokemon match \"{}\"", catalog.search.query))
                    .alignment(Alignment::Center)
                    .style(Style::default().fg(TEXT_DIM)),
                body,
            );
            return;
        }

        let items: Vec<ListItem> = catalog
            .filtered_indices
            .iter()
            .filter_map(|idx| catalog.list().get(*idx))
            .map(|entry| ListItem::new(format_name(&entry.name)))
            .collect();
        let list = List::new(items)
            .style(Style::default().fg(TEXT_MAIN))
            .highlight_style(Style::default().fg(HOVER_YELLOW).add_modifier(Modifier::BOLD))
            .highlight_symbol("▸ ");
        self.list_state.select(catalog.hovered);
        frame.render_stateful_widget(list, body, &mut self.list_state);
        self.list_area = Some(body);
    }
}

fn render_spinner(frame: &mut Frame, area: Rect, spinner_frame: usize) {
    let glyph = SPINNER[spinner_frame % SPINNER.len()];
    let center = Rect {
        y: area.y + area.height / 2,
        height: area.height.min(1),
        ..area
    };
    frame.render_widget(
        Paragraph::new(Span::styled(
            glyph,
            Style::default().fg(ACCENT_TEAL).add_modifier(Modifier::BOLD),
        ))
        .alignment(Alignment::Center),
        center,
    );
}

fn render_error(frame: &mut Frame, area: Rect, error: &str) {
    let lines = vec![
        Line::from(Span::styled(
            "Could not load the pokedex",
            Style::default().fg(WARNING_RED).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(error.to_string(), Style::default().fg(TEXT_DIM))),
        Line::from(""),
        Line::from(Span::styled("Esc to go back", Style::default().fg(TEXT_DIM))),
    ];
    frame.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true }),
        area,
    );
}

fn render_placeholder(frame: &mut Frame, area: Rect) {
    let mut lines = vec![Line::from(Span::styled(
        "Requirement:",
        Style::default().fg(TEXT_MAIN).add_modifier(Modifier::BOLD),
    ))];
    lines.extend(PLACEHOLDER.iter().map(|item| {
        Line::from(vec![
            Span::styled("- ", Style::default().fg(ACCENT_TEAL)),
            Span::styled(*item, Style::default().fg(TEXT_DIM)),
        ])
    }));
    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), area);
}

fn render_search(frame: &mut Frame, area: Rect, catalog: &CatalogState) {
    let query = if catalog.search.active {
        format!("/{}_", catalog.search.query)
    } else {
        format!("/{}", catalog.search.query)
    };
    let count = format!(
        "{} / {}",
        catalog.filtered_indices.len(),
        catalog.list().len()
    );
    let block = Block::default()
        .borders(Borders::ALL)
        .title("SEARCH")
        .title_bottom(Line::from(count).alignment(Alignment::Right))
        .style(Style::default().bg(BG_PANEL))
        .border_style(if catalog.search.active {
            Style::default().fg(ACCENT_GOLD)
        } else {
            Style::default().fg(TEXT_DIM)
        });
    frame.render_widget(
        Paragraph::new(query)
            .style(Style::default().fg(TEXT_MAIN))
            .block(block),
        area,
    );
}
