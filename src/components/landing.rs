use crossterm::event::{KeyCode, MouseButton, MouseEventKind};
use ratatui::{
    layout::{Alignment, Constraint, Layout, Position, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};
use tui_dispatch::EventKind;
use tui_dispatch_components::{BaseStyle, Padding, TextInput, TextInputProps, TextInputStyle};

use super::{ui_render, Component};
use crate::action::Action;
use crate::state::LandingState;
use crate::theme::{
    ACCENT_GOLD, ACCENT_TEAL, BG_BASE, BG_PANEL, POKEBALL_RED, POKEBALL_WHITE, TEXT_DIM,
    TEXT_MAIN, WARNING_RED,
};

const REQUIREMENT: &str = "Requirement: the pokeball below opens the Pokedex. \
It stays hidden, and the red text stays visible, until the box reads \"Ready!\".";
const PROMPT: &str = "Are you ready to be a pokemon master?";
const NOT_READY: &str = "I am not ready yet!";

const POKEBALL: [(&str, bool); 6] = [
    ("   ▄▄█████▄▄   ", true),
    (" ▄███████████▄ ", true),
    ("█████████████████", true),
    ("▀▀▀▀▀▀▀(●)▀▀▀▀▀▀▀", false),
    (" ▀███████████▀ ", false),
    ("   ▀▀█████▀▀   ", false),
];

pub struct LandingView {
    input: TextInput,
    pokeball_area: Option<Rect>,
}

pub struct LandingViewProps<'a> {
    pub landing: &'a LandingState,
    pub is_focused: bool,
}

impl Default for LandingView {
    fn default() -> Self {
        Self {
            input: TextInput::new(),
            pokeball_area: None,
        }
    }
}

impl LandingView {
    pub fn new() -> Self {
        Self::default()
    }

    fn pokeball_hit(&self, column: u16, row: u16) -> bool {
        self.pokeball_area
            .is_some_and(|area| area.contains(Position::new(column, row)))
    }
}

impl Component<Action> for LandingView {
    type Props<'a> = LandingViewProps<'a>;

    fn handle_event(
        &mut self,
        event: &EventKind,
        props: Self::Props<'_>,
    ) -> impl IntoIterator<Item = Action> {
        if !props.is_focused {
            return Vec::new();
        }

        match event {
            EventKind::Mouse(mouse) => {
                let clicked = matches!(mouse.kind, MouseEventKind::Down(MouseButton::Left));
                if clicked && props.landing.ready && self.pokeball_hit(mouse.column, mouse.row) {
                    return vec![Action::LandingNavigate];
                }
                Vec::new()
            }
            EventKind::Key(key) => {
                if key.code == KeyCode::Esc {
                    return Vec::new();
                }
                let input_props = TextInputProps {
                    value: &props.landing.input,
                    placeholder: "type here",
                    is_focused: true,
                    style: input_style(),
                    on_change: Action::LandingInputChange,
                    on_submit: submit_landing,
                    on_cursor_move: Some(ui_render),
                };
                self.input
                    .handle_event(event, input_props)
                    .into_iter()
                    .collect()
            }
            _ => Vec::new(),
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title("POKEDEX")
            .style(Style::default().bg(BG_BASE).fg(TEXT_MAIN))
            .border_style(Style::default().fg(TEXT_DIM));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let [requirement, _, ball, _, prompt, input, warning, _] = Layout::vertical([
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Length(POKEBALL.len() as u16),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .areas(inner);

        frame.render_widget(
            Paragraph::new(REQUIREMENT)
                .wrap(Wrap { trim: true })
                .alignment(Alignment::Center)
                .style(Style::default().fg(TEXT_MAIN).add_modifier(Modifier::BOLD)),
            requirement,
        );

        if props.landing.ready {
            let width = POKEBALL
                .iter()
                .map(|(row, _)| row.chars().count() as u16)
                .max()
                .unwrap_or(0)
                .min(ball.width);
            let ball_area = Rect {
                x: ball.x + ball.width.saturating_sub(width) / 2,
                width,
                ..ball
            };
            let lines: Vec<Line> = POKEBALL
                .iter()
                .map(|(row, top)| {
                    let color = if *top { POKEBALL_RED } else { POKEBALL_WHITE };
                    Line::from(Span::styled(*row, Style::default().fg(color)))
                })
                .collect();
            frame.render_widget(
                Paragraph::new(lines).alignment(Alignment::Center),
                ball_area,
            );
            self.pokeball_area = Some(ball_area);
        } else {
            self.pokeball_area = None;
        }

        frame.render_widget(
            Paragraph::new(PROMPT)
                .alignment(Alignment::Center)
                .style(Style::default().fg(ACCENT_TEAL)),
            prompt,
        );

        let field = Rect {
            x: input.x + input.width.saturating_sub(32) / 2,
            width: input.width.min(32),
            ..input
        };
        let frame_block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(ACCENT_GOLD));
        let field_inner = frame_block.inner(field);
        frame.render_widget(frame_block, field);
        let input_props = TextInputProps {
            value: &props.landing.input,
            placeholder: "type here",
            is_focused: props.is_focused,
            style: input_style(),
            on_change: Action::LandingInputChange,
            on_submit: submit_landing,
            on_cursor_move: Some(ui_render),
        };
        self.input.render(frame, field_inner, input_props);

        let status = if props.landing.ready {
            Line::from(Span::styled(
                "Click the pokeball or press Enter",
                Style::default().fg(TEXT_DIM),
            ))
        } else {
            Line::from(Span::styled(
                NOT_READY,
                Style::default().fg(WARNING_RED).add_modifier(Modifier::BOLD),
            ))
        };
        frame.render_widget(
            Paragraph::new(status).alignment(Alignment::Center),
            warning,
        );
    }
}

fn input_style() -> TextInputStyle {
    TextInputStyle {
        base: BaseStyle {
            border: None,
            padding: Padding::xy(1, 0),
            bg: Some(BG_PANEL),
            fg: Some(TEXT_MAIN),
        },
        placeholder_style: Some(Style::default().fg(TEXT_DIM)),
        cursor_style: Some(Style::default().bg(ACCENT_GOLD).fg(BG_BASE)),
    }
}

fn submit_landing(_: String) -> Action {
    Action::LandingNavigate
}
