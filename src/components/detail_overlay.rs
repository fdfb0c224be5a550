use crossterm::event::{KeyCode, MouseButton, MouseEventKind};
use ratatui::{
    layout::{Alignment, Constraint, Layout, Position, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Borders, Paragraph},
    Frame,
};
use tui_dispatch::EventKind;
use tui_dispatch_components::{
    centered_rect, BaseStyle, BorderStyle, Modal, ModalBehavior, ModalProps, ModalStyle, Padding,
};

use super::stat_panels::{render_overlay_content, OverlayContent};
use super::Component;
use crate::action::Action;
use crate::sprite::SpriteData;
use crate::state::{DetailRecord, ExportStatus, StatTable};
use crate::theme::{
    ACCENT_GOLD, ACCENT_TEAL, BG_OVERLAY, HOVER_YELLOW, TEXT_DIM, TEXT_MAIN, WARNING_RED,
};

const BUTTON_LABEL: &str = "[ Download as PDF ]";

pub struct DetailOverlay {
    modal: Modal,
    modal_area: Rect,
    button_area: Option<Rect>,
}

pub struct DetailOverlayProps<'a> {
    pub record: &'a DetailRecord,
    pub sprite: Option<&'a SpriteData>,
    pub sprite_loading: bool,
    pub table: &'a StatTable,
    pub export: &'a ExportStatus,
    pub is_focused: bool,
}

impl Default for DetailOverlay {
    fn default() -> Self {
        Self {
            modal: Modal::new(),
            modal_area: Rect::default(),
            button_area: None,
        }
    }
}

impl DetailOverlay {
    pub fn new() -> Self {
        Self::default()
    }

    fn button_hit(&self, column: u16, row: u16) -> bool {
        self.button_area
            .is_some_and(|area| area.contains(Position::new(column, row)))
    }
}

impl Component<Action> for DetailOverlay {
    type Props<'a> = DetailOverlayProps<'a>;

    fn handle_event(
        &mut self,
        event: &EventKind,
        props: Self::Props<'_>,
    ) -> impl IntoIterator<Item = Action> {
        if !props.is_focused {
            return Vec::new();
        }

        if let EventKind::Mouse(mouse) = event {
            if matches!(mouse.kind, MouseEventKind::Down(MouseButton::Left))
                && self.button_hit(mouse.column, mouse.row)
            {
                return vec![Action::ExportRequest];
            }
        }

        let mut noop_render = |_frame: &mut Frame, _area: Rect| {};
        let modal_props = ModalProps {
            is_open: true,
            is_focused: true,
            area: self.modal_area,
            style: overlay_modal_style(),
            behavior: ModalBehavior {
                close_on_esc: true,
                close_on_backdrop: true,
            },
            on_close: dismiss_overlay,
            render_content: &mut noop_render,
        };
        let modal_actions: Vec<_> = self
            .modal
            .handle_event(event, modal_props)
            .into_iter()
            .collect();
        if !modal_actions.is_empty() {
            return modal_actions;
        }

        let EventKind::Key(key) = event else {
            return Vec::new();
        };
        match key.code {
            KeyCode::Char('s') => vec![Action::StatSortToggle],
            KeyCode::Left | KeyCode::Char('h') => vec![Action::StatPagePrev],
            KeyCode::Right | KeyCode::Char('l') => vec![Action::StatPageNext],
            KeyCode::Char('d') | KeyCode::Enter => vec![Action::ExportRequest],
            _ => Vec::new(),
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let width = area.width.saturating_sub(4).min(72);
        let height = area.height.saturating_sub(2).min(40);
        let modal_area = centered_rect(width, height, area);
        self.modal_area = modal_area;

        let DetailOverlay {
            modal, button_area, ..
        } = self;
        let mut render_content = |frame: &mut Frame, content_area: Rect| {
            let [body, footer] =
                Layout::vertical([Constraint::Min(10), Constraint::Length(2)]).areas(content_area);
            let content = OverlayContent {
                record: props.record,
                sprite: props.sprite,
                sprite_loading: props.sprite_loading,
                table: props.table,
            };
            render_overlay_content(frame, body, &content);
            *button_area = Some(render_export_bar(frame, footer, props.export));
        };

        modal.render(
            frame,
            area,
            ModalProps {
                is_open: true,
                is_focused: props.is_focused,
                area: modal_area,
                style: overlay_modal_style(),
                behavior: ModalBehavior {
                    close_on_esc: true,
                    close_on_backdrop: true,
                },
                on_close: dismiss_overlay,
                render_content: &mut render_content,
            },
        );
    }
}

/// Draws the export button and status line; returns the button's clickable rect.
fn render_export_bar(frame: &mut Frame, area: Rect, export: &ExportStatus) -> Rect {
    let [button_row, status_row] =
        Layout::vertical([Constraint::Length(1), Constraint::Length(1)]).areas(area);

    let label_width = (BUTTON_LABEL.chars().count() as u16).min(button_row.width);
    let button = Rect {
        width: label_width,
        ..button_row
    };
    let button_style = if *export == ExportStatus::Exporting {
        Style::default().fg(TEXT_DIM)
    } else {
        Style::default()
            .fg(HOVER_YELLOW)
            .add_modifier(Modifier::BOLD)
    };
    frame.render_widget(Paragraph::new(Span::styled(BUTTON_LABEL, button_style)), button);

    let hints = Line::from(vec![
        Span::styled("s", Style::default().fg(ACCENT_TEAL)),
        Span::styled(" sort  ", Style::default().fg(TEXT_DIM)),
        Span::styled("←/→", Style::default().fg(ACCENT_TEAL)),
        Span::styled(" page  ", Style::default().fg(TEXT_DIM)),
        Span::styled("Esc", Style::default().fg(ACCENT_TEAL)),
        Span::styled(" close", Style::default().fg(TEXT_DIM)),
    ]);
    let hint_area = Rect {
        x: button.x + label_width,
        width: button_row.width.saturating_sub(label_width),
        ..button_row
    };
    frame.render_widget(Paragraph::new(hints).alignment(Alignment::Right), hint_area);

    let status = match export {
        ExportStatus::Idle => Span::raw(""),
        ExportStatus::Exporting => {
            Span::styled("Exporting...", Style::default().fg(ACCENT_GOLD))
        }
        ExportStatus::Saved(path) => {
            Span::styled(format!("Saved {path}"), Style::default().fg(ACCENT_TEAL))
        }
        ExportStatus::Failed(error) => Span::styled(
            format!("Export failed: {error}"),
            Style::default().fg(WARNING_RED),
        ),
    };
    frame.render_widget(Paragraph::new(Line::from(status)), status_row);
    button
}

fn overlay_modal_style() -> ModalStyle {
    ModalStyle {
        dim_factor: 0.6,
        base: BaseStyle {
            border: Some(BorderStyle {
                borders: Borders::ALL,
                style: Style::default().fg(TEXT_DIM),
                focused_style: Some(Style::default().fg(ACCENT_GOLD)),
            }),
            padding: Padding::xy(1, 0),
            bg: Some(BG_OVERLAY),
            fg: Some(TEXT_MAIN),
        },
    }
}

fn dismiss_overlay() -> Action {
    Action::OverlayDismiss
}
