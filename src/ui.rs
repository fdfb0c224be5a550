use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::Span,
    widgets::{Block, Borders},
    Frame,
};
use tui_dispatch::{EventContext, EventKind, EventRoutingState, HandlerResponse, RenderContext};
use tui_dispatch_components::{
    BaseStyle, BorderStyle, Padding, StatusBar, StatusBarHint, StatusBarItem, StatusBarProps,
    StatusBarSection, StatusBarStyle,
};

use crate::action::Action;
use crate::components::{
    format_name, CatalogView, CatalogViewProps, Component, DetailOverlay, DetailOverlayProps,
    LandingView, LandingViewProps,
};
use crate::state::{AppState, View};
use crate::theme::{ACCENT_GOLD, ACCENT_TEAL, BG_BASE, BG_PANEL, TEXT_DIM, TEXT_MAIN};

#[derive(tui_dispatch::ComponentId, Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum DexComponentId {
    Landing,
    Catalog,
    Overlay,
}

#[derive(tui_dispatch::BindingContext, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DexContext {
    Landing,
    Catalog,
    Overlay,
}

impl EventRoutingState<DexComponentId, DexContext> for AppState {
    fn focused(&self) -> Option<DexComponentId> {
        if self.overlay_open() {
            return Some(DexComponentId::Overlay);
        }
        match self.view {
            View::Landing => Some(DexComponentId::Landing),
            View::Catalog => Some(DexComponentId::Catalog),
        }
    }

    fn modal(&self) -> Option<DexComponentId> {
        if self.overlay_open() {
            Some(DexComponentId::Overlay)
        } else {
            None
        }
    }

    fn binding_context(&self, id: DexComponentId) -> DexContext {
        match id {
            DexComponentId::Landing => DexContext::Landing,
            DexComponentId::Catalog => DexContext::Catalog,
            DexComponentId::Overlay => DexContext::Overlay,
        }
    }

    fn default_context(&self) -> DexContext {
        DexContext::Landing
    }
}

pub struct DexUi {
    landing: LandingView,
    catalog: CatalogView,
    overlay: DetailOverlay,
    status_bar: StatusBar,
}

impl Default for DexUi {
    fn default() -> Self {
        Self::new()
    }
}

impl DexUi {
    pub fn new() -> Self {
        Self {
            landing: LandingView::new(),
            catalog: CatalogView::new(),
            overlay: DetailOverlay::new(),
            status_bar: StatusBar::new(),
        }
    }

    pub fn render(
        &mut self,
        frame: &mut Frame,
        area: Rect,
        state: &AppState,
        _render_ctx: RenderContext,
        event_ctx: &mut EventContext<DexComponentId>,
    ) {
        frame.render_widget(Block::default().style(Style::default().bg(BG_BASE)), area);
        let [body, footer] =
            Layout::vertical([Constraint::Min(5), Constraint::Length(3)]).areas(area);

        match state.view {
            View::Landing => {
                event_ctx.set_component_area(DexComponentId::Landing, body);
                event_ctx.component_areas.remove(&DexComponentId::Catalog);
                let props = LandingViewProps {
                    landing: &state.landing,
                    is_focused: true,
                };
                self.landing.render(frame, body, props);
            }
            View::Catalog => {
                event_ctx.set_component_area(DexComponentId::Catalog, body);
                event_ctx.component_areas.remove(&DexComponentId::Landing);
                let props = CatalogViewProps {
                    catalog: &state.catalog,
                    is_focused: !state.overlay_open(),
                };
                self.catalog.render(frame, body, props);
            }
        }

        render_footer(frame, footer, state, &mut self.status_bar);

        if let Some(record) = state.catalog.detail.as_ref().filter(|_| state.overlay_open()) {
            event_ctx.set_component_area(DexComponentId::Overlay, area);
            let props = DetailOverlayProps {
                record,
                sprite: state.catalog.detail_sprite(),
                sprite_loading: state.catalog.sprite_loading,
                table: &state.catalog.stat_table,
                export: &state.catalog.export,
                is_focused: true,
            };
            self.overlay.render(frame, area, props);
        } else {
            event_ctx.component_areas.remove(&DexComponentId::Overlay);
        }
    }

    pub fn handle_landing_event(
        &mut self,
        event: &EventKind,
        state: &AppState,
    ) -> HandlerResponse<Action> {
        let props = LandingViewProps {
            landing: &state.landing,
            is_focused: state.view == View::Landing,
        };
        handler_response(self.landing.handle_event(event, props).into_iter().collect())
    }

    pub fn handle_catalog_event(
        &mut self,
        event: &EventKind,
        state: &AppState,
    ) -> HandlerResponse<Action> {
        let props = CatalogViewProps {
            catalog: &state.catalog,
            is_focused: state.view == View::Catalog && !state.overlay_open(),
        };
        handler_response(self.catalog.handle_event(event, props).into_iter().collect())
    }

    pub fn handle_overlay_event(
        &mut self,
        event: &EventKind,
        state: &AppState,
    ) -> HandlerResponse<Action> {
        let Some(record) = state.catalog.detail.as_ref() else {
            return HandlerResponse::ignored();
        };
        let props = DetailOverlayProps {
            record,
            sprite: state.catalog.detail_sprite(),
            sprite_loading: state.catalog.sprite_loading,
            table: &state.catalog.stat_table,
            export: &state.catalog.export,
            is_focused: state.overlay_open(),
        };
        handler_response(self.overlay.handle_event(event, props).into_iter().collect())
    }
}

fn handler_response(actions: Vec<Action>) -> HandlerResponse<Action> {
    if actions.is_empty() {
        HandlerResponse::ignored()
    } else {
        HandlerResponse {
            actions,
            consumed: true,
            needs_render: false,
        }
    }
}

fn render_footer(frame: &mut Frame, area: Rect, state: &AppState, status_bar: &mut StatusBar) {
    let status = state
        .message
        .clone()
        .unwrap_or_else(|| status_text(state));
    let status_span = Span::styled(status.as_str(), Style::default().fg(ACCENT_GOLD));
    let status_items = [StatusBarItem::span(status_span)];
    let (left_hints, center_hints) = status_hints(state);

    let style = StatusBarStyle {
        base: BaseStyle {
            border: Some(BorderStyle {
                borders: Borders::ALL,
                style: Style::default().fg(TEXT_DIM),
                focused_style: Some(Style::default().fg(ACCENT_TEAL)),
            }),
            padding: Padding::xy(1, 0),
            bg: Some(BG_PANEL),
            fg: Some(TEXT_MAIN),
        },
        text: Style::default().fg(TEXT_DIM),
        hint_key: Style::default()
            .fg(ACCENT_TEAL)
            .add_modifier(Modifier::BOLD),
        hint_label: Style::default().fg(TEXT_DIM),
        separator: Style::default().fg(TEXT_DIM),
    };

    let props = StatusBarProps {
        left: StatusBarSection::hints(&left_hints).with_separator("  "),
        center: StatusBarSection::hints(&center_hints).with_separator("  "),
        right: StatusBarSection::items(&status_items).with_separator("  "),
        style,
        is_focused: false,
    };
    Component::<Action>::render(status_bar, frame, area, props);
}

fn status_text(state: &AppState) -> String {
    let catalog = &state.catalog;
    match state.view {
        View::Landing if state.landing.ready => "Ready!".to_string(),
        View::Landing => String::new(),
        View::Catalog if catalog.is_loading() => "Loading pokedex...".to_string(),
        View::Catalog => match catalog.pending_name.as_deref() {
            Some(name) => format!("Loading {}...", format_name(name)),
            None => format!("{} pokemon", catalog.list().len()),
        },
    }
}

fn status_hints(state: &AppState) -> (Vec<StatusBarHint<'static>>, Vec<StatusBarHint<'static>>) {
    let quit = vec![StatusBarHint::new("Ctrl+C", "Quit")];
    if state.overlay_open() {
        let left = vec![
            StatusBarHint::new("s", "Sort"),
            StatusBarHint::new("h/l", "Page"),
            StatusBarHint::new("d", "PDF"),
            StatusBarHint::new("Esc", "Close"),
        ];
        return (left, quit);
    }
    let left = match state.view {
        View::Landing if state.landing.ready => vec![StatusBarHint::new("Enter", "Pokedex")],
        View::Landing => vec![StatusBarHint::new("type", "Ready!")],
        View::Catalog if state.catalog.search.active => vec![
            StatusBarHint::new("Enter", "Apply"),
            StatusBarHint::new("Esc", "Cancel"),
            StatusBarHint::new("Bksp", "Delete"),
        ],
        View::Catalog => vec![
            StatusBarHint::new("j/k", "Move"),
            StatusBarHint::new("Enter", "Open"),
            StatusBarHint::new("/", "Search"),
            StatusBarHint::new("Esc", "Back"),
        ],
    };
    (left, quit)
}
