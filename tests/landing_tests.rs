//! Landing view gate: only the exact sentinel unlocks navigation.

use tui_dispatch::testing::*;
use tui_dispatch::{assert_emitted, NumericComponentId};
use pokedex::{
    action::Action,
    components::{Component, LandingView, LandingViewProps},
    effect::Effect,
    reducer::reducer,
    state::{AppState, View},
};

#[test]
fn near_misses_keep_warning_and_block_navigation() {
    let mut harness = EffectStoreTestHarness::new(AppState::default(), reducer);

    for attempt in ["ready!", "Ready", "Ready! ", " Ready!", "READY!"] {
        harness.dispatch_collect(Action::LandingInputChange(attempt.into()));
        harness.assert_state(|s| !s.landing.ready);
    }

    harness.dispatch_collect(Action::LandingNavigate);
    harness.assert_state(|s| s.view == View::Landing);
    harness.drain_effects().effects_empty();

    let mut view = LandingView::new();
    let output = harness.render_plain(70, 24, |frame, area, state| {
        let props = LandingViewProps {
            landing: &state.landing,
            is_focused: true,
        };
        view.render(frame, area, props);
    });
    assert!(output.contains("I am not ready yet!"));
}

#[test]
fn ready_latches_and_survives_later_edits() {
    let mut harness = EffectStoreTestHarness::new(AppState::default(), reducer);

    harness.dispatch_collect(Action::LandingInputChange("Ready!".into()));
    harness.assert_state(|s| s.landing.ready && s.landing.text == "Ready!");

    harness.dispatch_collect(Action::LandingInputChange("Ready".into()));
    harness.dispatch_collect(Action::LandingInputChange(String::new()));
    harness.assert_state(|s| s.landing.ready);
    harness.assert_state(|s| s.landing.input.is_empty());

    let mut view = LandingView::new();
    let output = harness.render_plain(70, 24, |frame, area, state| {
        let props = LandingViewProps {
            landing: &state.landing,
            is_focused: true,
        };
        view.render(frame, area, props);
    });
    assert!(!output.contains("I am not ready yet!"));
}

#[test]
fn navigation_mounts_catalog_with_delayed_fetch() {
    let mut harness = EffectStoreTestHarness::new(AppState::default(), reducer);
    harness.dispatch_collect(Action::LandingInputChange("Ready!".into()));
    harness.dispatch_collect(Action::LandingNavigate);

    harness.assert_state(|s| s.view == View::Catalog);
    harness.assert_state(|s| s.catalog.is_loading());

    let effects = harness.drain_effects();
    effects.effects_count(1);
    effects.effects_first_matches(|e| {
        matches!(
            e,
            Effect::LoadCatalog { url, delay_ms: 1000 }
                if url == "https://pokeapi.co/api/v2/pokemon"
        )
    });
}

#[test]
fn typing_routes_through_text_input() {
    let mut harness = TestHarness::<AppState, Action>::default();
    let mut view = LandingView::new();

    let actions = harness.send_keys::<NumericComponentId, _, _>("r", |state, event| {
        let props = LandingViewProps {
            landing: &state.landing,
            is_focused: true,
        };
        view.handle_event(&event.kind, props)
            .into_iter()
            .collect::<Vec<_>>()
    });

    assert_emitted!(actions, Action::LandingInputChange(_));
}

#[test]
fn unfocused_landing_ignores_keys() {
    let mut harness = TestHarness::<AppState, Action>::default();
    let mut view = LandingView::new();

    let actions = harness.send_keys::<NumericComponentId, _, _>("a b", |state, event| {
        let props = LandingViewProps {
            landing: &state.landing,
            is_focused: false,
        };
        view.handle_event(&event.kind, props)
            .into_iter()
            .collect::<Vec<_>>()
    });

    actions.assert_empty();
}
