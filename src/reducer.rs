use tui_dispatch::DispatchResult;

use crate::action::Action;
use crate::effect::Effect;
use crate::export::{export_path, ExportJob};
use crate::state::{AppState, CatalogState, ExportStatus, LandingState, View, MOUNT_DELAY_MS};

pub fn reducer(state: &mut AppState, action: Action) -> DispatchResult<Effect> {
    match action {
        Action::Init => {
            state.message = None;
            if state.view == View::Catalog {
                return mount_catalog(state);
            }
            DispatchResult::changed()
        }

        Action::LandingInputChange(value) => {
            if state.view != View::Landing || !state.landing.input_changed(value) {
                return DispatchResult::unchanged();
            }
            DispatchResult::changed()
        }

        Action::LandingNavigate => {
            if state.view != View::Landing || !state.landing.ready {
                return DispatchResult::unchanged();
            }
            state.view = View::Catalog;
            mount_catalog(state)
        }

        Action::CatalogDidLoad(entries) => {
            if state.view != View::Catalog || !state.catalog.list_loaded(entries) {
                return DispatchResult::unchanged();
            }
            state.message = None;
            DispatchResult::changed()
        }

        Action::CatalogDidError(error) => {
            if state.view != View::Catalog || !state.catalog.list_failed(error.clone()) {
                return DispatchResult::unchanged();
            }
            state.message = Some(format!("Pokedex error: {error}"));
            DispatchResult::changed()
        }

        Action::CatalogHover(row) => {
            if !list_interactive(state) || !state.catalog.set_hovered(row) {
                return DispatchResult::unchanged();
            }
            DispatchResult::changed()
        }

        Action::CatalogHoverMove(delta) => {
            if !list_interactive(state) {
                return DispatchResult::unchanged();
            }
            let current = state.catalog.hovered.unwrap_or(0) as i64;
            let next = (current + delta as i64).max(0) as usize;
            if !state.catalog.set_hovered(next) {
                return DispatchResult::unchanged();
            }
            DispatchResult::changed()
        }

        Action::CatalogLeave => {
            if state.view != View::Catalog {
                return DispatchResult::unchanged();
            }
            state.view = View::Landing;
            state.landing = LandingState::default();
            state.catalog = CatalogState::default();
            state.message = None;
            DispatchResult::changed_with(Effect::CancelCatalogTasks)
        }

        Action::SearchStart => {
            if !list_interactive(state) {
                return DispatchResult::unchanged();
            }
            state.catalog.search.active = true;
            state.catalog.search.query.clear();
            state.catalog.rebuild_filtered();
            DispatchResult::changed()
        }

        Action::SearchCancel => {
            let search = &state.catalog.search;
            if !search.active && search.query.is_empty() {
                return DispatchResult::unchanged();
            }
            state.catalog.search.active = false;
            state.catalog.search.query.clear();
            state.catalog.rebuild_filtered();
            DispatchResult::changed()
        }

        Action::SearchSubmit => {
            if !state.catalog.search.active {
                return DispatchResult::unchanged();
            }
            state.catalog.search.active = false;
            state.catalog.rebuild_filtered();
            DispatchResult::changed()
        }

        Action::SearchInput(ch) => {
            if !state.catalog.search.active {
                return DispatchResult::unchanged();
            }
            state.catalog.search.query.push(ch);
            state.catalog.rebuild_filtered();
            DispatchResult::changed()
        }

        Action::SearchBackspace => {
            if !state.catalog.search.active {
                return DispatchResult::unchanged();
            }
            state.catalog.search.query.pop();
            state.catalog.rebuild_filtered();
            DispatchResult::changed()
        }

        Action::DetailSelect(row) => {
            if state.view != View::Catalog || state.overlay_open() {
                return DispatchResult::unchanged();
            }
            let Some((seq, url)) = state.catalog.request_detail(row) else {
                return DispatchResult::unchanged();
            };
            state.message = None;
            DispatchResult::changed_with(Effect::LoadDetail { seq, url })
        }

        Action::DetailDidLoad { seq, record } => {
            if state.view != View::Catalog || !state.catalog.detail_selected(seq, record) {
                return DispatchResult::unchanged();
            }
            match sprite_follow_up(state) {
                Some(effect) => DispatchResult::changed_with(effect),
                None => DispatchResult::changed(),
            }
        }

        Action::DetailDidError { seq, error } => {
            if !state.catalog.detail_failed(seq) {
                return DispatchResult::unchanged();
            }
            state.message = Some(format!("Pokemon error: {error}"));
            DispatchResult::changed()
        }

        Action::SpriteDidLoad { name, sprite } => {
            if is_current_detail(state, &name) {
                state.catalog.sprite_loading = false;
            }
            state.catalog.sprites.insert(name, sprite);
            DispatchResult::changed()
        }

        Action::SpriteDidError { name, error } => {
            if !is_current_detail(state, &name) {
                return DispatchResult::unchanged();
            }
            state.catalog.sprite_loading = false;
            state.message = Some(format!("Sprite error: {error}"));
            DispatchResult::changed()
        }

        Action::OverlayDismiss => {
            if !state.catalog.overlay_dismissed() {
                return DispatchResult::unchanged();
            }
            DispatchResult::changed()
        }

        Action::StatSortToggle => {
            if state.catalog.detail.is_none() {
                return DispatchResult::unchanged();
            }
            state.catalog.stat_table.toggle_sort();
            DispatchResult::changed()
        }

        Action::StatPageNext => {
            let Some(len) = state.catalog.detail.as_ref().map(|d| d.stats.len()) else {
                return DispatchResult::unchanged();
            };
            if !state.catalog.stat_table.next_page(len) {
                return DispatchResult::unchanged();
            }
            DispatchResult::changed()
        }

        Action::StatPagePrev => {
            if state.catalog.detail.is_none() || !state.catalog.stat_table.prev_page() {
                return DispatchResult::unchanged();
            }
            DispatchResult::changed()
        }

        Action::ExportRequest => {
            let catalog = &state.catalog;
            let Some(record) = catalog.detail.clone() else {
                return DispatchResult::unchanged();
            };
            if catalog.export == ExportStatus::Exporting {
                return DispatchResult::unchanged();
            }
            let job = ExportJob {
                path: export_path(&state.export_dir, &record.name),
                sprite: catalog.sprites.get(&record.name).cloned(),
                table: catalog.stat_table.clone(),
                record,
            };
            state.catalog.export = ExportStatus::Exporting;
            DispatchResult::changed_with(Effect::ExportPdf(job))
        }

        Action::ExportDidSave(path) => {
            if state.view != View::Catalog {
                return DispatchResult::unchanged();
            }
            if state.catalog.export == ExportStatus::Exporting {
                state.catalog.export = ExportStatus::Saved(path.clone());
            }
            state.message = Some(format!("Saved {path}"));
            DispatchResult::changed()
        }

        Action::ExportDidError(error) => {
            if state.view != View::Catalog {
                return DispatchResult::unchanged();
            }
            if state.catalog.export == ExportStatus::Exporting {
                state.catalog.export = ExportStatus::Failed(error.clone());
            }
            state.message = Some(format!("Export error: {error}"));
            DispatchResult::changed()
        }

        Action::UiRender => DispatchResult::changed(),

        Action::UiTerminalResize(width, height) => {
            if state.terminal_size != (width, height) {
                state.terminal_size = (width, height);
                DispatchResult::changed()
            } else {
                DispatchResult::unchanged()
            }
        }

        Action::Tick => {
            state.tick = state.tick.wrapping_add(1);
            let busy = state.view == View::Catalog
                && (state.catalog.is_loading() || state.catalog.pending_detail.is_some());
            if !busy {
                return DispatchResult::unchanged();
            }
            state.catalog.spinner_frame = state.catalog.spinner_frame.wrapping_add(1);
            DispatchResult::changed()
        }

        Action::Quit => DispatchResult::unchanged(),
    }
}

fn mount_catalog(state: &mut AppState) -> DispatchResult<Effect> {
    state.catalog = CatalogState::mounted();
    state.message = None;
    DispatchResult::changed_with(Effect::LoadCatalog {
        url: state.catalog_url.clone(),
        delay_ms: MOUNT_DELAY_MS,
    })
}

fn list_interactive(state: &AppState) -> bool {
    state.view == View::Catalog && state.catalog.entries.is_loaded() && !state.overlay_open()
}

fn is_current_detail(state: &AppState, name: &str) -> bool {
    state
        .catalog
        .detail
        .as_ref()
        .is_some_and(|detail| detail.name == name)
}

fn sprite_follow_up(state: &mut AppState) -> Option<Effect> {
    let detail = state.catalog.detail.as_ref()?;
    if state.catalog.sprites.contains_key(&detail.name) {
        return None;
    }
    let url = detail.image_url.clone()?;
    let name = detail.name.clone();
    state.catalog.sprite_loading = true;
    Some(Effect::LoadSprite { name, url })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{CatalogEntry, DetailRecord, StatRow};

    fn catalog_state() -> AppState {
        let mut state = AppState::new(View::Catalog, "/tmp/dex");
        state.catalog = CatalogState::mounted();
        state.catalog.list_loaded(vec![
            CatalogEntry {
                name: "bulbasaur".into(),
                detail_url: "https://pokeapi.co/api/v2/pokemon/1/".into(),
            },
            CatalogEntry {
                name: "charmander".into(),
                detail_url: "https://pokeapi.co/api/v2/pokemon/4/".into(),
            },
        ]);
        state
    }

    fn record(name: &str) -> DetailRecord {
        DetailRecord {
            name: name.into(),
            image_url: Some(format!("https://img/{name}.png")),
            stats: vec![StatRow {
                key: 0,
                stat_name: "hp".into(),
                base_value: 39,
            }],
        }
    }

    #[test]
    fn navigate_ignored_until_ready() {
        let mut state = AppState::default();
        let result = reducer(&mut state, Action::LandingNavigate);
        assert!(!result.changed);
        assert_eq!(state.view, View::Landing);

        reducer(&mut state, Action::LandingInputChange("Ready!".into()));
        let result = reducer(&mut state, Action::LandingNavigate);
        assert!(result.changed);
        assert_eq!(state.view, View::Catalog);
        assert!(state.catalog.is_loading());
        assert!(matches!(
            result.effects.as_slice(),
            [Effect::LoadCatalog { delay_ms: 1000, .. }]
        ));
    }

    #[test]
    fn late_list_after_leave_is_ignored() {
        let mut state = catalog_state();
        state.catalog = CatalogState::mounted();
        let result = reducer(&mut state, Action::CatalogLeave);
        assert_eq!(result.effects, vec![Effect::CancelCatalogTasks]);

        let result = reducer(&mut state, Action::CatalogDidLoad(Vec::new()));
        assert!(!result.changed);
        assert_eq!(state.view, View::Landing);
        assert!(!state.catalog.entries.is_loaded());
    }

    #[test]
    fn detail_load_requests_sprite_once() {
        let mut state = catalog_state();
        let result = reducer(&mut state, Action::DetailSelect(1));
        let seq = state.catalog.detail_seq;
        assert_eq!(
            result.effects,
            vec![Effect::LoadDetail {
                seq,
                url: "https://pokeapi.co/api/v2/pokemon/4/".into(),
            }]
        );

        let result = reducer(
            &mut state,
            Action::DetailDidLoad {
                seq,
                record: record("charmander"),
            },
        );
        assert!(state.catalog.sprite_loading);
        assert!(matches!(
            result.effects.as_slice(),
            [Effect::LoadSprite { name, .. }] if name == "charmander"
        ));
    }

    #[test]
    fn detail_select_ignored_while_overlay_open() {
        let mut state = catalog_state();
        reducer(&mut state, Action::DetailSelect(0));
        let seq = state.catalog.detail_seq;
        reducer(
            &mut state,
            Action::DetailDidLoad {
                seq,
                record: record("bulbasaur"),
            },
        );
        let result = reducer(&mut state, Action::DetailSelect(1));
        assert!(!result.changed);
        assert!(result.effects.is_empty());
    }

    #[test]
    fn export_builds_path_from_dir_and_name() {
        let mut state = catalog_state();
        reducer(&mut state, Action::DetailSelect(0));
        let seq = state.catalog.detail_seq;
        reducer(
            &mut state,
            Action::DetailDidLoad {
                seq,
                record: record("bulbasaur"),
            },
        );

        let result = reducer(&mut state, Action::ExportRequest);
        match result.effects.as_slice() {
            [Effect::ExportPdf(job)] => {
                assert!(job.path.ends_with("bulbasaur.pdf"));
                assert!(job.path.starts_with("/tmp/dex"));
            }
            other => panic!("unexpected effects: {other:?}"),
        }
        assert_eq!(state.catalog.export, ExportStatus::Exporting);

        let again = reducer(&mut state, Action::ExportRequest);
        assert!(!again.changed);
    }

    #[test]
    fn export_finishing_after_leave_is_ignored() {
        let mut state = catalog_state();
        reducer(&mut state, Action::DetailSelect(0));
        let seq = state.catalog.detail_seq;
        reducer(
            &mut state,
            Action::DetailDidLoad {
                seq,
                record: record("bulbasaur"),
            },
        );
        reducer(&mut state, Action::ExportRequest);
        reducer(&mut state, Action::CatalogLeave);

        let saved = reducer(
            &mut state,
            Action::ExportDidSave("/tmp/dex/bulbasaur.pdf".into()),
        );
        assert!(!saved.changed);
        let failed = reducer(&mut state, Action::ExportDidError("disk full".into()));
        assert!(!failed.changed);
        assert_eq!(state.message, None);
        assert_eq!(state.catalog.export, ExportStatus::Idle);
    }

    #[test]
    fn tick_only_changes_while_busy() {
        let mut state = catalog_state();
        assert!(!reducer(&mut state, Action::Tick).changed);
        state.catalog = CatalogState::mounted();
        assert!(reducer(&mut state, Action::Tick).changed);
        assert_eq!(state.catalog.spinner_frame, 1);
    }

    #[test]
    fn hover_move_clamps_to_list() {
        let mut state = catalog_state();
        assert!(!reducer(&mut state, Action::CatalogHoverMove(-3)).changed);
        assert!(reducer(&mut state, Action::CatalogHoverMove(5)).changed);
        assert_eq!(state.catalog.hovered, Some(1));
    }
}
