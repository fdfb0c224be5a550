use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tui_dispatch::DataResource;
use tui_dispatch_debug::debug::{ron_string, DebugSection, DebugState};

use crate::api::CATALOG_URL;
use crate::sprite::SpriteData;

/// Exact input that unlocks the catalog link on the landing view.
pub const READY_SENTINEL: &str = "Ready!";
/// Delay between mounting the catalog view and issuing the list request.
pub const MOUNT_DELAY_MS: u64 = 1000;
/// Rows shown per page of the stat table.
pub const STAT_PAGE_SIZE: usize = 3;
/// Value-axis ceiling of the stat chart. Fixed, not derived from the data.
pub const STAT_AXIS_MAX: u32 = 255;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum View {
    #[default]
    Landing,
    Catalog,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LandingState {
    /// Current contents of the text field.
    pub input: String,
    /// Last accepted value; only ever the sentinel.
    pub text: String,
    pub ready: bool,
}

impl LandingState {
    /// Applies an input change. Readiness latches once the sentinel is typed.
    pub fn input_changed(&mut self, value: String) -> bool {
        let mut changed = self.input != value;
        self.input = value;
        if self.input == READY_SENTINEL {
            changed |= !self.ready || self.text != self.input;
            self.text = self.input.clone();
            self.ready = true;
        }
        changed
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchState {
    pub active: bool,
    pub query: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub name: String,
    pub detail_url: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StatRow {
    pub key: usize,
    pub stat_name: String,
    pub base_value: u32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DetailRecord {
    pub name: String,
    pub image_url: Option<String>,
    pub stats: Vec<StatRow>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortOrder {
    #[default]
    Descend,
    Unsorted,
    Ascend,
}

impl SortOrder {
    /// Header click cycle: descend, then off, then ascend.
    pub fn next(self) -> Self {
        match self {
            SortOrder::Descend => SortOrder::Unsorted,
            SortOrder::Unsorted => SortOrder::Ascend,
            SortOrder::Ascend => SortOrder::Descend,
        }
    }

    pub fn indicator(self) -> &'static str {
        match self {
            SortOrder::Descend => "▼",
            SortOrder::Ascend => "▲",
            SortOrder::Unsorted => "-",
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct StatTable {
    pub order: SortOrder,
    pub page: usize,
}

impl StatTable {
    pub fn sorted<'a>(&self, rows: &'a [StatRow]) -> Vec<&'a StatRow> {
        let mut sorted: Vec<&StatRow> = rows.iter().collect();
        match self.order {
            SortOrder::Descend => sorted.sort_by(|a, b| b.base_value.cmp(&a.base_value)),
            SortOrder::Ascend => sorted.sort_by_key(|row| row.base_value),
            SortOrder::Unsorted => {}
        }
        sorted
    }

    pub fn page_count(&self, len: usize) -> usize {
        len.div_ceil(STAT_PAGE_SIZE).max(1)
    }

    pub fn page_rows<'a>(&self, rows: &'a [StatRow]) -> Vec<&'a StatRow> {
        self.sorted(rows)
            .into_iter()
            .skip(self.page * STAT_PAGE_SIZE)
            .take(STAT_PAGE_SIZE)
            .collect()
    }

    pub fn toggle_sort(&mut self) {
        self.order = self.order.next();
        self.page = 0;
    }

    pub fn next_page(&mut self, len: usize) -> bool {
        if self.page + 1 >= self.page_count(len) {
            return false;
        }
        self.page += 1;
        true
    }

    pub fn prev_page(&mut self) -> bool {
        if self.page == 0 {
            return false;
        }
        self.page -= 1;
        true
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub enum ExportStatus {
    #[default]
    Idle,
    Exporting,
    Saved(String),
    Failed(String),
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CatalogState {
    pub entries: DataResource<Vec<CatalogEntry>>,
    pub filtered_indices: Vec<usize>,
    /// Row under the cursor or mouse, as an index into `filtered_indices`.
    pub hovered: Option<usize>,
    pub search: SearchState,

    pub detail: Option<DetailRecord>,
    /// Sequence number of the most recently issued detail request.
    pub detail_seq: u64,
    /// Sequence still allowed to land; cleared by a response or a dismiss.
    pub pending_detail: Option<u64>,
    pub pending_name: Option<String>,
    pub stat_table: StatTable,

    pub sprites: HashMap<String, SpriteData>,
    pub sprite_loading: bool,
    pub export: ExportStatus,
    pub spinner_frame: usize,
}

impl Default for CatalogState {
    fn default() -> Self {
        Self {
            entries: DataResource::Empty,
            filtered_indices: Vec::new(),
            hovered: None,
            search: SearchState::default(),
            detail: None,
            detail_seq: 0,
            pending_detail: None,
            pending_name: None,
            stat_table: StatTable::default(),
            sprites: HashMap::new(),
            sprite_loading: false,
            export: ExportStatus::Idle,
            spinner_frame: 0,
        }
    }
}

impl CatalogState {
    /// Fresh state for a newly mounted view: loading, nothing selected.
    pub fn mounted() -> Self {
        Self {
            entries: DataResource::Loading,
            ..Self::default()
        }
    }

    pub fn is_loading(&self) -> bool {
        self.entries.is_loading()
    }

    pub fn list(&self) -> &[CatalogEntry] {
        self.entries.data().map(Vec::as_slice).unwrap_or(&[])
    }

    /// Stores the fetched list. Ignored unless a load is outstanding.
    pub fn list_loaded(&mut self, entries: Vec<CatalogEntry>) -> bool {
        if !self.entries.is_loading() {
            return false;
        }
        self.entries = DataResource::Loaded(entries);
        self.rebuild_filtered();
        self.hovered = if self.filtered_indices.is_empty() {
            None
        } else {
            Some(0)
        };
        true
    }

    pub fn list_failed(&mut self, error: String) -> bool {
        if !self.entries.is_loading() {
            return false;
        }
        self.entries = DataResource::Failed(error);
        true
    }

    /// Issues a new detail request for a visible row, returning its sequence and URL.
    pub fn request_detail(&mut self, row: usize) -> Option<(u64, String)> {
        let entry = self.entry_at(row)?.clone();
        self.hovered = Some(row);
        self.detail_seq += 1;
        self.pending_detail = Some(self.detail_seq);
        self.pending_name = Some(entry.name);
        Some((self.detail_seq, entry.detail_url))
    }

    /// Opens the overlay with a record if `seq` is the latest outstanding request.
    pub fn detail_selected(&mut self, seq: u64, record: DetailRecord) -> bool {
        if self.pending_detail != Some(seq) {
            return false;
        }
        self.pending_detail = None;
        self.pending_name = None;
        self.detail = Some(record);
        self.stat_table = StatTable::default();
        self.export = ExportStatus::Idle;
        self.sprite_loading = false;
        true
    }

    pub fn detail_failed(&mut self, seq: u64) -> bool {
        if self.pending_detail != Some(seq) {
            return false;
        }
        self.pending_detail = None;
        self.pending_name = None;
        true
    }

    /// Closes the overlay and invalidates any detail request still in flight.
    pub fn overlay_dismissed(&mut self) -> bool {
        if self.detail.is_none() && self.pending_detail.is_none() {
            return false;
        }
        self.detail = None;
        self.pending_detail = None;
        self.pending_name = None;
        self.sprite_loading = false;
        self.stat_table = StatTable::default();
        self.export = ExportStatus::Idle;
        true
    }

    pub fn entry_at(&self, row: usize) -> Option<&CatalogEntry> {
        self.filtered_indices
            .get(row)
            .and_then(|idx| self.list().get(*idx))
    }

    pub fn set_hovered(&mut self, row: usize) -> bool {
        if self.filtered_indices.is_empty() {
            return false;
        }
        let bounded = row.min(self.filtered_indices.len() - 1);
        if self.hovered == Some(bounded) {
            return false;
        }
        self.hovered = Some(bounded);
        true
    }

    pub fn rebuild_filtered(&mut self) {
        let query = self.search.query.trim().to_lowercase();
        self.filtered_indices = self
            .list()
            .iter()
            .enumerate()
            .filter(|(_, entry)| query.is_empty() || entry.name.to_lowercase().contains(&query))
            .map(|(idx, _)| idx)
            .collect();

        self.hovered = match self.hovered {
            _ if self.filtered_indices.is_empty() => None,
            Some(row) if row < self.filtered_indices.len() => Some(row),
            _ => Some(0),
        };
    }

    pub fn detail_sprite(&self) -> Option<&SpriteData> {
        let detail = self.detail.as_ref()?;
        self.sprites.get(&detail.name)
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AppState {
    pub view: View,
    pub landing: LandingState,
    pub catalog: CatalogState,
    pub catalog_url: String,
    pub export_dir: String,
    pub terminal_size: (u16, u16),
    pub message: Option<String>,
    pub tick: u64,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(View::Landing, ".")
    }
}

impl AppState {
    pub fn new(view: View, export_dir: impl Into<String>) -> Self {
        Self {
            view,
            landing: LandingState::default(),
            catalog: CatalogState::default(),
            catalog_url: CATALOG_URL.to_string(),
            export_dir: export_dir.into(),
            terminal_size: (80, 24),
            message: None,
            tick: 0,
        }
    }

    pub fn overlay_open(&self) -> bool {
        self.view == View::Catalog && self.catalog.detail.is_some()
    }
}

impl DebugState for AppState {
    fn debug_sections(&self) -> Vec<DebugSection> {
        let catalog = &self.catalog;
        vec![
            DebugSection::new("View")
                .entry("view", ron_string(&self.view))
                .entry("input", ron_string(&self.landing.input))
                .entry("ready", ron_string(&self.landing.ready))
                .entry("export_dir", ron_string(&self.export_dir)),
            DebugSection::new("Catalog")
                .entry("loading", ron_string(&catalog.is_loading()))
                .entry("total", ron_string(&catalog.list().len()))
                .entry("filtered", ron_string(&catalog.filtered_indices.len()))
                .entry("hovered", ron_string(&catalog.hovered))
                .entry("search", ron_string(&catalog.search.query))
                .entry("search_active", ron_string(&catalog.search.active)),
            DebugSection::new("Overlay")
                .entry(
                    "detail",
                    ron_string(&catalog.detail.as_ref().map(|detail| detail.name.clone())),
                )
                .entry("detail_seq", ron_string(&catalog.detail_seq))
                .entry("pending", ron_string(&catalog.pending_detail))
                .entry("sort", ron_string(&catalog.stat_table.order))
                .entry("page", ron_string(&catalog.stat_table.page))
                .entry("sprite_loading", ron_string(&catalog.sprite_loading))
                .entry("sprites_cached", ron_string(&catalog.sprites.len())),
            DebugSection::new("Status")
                .entry("export", ron_string(&catalog.export))
                .entry("message", ron_string(&self.message)),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats(values: &[u32]) -> Vec<StatRow> {
        values
            .iter()
            .enumerate()
            .map(|(key, value)| StatRow {
                key,
                stat_name: format!("stat-{key}"),
                base_value: *value,
            })
            .collect()
    }

    #[test]
    fn landing_latches_ready_on_sentinel_only() {
        let mut landing = LandingState::default();
        landing.input_changed("Ready".into());
        assert!(!landing.ready);
        assert!(landing.text.is_empty());

        landing.input_changed("Ready!".into());
        assert!(landing.ready);
        assert_eq!(landing.text, "Ready!");

        landing.input_changed("Ready".into());
        assert!(landing.ready);
        assert_eq!(landing.text, "Ready!");
        assert_eq!(landing.input, "Ready");
    }

    #[test]
    fn stat_table_defaults_to_descending() {
        let rows = stats(&[45, 49, 65, 65, 45, 80]);
        let table = StatTable::default();
        let values: Vec<u32> = table.sorted(&rows).iter().map(|row| row.base_value).collect();
        assert_eq!(values, vec![80, 65, 65, 49, 45, 45]);
    }

    #[test]
    fn stat_table_sort_cycle_resets_page() {
        let rows = stats(&[10, 30, 20, 40]);
        let mut table = StatTable::default();
        assert!(table.next_page(rows.len()));
        table.toggle_sort();
        assert_eq!(table.order, SortOrder::Unsorted);
        assert_eq!(table.page, 0);
        let keys: Vec<usize> = table.sorted(&rows).iter().map(|row| row.key).collect();
        assert_eq!(keys, vec![0, 1, 2, 3]);

        table.toggle_sort();
        assert_eq!(table.order, SortOrder::Ascend);
        let values: Vec<u32> = table.sorted(&rows).iter().map(|row| row.base_value).collect();
        assert_eq!(values, vec![10, 20, 30, 40]);

        table.toggle_sort();
        assert_eq!(table.order, SortOrder::Descend);
    }

    #[test]
    fn stat_table_pages_hold_at_most_page_size() {
        let rows = stats(&[1, 2, 3, 4, 5, 6, 7]);
        let mut table = StatTable::default();
        assert_eq!(table.page_count(rows.len()), 3);
        assert_eq!(table.page_rows(&rows).len(), STAT_PAGE_SIZE);
        assert!(table.next_page(rows.len()));
        assert!(table.next_page(rows.len()));
        assert_eq!(table.page_rows(&rows).len(), 1);
        assert!(!table.next_page(rows.len()));
        assert!(table.prev_page());
        assert_eq!(table.page, 1);
    }

    #[test]
    fn empty_stat_table_still_has_one_page() {
        let table = StatTable::default();
        assert_eq!(table.page_count(0), 1);
        assert!(table.page_rows(&[]).is_empty());
    }

    #[test]
    fn stale_detail_sequence_is_discarded() {
        let mut catalog = CatalogState::mounted();
        catalog.list_loaded(vec![
            CatalogEntry {
                name: "bulbasaur".into(),
                detail_url: "u/1".into(),
            },
            CatalogEntry {
                name: "ivysaur".into(),
                detail_url: "u/2".into(),
            },
        ]);
        let (first, _) = catalog.request_detail(0).unwrap();
        let (second, url) = catalog.request_detail(1).unwrap();
        assert_eq!(url, "u/2");
        let record = |name: &str| DetailRecord {
            name: name.into(),
            image_url: None,
            stats: Vec::new(),
        };

        assert!(!catalog.detail_selected(first, record("bulbasaur")));
        assert!(catalog.detail_selected(second, record("ivysaur")));
        assert!(!catalog.detail_selected(first, record("bulbasaur")));
        assert_eq!(catalog.detail.as_ref().unwrap().name, "ivysaur");
    }

    #[test]
    fn list_loaded_requires_outstanding_load() {
        let mut catalog = CatalogState::default();
        assert!(!catalog.list_loaded(Vec::new()));
        let mut catalog = CatalogState::mounted();
        assert!(catalog.list_loaded(Vec::new()));
        assert!(catalog.hovered.is_none());
        assert!(!catalog.list_loaded(Vec::new()));
    }
}
