use serde::{Deserialize, Serialize};

use crate::sprite::SpriteData;
use crate::state::{CatalogEntry, DetailRecord};

#[derive(tui_dispatch::Action, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[action(infer_categories)]
pub enum Action {
    Init,

    LandingInputChange(String),
    LandingNavigate,

    CatalogDidLoad(Vec<CatalogEntry>),
    CatalogDidError(String),
    CatalogHover(usize),
    CatalogHoverMove(i16),
    CatalogLeave,

    SearchStart,
    SearchCancel,
    SearchSubmit,
    SearchInput(char),
    SearchBackspace,

    DetailSelect(usize),
    DetailDidLoad { seq: u64, record: DetailRecord },
    DetailDidError { seq: u64, error: String },
    SpriteDidLoad { name: String, sprite: SpriteData },
    SpriteDidError { name: String, error: String },

    OverlayDismiss,
    StatSortToggle,
    StatPageNext,
    StatPagePrev,

    ExportRequest,
    ExportDidSave(String),
    ExportDidError(String),

    UiRender,
    UiTerminalResize(u16, u16),
    Tick,
    Quit,
}
