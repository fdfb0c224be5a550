use ratatui::style::Color;

pub const BG_BASE: Color = Color::Rgb(12, 18, 28);
pub const BG_PANEL: Color = Color::Rgb(20, 32, 46);
pub const BG_OVERLAY: Color = Color::Rgb(0, 0, 0);
pub const TEXT_MAIN: Color = Color::Rgb(232, 242, 244);
pub const TEXT_DIM: Color = Color::Rgb(176, 195, 207);
pub const ACCENT_TEAL: Color = Color::Rgb(72, 204, 184);
pub const ACCENT_GOLD: Color = Color::Rgb(228, 176, 88);
pub const HOVER_YELLOW: Color = Color::Rgb(250, 222, 60);
pub const WARNING_RED: Color = Color::Rgb(230, 64, 64);
pub const POKEBALL_RED: Color = Color::Rgb(214, 40, 40);
pub const POKEBALL_WHITE: Color = Color::Rgb(240, 240, 240);
