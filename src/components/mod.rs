pub mod catalog_list;
pub mod detail_overlay;
pub mod landing;
pub mod stat_panels;

// Re-export core Component trait
pub use tui_dispatch::Component;

pub use catalog_list::{CatalogView, CatalogViewProps};
pub use detail_overlay::{DetailOverlay, DetailOverlayProps};
pub use landing::{LandingView, LandingViewProps};

/// "mr-mime" -> "Mr Mime"
pub fn format_name(name: &str) -> String {
    name.split('-')
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => format!("{}{}", first.to_ascii_uppercase(), chars.as_str()),
                None => "".to_string(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn ui_render(_: usize) -> crate::action::Action {
    crate::action::Action::UiRender
}
