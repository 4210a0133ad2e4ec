use super::models::{LogLevel, UnmatchedSectionPolicy};

pub(crate) fn default_progress_bar_id() -> String {
    "progressBar".to_string()
}

pub(crate) fn default_navbar_id() -> String {
    "navbar".to_string()
}

pub(crate) fn default_nav_toggle_id() -> String {
    "navToggle".to_string()
}

pub(crate) fn default_mobile_menu_id() -> String {
    "mobileMenu".to_string()
}

pub(crate) fn default_mobile_close_id() -> String {
    "mobileClose".to_string()
}

pub(crate) fn default_cover_date_id() -> String {
    "coverDate".to_string()
}

pub(crate) fn default_footer_date_id() -> String {
    "footerDate".to_string()
}

pub(crate) fn default_nav_link_class() -> String {
    "nav-link".to_string()
}

pub(crate) fn default_mobile_link_class() -> String {
    "mobile-link".to_string()
}

pub(crate) fn default_mobile_cta_class() -> String {
    "mobile-cta".to_string()
}

pub(crate) fn default_reveal_class() -> String {
    "reveal".to_string()
}

pub(crate) fn default_scrolled_class() -> String {
    "scrolled".to_string()
}

pub(crate) fn default_active_class() -> String {
    "active".to_string()
}

pub(crate) fn default_menu_open_class() -> String {
    "menu-open".to_string()
}

pub(crate) fn default_visible_class() -> String {
    "visible".to_string()
}

pub(crate) fn default_scrolled_threshold() -> f64 {
    80.0
}

pub(crate) fn default_section_probe_offset() -> f64 {
    150.0
}

pub(crate) fn default_unmatched_section_policy() -> UnmatchedSectionPolicy {
    UnmatchedSectionPolicy::KeepLast
}

pub(crate) fn default_desktop_breakpoint() -> f64 {
    1024.0
}

pub(crate) fn default_stagger_base_ms() -> u64 {
    100
}

pub(crate) fn default_stagger_step_ms() -> u64 {
    50
}

pub(crate) fn default_link_slide_px() -> f64 {
    20.0
}

pub(crate) fn default_link_transition() -> String {
    "all 0.4s cubic-bezier(0.16, 1, 0.3, 1)".to_string()
}

pub(crate) fn default_navbar_height() -> f64 {
    80.0
}

pub(crate) fn default_reveal_threshold() -> f64 {
    0.1
}

pub(crate) fn default_reveal_bottom_inset() -> f64 {
    80.0
}

pub(crate) fn default_date_format() -> String {
    "%B %-d, %Y".to_string()
}

pub(crate) fn default_log_level() -> LogLevel {
    LogLevel::Info
}
