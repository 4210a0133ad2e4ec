use super::defaults;
use serde::Deserialize;

/// Page wiring configuration; deserializable from TOML.
///
/// Element ids and class names describe the host markup contract. Every
/// field has a default matching the stock proposal page, so an empty
/// document yields a working configuration.
#[derive(Debug, Clone, Deserialize, serde::Serialize, PartialEq)]
pub struct PageConfig {
    #[serde(default = "defaults::default_progress_bar_id")]
    pub progress_bar_id: String,
    #[serde(default = "defaults::default_navbar_id")]
    pub navbar_id: String,
    #[serde(default = "defaults::default_nav_toggle_id")]
    pub nav_toggle_id: String,
    #[serde(default = "defaults::default_mobile_menu_id")]
    pub mobile_menu_id: String,
    #[serde(default = "defaults::default_mobile_close_id")]
    pub mobile_close_id: String,
    #[serde(default = "defaults::default_cover_date_id")]
    pub cover_date_id: String,
    #[serde(default = "defaults::default_footer_date_id")]
    pub footer_date_id: String,
    #[serde(default = "defaults::default_nav_link_class")]
    pub nav_link_class: String,
    #[serde(default = "defaults::default_mobile_link_class")]
    pub mobile_link_class: String,
    #[serde(default = "defaults::default_mobile_cta_class")]
    pub mobile_cta_class: String,
    #[serde(default = "defaults::default_reveal_class")]
    pub reveal_class: String,
    #[serde(default = "defaults::default_scrolled_class")]
    pub scrolled_class: String,
    #[serde(default = "defaults::default_active_class")]
    pub active_class: String,
    #[serde(default = "defaults::default_menu_open_class")]
    pub menu_open_class: String,
    #[serde(default = "defaults::default_visible_class")]
    pub visible_class: String,
    #[serde(default = "defaults::default_scrolled_threshold")]
    pub scrolled_threshold: f64,
    #[serde(default = "defaults::default_section_probe_offset")]
    pub section_probe_offset: f64,
    #[serde(default = "defaults::default_unmatched_section_policy")]
    pub unmatched_section_policy: UnmatchedSectionPolicy,
    #[serde(default = "defaults::default_desktop_breakpoint")]
    pub desktop_breakpoint: f64,
    #[serde(default = "defaults::default_stagger_base_ms")]
    pub stagger_base_ms: u64,
    #[serde(default = "defaults::default_stagger_step_ms")]
    pub stagger_step_ms: u64,
    #[serde(default = "defaults::default_link_slide_px")]
    pub link_slide_px: f64,
    #[serde(default = "defaults::default_link_transition")]
    pub link_transition: String,
    #[serde(default = "defaults::default_navbar_height")]
    pub default_navbar_height: f64,
    #[serde(default = "defaults::default_reveal_threshold")]
    pub reveal_threshold: f64,
    #[serde(default = "defaults::default_reveal_bottom_inset")]
    pub reveal_bottom_inset: f64,
    #[serde(default = "defaults::default_date_format")]
    pub date_format: String,
    #[serde(default = "defaults::default_log_level")]
    pub log_level: LogLevel,
}

impl Default for PageConfig {
    fn default() -> Self {
        PageConfig {
            progress_bar_id: defaults::default_progress_bar_id(),
            navbar_id: defaults::default_navbar_id(),
            nav_toggle_id: defaults::default_nav_toggle_id(),
            mobile_menu_id: defaults::default_mobile_menu_id(),
            mobile_close_id: defaults::default_mobile_close_id(),
            cover_date_id: defaults::default_cover_date_id(),
            footer_date_id: defaults::default_footer_date_id(),
            nav_link_class: defaults::default_nav_link_class(),
            mobile_link_class: defaults::default_mobile_link_class(),
            mobile_cta_class: defaults::default_mobile_cta_class(),
            reveal_class: defaults::default_reveal_class(),
            scrolled_class: defaults::default_scrolled_class(),
            active_class: defaults::default_active_class(),
            menu_open_class: defaults::default_menu_open_class(),
            visible_class: defaults::default_visible_class(),
            scrolled_threshold: defaults::default_scrolled_threshold(),
            section_probe_offset: defaults::default_section_probe_offset(),
            unmatched_section_policy: defaults::default_unmatched_section_policy(),
            desktop_breakpoint: defaults::default_desktop_breakpoint(),
            stagger_base_ms: defaults::default_stagger_base_ms(),
            stagger_step_ms: defaults::default_stagger_step_ms(),
            link_slide_px: defaults::default_link_slide_px(),
            link_transition: defaults::default_link_transition(),
            default_navbar_height: defaults::default_navbar_height(),
            reveal_threshold: defaults::default_reveal_threshold(),
            reveal_bottom_inset: defaults::default_reveal_bottom_inset(),
            date_format: defaults::default_date_format(),
            log_level: defaults::default_log_level(),
        }
    }
}

/// What the section highlighter does when no section contains the probe.
#[derive(Debug, Clone, Copy, Deserialize, serde::Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum UnmatchedSectionPolicy {
    /// Leave the previous highlight in place.
    #[default]
    KeepLast,
    /// Unmark every navigation link.
    Clear,
}

impl std::fmt::Display for UnmatchedSectionPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            UnmatchedSectionPolicy::KeepLast => "keep-last",
            UnmatchedSectionPolicy::Clear => "clear",
        };
        write!(f, "{}", label)
    }
}

/// Supported logging verbosity levels.
#[derive(Debug, Clone, Copy, Deserialize, serde::Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl Default for LogLevel {
    fn default() -> Self {
        LogLevel::Info
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_filter_str())
    }
}

impl LogLevel {
    pub fn as_filter_str(self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}
