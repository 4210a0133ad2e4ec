use super::defaults;
use super::models::{LogLevel, PageConfig, UnmatchedSectionPolicy};
use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize, serde::Serialize)]
pub(super) struct ConfigTables {
    #[serde(default)]
    elements: ElementsConfig,
    #[serde(default)]
    classes: ClassesConfig,
    #[serde(default)]
    navigation: NavigationConfig,
    #[serde(default)]
    mobile_menu: MobileMenuConfig,
    #[serde(default)]
    smooth_scroll: SmoothScrollConfig,
    #[serde(default)]
    reveal: RevealConfig,
    #[serde(default)]
    dates: DatesConfig,
    #[serde(default)]
    logging: LoggingConfig,
}

impl From<ConfigTables> for PageConfig {
    fn from(tables: ConfigTables) -> Self {
        PageConfig {
            progress_bar_id: tables.elements.progress_bar,
            navbar_id: tables.elements.navbar,
            nav_toggle_id: tables.elements.nav_toggle,
            mobile_menu_id: tables.elements.mobile_menu,
            mobile_close_id: tables.elements.mobile_close,
            cover_date_id: tables.elements.cover_date,
            footer_date_id: tables.elements.footer_date,
            nav_link_class: tables.classes.nav_link,
            mobile_link_class: tables.classes.mobile_link,
            mobile_cta_class: tables.classes.mobile_cta,
            reveal_class: tables.classes.reveal,
            scrolled_class: tables.classes.scrolled,
            active_class: tables.classes.active,
            menu_open_class: tables.classes.menu_open,
            visible_class: tables.classes.visible,
            scrolled_threshold: tables.navigation.scrolled_threshold,
            section_probe_offset: tables.navigation.section_probe_offset,
            unmatched_section_policy: tables.navigation.unmatched_section_policy,
            desktop_breakpoint: tables.mobile_menu.desktop_breakpoint,
            stagger_base_ms: tables.mobile_menu.stagger_base_ms,
            stagger_step_ms: tables.mobile_menu.stagger_step_ms,
            link_slide_px: tables.mobile_menu.link_slide_px,
            link_transition: tables.mobile_menu.link_transition,
            default_navbar_height: tables.smooth_scroll.default_navbar_height,
            reveal_threshold: tables.reveal.threshold,
            reveal_bottom_inset: tables.reveal.bottom_inset,
            date_format: tables.dates.format,
            log_level: tables.logging.log_level,
        }
    }
}

impl From<&PageConfig> for ConfigTables {
    fn from(config: &PageConfig) -> Self {
        ConfigTables {
            elements: ElementsConfig {
                progress_bar: config.progress_bar_id.clone(),
                navbar: config.navbar_id.clone(),
                nav_toggle: config.nav_toggle_id.clone(),
                mobile_menu: config.mobile_menu_id.clone(),
                mobile_close: config.mobile_close_id.clone(),
                cover_date: config.cover_date_id.clone(),
                footer_date: config.footer_date_id.clone(),
            },
            classes: ClassesConfig {
                nav_link: config.nav_link_class.clone(),
                mobile_link: config.mobile_link_class.clone(),
                mobile_cta: config.mobile_cta_class.clone(),
                reveal: config.reveal_class.clone(),
                scrolled: config.scrolled_class.clone(),
                active: config.active_class.clone(),
                menu_open: config.menu_open_class.clone(),
                visible: config.visible_class.clone(),
            },
            navigation: NavigationConfig {
                scrolled_threshold: config.scrolled_threshold,
                section_probe_offset: config.section_probe_offset,
                unmatched_section_policy: config.unmatched_section_policy,
            },
            mobile_menu: MobileMenuConfig {
                desktop_breakpoint: config.desktop_breakpoint,
                stagger_base_ms: config.stagger_base_ms,
                stagger_step_ms: config.stagger_step_ms,
                link_slide_px: config.link_slide_px,
                link_transition: config.link_transition.clone(),
            },
            smooth_scroll: SmoothScrollConfig {
                default_navbar_height: config.default_navbar_height,
            },
            reveal: RevealConfig {
                threshold: config.reveal_threshold,
                bottom_inset: config.reveal_bottom_inset,
            },
            dates: DatesConfig {
                format: config.date_format.clone(),
            },
            logging: LoggingConfig {
                log_level: config.log_level,
            },
        }
    }
}

#[derive(Debug, Clone, Deserialize, serde::Serialize)]
struct ElementsConfig {
    #[serde(default = "defaults::default_progress_bar_id")]
    progress_bar: String,
    #[serde(default = "defaults::default_navbar_id")]
    navbar: String,
    #[serde(default = "defaults::default_nav_toggle_id")]
    nav_toggle: String,
    #[serde(default = "defaults::default_mobile_menu_id")]
    mobile_menu: String,
    #[serde(default = "defaults::default_mobile_close_id")]
    mobile_close: String,
    #[serde(default = "defaults::default_cover_date_id")]
    cover_date: String,
    #[serde(default = "defaults::default_footer_date_id")]
    footer_date: String,
}

impl Default for ElementsConfig {
    fn default() -> Self {
        ElementsConfig {
            progress_bar: defaults::default_progress_bar_id(),
            navbar: defaults::default_navbar_id(),
            nav_toggle: defaults::default_nav_toggle_id(),
            mobile_menu: defaults::default_mobile_menu_id(),
            mobile_close: defaults::default_mobile_close_id(),
            cover_date: defaults::default_cover_date_id(),
            footer_date: defaults::default_footer_date_id(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, serde::Serialize)]
struct ClassesConfig {
    #[serde(default = "defaults::default_nav_link_class")]
    nav_link: String,
    #[serde(default = "defaults::default_mobile_link_class")]
    mobile_link: String,
    #[serde(default = "defaults::default_mobile_cta_class")]
    mobile_cta: String,
    #[serde(default = "defaults::default_reveal_class")]
    reveal: String,
    #[serde(default = "defaults::default_scrolled_class")]
    scrolled: String,
    #[serde(default = "defaults::default_active_class")]
    active: String,
    #[serde(default = "defaults::default_menu_open_class")]
    menu_open: String,
    #[serde(default = "defaults::default_visible_class")]
    visible: String,
}

impl Default for ClassesConfig {
    fn default() -> Self {
        ClassesConfig {
            nav_link: defaults::default_nav_link_class(),
            mobile_link: defaults::default_mobile_link_class(),
            mobile_cta: defaults::default_mobile_cta_class(),
            reveal: defaults::default_reveal_class(),
            scrolled: defaults::default_scrolled_class(),
            active: defaults::default_active_class(),
            menu_open: defaults::default_menu_open_class(),
            visible: defaults::default_visible_class(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, serde::Serialize)]
struct NavigationConfig {
    #[serde(default = "defaults::default_scrolled_threshold")]
    scrolled_threshold: f64,
    #[serde(default = "defaults::default_section_probe_offset")]
    section_probe_offset: f64,
    #[serde(default = "defaults::default_unmatched_section_policy")]
    unmatched_section_policy: UnmatchedSectionPolicy,
}

impl Default for NavigationConfig {
    fn default() -> Self {
        NavigationConfig {
            scrolled_threshold: defaults::default_scrolled_threshold(),
            section_probe_offset: defaults::default_section_probe_offset(),
            unmatched_section_policy: defaults::default_unmatched_section_policy(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, serde::Serialize)]
struct MobileMenuConfig {
    #[serde(default = "defaults::default_desktop_breakpoint")]
    desktop_breakpoint: f64,
    #[serde(default = "defaults::default_stagger_base_ms")]
    stagger_base_ms: u64,
    #[serde(default = "defaults::default_stagger_step_ms")]
    stagger_step_ms: u64,
    #[serde(default = "defaults::default_link_slide_px")]
    link_slide_px: f64,
    #[serde(default = "defaults::default_link_transition")]
    link_transition: String,
}

impl Default for MobileMenuConfig {
    fn default() -> Self {
        MobileMenuConfig {
            desktop_breakpoint: defaults::default_desktop_breakpoint(),
            stagger_base_ms: defaults::default_stagger_base_ms(),
            stagger_step_ms: defaults::default_stagger_step_ms(),
            link_slide_px: defaults::default_link_slide_px(),
            link_transition: defaults::default_link_transition(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, serde::Serialize)]
struct SmoothScrollConfig {
    #[serde(default = "defaults::default_navbar_height")]
    default_navbar_height: f64,
}

impl Default for SmoothScrollConfig {
    fn default() -> Self {
        SmoothScrollConfig {
            default_navbar_height: defaults::default_navbar_height(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, serde::Serialize)]
struct RevealConfig {
    #[serde(default = "defaults::default_reveal_threshold")]
    threshold: f64,
    #[serde(default = "defaults::default_reveal_bottom_inset")]
    bottom_inset: f64,
}

impl Default for RevealConfig {
    fn default() -> Self {
        RevealConfig {
            threshold: defaults::default_reveal_threshold(),
            bottom_inset: defaults::default_reveal_bottom_inset(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, serde::Serialize)]
struct DatesConfig {
    #[serde(default = "defaults::default_date_format")]
    format: String,
}

impl Default for DatesConfig {
    fn default() -> Self {
        DatesConfig {
            format: defaults::default_date_format(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, serde::Serialize)]
struct LoggingConfig {
    #[serde(default = "defaults::default_log_level")]
    log_level: LogLevel,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            log_level: defaults::default_log_level(),
        }
    }
}
