use super::Controller;
use crate::config::PageConfig;
use crate::env::{Document, EventKind, ListenTarget, NodeId, Owner, ScrollMetrics, Token};
use crate::page::effects::{Bindings, Effect};
use crate::page::messages::{DomEvent, PageEvent};
use tracing::debug;

/// Percentage of the scrollable distance already traversed, in `[0, 100]`.
/// A page that cannot scroll reports 0.
pub fn scroll_progress(metrics: ScrollMetrics) -> f64 {
    let max_scroll = metrics.max_scroll();
    if max_scroll.is_nan() || max_scroll <= 0.0 {
        return 0.0;
    }
    (metrics.scroll_y / max_scroll * 100.0).clamp(0.0, 100.0)
}

/// Keeps the progress indicator's width in step with the scroll position.
pub struct ProgressBar {
    element_id: String,
    bar: Option<NodeId>,
    scroll: Option<Token>,
    last_width: Option<f64>,
    bindings: Bindings,
}

impl ProgressBar {
    pub fn new(config: &PageConfig) -> Self {
        ProgressBar {
            element_id: config.progress_bar_id.clone(),
            bar: None,
            scroll: None,
            last_width: None,
            bindings: Bindings::new(Owner::ProgressBar),
        }
    }

    fn update(&mut self, doc: &dyn Document, effects: &mut Vec<Effect>) {
        let Some(bar) = self.bar else {
            return;
        };
        let progress = scroll_progress(doc.scroll_metrics());
        if self.last_width == Some(progress) {
            return;
        }
        self.last_width = Some(progress);
        effects.push(Effect::SetStyle {
            node: bar,
            property: "width",
            value: format!("{progress}%"),
        });
    }
}

impl Controller for ProgressBar {
    fn owner(&self) -> Owner {
        Owner::ProgressBar
    }

    fn init(&mut self, doc: &dyn Document, effects: &mut Vec<Effect>) {
        let Some(bar) = doc.element_by_id(&self.element_id) else {
            debug!(id = %self.element_id, "Progress bar element missing; indicator inactive");
            return;
        };
        self.bar = Some(bar);
        self.scroll = Some(
            self.bindings
                .listen(ListenTarget::Window, EventKind::Scroll, effects),
        );
        self.update(doc, effects);
    }

    fn handle(&mut self, doc: &dyn Document, event: &PageEvent, effects: &mut Vec<Effect>) {
        if let PageEvent::Dom {
            token,
            event: DomEvent::Scroll,
        } = event
        {
            if self.scroll == Some(*token) {
                self.update(doc, effects);
            }
        }
    }

    fn teardown(&mut self, effects: &mut Vec<Effect>) {
        self.bindings.release(effects);
        self.bar = None;
        self.scroll = None;
        self.last_width = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::fake::{FakeElement, FakeHost};

    fn metrics(scroll_y: f64) -> ScrollMetrics {
        ScrollMetrics {
            scroll_y,
            viewport_width: 1280.0,
            viewport_height: 800.0,
            document_height: 4800.0,
        }
    }

    #[test]
    fn progress_spans_zero_to_hundred() {
        assert_eq!(scroll_progress(metrics(0.0)), 0.0);
        assert_eq!(scroll_progress(metrics(2000.0)), 50.0);
        assert_eq!(scroll_progress(metrics(4000.0)), 100.0);
    }

    #[test]
    fn progress_is_clamped_outside_the_scroll_range() {
        assert_eq!(scroll_progress(metrics(4400.0)), 100.0);
        assert_eq!(scroll_progress(metrics(-30.0)), 0.0);
    }

    #[test]
    fn unscrollable_page_reports_zero() {
        let mut short = metrics(10.0);
        short.document_height = 800.0;
        assert_eq!(scroll_progress(short), 0.0);
        short.document_height = 600.0;
        assert_eq!(scroll_progress(short), 0.0);
    }

    #[test]
    fn init_writes_width_and_listens_for_scroll() {
        let mut host = FakeHost::new();
        let bar = host.add(FakeElement::new("div").id("progressBar"));
        host.metrics = metrics(1000.0);

        let mut progress = ProgressBar::new(&PageConfig::default());
        let mut effects = Vec::new();
        progress.init(&host, &mut effects);

        assert!(matches!(
            effects[0],
            Effect::Listen {
                target: ListenTarget::Window,
                kind: EventKind::Scroll,
                ..
            }
        ));
        assert_eq!(
            effects[1],
            Effect::SetStyle {
                node: bar,
                property: "width",
                value: "25%".to_string(),
            }
        );
    }

    #[test]
    fn unchanged_progress_is_not_rewritten() {
        let mut host = FakeHost::new();
        host.add(FakeElement::new("div").id("progressBar"));
        host.metrics = metrics(0.0);

        let mut progress = ProgressBar::new(&PageConfig::default());
        let mut effects = Vec::new();
        progress.init(&host, &mut effects);
        let token = progress.scroll.expect("scroll listener");

        effects.clear();
        let scroll = PageEvent::Dom {
            token,
            event: DomEvent::Scroll,
        };
        progress.handle(&host, &scroll, &mut effects);
        assert!(effects.is_empty());

        host.metrics.scroll_y = 4000.0;
        progress.handle(&host, &scroll, &mut effects);
        assert_eq!(effects.len(), 1);
    }

    #[test]
    fn missing_indicator_disables_controller() {
        let host = FakeHost::new();
        let mut progress = ProgressBar::new(&PageConfig::default());
        let mut effects = Vec::new();
        progress.init(&host, &mut effects);
        assert!(effects.is_empty());
    }
}
