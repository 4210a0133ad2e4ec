use super::Controller;
use crate::config::PageConfig;
use crate::env::{Document, Owner};
use crate::page::effects::Effect;
use crate::page::messages::PageEvent;
use chrono::NaiveDate;
use std::fmt::Write;
use tracing::{debug, warn};

const FALLBACK_FORMAT: &str = "%B %-d, %Y";

/// Format `date` with a strftime pattern, e.g. `October 19, 2026` for the
/// default. An invalid pattern falls back to the default rather than failing.
pub fn format_long_date(date: NaiveDate, pattern: &str) -> String {
    let mut text = String::new();
    if write!(text, "{}", date.format(pattern)).is_ok() {
        return text;
    }
    warn!(%pattern, "Invalid date format; using default");
    date.format(FALLBACK_FORMAT).to_string()
}

/// Writes today's date into the cover and footer placeholders once.
pub struct DateStamp {
    element_ids: [String; 2],
    pattern: String,
}

impl DateStamp {
    pub fn new(config: &PageConfig) -> Self {
        DateStamp {
            element_ids: [config.cover_date_id.clone(), config.footer_date_id.clone()],
            pattern: config.date_format.clone(),
        }
    }
}

impl Controller for DateStamp {
    fn owner(&self) -> Owner {
        Owner::DateStamp
    }

    fn init(&mut self, doc: &dyn Document, effects: &mut Vec<Effect>) {
        let text = format_long_date(doc.today(), &self.pattern);
        for id in &self.element_ids {
            match doc.element_by_id(id) {
                Some(node) => effects.push(Effect::SetText {
                    node,
                    text: text.clone(),
                }),
                None => debug!(%id, "Date placeholder missing"),
            }
        }
    }

    fn handle(&mut self, _doc: &dyn Document, _event: &PageEvent, _effects: &mut Vec<Effect>) {}

    fn teardown(&mut self, _effects: &mut Vec<Effect>) {}
}
