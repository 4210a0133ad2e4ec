mod date_stamp;
mod mobile_menu;
mod navbar;
mod progress;
mod reveal;
mod smooth_scroll;

pub use date_stamp::{DateStamp, format_long_date};
pub use mobile_menu::{MenuState, MobileMenu};
pub use navbar::NavBar;
pub use progress::{ProgressBar, scroll_progress};
pub use reveal::ScrollReveal;
pub use smooth_scroll::SmoothScroll;

use super::effects::Effect;
use super::messages::PageEvent;
use crate::env::{Document, Owner};

/// One independent piece of page behavior.
///
/// `init` runs once at page-ready and registers whatever callbacks the
/// controller needs; afterwards only events carrying one of its tokens are
/// routed to `handle`. `teardown` releases every registration still held.
pub trait Controller {
    fn owner(&self) -> Owner;
    fn init(&mut self, doc: &dyn Document, effects: &mut Vec<Effect>);
    fn handle(&mut self, doc: &dyn Document, event: &PageEvent, effects: &mut Vec<Effect>);
    fn teardown(&mut self, effects: &mut Vec<Effect>);
}
