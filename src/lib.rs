//! Client-side interactions for a static landing page.
//!
//! - `config`: markup contract and tuning knobs, loaded from TOML.
//! - `env`: the capabilities controllers read from and write through.
//! - `page`: the controllers and the runtime that boots and routes to them.
//! - `timing`: debounce and throttle wrappers.
//!
//! Nothing here touches the browser directly; the `pagewire-web` crate
//! implements [`env::Host`] over `web-sys` and drives a [`page::Page`].

pub mod config;
pub mod env;
pub mod page;
pub mod timing;

pub use config::{PageConfig, load_config, parse_config};
pub use page::{Dispatch, Page, PageEvent};
