//! Page access for pagescrape.
//!
//! Provides the headless browser session, document sources, readiness
//! polling, text extraction, and robots.txt checks.
//! The live browser requires the `browser` feature flag and Chrome/Chromium installed.

pub mod document;
pub mod extract;
pub mod readiness;
pub mod robots;
#[cfg(feature = "browser")]
pub mod session;

pub use document::{DocumentSource, StaticDocument};
pub use extract::extract;
pub use readiness::{ReadyCondition, Readiness};
#[cfg(feature = "browser")]
pub use session::BrowserSession;
