//! Internationalization (i18n) reference data.
//!
//! - `registry`: every language the platform knows, with display names and direction
//! - `strings`: localized placeholder text for emergency screens
//!
//! # Example
//!
//! ```rust,ignore
//! use content_fallback::i18n::LanguageRegistry;
//!
//! let strings = LanguageRegistry::get().placeholder_strings("ml");
//! println!("{}", strings.render_message("story_01", "മലയാളം"));
//! ```

mod registry;
mod strings;

pub use registry::{LanguageConfig, LanguageRegistry};
pub use strings::PlaceholderStrings;
