mod error;
mod loader;
mod parsing;
mod types;

pub use error::ElementSetError;
pub use loader::{detect_format, load_elements, parse_elements};
pub use parsing::{parse_multi_tle, parse_tle_lines};
pub use types::{ElementFormat, ElementSet, ElementSource, RawElements};
