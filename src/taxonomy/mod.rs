pub mod badges;
pub mod languages;

pub use badges::{catalog, BadgeCatalog};
pub use languages::{language_color, FALLBACK_LANGUAGE_COLOR};
