pub mod detectors;
pub mod entities;
pub mod filth;
pub mod locale;
pub mod normalize;
pub mod replacer;
pub mod scrubber;

// Re-export main types for convenient access
pub use filth::{resolve_overlaps, Category, Filth, FilthKind};
pub use locale::Locale;

// Re-export the pipeline entry points
pub use scrubber::{scrub_text, LocaleScrub, ScrubOptions, ScrubSession};

// Re-export detector selection for callers composing their own pipelines
pub use detectors::{detector_catalog, select_detectors, Detector, DetectorContext};

pub use replacer::{HashAlgorithm, HashedPiiReplacer};
