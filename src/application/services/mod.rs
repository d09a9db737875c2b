mod locator_extractor;

pub use locator_extractor::LocatorExtractor;
