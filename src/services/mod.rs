pub mod extraction;
pub mod tika;

pub use extraction::{BoxedExtractor, ExtractionService, ExtractorFactory};
pub use tika::{TikaClient, TikaClientFactory};
