pub mod crawler;
pub mod error;
pub mod extractor;
pub mod frontier;
pub mod result;
pub mod result_map;
pub mod scheduler;

pub use crawler::Crawler;
pub use error::ScanError;
pub use extractor::LinkExtractor;
pub use frontier::Frontier;
pub use result::{Completion, CrawlReport, Observation, PageLinks};
pub use result_map::ResultMap;
pub use scheduler::{ProgressCallback, Scheduler};
pub use tokio_util::sync::CancellationToken;
