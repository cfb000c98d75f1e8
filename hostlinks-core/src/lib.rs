pub mod crawl;

pub use crawl::{
    CrawlOptions, CrawlProgressCallback, DEFAULT_SEED_URL, completion_notice, execute_crawl,
    generate_host_listing,
};
