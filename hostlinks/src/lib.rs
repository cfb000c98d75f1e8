pub mod commands;

// Include handlers module directly from handlers.rs
#[path = "handlers.rs"]
pub mod handlers;

pub use commands::command_argument_builder;
pub use handlers::{crawl_options_from_matches, handle_crawl};

// Re-export crawl functionality from hostlinks-core
pub use hostlinks_core::crawl::{
    CrawlOptions, CrawlProgressCallback, DEFAULT_SEED_URL, execute_crawl, generate_host_listing,
};
