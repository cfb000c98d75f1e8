use hostlinks::{command_argument_builder, handle_crawl};

#[tokio::main]
async fn main() {
    let matches = command_argument_builder().get_matches();
    handle_crawl(&matches).await;
}
