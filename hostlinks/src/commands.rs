use clap::arg;
use hostlinks_core::DEFAULT_SEED_URL;

pub const CLAP_STYLING: clap::builder::styling::Styles = clap::builder::styling::Styles::styled()
    .header(clap_cargo::style::HEADER)
    .usage(clap_cargo::style::USAGE)
    .literal(clap_cargo::style::LITERAL)
    .placeholder(clap_cargo::style::PLACEHOLDER)
    .error(clap_cargo::style::ERROR)
    .valid(clap_cargo::style::VALID)
    .invalid(clap_cargo::style::INVALID);

pub fn command_argument_builder() -> clap::Command {
    clap::Command::new("hostlinks")
        .version(env!("CARGO_PKG_VERSION"))
        .bin_name("hostlinks")
        .about(
            "Crawl a site from a seed URL, following same-domain links, and list every host \
            its pages link to.",
        )
        .styles(CLAP_STYLING)
        .arg(
            arg!([URL])
                .required(false)
                .help("The seed URL to start crawling from")
                .default_value(DEFAULT_SEED_URL),
        )
        .arg(
            arg!(-t --"threads" <NUM_WORKERS>)
                .required(false)
                .help("Maximum number of pages fetched concurrently")
                .value_parser(clap::value_parser!(usize))
                .default_value("10"),
        )
        .arg(
            arg!(--"timeout" <SECONDS>)
                .required(false)
                .help("Request timeout in seconds")
                .value_parser(clap::value_parser!(u64))
                .default_value("10"),
        )
        .arg(
            arg!(--"drain-timeout" <SECONDS>)
                .required(false)
                .help("How long to wait for the crawl to finish before cancelling it")
                .value_parser(clap::value_parser!(u64))
                .default_value("120"),
        )
        .arg(
            arg!(--"cancel-timeout" <SECONDS>)
                .required(false)
                .help("How long cancelled pages get to wind down before giving up on them")
                .value_parser(clap::value_parser!(u64))
                .default_value("20"),
        )
        .arg(arg!(-q --"quiet" "Suppress the progress spinner and status messages").required(false))
        .arg(arg!(-v --"verbose" "Log every fetch and link decision").required(false))
}
