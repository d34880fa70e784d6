use anyhow::Result;
use clap::{Args, Parser, Subcommand, ValueEnum};
use news_cli::config::{load_config, API_KEY_ENV};
use news_cli::models::{Endpoint, RawParams, SortBy};
use news_cli::pipeline::{run, PageFetcher, QueryRequest};
use news_cli::sources::NewsApiSource;
use news_cli::ui;
use news_cli::utils::HttpClient;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// News CLI - Search news sources, articles and top headlines
#[derive(Parser, Debug)]
#[command(name = "news")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Search news sources, articles and top headlines", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Configuration file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Diagnostic log level written to stderr (error, warn, info, debug, trace)
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    /// Only log errors
    #[arg(long, short, global = true)]
    quiet: bool,

    /// Disable coloured output
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Article ordering
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum Order {
    /// Articles more closely related to the query first
    Relevancy,
    /// Articles from popular sources and publishers first
    Popularity,
    /// Newest articles first
    #[value(name = "publishedAt", alias = "published-at")]
    PublishedAt,
}

impl From<Order> for SortBy {
    fn from(order: Order) -> Self {
        match order {
            Order::Relevancy => SortBy::Relevancy,
            Order::Popularity => SortBy::Popularity,
            Order::PublishedAt => SortBy::PublishedAt,
        }
    }
}

/// Display and storage options shared by every command
#[derive(Args, Debug, Clone, Default)]
struct OutputArgs {
    /// Show extended fields for each result
    #[arg(long, short)]
    verbose: bool,

    /// Save the result to this path as JSON
    #[arg(long, short)]
    write: Option<PathBuf>,
}

/// Pagination options for article endpoints
#[derive(Args, Debug, Clone, Default)]
struct PagingArgs {
    /// Number of pages to fetch
    #[arg(long, short, value_parser = clap::value_parser!(u32).range(1..))]
    pages: Option<u32>,

    /// Number of results per page (max 100)
    #[arg(long, short = 'z', value_parser = clap::value_parser!(i64).range(1..=100))]
    page_size: Option<i64>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List the news publishers available
    Sources {
        /// Only return sources publishing in this language
        #[arg(long, short)]
        language: Option<String>,

        /// Only return sources covering this category
        #[arg(long, short)]
        category: Option<String>,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Search every article
    Everything {
        /// Keywords or phrase to search for
        query: Option<String>,

        /// Oldest publication date (ISO 8601, e.g. 2018-07-07 or 2018-07-07T01:07:36)
        #[arg(long, short)]
        from: Option<String>,

        /// Newest publication date (ISO 8601)
        #[arg(long, short)]
        to: Option<String>,

        /// Comma-separated news source ids
        #[arg(long, short, value_delimiter = ',')]
        sources: Vec<String>,

        /// Comma-separated domains to restrict the search to
        #[arg(long, short, value_delimiter = ',')]
        domains: Vec<String>,

        #[command(flatten)]
        paging: PagingArgs,

        /// Only return articles written in this language
        #[arg(long, short)]
        language: Option<String>,

        /// Result ordering
        #[arg(long, short, value_enum)]
        order: Option<Order>,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Breaking news headlines
    #[command(name = "top-headlines", alias = "topHeadlines")]
    TopHeadlines {
        /// Keywords or phrase to search for
        query: Option<String>,

        /// Only return headlines from this country
        #[arg(long, short = 'u')]
        country: Option<String>,

        /// Only return headlines in this category
        #[arg(long, short)]
        category: Option<String>,

        /// Comma-separated news source ids
        #[arg(long, short, value_delimiter = ',')]
        sources: Vec<String>,

        #[command(flatten)]
        paging: PagingArgs,

        #[command(flatten)]
        output: OutputArgs,
    },
}

fn non_empty(list: Vec<String>) -> Option<Vec<String>> {
    (!list.is_empty()).then_some(list)
}

/// Translate a parsed command into a pipeline request
fn build_request(command: Commands, default_page_size: i64) -> QueryRequest {
    let (endpoint, raw, paging, output) = match command {
        Commands::Sources {
            language,
            category,
            output,
        } => (
            Endpoint::Sources,
            RawParams::new()
                .param("language", language)
                .param("category", category),
            PagingArgs::default(),
            output,
        ),
        Commands::Everything {
            query,
            from,
            to,
            sources,
            domains,
            paging,
            language,
            order,
            output,
        } => (
            Endpoint::Everything,
            RawParams::new()
                .param("q", query)
                .param("sources", non_empty(sources))
                .param("domains", non_empty(domains))
                .param("language", language)
                .param("from", from)
                .param("to", to)
                .param("sortBy", order.map(|o| SortBy::from(o).as_str())),
            paging,
            output,
        ),
        Commands::TopHeadlines {
            query,
            country,
            category,
            sources,
            paging,
            output,
        } => (
            Endpoint::TopHeadlines,
            RawParams::new()
                .param("q", query)
                .param("sources", non_empty(sources))
                .param("country", country)
                .param("category", category),
            paging,
            output,
        ),
    };

    let params = raw
        .param("pageSize", Some(paging.page_size.unwrap_or(default_page_size)))
        .normalize();

    let mut request = QueryRequest::new(endpoint, params)
        .pages(paging.pages.unwrap_or(1))
        .verbose(output.verbose);
    if let Some(path) = output.write {
        request = request.write(path);
    }
    request
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.quiet { "error" } else { cli.log_level.as_str() };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| format!("news_cli={}", level)),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = load_config(cli.config.as_deref())?;
    let color = ui::use_color(config.output.color && !cli.no_color);

    let Some(api_key) = config.api_key() else {
        let message = format!(
            "no API key configured; set {} or api.key in the configuration file",
            API_KEY_ENV
        );
        eprintln!("{}", ui::error_line(&message, color));
        std::process::exit(1);
    };

    let client = HttpClient::with_timeout(config.api.timeout())?;
    let source = NewsApiSource::new(api_key, client).with_base_url(&config.api.base_url);
    let fetcher = PageFetcher::new(Arc::new(source)).with_policy(config.fetch.failure_policy);

    let request = build_request(cli.command, config.fetch.page_size());
    tracing::debug!(?request, "built request");

    match run(&fetcher, &request, |view| {
        print!("{}", ui::render_view(view, color))
    })
    .await
    {
        Ok(outcome) => {
            if let Some(path) = outcome.saved_to {
                println!("{}", ui::saved_notice(&path, color));
            }
            Ok(())
        }
        Err(e) => {
            eprintln!("{}", ui::error_line(&e, color));
            std::process::exit(1);
        }
    }
}
