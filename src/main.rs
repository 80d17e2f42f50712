#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::missing_errors_doc, clippy::missing_panics_doc)]

use anyhow::Result;
use clap::Parser;
use linkscout::check::{self, CheckScope, CheckSummary, Verifier};
use linkscout::cli::{Cli, Commands};
use linkscout::cms::CmsClient;
use linkscout::config::Config;
use linkscout::gateway;
use linkscout::notify::{self, WebhookSink};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Serve { port, host } => {
            let host = host.unwrap_or_else(|| config.gateway.host.clone());
            let port = port.unwrap_or(config.gateway.port);
            gateway::run_gateway(&host, port, config).await
        }
        Commands::Check {
            post,
            recent,
            all,
            export,
            notify,
        } => run_check_command(&config, post, recent, all, export, notify).await,
    }
}

async fn run_check_command(
    config: &Config,
    post: Option<u64>,
    recent: Option<usize>,
    all: bool,
    export: bool,
    notify: bool,
) -> Result<()> {
    let scope = match (post, recent, all) {
        (Some(id), None, false) => CheckScope::Post(id),
        (None, Some(n), false) => CheckScope::Recent(n),
        (None, None, true) => CheckScope::All,
        _ => anyhow::bail!("select a scope: --post <id>, --recent <n>, or --all"),
    };

    if scope == CheckScope::All {
        println!("! checking every post — this can take a while on large sites");
    }

    let cms = CmsClient::new(&config.cms);
    let verifier = Verifier::new(&config.checker, &config.archive);
    let posts = scope.resolve(&cms).await?;
    let summary = check::run_check(&posts, &verifier, &config.checker).await;

    print_summary(&summary);

    if export {
        let path = notify::export_summary(&config.export.dir, &summary)?;
        println!("✓ exported to {}", path.display());
    }
    if notify {
        WebhookSink::new(&config.webhook).send(&summary).await?;
        println!("✓ webhook notified");
    }

    Ok(())
}

fn print_summary(summary: &CheckSummary) {
    println!(
        "◆ checked {} link(s) across {} post(s) in {}ms",
        summary.total_links, summary.total_posts, summary.processing_time_ms
    );
    println!(
        "  dead: {}  forbidden: {}  timeouts: {}  retryable: {}",
        summary.dead_links,
        summary.forbidden_errors,
        summary.timeout_errors,
        summary.retryable_errors
    );

    for post in summary.posts.iter().filter(|p| !p.dead.is_empty()) {
        println!("  › {} — {} dead", post.post_slug, post.dead.len());
        for outcome in &post.dead {
            match (outcome.status, outcome.error.as_deref()) {
                (Some(status), _) => println!("      {status} {}", outcome.url),
                (None, Some(error)) => println!("      ERR {} ({error})", outcome.url),
                (None, None) => println!("      ERR {}", outcome.url),
            }
            if let Some(ref archive) = outcome.archive_url {
                println!("        archived copy: {archive}");
            }
        }
    }

    for recommendation in &summary.recommendations {
        println!("  ! {recommendation}");
    }
}
