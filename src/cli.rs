use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// `linkscout` — dead-link audit for CMS-hosted blogs.
#[derive(Parser, Debug)]
#[command(name = "linkscout")]
#[command(version)]
#[command(about = "Find dead outbound links in blog posts served by a CMS.", long_about = None)]
pub struct Cli {
    /// Path to config.toml (default: platform config dir)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the HTTP gateway
    Serve {
        /// Port to listen on (overrides config)
        #[arg(short, long)]
        port: Option<u16>,

        /// Host to bind to (overrides config)
        #[arg(long)]
        host: Option<String>,
    },

    /// Run a one-shot check and print the summary
    Check {
        /// Check a single post by id
        #[arg(long, conflicts_with_all = ["recent", "all"])]
        post: Option<u64>,

        /// Check the N most recent posts
        #[arg(long, conflicts_with = "all")]
        recent: Option<usize>,

        /// Check every post (slow on large sites)
        #[arg(long)]
        all: bool,

        /// Write the summary to the export directory as JSON
        #[arg(long)]
        export: bool,

        /// Push the summary to the configured webhook
        #[arg(long)]
        notify: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_serve_with_overrides() {
        let cli = Cli::try_parse_from(["linkscout", "serve", "--port", "9000", "--host", "::1"])
            .unwrap();
        match cli.command {
            Commands::Serve { port, host } => {
                assert_eq!(port, Some(9000));
                assert_eq!(host.as_deref(), Some("::1"));
            }
            Commands::Check { .. } => panic!("expected serve"),
        }
    }

    #[test]
    fn parses_check_recent() {
        let cli = Cli::try_parse_from(["linkscout", "check", "--recent", "5", "--export"]).unwrap();
        match cli.command {
            Commands::Check {
                recent, export, ..
            } => {
                assert_eq!(recent, Some(5));
                assert!(export);
            }
            Commands::Serve { .. } => panic!("expected check"),
        }
    }

    #[test]
    fn conflicting_scopes_rejected() {
        assert!(Cli::try_parse_from(["linkscout", "check", "--post", "1", "--all"]).is_err());
        assert!(
            Cli::try_parse_from(["linkscout", "check", "--recent", "2", "--all"]).is_err()
        );
    }

    #[test]
    fn global_config_flag() {
        let cli =
            Cli::try_parse_from(["linkscout", "check", "--all", "--config", "/tmp/c.toml"])
                .unwrap();
        assert_eq!(cli.config.as_deref(), Some(std::path::Path::new("/tmp/c.toml")));
    }
}
