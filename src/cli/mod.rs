pub mod commands;
pub mod utils;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "gastos-api")]
#[command(about = "Gastos API - spending categories and expenses per user")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Start the HTTP server (default)")]
    Serve {
        #[arg(long, help = "Listen port, overrides PORT/GASTOS_API_PORT")]
        port: Option<u16>,
    },

    #[command(about = "Sign a token for local testing with the configured JWT_SECRET")]
    Token {
        #[arg(long, help = "Tenant id written to the `id` claim")]
        id: String,
        #[arg(long, help = "Optional `login` claim")]
        login: Option<String>,
        #[arg(long, help = "Lifetime in seconds (defaults to JWT_EXPIRATION_SECS)")]
        ttl: Option<i64>,
    },

    #[command(about = "Apply the embedded Postgres migrations and exit")]
    Migrate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);

    match cli.command.unwrap_or(Commands::Serve { port: None }) {
        Commands::Serve { port } => commands::serve::handle(port).await,
        Commands::Token { id, login, ttl } => commands::token::handle(id, login, ttl, output_format),
        Commands::Migrate => commands::migrate::handle(output_format).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_subcommand_means_serve() {
        let cli = Cli::try_parse_from(["gastos-api"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(OutputFormat::from_cli(&cli), OutputFormat::Text);
    }

    #[test]
    fn parses_token_arguments() {
        let cli = Cli::try_parse_from(["gastos-api", "--json", "token", "--id", "alice", "--ttl", "60"]).unwrap();
        assert_eq!(OutputFormat::from_cli(&cli), OutputFormat::Json);
        match cli.command {
            Some(Commands::Token { id, login, ttl }) => {
                assert_eq!(id, "alice");
                assert_eq!(login, None);
                assert_eq!(ttl, Some(60));
            }
            _ => panic!("expected token command"),
        }
    }

    #[test]
    fn token_requires_id() {
        assert!(Cli::try_parse_from(["gastos-api", "token"]).is_err());
    }
}
