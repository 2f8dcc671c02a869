//! AI Bank Tool MCP Server
//!
//! A Model Context Protocol (MCP) server exposing mock banking tools over stdio or
//! Streamable HTTP.

use clap::{Parser, Subcommand};

use ai_bank_tool::config::Config;
use ai_bank_tool::error::Result;
use ai_bank_tool::mcp::http;
use ai_bank_tool::mcp::server::McpServer;
use ai_bank_tool::mcp::tools::ToolHandler;

/// AI Bank Tool MCP Server
#[derive(Parser)]
#[command(name = "ai-bank-tool")]
#[command(author, version, about = "AI Bank Tool - a mock banking MCP server")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve MCP over stdin/stdout (default)
    Stdio,

    /// Serve MCP over Streamable HTTP
    Http {
        /// Host to bind (overrides HOST)
        #[arg(long)]
        host: Option<String>,

        /// Port to bind (overrides PORT)
        #[arg(long)]
        port: Option<u16>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr; stdout belongs to the stdio transport
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command.unwrap_or(Commands::Stdio) {
        Commands::Stdio => {
            let mut server = McpServer::new(ToolHandler::new());
            server.run_stdio().await?;
        }
        Commands::Http { host, port } => {
            let config = Config::new()?.with_overrides(host, port);
            let server = McpServer::new(ToolHandler::new().with_call_logging());
            if let Err(e) = http::serve(&config, server).await {
                tracing::error!("Server error: {}", e);
                std::process::exit(1);
            }
        }
    }

    Ok(())
}
