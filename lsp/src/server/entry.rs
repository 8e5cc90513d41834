use tower_lsp::{LspService, Server};
use tracing_subscriber::EnvFilter;

use super::{cli::try_cli_analyze, state::MacrorifyLanguageServer};

pub async fn run() {
    match try_cli_analyze(std::env::args().skip(1)) {
        Ok(Some(output)) => {
            println!("{output}");
            return;
        }
        Ok(None) => {}
        Err(e) => {
            eprintln!("macrorify-lsp analyze error: {e:#}");
            std::process::exit(2);
        }
    }

    // stdout carries the JSON-RPC stream
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    let stdin = tokio::io::stdin();
    let stdout = tokio::io::stdout();

    let (service, socket) = LspService::new(MacrorifyLanguageServer::new);
    Server::new(stdin, stdout, socket).serve(service).await;
}
