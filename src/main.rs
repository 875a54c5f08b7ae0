use clap::Parser;

#[tokio::main]
async fn main() {
    let cli = amq_jolokia::cli::Cli::parse();
    let config = match cli.resolve_config() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("amq-jolokia: {}", err);
            std::process::exit(2);
        }
    };
    if let Err(err) = amq_jolokia::mcp::server::run_stdio(config).await {
        eprintln!("amq-jolokia: {}", err);
        std::process::exit(1);
    }
}
