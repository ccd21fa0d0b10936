use socialgrab::{config::ServerConfig, server};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "socialgrab=info,tower_http=info".to_string()),
        )
        .init();

    if let Err(error) = server::run(ServerConfig::from_env()).await {
        eprintln!("Server error: {}", error.message());
        std::process::exit(1);
    }
}
