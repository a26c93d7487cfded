#[tokio::main]
async fn main() -> std::io::Result<()> {
    void_skies_server::run_with_config().await
}
