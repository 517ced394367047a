#[tokio::main]
async fn main() -> anyhow::Result<()> {
    buyback_server::start().await
}
