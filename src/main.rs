#[tokio::main]
async fn main() -> anyhow::Result<()> {
    broker_service_lib::run().await?;
    Ok(())
}
