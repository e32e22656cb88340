/*
 * Responsibility
 * - start the tokio runtime and hand off to app::run()
 */
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    casting_api::app::run().await
}
