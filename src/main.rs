#[tokio::main]
async fn main() -> anyhow::Result<()> {
    quiz_bank::run().await
}
