#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    if let Err(e) = dbcheck::run().await {
        eprintln!("dbcheck fatal: {e:#}");
        std::process::exit(1);
    }
    Ok(())
}
