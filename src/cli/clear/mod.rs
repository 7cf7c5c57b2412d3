//! Clear command - empties the semantic cache

/// Clear every cached answer
pub async fn run() -> anyhow::Result<()> {
    let service = super::bootstrap().await?;
    service.clear_cache().await;

    println!("Cache cleared.");

    Ok(())
}
