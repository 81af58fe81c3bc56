use anyhow::Result;

use crate::{config, session};

pub async fn run() -> Result<()> {
    let cfg = config::load_config()?;

    println!("Authenticating with Google...");

    session::authenticate(&cfg.google).await?;

    println!("\nTokens saved to {}", config::session_path()?.display());
    println!("Run `classcal import` to import your schedule.");

    Ok(())
}
