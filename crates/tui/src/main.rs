use sdg_finance_tui::{app::App, config, error::Result, logging, session::Session};

#[tokio::main]
async fn main() -> Result<()> {
    let config = config::load()?;
    logging::init(&config)?;

    let mut session = Session::load(&config.session_file)?;
    if let Some(token) = config.token.as_deref().filter(|t| !t.trim().is_empty()) {
        tracing::info!("using access token from configuration");
        session = Session::signed_in(token.trim());
    }

    let mut app = App::new(config, session)?;
    app.run().await?;
    Ok(())
}
