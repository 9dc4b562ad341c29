use crate::api;
use crate::cli::actions::Action;
use anyhow::Result;

/// Handle the server action
pub async fn handle(action: Action) -> Result<()> {
    match action {
        Action::Server {
            port,
            db,
            icon_cache,
        } => {
            api::new(port, &db, icon_cache).await?;
        }
    }

    Ok(())
}
