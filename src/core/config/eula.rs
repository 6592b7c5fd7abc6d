use tracing::info;

use crate::core::error::{ServerError, ServerResult};
use crate::core::server::ServerLayout;

const EULA_ACCEPTED: &str = "eula=true\n";

/// Overwrite `eula.txt` with the acceptance line the server requires
/// before it will boot.
pub async fn accept_eula(layout: &ServerLayout) -> ServerResult<()> {
    let path = layout.eula_path();
    tokio::fs::write(&path, EULA_ACCEPTED)
        .await
        .map_err(|e| ServerError::io(&path, e))?;

    info!("EULA accepted automatically");
    Ok(())
}
