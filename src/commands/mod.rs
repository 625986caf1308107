pub mod cite;
pub mod convert;
pub mod tags;

use std::path::Path;

use anyhow::Result;
use tracing::{info, warn};

use crate::notes::DisplayNames;

fn load_display_names(path: &Path) -> Result<DisplayNames> {
    if !path.exists() {
        warn!(path = %path.display(), "display name map missing, tokens pass through");
        return Ok(DisplayNames::default());
    }

    let names = DisplayNames::load(path)?;
    info!(path = %path.display(), "loaded display name map");
    Ok(names)
}
