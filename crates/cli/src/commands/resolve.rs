use anyhow::{Context, Result};

use schemegen_core::{CustomSchemeInfos, SchemeInfoSource};

use super::load_inputs;
use crate::cli::InputArgs;

pub fn resolve_command(inputs: InputArgs) -> Result<()> {
    let inputs = load_inputs(inputs)?;

    let scheme_infos = CustomSchemeInfos
        .scheme_infos(&inputs)
        .context("Failed to resolve custom schemes")?;

    println!("{}", serde_json::to_string_pretty(&scheme_infos)?);
    Ok(())
}
