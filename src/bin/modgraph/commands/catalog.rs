//! `modgraph catalog` command

use anyhow::Result;

use modgraph::core::catalog;

pub fn execute() -> Result<()> {
    print!("{}", catalog::voxel_plugin().to_toml()?);
    Ok(())
}
