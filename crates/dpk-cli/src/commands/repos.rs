use miette::Result;

use dpk_core::config::DpkConfig;

pub fn exec(config: &DpkConfig) -> Result<()> {
    dpk_ops::ops_repos::repos(config)
}
