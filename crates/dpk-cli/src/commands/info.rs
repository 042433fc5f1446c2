//! Handler for `dpk info`.

use std::path::PathBuf;

use miette::Result;

use dpk_ops::ops_info::{self, InfoOptions};

pub async fn exec(paths: &[PathBuf], names: &[String], json: bool) -> Result<()> {
    ops_info::info(paths, names, &InfoOptions { json }).await
}
