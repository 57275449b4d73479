//! `checkcfg mydecode.json`
//!
//! Parse and validate `mydecode.json`. No output and an exit code of 0
//! indicates success.

use anyhow::{anyhow, Result};
use std::env;
use lxitools::cfg::DecodeConfig;

fn main() -> Result<()> {
    let args = env::args().collect::<Vec<_>>();
    let path = args.get(1).ok_or_else(|| anyhow!("usage: checkcfg CONFIG"))?;
    let _config = DecodeConfig::load(path)?;

    Ok(())
}
