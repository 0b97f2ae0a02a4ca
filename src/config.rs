use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use anyhow::{Context, Result};
use derivative::Derivative;
use serde::{Deserialize, Serialize};
use yomi::algo::shanten::ShantenOptions;
use yomi::t;
use yomi::tile::Tile;

/// Defaults for flags that rarely change between runs. Every field is
/// optional in the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Derivative, Serialize, Deserialize)]
#[derivative(Default)]
#[serde(default)]
pub struct Config {
    pub shanten: ShantenOptions,
    #[derivative(Default(value = "t!(E)"))]
    pub bakaze: Tile,
    #[derivative(Default(value = "t!(E)"))]
    pub jikaze: Tile,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("failed to open config {}", path.display()))?;
        serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("failed to parse config {}", path.display()))
    }
}
