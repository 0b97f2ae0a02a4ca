mod config;
mod report;

use config::Config;
use report::{Query, Report};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use yomi::hand::parse_hand;
use yomi::tile::Tile;

/// Shanten, ukeire, winning structures, yaku and points of a riichi mahjong
/// hand.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Tenhou notation; `[...]` for called sets and `(...)` for ankans,
    /// e.g. "123m 55p [789s] (1111z) 4m"
    hand: String,

    /// Defaults to the last concealed tile of a 14-tile hand
    #[arg(short, long)]
    winning_tile: Option<Tile>,

    #[arg(short, long)]
    tsumo: bool,

    #[arg(long)]
    bakaze: Option<Tile>,

    /// The seat is oya when this is E
    #[arg(long)]
    jikaze: Option<Tile>,

    /// Dora indicator, may be repeated
    #[arg(short, long = "dora")]
    doras: Vec<Tile>,

    /// Ura dora indicator, may be repeated
    #[arg(short, long = "ura")]
    uras: Vec<Tile>,

    /// Han from yaku the hand cannot show, like riichi or ippatsu
    #[arg(long, default_value_t = 0)]
    extra_han: u8,

    #[arg(long)]
    no_chitoi: bool,

    #[arg(long)]
    no_kokushi: bool,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,

    /// JSON file with defaults for shanten options and winds
    #[arg(short, long)]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let args = Args::parse();
    let config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    info!("using {config:?}");

    let mut shanten = config.shanten;
    shanten.chitoi &= !args.no_chitoi;
    shanten.kokushi &= !args.no_kokushi;
    let query = Query {
        winning_tile: args.winning_tile,
        is_tsumo: args.tsumo,
        bakaze: args.bakaze.unwrap_or(config.bakaze),
        jikaze: args.jikaze.unwrap_or(config.jikaze),
        dora_indicators: args.doras,
        ura_indicators: args.uras,
        additional_hans: args.extra_han,
        shanten,
    };

    let (hand, last_tile) =
        parse_hand(&args.hand).with_context(|| format!("failed to parse hand {:?}", args.hand))?;
    let report = Report::new(&hand, last_tile, &query)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{report}");
    }
    Ok(())
}
