use anyhow::{Result, ensure};
use clap::Parser;
use std::path::PathBuf;
use tile_snake::board::BorderPolicy;
use tile_snake::modes::HumanMode;

#[derive(Parser)]
#[command(name = "tile_snake")]
#[command(version, about = "Terminal snake on level-driven tile boards")]
struct Cli {
    /// Board width when playing the default level
    #[arg(long, default_value = "20")]
    width: usize,

    /// Board height when playing the default level
    #[arg(long, default_value = "15")]
    height: usize,

    /// Level file to play instead of the default border box
    #[arg(long)]
    level: Option<PathBuf>,

    /// Initial game speed (higher is faster)
    #[arg(long, default_value = "5")]
    speed: u32,

    /// Make the map edges lethal instead of teleporting
    #[arg(long)]
    solid_borders: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    ensure!(
        cli.width >= 4 && cli.height >= 4,
        "board must be at least 4x4"
    );

    let policy = if cli.solid_borders {
        BorderPolicy::Solid
    } else {
        BorderPolicy::Wrap
    };

    let mut human_mode = HumanMode::new(cli.width, cli.height, cli.level, cli.speed, policy)?;
    human_mode.run().await?;

    Ok(())
}
