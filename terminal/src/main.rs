use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use common::{LoadOptions, MoveIndex, DEFAULT_MAX_BOARD_DIMENSION, DEFAULT_MAX_LINE_LENGTH, NO_MOVE};
use std::path::PathBuf;
use terminal::render::BoardRenderer;
use terminal::replay::player::ReplayPlayer;
use terminal::replay::reader::ReplayReader;
use terminal::replay::ReplaySummary;
use tracing::info;

#[derive(Parser, Debug)]
#[command(
    name = "replay2048-terminal",
    about = "Inspect recorded 2048 replay files"
)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Longest accepted line in the replay file, in bytes
    #[arg(long, global = true, default_value_t = DEFAULT_MAX_LINE_LENGTH)]
    max_line_length: usize,

    /// Largest accepted board side length
    #[arg(long, global = true, default_value_t = DEFAULT_MAX_BOARD_DIMENSION)]
    max_board_dimension: usize,

    /// Reject moves with fewer tiles than the board holds instead of zero-filling
    #[arg(long, global = true)]
    strict_tiles: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print replay metadata
    Info {
        file: PathBuf,

        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the board at one move (the first move by default)
    Show {
        file: PathBuf,

        /// Move index; -1 shows the empty board before the first move
        #[arg(long = "move", allow_negative_numbers = true, conflicts_with = "last")]
        index: Option<MoveIndex>,

        /// Show the final move
        #[arg(long)]
        last: bool,
    },
    /// Dump raw tile values for one move or every move
    Dump {
        file: PathBuf,

        /// Move index to dump; every move when omitted
        #[arg(long = "move", allow_negative_numbers = true)]
        index: Option<MoveIndex>,
    },
}

impl Args {
    fn load_options(&self) -> LoadOptions {
        LoadOptions {
            max_line_length: self.max_line_length,
            max_board_dimension: self.max_board_dimension,
            strict_tiles: self.strict_tiles,
        }
    }
}

fn main() -> Result<()> {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let options = args.load_options();

    match args.command {
        Command::Info { file, json } => {
            let store = ReplayReader::load_replay(&file, options)?;
            let summary = ReplaySummary::from_store(&store);
            if json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                print_summary(&summary);
            }
        }
        Command::Show { file, index, last } => {
            let mut player = ReplayPlayer::new(options);
            player
                .load(&file)
                .with_context(|| format!("Failed to load replay file: {:?}", file))?;
            position_player(&mut player, index, last)?;
            print_position(&player);
        }
        Command::Dump { file, index } => {
            let store = ReplayReader::load_replay(&file, options)?;
            match index {
                Some(i) => match store.format_move_tiles(i) {
                    Some(dump) => print!("{}", dump),
                    None => bail!("Move {} is out of range ({} moves)", i, store.move_count()),
                },
                None => print!("{}", store.format_all_tiles()),
            }
        }
    }

    Ok(())
}

fn position_player(player: &mut ReplayPlayer, index: Option<MoveIndex>, last: bool) -> Result<()> {
    let count = player.store().move_count();
    let moved = match (index, last) {
        (_, true) => player.seek_last(),
        (Some(NO_MOVE), false) => true,
        (Some(i), false) => player.seek_to_move(i),
        // An empty replay has nothing but the initial board
        (None, false) => player.seek_first() || count == 0,
    };
    if !moved {
        bail!("Move {:?} is out of range ({} moves)", index, count);
    }
    info!("Positioned at move {} of {}", player.current_index(), count);
    Ok(())
}

fn print_summary(summary: &ReplaySummary) {
    println!("File:            {}", summary.file_name);
    println!("Moves:           {}", summary.move_count);
    println!(
        "Board:           {}x{}",
        summary.board_dimension, summary.board_dimension
    );
    println!("Winning tile:    {}", summary.sentinel_value);
    println!("Spawns per move: {}", summary.spawn_count);
    println!("Playback delay:  {} ms", summary.playback_delay_ms);
    println!("Undo used:       {}", if summary.did_undo { "yes" } else { "no" });
    println!("Final score:     {}", summary.final_score);
    println!("Best score:      {}", summary.best_score);
    println!("Highest tile:    {}", summary.highest_tile);
    println!("Result:          {}", if summary.game_won { "won" } else { "not won" });
}

fn print_position(player: &ReplayPlayer) {
    let store = player.store();
    let index = player.current_index();
    let directions = player.current_directions();

    println!(
        "Move: {} / {} | Score: {} | Best: {} | {} -> {}",
        index + 1,
        store.move_count(),
        player.current_score(),
        player.current_best_score(),
        directions.prev,
        directions.next,
    );

    let renderer = BoardRenderer::for_store(store);
    for line in renderer.render(player.current_tiles(), store.board_dimension()) {
        println!("{}", line);
    }

    if store.is_win_at(index) {
        println!("Reached {}!", store.sentinel_value());
    }
    store.log_move_tiles(index);
}
