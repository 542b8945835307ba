//! blockdb CLI
//!
//! Offline inspection of a block database directory. Operates on the
//! [`RawBlock`] collaborator type shipped with the crate.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use blockdb::{BlockDatabase, RawBlock, Result};

/// blockdb CLI
#[derive(Parser, Debug)]
#[command(name = "blockdb-cli")]
#[command(about = "Inspect a blockdb database directory")]
struct Args {
    /// Database directory
    #[arg(short, long, default_value = "./blockdb_data")]
    dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print slot count, blob size, and the last stored block
    Stats,

    /// Print the most recent block that has not been removed
    Last,

    /// Fetch a block by sequence number
    Get {
        /// The sequence number to fetch
        number: u64,
    },

    /// Print the identifier recorded at a sequence number
    Id {
        /// The sequence number to look up
        number: u64,
    },
}

fn run(args: Args) -> Result<()> {
    let mut db: BlockDatabase<RawBlock> = BlockDatabase::open_path(&args.dir)?;

    match args.command {
        Commands::Stats => {
            println!("slots:      {}", db.slot_count()?);
            println!("blob bytes: {}", db.blob_size()?);
            match db.last()? {
                Some(block) => println!("last:       height {}", block.height),
                None => println!("last:       (none)"),
            }
        }
        Commands::Last => match db.last()? {
            Some(block) => {
                println!("height:  {}", block.height);
                println!("id:      {}", blockdb::Block::id(&block));
                println!("payload: {} bytes", block.payload.len());
            }
            None => println!("database holds no valid blocks"),
        },
        Commands::Get { number } => match db.fetch_by_number(number)? {
            Some(block) => {
                println!("height:  {}", block.height);
                println!("id:      {}", blockdb::Block::id(&block));
                println!("payload: {} bytes", block.payload.len());
            }
            None => println!("slot {} is empty or tombstoned", number),
        },
        Commands::Id { number } => {
            let id = db.fetch_block_id(number)?;
            println!("{}", id);
        }
    }

    db.close();
    Ok(())
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    if let Err(e) = run(args) {
        eprintln!("error: {}", e);
        process::exit(1);
    }
}
