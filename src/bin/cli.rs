//! blockfile CLI
//!
//! Command-line interface for creating and inspecting block containers.

use blockfile::{BlockContainer, BlockFileError};
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

/// blockfile CLI
#[derive(Parser, Debug)]
#[command(name = "blockfile-cli")]
#[command(about = "Create and inspect blockfile containers")]
#[command(version)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create a new, empty container
    Create {
        /// Path of the container to create
        path: String,

        /// Block size in bytes
        #[arg(short, long, default_value = "4096")]
        block_size: u32,

        /// Format revision
        #[arg(short, long, default_value = "1")]
        revision: u8,
    },

    /// Print a container's header metadata
    Info {
        /// Path of the container
        path: String,
    },

    /// Print the number of blocks in a container
    Count {
        /// Path of the container
        path: String,
    },

    /// Hex-dump one block
    Read {
        /// Path of the container
        path: String,

        /// Block index
        index: u64,
    },

    /// Write text into one block (zero-padded to the block size)
    Write {
        /// Path of the container
        path: String,

        /// Block index
        index: u64,

        /// The text to store
        text: String,
    },
}

fn main() {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,blockfile=info"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    if let Err(e) = run(args.command) {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}

fn run(command: Commands) -> blockfile::Result<()> {
    match command {
        Commands::Create {
            path,
            block_size,
            revision,
        } => {
            let mut container = blockfile::create_container(&path, revision, block_size)?;
            tracing::info!("Created {} (block size {})", path, container.block_size());
            container.close()
        }

        Commands::Info { path } => {
            let mut container = blockfile::open_container(&path)?;
            let info = container.info();
            println!("File          {}", info.file_name);
            println!("Revision      {}", info.revision.as_u8());
            println!("Block size    {} B", info.block_size);
            println!("Header size   {} B", info.header_size);
            match container.num_blocks() {
                Ok(count) => println!("Blocks        {}", count),
                Err(e @ BlockFileError::MisalignedBlockArea { .. }) => {
                    let floor = e.floor_block_count().unwrap_or(0);
                    println!("Blocks        {} (degraded: {})", floor, e)
                }
                Err(e) => return Err(e),
            }
            container.close()
        }

        Commands::Count { path } => {
            let mut container = blockfile::open_container(&path)?;
            let count = match container.num_blocks() {
                Ok(count) => count,
                Err(BlockFileError::MisalignedBlockArea { blocks, remainder }) => {
                    tracing::warn!("{} trailing bytes after block {}", remainder, blocks);
                    blocks
                }
                Err(e) => return Err(e),
            };
            println!("{}", count);
            container.close()
        }

        Commands::Read { path, index } => {
            let mut container = blockfile::open_container(&path)?;
            let block = container.read_block(index)?;
            let base = container.info().block_offset(index).unwrap_or(0);
            for (row, chunk) in block.chunks(16).enumerate() {
                let hex: Vec<String> = chunk.iter().map(|b| format!("{:02x}", b)).collect();
                println!("{:012x}  {}", base + (row * 16) as u64, hex.join(" "));
            }
            container.close()
        }

        Commands::Write { path, index, text } => {
            let mut container = blockfile::open_container(&path)?;
            let written = container.write_block(text.as_bytes(), index)?;
            tracing::info!("Wrote {} bytes to block {} of {}", written, index, path);
            container.close()
        }
    }
}
