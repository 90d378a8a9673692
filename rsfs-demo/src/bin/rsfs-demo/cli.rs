use clap::Parser;
use rsfs::Geometry;
use rsfs::config::{BLOCK_SIZE, NUM_BLOCKS, NUM_INODES, NUM_OPEN_FILES, NUM_POINTERS};
use rsfs_demo::Workload;

#[derive(Parser)]
pub struct Cli {
    /// Number of files shared by the workers
    #[arg(long, short, default_value_t = 4)]
    pub files: usize,

    /// Number of reader threads
    #[arg(long, short, default_value_t = 4)]
    pub readers: usize,

    /// Number of writer threads
    #[arg(long, short, default_value_t = 2)]
    pub writers: usize,

    /// Sessions opened by each thread
    #[arg(long, default_value_t = 16)]
    pub rounds: usize,

    /// Data block size in bytes
    #[arg(long, default_value_t = BLOCK_SIZE)]
    pub block_size: usize,

    /// Number of data blocks
    #[arg(long, default_value_t = NUM_BLOCKS)]
    pub blocks: usize,

    /// Number of inodes
    #[arg(long, default_value_t = NUM_INODES)]
    pub inodes: usize,

    /// Direct block pointers per inode
    #[arg(long, default_value_t = NUM_POINTERS)]
    pub pointers: usize,

    /// Open-file table slots
    #[arg(long, default_value_t = NUM_OPEN_FILES)]
    pub open_files: usize,

    /// Skip the append/write/cut walkthrough
    #[arg(long)]
    pub skip_tour: bool,
}

impl Cli {
    pub fn geometry(&self) -> Geometry {
        Geometry {
            block_size: self.block_size,
            blocks: self.blocks,
            inodes: self.inodes,
            pointers: self.pointers,
            open_files: self.open_files,
        }
    }

    pub fn workload(&self) -> Workload {
        Workload {
            files: self.files,
            readers: self.readers,
            writers: self.writers,
            rounds: self.rounds,
        }
    }
}
