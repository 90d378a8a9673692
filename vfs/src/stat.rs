/// 单个文件的状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stat {
    /// Inode number
    pub inode: u64,
    /// File size
    pub size: u64,
    /// Occupying blocks
    pub blocks: u64,
    /// Optimal I/O block size
    pub block_size: u64,
}
