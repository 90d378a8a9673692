//! 引擎的容量参数

use vfs::{Error, Result};

/// 数据块大小(字节)
pub const BLOCK_SIZE: usize = 32;
/// 数据块总数
pub const NUM_BLOCKS: usize = 1024;
/// inode 总数，也即最多可容纳的文件数
pub const NUM_INODES: usize = 64;
/// 每个 inode 的直接索引数，决定了单个文件的最大长度
pub const NUM_POINTERS: usize = 16;
/// 打开文件表的槽位数
pub const NUM_OPEN_FILES: usize = 64;

/// 一个引擎实例的全部容量
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Geometry {
    pub block_size: usize,
    pub blocks: usize,
    pub inodes: usize,
    pub pointers: usize,
    pub open_files: usize,
}

impl Default for Geometry {
    fn default() -> Self {
        Self {
            block_size: BLOCK_SIZE,
            blocks: NUM_BLOCKS,
            inodes: NUM_INODES,
            pointers: NUM_POINTERS,
            open_files: NUM_OPEN_FILES,
        }
    }
}

impl Geometry {
    /// 单个文件的最大长度(字节)
    #[inline]
    pub fn file_capacity(&self) -> usize {
        self.pointers * self.block_size
    }

    pub fn validate(&self) -> Result<()> {
        let fields = [
            (self.block_size, "block size must be positive"),
            (self.blocks, "block count must be positive"),
            (self.inodes, "inode count must be positive"),
            (self.pointers, "pointer count must be positive"),
            (self.open_files, "open-file slot count must be positive"),
        ];
        match fields.into_iter().find(|&(value, _)| value == 0) {
            Some((_, reason)) => Err(Error::InvalidArgument(reason)),
            None => Ok(()),
        }
    }
}
