//! # 数据块池
//!
//! 定长的内存块数组加一张占用位图。位图只在本层被修改，
//! 且只在"扫描并翻转"期间持锁。

use derive_more::{From, Into};
use spin::{Mutex, RwLock};
use vfs::{Error, Resource, Result};

use crate::layout::Bitmap;

/// 块编号，即块在池中的下标
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, From, Into)]
#[repr(transparent)]
pub struct BlockId(usize);

pub struct BlockPool {
    block_size: usize,
    bitmap: Mutex<Bitmap>,
    blocks: Box<[RwLock<Box<[u8]>>]>,
}

impl BlockPool {
    pub fn new(blocks: usize, block_size: usize) -> Self {
        Self {
            block_size,
            bitmap: Mutex::new(Bitmap::new(blocks)),
            blocks: (0..blocks)
                .map(|_| RwLock::new(vec![0; block_size].into_boxed_slice()))
                .collect(),
        }
    }

    #[inline]
    pub fn block_size(&self) -> usize {
        self.block_size
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.blocks.len()
    }

    pub fn used(&self) -> usize {
        self.bitmap.lock().used()
    }

    /// 分配新的数据块并返回其编号
    pub fn alloc(&self) -> Result<BlockId> {
        let index = self
            .bitmap
            .lock()
            .alloc()
            .ok_or(Error::Exhausted(Resource::Blocks))?;
        log::trace!("alloc data block {index}");
        Ok(BlockId(index))
    }

    /// 清零后归还数据块，已删除的数据不会被下一次分配读到
    pub fn dealloc(&self, id: BlockId) {
        self.blocks[id.0].write().fill(0);
        self.bitmap.lock().dealloc(id.0);
        log::trace!("dealloc data block {}", id.0);
    }

    #[inline]
    pub fn map<V>(&self, id: BlockId, f: impl FnOnce(&[u8]) -> V) -> V {
        f(&self.blocks[id.0].read())
    }

    #[inline]
    pub fn map_mut<V>(&self, id: BlockId, f: impl FnOnce(&mut [u8]) -> V) -> V {
        f(&mut self.blocks[id.0].write())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exhaustion() {
        let pool = BlockPool::new(2, 8);
        assert_eq!(pool.alloc(), Ok(BlockId(0)));
        assert_eq!(pool.alloc(), Ok(BlockId(1)));
        assert_eq!(pool.alloc(), Err(Error::Exhausted(Resource::Blocks)));
        assert_eq!(pool.used(), 2);
    }

    #[test]
    fn freed_block_is_zeroed() {
        let pool = BlockPool::new(1, 8);
        let id = pool.alloc().unwrap();
        pool.map_mut(id, |data| data.copy_from_slice(b"deadbeef"));

        pool.dealloc(id);
        assert_eq!(pool.used(), 0);

        let id = pool.alloc().unwrap();
        assert_eq!(id, BlockId(0));
        pool.map(id, |data| assert!(data.iter().all(|&b| b == 0)));
    }
}
