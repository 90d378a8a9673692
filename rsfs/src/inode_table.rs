//! # inode 表
//!
//! 定长的 inode 槽位数组加一张占用位图。每个 inode 各自带有读写准入，
//! 与表的分配锁互不相干。

use derive_more::{From, Into};
use spin::{Mutex, RwLock};
use vfs::{Error, Resource, Result};

use crate::admission::Admission;
use crate::layout::{Bitmap, Inode};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, From, Into)]
#[repr(transparent)]
pub struct InodeId(usize);

#[derive(Debug)]
pub struct InodeSlot {
    pub inode: RwLock<Inode>,
    pub admission: Admission,
}

#[derive(Debug)]
pub struct InodeTable {
    bitmap: Mutex<Bitmap>,
    slots: Box<[InodeSlot]>,
}

impl InodeTable {
    pub fn new(inodes: usize, pointers: usize) -> Self {
        Self {
            bitmap: Mutex::new(Bitmap::new(inodes)),
            slots: (0..inodes)
                .map(|_| InodeSlot {
                    inode: RwLock::new(Inode::new(pointers)),
                    admission: Admission::new(),
                })
                .collect(),
        }
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn used(&self) -> usize {
        self.bitmap.lock().used()
    }

    /// 分配新的 inode 并返回其ID
    pub fn alloc(&self) -> Result<InodeId> {
        let index = self
            .bitmap
            .lock()
            .alloc()
            .ok_or(Error::Exhausted(Resource::Inodes))?;
        self.slots[index].inode.write().init();
        log::trace!("alloc inode {index}");
        Ok(InodeId(index))
    }

    /// 归还 inode，调用者须先归还它的全部数据块
    pub fn dealloc(&self, id: InodeId) {
        debug_assert_eq!(self.slots[id.0].inode.read().blocks(), 0);
        self.bitmap.lock().dealloc(id.0);
        log::trace!("dealloc inode {}", id.0);
    }

    #[inline]
    pub fn get(&self, id: InodeId) -> &InodeSlot {
        &self.slots[id.0]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reuse_lowest_free() {
        let table = InodeTable::new(3, 4);
        let ids: Vec<_> = (0..3).map(|_| table.alloc().unwrap()).collect();
        assert_eq!(ids, [InodeId(0), InodeId(1), InodeId(2)]);
        assert_eq!(table.alloc(), Err(Error::Exhausted(Resource::Inodes)));

        table.dealloc(InodeId(1));
        assert_eq!(table.used(), 2);
        assert_eq!(table.alloc(), Ok(InodeId(1)));
    }
}
