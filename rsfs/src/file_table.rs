//! # 打开文件表
//!
//! 一个会话对应表中的一个槽位，槽位下标就是文件描述符。
//! 槽位的占用情况记在位图里，分配与归还只在翻转位时持表锁；
//! 会话状态各自由槽位锁保护。

use derive_more::{From, Into};
use spin::Mutex;
use vfs::{Error, Resource, Result};

use crate::layout::Bitmap;
use crate::{AccessMode, InodeId};

/// 文件描述符
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, From, Into)]
#[repr(transparent)]
pub struct Fd(usize);

/// 一次打开到关闭之间的访问状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpenFile {
    pub inode_id: InodeId,
    pub mode: AccessMode,
    /// **文件**内的偏移量
    pub position: usize,
}

impl OpenFile {
    pub fn check_writable(&self) -> Result<()> {
        if self.mode.writable() {
            Ok(())
        } else {
            Err(Error::AccessDenied)
        }
    }
}

#[derive(Debug)]
pub struct FileTable {
    bitmap: Mutex<Bitmap>,
    slots: Box<[Mutex<Option<OpenFile>>]>,
}

impl FileTable {
    pub fn new(slots: usize) -> Self {
        Self {
            bitmap: Mutex::new(Bitmap::new(slots)),
            slots: (0..slots).map(|_| Mutex::new(None)).collect(),
        }
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn used(&self) -> usize {
        self.bitmap.lock().used()
    }

    /// 占用一个空槽位，游标置零
    pub fn alloc(&self, inode_id: InodeId, mode: AccessMode) -> Result<Fd> {
        let index = self
            .bitmap
            .lock()
            .alloc()
            .ok_or(Error::Exhausted(Resource::Sessions))?;
        *self.slots[index].lock() = Some(OpenFile {
            inode_id,
            mode,
            position: 0,
        });
        Ok(Fd(index))
    }

    /// 归还槽位并交出其中的会话
    pub fn dealloc(&self, fd: Fd) -> Result<OpenFile> {
        let file = self.slot(fd)?.lock().take().ok_or(NOT_OPEN)?;
        self.bitmap.lock().dealloc(fd.0);
        Ok(file)
    }

    /// 独占地访问`fd`对应的会话
    pub fn with<V>(&self, fd: Fd, f: impl FnOnce(&mut OpenFile) -> Result<V>) -> Result<V> {
        let mut slot = self.slot(fd)?.lock();
        f(slot.as_mut().ok_or(NOT_OPEN)?)
    }

    fn slot(&self, fd: Fd) -> Result<&Mutex<Option<OpenFile>>> {
        self.slots
            .get(fd.0)
            .ok_or(Error::InvalidArgument("fd out of range"))
    }
}

const NOT_OPEN: Error = Error::InvalidArgument("fd is not open");
