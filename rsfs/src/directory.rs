//! # 根目录
//!
//! 唯一的一层扁平命名空间：按创建顺序排列的"名字 → inode"绑定，线性查找。
//! 目录本身不加锁，由上层整体包一把读写锁；名字唯一性由上层在插入前检查。

use vfs::{Error, Result};

use crate::InodeId;

/// 文件名的最大字节数
pub const NAME_MAX_LEN: usize = 27;

/// 文件系统项的元信息
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    name: String,
    inode_id: InodeId,
}

impl DirEntry {
    #[inline]
    pub fn new(name: &str, inode_id: InodeId) -> Self {
        Self {
            name: name.to_owned(),
            inode_id,
        }
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn inode_id(&self) -> InodeId {
        self.inode_id
    }
}

#[derive(Debug, Default)]
pub struct Directory {
    entries: Vec<DirEntry>,
}

impl Directory {
    pub fn new() -> Self {
        Self::default()
    }

    /// 根据文件名获取 inode
    pub fn find(&self, name: &str) -> Option<InodeId> {
        self.entries
            .iter()
            .find_map(|entry| (entry.name == name).then_some(entry.inode_id))
    }

    /// 在末尾追加目录项
    pub fn insert(&mut self, name: &str, inode_id: InodeId) {
        debug_assert!(self.find(name).is_none(), "duplicate name {name:?}");
        self.entries.push(DirEntry::new(name, inode_id));
    }

    /// 删除目录项并返回其 inode，其余目录项保持原有顺序
    pub fn remove(&mut self, name: &str) -> Option<InodeId> {
        let index = self.entries.iter().position(|entry| entry.name == name)?;
        Some(self.entries.remove(index).inode_id)
    }

    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &DirEntry> {
        self.entries.iter()
    }
}

pub fn validate_name(name: &str) -> Result<()> {
    if name.is_empty() {
        Err(Error::InvalidArgument("file name is empty"))
    } else if name.len() > NAME_MAX_LEN {
        Err(Error::InvalidArgument("file name is too long"))
    } else {
        Ok(())
    }
}
