//! # 引擎层
//!
//! 把块池、inode 表、目录与打开文件表装配成一个文件系统实例，
//! 对外提供类 POSIX 的会话式接口。实例可在线程间共享。
//!
//! 加锁顺序：目录 → 会话槽位 → inode → 数据块 → 位图。
//! 准入只在打开/关闭时取得或归还，等待准入时不持有其它任何锁。

use enumflags2::BitFlags;
use spin::RwLock;
use vfs::{Error, Result, Stat};

use crate::block_pool::BlockPool;
use crate::directory::{self, Directory};
use crate::file_table::FileTable;
use crate::inode_table::{InodeSlot, InodeTable};
use crate::report::{FsStat, Usage};
use crate::{AccessMode, AccessState, Fd, Geometry, InodeId, OpenFlag};

pub struct Rsfs {
    geometry: Geometry,
    block_pool: BlockPool,
    inode_table: InodeTable,
    directory: RwLock<Directory>,
    file_table: FileTable,
}

impl Rsfs {
    /// 按给定容量建立一个空的文件系统
    pub fn new(geometry: Geometry) -> Result<Self> {
        geometry.validate()?;
        log::info!("init rsfs with {geometry:?}");

        Ok(Self {
            geometry,
            block_pool: BlockPool::new(geometry.blocks, geometry.block_size),
            inode_table: InodeTable::new(geometry.inodes, geometry.pointers),
            directory: RwLock::new(Directory::new()),
            file_table: FileTable::new(geometry.open_files),
        })
    }

    #[inline]
    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    /// 创建空文件并返回其 inode
    pub fn create(&self, name: &str) -> Result<InodeId> {
        directory::validate_name(name)?;
        let mut dir = self.directory.write();
        self.create_in(&mut dir, name)
    }

    /// 打开文件。
    ///
    /// 只读打开在文件被读写打开期间阻塞；读写打开在文件有任何会话期间阻塞。
    pub fn open(&self, name: &str, flags: BitFlags<OpenFlag>) -> Result<Fd> {
        let mode = AccessMode::try_from(flags)?;

        // 解析名字与登记等待须在同一把目录锁下完成，删除才看得见这次打开
        let inode_id = if flags.contains(OpenFlag::CREATE) {
            directory::validate_name(name)?;
            let mut dir = self.directory.write();
            let inode_id = match dir.find(name) {
                Some(inode_id) => inode_id,
                None => self.create_in(&mut dir, name)?,
            };
            self.slot(inode_id).admission.reserve();
            inode_id
        } else {
            let dir = self.directory.read();
            let inode_id = dir.find(name).ok_or_else(|| {
                log::warn!("open: {name:?} does not exist");
                Error::NotFound
            })?;
            self.slot(inode_id).admission.reserve();
            inode_id
        };

        let slot = self.slot(inode_id);
        slot.admission.enter(mode);

        let fd = match self.file_table.alloc(inode_id, mode) {
            Ok(fd) => fd,
            Err(err) => {
                log::warn!("open: {err}");
                slot.admission.leave(mode);
                return Err(err);
            }
        };

        if flags.contains(OpenFlag::TRUNC) {
            slot.inode.write().clear(&self.block_pool);
        }

        log::debug!("open {name:?} as {fd:?} ({mode:?})");
        Ok(fd)
    }

    /// 从游标处写入`buf`，写入范围之后的内容保持不变
    pub fn append(&self, fd: Fd, buf: &[u8]) -> Result<usize> {
        check_size(buf.len())?;
        self.file_table.with(fd, |file| {
            file.check_writable()?;
            let mut inode = self.slot(file.inode_id).inode.write();
            let written = inode.write_at(file.position, buf, &self.block_pool)?;
            file.position += written;
            Ok(written)
        })
    }

    /// 从游标处写入`buf`，并丢弃写入范围之后的全部旧内容
    pub fn write(&self, fd: Fd, buf: &[u8]) -> Result<usize> {
        check_size(buf.len())?;
        self.file_table.with(fd, |file| {
            file.check_writable()?;
            let mut inode = self.slot(file.inode_id).inode.write();
            inode.truncate(file.position + buf.len(), &self.block_pool);
            let written = inode.write_at(file.position, buf, &self.block_pool)?;
            file.position += written;
            Ok(written)
        })
    }

    /// 从游标处读出至多`buf.len()`字节，返回实际读到的字节数
    pub fn read(&self, fd: Fd, buf: &mut [u8]) -> Result<usize> {
        check_size(buf.len())?;
        self.file_table.with(fd, |file| {
            let inode = self.slot(file.inode_id).inode.read();
            let read = inode.read_at(file.position, buf, &self.block_pool);
            file.position += read;
            Ok(read)
        })
    }

    /// 把游标移到`offset`，只接受`0..=length`；越界时游标不动
    pub fn seek(&self, fd: Fd, offset: usize) -> Result<usize> {
        self.file_table.with(fd, |file| {
            let length = self.slot(file.inode_id).inode.read().len();
            if offset > length {
                log::warn!("seek: offset {offset} beyond length {length}");
                return Err(Error::InvalidArgument("offset beyond end of file"));
            }
            file.position = offset;
            Ok(offset)
        })
    }

    #[inline]
    pub fn tell(&self, fd: Fd) -> Result<usize> {
        self.file_table.with(fd, |file| Ok(file.position))
    }

    /// 删去游标处起`size`字节，其后内容前移；完成后游标位于新的文件末尾
    pub fn cut(&self, fd: Fd, size: usize) -> Result<usize> {
        check_size(size)?;
        self.file_table.with(fd, |file| {
            file.check_writable()?;
            let mut inode = self.slot(file.inode_id).inode.write();
            if file.position.checked_add(size).is_none_or(|end| end > inode.len()) {
                return Err(Error::InvalidArgument("cut range beyond end of file"));
            }
            inode.cut(file.position, size, &self.block_pool);
            file.position = inode.len();
            Ok(size)
        })
    }

    pub fn close(&self, fd: Fd) -> Result<()> {
        let file = self.file_table.dealloc(fd)?;
        self.slot(file.inode_id).admission.leave(file.mode);
        log::debug!("close {fd:?}");
        Ok(())
    }

    /// 删除文件；文件仍被打开(或正有人等着打开)时拒绝
    pub fn delete(&self, name: &str) -> Result<()> {
        let mut dir = self.directory.write();
        let inode_id = dir.find(name).ok_or(Error::NotFound)?;
        let slot = self.slot(inode_id);
        if !slot.admission.is_idle() {
            log::warn!("delete: {name:?} is still open");
            return Err(Error::Busy);
        }

        slot.inode.write().clear(&self.block_pool);
        self.inode_table.dealloc(inode_id);
        dir.remove(name);

        log::debug!("delete {name:?}");
        Ok(())
    }

    pub fn metadata(&self, name: &str) -> Result<Stat> {
        let inode_id = self.directory.read().find(name).ok_or(Error::NotFound)?;
        Ok(self.stat_of(inode_id))
    }

    /// 文件当前的准入状态
    pub fn access_state(&self, name: &str) -> Result<AccessState> {
        let inode_id = self.directory.read().find(name).ok_or(Error::NotFound)?;
        Ok(self.slot(inode_id).admission.access())
    }

    pub fn fstat(&self, fd: Fd) -> Result<Stat> {
        let inode_id = self.file_table.with(fd, |file| Ok(file.inode_id))?;
        Ok(self.stat_of(inode_id))
    }

    /// 文件系统整体状况的快照
    pub fn stat(&self) -> FsStat {
        let files = self
            .directory
            .read()
            .iter()
            .map(|entry| vfs::DirEntry {
                inode: usize::from(entry.inode_id()) as u64,
                name: entry.name().to_owned(),
                size: self.slot(entry.inode_id()).inode.read().len() as u64,
            })
            .collect();

        FsStat {
            files,
            blocks: Usage::new(self.block_pool.capacity(), self.block_pool.used()),
            inodes: Usage::new(self.inode_table.capacity(), self.inode_table.used()),
            open_files: Usage::new(self.file_table.capacity(), self.file_table.used()),
        }
    }
}

impl Rsfs {
    #[inline]
    fn slot(&self, inode_id: InodeId) -> &InodeSlot {
        self.inode_table.get(inode_id)
    }

    fn create_in(&self, dir: &mut Directory, name: &str) -> Result<InodeId> {
        // 确认没有已创建的同名项
        if dir.find(name).is_some() {
            log::warn!("create: {name:?} already exists");
            return Err(Error::AlreadyExists);
        }

        let inode_id = self.inode_table.alloc()?;
        dir.insert(name, inode_id);

        log::debug!("create {name:?} at {inode_id:?}");
        Ok(inode_id)
    }

    fn stat_of(&self, inode_id: InodeId) -> Stat {
        let inode = self.slot(inode_id).inode.read();
        Stat {
            inode: usize::from(inode_id) as u64,
            size: inode.len() as u64,
            blocks: inode.blocks() as u64,
            block_size: self.geometry.block_size as u64,
        }
    }
}

#[inline]
fn check_size(size: usize) -> Result<()> {
    if size == 0 {
        Err(Error::InvalidArgument("size must be positive"))
    } else {
        Ok(())
    }
}
