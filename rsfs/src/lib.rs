//! # rsfs
//!
//! 驻留内存的文件存储引擎：定长的数据块池与 inode 表、一层扁平目录、
//! 以会话为单位的打开文件表，供多个线程并发使用。

/* rsfs 的整体架构，自上而下 */

// 引擎层：创建、打开、读写、删除等操作
mod efs;

// 状况报告
mod report;

// 打开文件表：会话与文件描述符
mod file_table;

// 根目录：名字到 inode 的绑定
mod directory;

// 读者-写者准入
mod admission;

// inode 表
mod inode_table;

// 数据块池
mod block_pool;

// 内存数据结构层：位图与 inode 的块映射
mod layout;

mod flags;

pub mod config;

pub use self::{
    admission::AccessState,
    config::Geometry,
    directory::NAME_MAX_LEN,
    efs::Rsfs,
    file_table::Fd,
    flags::{AccessMode, OpenFlag},
    inode_table::InodeId,
    report::{FsStat, Usage},
};
