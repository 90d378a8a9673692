//! 文件系统之间共享的词汇：错误、文件状态与目录项。

mod dirent;
mod error;
mod stat;

pub use self::{
    dirent::DirEntry,
    error::{Error, Resource, Result},
    stat::Stat,
};
