use core::fmt;

pub type Result<T> = core::result::Result<T, Error>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("file already exists")]
    AlreadyExists,
    #[error("no such file")]
    NotFound,
    #[error("{0} exhausted")]
    Exhausted(Resource),
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),
    /// 在只读会话上做写类操作
    #[error("session is not writable")]
    AccessDenied,
    /// 文件仍有打开的会话
    #[error("file is still open")]
    Busy,
}

/// 会被用尽的定长资源
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Blocks,
    Inodes,
    Sessions,
    /// 单个 inode 的直接索引，即文件容量
    DirectPointers,
}

impl Error {
    /// 经典的负数返回码，每种错误各不相同
    pub fn code(&self) -> i32 {
        match self {
            Self::AlreadyExists => -1,
            Self::Exhausted(Resource::Inodes) => -2,
            Self::Exhausted(Resource::Blocks) => -3,
            Self::Exhausted(Resource::Sessions) => -4,
            Self::Exhausted(Resource::DirectPointers) => -5,
            Self::NotFound => -6,
            Self::InvalidArgument(_) => -7,
            Self::AccessDenied => -8,
            Self::Busy => -9,
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Blocks => "data blocks",
            Self::Inodes => "inodes",
            Self::Sessions => "open-file slots",
            Self::DirectPointers => "direct pointers",
        })
    }
}
