use enumflags2::{BitFlags, bitflags};
use vfs::Error;

#[rustfmt::skip]
#[allow(clippy::upper_case_acronyms)]
#[bitflags]
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenFlag {
    /// 只写，不支持
    WRONLY = 0b0000_0000_0001,
    /// 读写兼备
    RDWR   = 0b0000_0000_0010,
    /// 文件不存在则创建
    CREATE = 0b0010_0000_0000,
    /// 准入后先清空文件，须与 RDWR 同用
    TRUNC  = 0b0100_0000_0000,
}

impl OpenFlag {
    // enumflags2拒绝值为0的标志
    /// 只读
    pub const RDONLY: u32 = 0b0000_0000_0000;

    #[inline]
    pub fn read_only() -> BitFlags<OpenFlag> {
        BitFlags::from_bits_truncate(Self::RDONLY)
    }

    #[inline]
    pub fn read_write() -> BitFlags<OpenFlag> {
        Self::RDWR.into()
    }
}

/// 会话的访问方式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessMode {
    ReadOnly,
    ReadWrite,
}

impl TryFrom<BitFlags<OpenFlag>> for AccessMode {
    type Error = Error;

    fn try_from(flags: BitFlags<OpenFlag>) -> Result<Self, Self::Error> {
        if flags.contains(OpenFlag::WRONLY) {
            return Err(Error::InvalidArgument("write-only access is not supported"));
        }
        if flags.contains(OpenFlag::RDWR) {
            Ok(Self::ReadWrite)
        } else if flags.contains(OpenFlag::TRUNC) {
            Err(Error::InvalidArgument("truncation requires read-write access"))
        } else {
            Ok(Self::ReadOnly)
        }
    }
}

impl AccessMode {
    #[inline]
    pub fn writable(self) -> bool {
        self == Self::ReadWrite
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn modes() {
        assert_eq!(
            AccessMode::try_from(OpenFlag::read_only()),
            Ok(AccessMode::ReadOnly)
        );
        assert_eq!(
            AccessMode::try_from(OpenFlag::RDWR | OpenFlag::CREATE | OpenFlag::TRUNC),
            Ok(AccessMode::ReadWrite)
        );
        assert!(AccessMode::try_from(BitFlags::from(OpenFlag::WRONLY)).is_err());
        assert!(AccessMode::try_from(BitFlags::from(OpenFlag::TRUNC)).is_err());
    }
}
