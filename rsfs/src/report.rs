//! 文件系统状况报告

use core::fmt;

/// 定长资源的使用情况
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Usage {
    pub total: usize,
    pub used: usize,
}

impl Usage {
    #[inline]
    pub fn new(total: usize, used: usize) -> Self {
        Self { total, used }
    }

    #[inline]
    pub fn unused(&self) -> usize {
        self.total - self.used
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FsStat {
    /// 按创建顺序排列
    pub files: Vec<vfs::DirEntry>,
    pub blocks: Usage,
    pub inodes: Usage,
    /// 打开文件表的会话槽位
    pub open_files: Usage,
}

impl fmt::Display for FsStat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Current status of the file system:")?;
        writeln!(f)?;
        writeln!(f, " {:>16}{:>10}{:>10}", "File Name", "Length", "iNode #")?;
        for file in &self.files {
            writeln!(f, "{:>16}{:>10}{:>10}", file.name, file.size, file.inode)?;
        }
        writeln!(f)?;
        writeln!(
            f,
            "Total Data Blocks: {:>4},  Used: {},  Unused: {}",
            self.blocks.total,
            self.blocks.used,
            self.blocks.unused()
        )?;
        writeln!(
            f,
            "Total iNode Blocks: {:>3},  Used: {},  Unused: {}",
            self.inodes.total,
            self.inodes.used,
            self.inodes.unused()
        )?;
        writeln!(f, "Total Opened Files: {:>3}", self.open_files.used)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render() {
        let stat = FsStat {
            files: vec![vfs::DirEntry {
                inode: 0,
                name: "notes".to_owned(),
                size: 11,
            }],
            blocks: Usage::new(64, 1),
            inodes: Usage::new(8, 1),
            open_files: Usage::new(4, 2),
        };

        let text = stat.to_string();
        assert!(text.contains("           notes        11         0"));
        assert!(text.contains("Total Data Blocks:   64,  Used: 1,  Unused: 63"));
        assert!(text.contains("Total iNode Blocks:   8,  Used: 1,  Unused: 7"));
        assert!(text.contains("Total Opened Files:   2"));
    }
}
