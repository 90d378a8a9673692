//! # 内存数据结构层

mod bitmap;
pub use bitmap::Bitmap;

mod inode;
pub use inode::Inode;
