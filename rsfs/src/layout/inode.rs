//! 文件的块映射：长度加一组直接索引。
//!
//! 字节位置 `p` 落在第 `p / block_size` 个索引所指的块内，
//! 块内偏移为 `p % block_size`。所有操作都逐块推进。
//!
//! 不变式：第 `i` 个索引有效当且仅当 `i < ceil(length / block_size)`；
//! 长度之后直到块尾的字节恒为零。

use vfs::{Error, Resource, Result};

use crate::block_pool::{BlockId, BlockPool};

#[derive(Debug)]
pub struct Inode {
    /// 文件长度(字节)
    length: usize,
    /// 直接索引，`None` 表示未使用
    direct: Box<[Option<BlockId>]>,
}

impl Inode {
    pub fn new(pointers: usize) -> Self {
        Self {
            length: 0,
            direct: vec![None; pointers].into_boxed_slice(),
        }
    }

    #[inline]
    pub fn init(&mut self) {
        debug_assert!(self.direct.iter().all(Option::is_none));
        self.length = 0;
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.length
    }

    /// 文件最多能容纳的字节数
    #[inline]
    pub fn capacity(&self, block_size: usize) -> usize {
        self.direct.len() * block_size
    }

    /// 正在使用的数据块个数
    pub fn blocks(&self) -> usize {
        self.direct.iter().flatten().count()
    }

    /// 计算容纳指定数据量需要多少个数据块
    #[inline]
    pub fn count_data_block(size: usize, block_size: usize) -> usize {
        size.div_ceil(block_size)
    }

    /// 从指定位置读出数据填充`buf`，遇到文件末尾或未使用的索引即停
    pub fn read_at(&self, offset: usize, buf: &mut [u8], pool: &BlockPool) -> usize {
        let block_size = pool.block_size();
        let end = (offset + buf.len()).min(self.length);

        let mut start = offset;
        let mut read_size = 0;
        while start < end {
            let block_index = start / block_size;
            let Some(block) = self.direct[block_index] else {
                break;
            };
            // 当前块的末地址(字节)
            let current_block_end = ((block_index + 1) * block_size).min(end);
            let block_read_size = current_block_end - start;
            let inner = start % block_size;

            pool.map(block, |data| {
                buf[read_size..read_size + block_read_size]
                    .copy_from_slice(&data[inner..inner + block_read_size]);
            });

            read_size += block_read_size;
            start = current_block_end;
        }

        read_size
    }

    /// 从指定位置写入`buf`，按需分配数据块；越过末尾则延长文件，
    /// 写入范围之后的内容保持不变。
    ///
    /// 超出文件容量的部分被截掉；数据块中途耗尽时返回已写入的字节数。
    /// 一个字节都写不进去才报错。
    pub fn write_at(&mut self, offset: usize, buf: &[u8], pool: &BlockPool) -> Result<usize> {
        let block_size = pool.block_size();
        debug_assert!(offset <= self.length, "write would leave a hole");

        let end = (offset + buf.len()).min(self.capacity(block_size));
        if offset >= end {
            return Err(Error::Exhausted(Resource::DirectPointers));
        }

        let mut start = offset;
        let mut written_size = 0;
        while start < end {
            let block_index = start / block_size;
            let block = match self.direct[block_index] {
                Some(block) => block,
                None => match pool.alloc() {
                    Ok(block) => *self.direct[block_index].insert(block),
                    Err(err) if written_size == 0 => return Err(err),
                    Err(_) => {
                        log::warn!("data blocks ran out, short write of {written_size} bytes");
                        break;
                    }
                },
            };
            let current_block_end = ((block_index + 1) * block_size).min(end);
            let block_write_size = current_block_end - start;
            let inner = start % block_size;

            pool.map_mut(block, |data| {
                data[inner..inner + block_write_size]
                    .copy_from_slice(&buf[written_size..written_size + block_write_size]);
            });

            written_size += block_write_size;
            start = current_block_end;
        }

        self.length = self.length.max(offset + written_size);
        Ok(written_size)
    }

    /// 丢弃`new_length`之后的全部内容：清零末块的尾部，归还其后的整块
    pub fn truncate(&mut self, new_length: usize, pool: &BlockPool) {
        if new_length >= self.length {
            return;
        }
        let block_size = pool.block_size();

        let inner = new_length % block_size;
        if inner != 0 {
            let last = self.block(new_length / block_size);
            pool.map_mut(last, |data| data[inner..].fill(0));
        }

        let kept = Self::count_data_block(new_length, block_size);
        let used = Self::count_data_block(self.length, block_size);
        for pointer in &mut self.direct[kept..used] {
            if let Some(block) = pointer.take() {
                pool.dealloc(block);
            }
        }

        self.length = new_length;
    }

    /// 删去`[offset, offset + size)`：把其后的内容原地逐块前移，再截去尾部
    pub fn cut(&mut self, offset: usize, size: usize, pool: &BlockPool) {
        debug_assert!(size <= self.length && offset <= self.length - size);
        let block_size = pool.block_size();

        // 一次搬运不跨越源块或目的块的边界，暂存区一块大小足矣
        let mut scratch = vec![0; block_size];
        let mut src = offset + size;
        let mut dest = offset;
        while src < self.length {
            let (src_inner, dest_inner) = (src % block_size, dest % block_size);
            let len = (block_size - src_inner)
                .min(block_size - dest_inner)
                .min(self.length - src);

            pool.map(self.block(src / block_size), |data| {
                scratch[..len].copy_from_slice(&data[src_inner..src_inner + len]);
            });
            pool.map_mut(self.block(dest / block_size), |data| {
                data[dest_inner..dest_inner + len].copy_from_slice(&scratch[..len]);
            });

            src += len;
            dest += len;
        }

        self.truncate(self.length - size, pool);
    }

    /// 归还全部数据块，长度归零
    pub fn clear(&mut self, pool: &BlockPool) {
        self.truncate(0, pool);
        debug_assert_eq!(self.blocks(), 0);
    }

    /// 长度以内的索引一定有效
    #[inline]
    fn block(&self, block_index: usize) -> BlockId {
        self.direct[block_index].expect("block within file length is unallocated")
    }
}
