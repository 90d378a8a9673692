/// 位图中的一组位
type BitmapGroup = u64;

const GROUP_BITS: usize = BitmapGroup::BITS as usize;

/// 占用位图，记录其指示区域内各槽位的分配情况：1 为占用
#[derive(Debug)]
pub struct Bitmap {
    groups: Box<[BitmapGroup]>,
    /// 位图所指示区域的槽位数
    capacity: usize,
}

impl Bitmap {
    pub fn new(capacity: usize) -> Self {
        let mut groups = vec![0; capacity.div_ceil(GROUP_BITS)].into_boxed_slice();

        // 末组里超出容量的位一律视作已占用，分配时自然跳过
        let tail = capacity % GROUP_BITS;
        if let Some(last) = groups.last_mut().filter(|_| tail != 0) {
            *last = BitmapGroup::MAX << tail;
        }

        Self { groups, capacity }
    }

    /// 已占用的槽位数
    pub fn used(&self) -> usize {
        let padding = self.groups.len() * GROUP_BITS - self.capacity;
        self.groups
            .iter()
            .map(|bits| bits.count_ones() as usize)
            .sum::<usize>()
            - padding
    }

    /// 分配编号最小的空闲槽位并返回其编号。
    /// 若位图的空间用尽，则返回空。
    pub fn alloc(&mut self) -> Option<usize> {
        // 寻找还有剩余空间的位组(即还有0)
        let (group_index, ingroup_index) =
            self.groups
                .iter()
                .enumerate()
                .find_map(|(group_index, &bits)| {
                    (bits != BitmapGroup::MAX).then_some((group_index, bits.trailing_ones()))
                })?;

        self.groups[group_index] |= 1 << ingroup_index;
        Some(encode(group_index, ingroup_index as usize))
    }

    pub fn dealloc(&mut self, index: usize) {
        // 编号一定得有对应的位
        debug_assert!(self.is_set(index), "slot {index} is not allocated");
        let (group_index, ingroup_index) = decode(index);

        self.groups[group_index] &= !(1 << ingroup_index);
    }

    pub fn is_set(&self, index: usize) -> bool {
        if index >= self.capacity {
            return false;
        }
        let (group_index, ingroup_index) = decode(index);
        self.groups[group_index] & (1 << ingroup_index) != 0
    }
}

/// 线性映射编码得到槽位编号
#[inline]
fn encode(group_index: usize, ingroup_index: usize) -> usize {
    group_index * GROUP_BITS + ingroup_index
}

#[inline]
fn decode(index: usize) -> (usize, usize) {
    (index / GROUP_BITS, index % GROUP_BITS)
}
