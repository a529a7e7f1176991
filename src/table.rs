use std::borrow::Borrow;
use std::cmp::Ordering;
use std::fmt;
use std::marker::PhantomData;
use std::ops::{Index, IndexMut};

use tracing::{debug, trace, warn};

use crate::error::ResourceTableError;
use crate::handle::{HandleIndex, ResourceHandle, ResourceType};
use crate::policy::{CheckPolicy, DebugChecked};
use crate::slot::SlotLedger;

/// A batch of handles, as taken by `ResourceTable::erase_items`
///
/// 一批 handle，用于 `ResourceTable::erase_items`
pub type HandleSet = Vec<ResourceHandle>;

/// ResourceTable stores values of one resource type addressed by handles
///
/// Values live densely in one contiguous `Vec<T>`. A parallel array of slot
/// records maps every handle index to its value's dense position, keeps the
/// slot's generation, and doubles as an intrusive free list.
///
/// ResourceTable 存储同一资源类型的值，并通过 handle 寻址
///
/// 值紧密存放在一个连续的 `Vec<T>` 中。并行的 slot 记录数组将每个 handle 索引
/// 映射到值的稠密位置，保存 slot 的代数，同时充当侵入式空闲列表。
///
/// # Features (特性)
///
/// - O(1) insertion, lookup, and erase | O(1) 插入、查找和删除
/// - Generations detect stale handles | 代数检测过期 handle
/// - Handles carry the table's resource type | handle 携带表的资源类型
/// - Defragmentation into a caller-chosen order | 按调用者指定顺序整理碎片
///
/// # Examples (示例)
///
/// ```
/// use resource_table::ResourceTable;
///
/// const KIND: u16 = 1;
/// let mut table = ResourceTable::new(KIND, 16);
///
/// let handle = table.insert(42);
/// assert!(table.contains(handle));
/// assert_eq!(table.item_at(handle), &42);
///
/// assert_eq!(table.erase(handle), 1);
/// assert!(!table.contains(handle));
/// ```
pub struct ResourceTable<T, P: CheckPolicy = DebugChecked> {
    items: Vec<T>,
    slot_of: Vec<HandleIndex>, // Slot index of each dense item | 每个稠密元素对应的 slot 索引
    ledger: SlotLedger,
    initial_capacity: usize,
    _policy: PhantomData<P>,
}

impl<T> ResourceTable<T, DebugChecked> {
    /// Create a table for `resource_type` with `initial_capacity` free slots
    ///
    /// 为 `resource_type` 创建一个含 `initial_capacity` 个空闲 slot 的表
    ///
    /// # Examples (示例)
    ///
    /// ```
    /// use resource_table::ResourceTable;
    ///
    /// let table: ResourceTable<String> = ResourceTable::new(1, 10);
    /// assert!(table.is_empty());
    /// assert_eq!(table.capacity(), 10);
    /// ```
    #[inline]
    pub fn new(resource_type: ResourceType, initial_capacity: usize) -> Self {
        Self::with_policy(resource_type, initial_capacity)
    }
}

impl<T, P: CheckPolicy> ResourceTable<T, P> {
    /// Create a table with an explicit check policy
    ///
    /// 使用显式校验策略创建表
    ///
    /// # Examples (示例)
    ///
    /// ```
    /// use resource_table::{Checked, ResourceTable};
    ///
    /// let table = ResourceTable::<u32, Checked>::with_policy(2, 4);
    /// assert_eq!(table.resource_type(), 2);
    /// ```
    pub fn with_policy(resource_type: ResourceType, initial_capacity: usize) -> Self {
        Self {
            items: Vec::with_capacity(initial_capacity),
            slot_of: Vec::with_capacity(initial_capacity),
            ledger: SlotLedger::new(resource_type, initial_capacity),
            initial_capacity,
            _policy: PhantomData,
        }
    }

    /// Insert a value and return the handle addressing it
    ///
    /// Reuses the most recently freed slot, or appends a new one when no slot
    /// is free. If the 32-bit index space is exhausted the value is dropped
    /// and an invalid handle is returned.
    ///
    /// 插入一个值并返回指向它的 handle
    ///
    /// 复用最近释放的 slot，没有空闲 slot 时追加一个。32 位索引空间耗尽时
    /// 丢弃该值并返回无效 handle。
    ///
    /// # Examples (示例)
    ///
    /// ```
    /// use resource_table::ResourceTable;
    ///
    /// let mut table = ResourceTable::new(7, 1);
    /// let handle = table.insert("value");
    /// assert_eq!(handle.resource_type(), 7);
    /// assert_eq!(table[handle], "value");
    /// ```
    #[inline]
    pub fn insert(&mut self, value: T) -> ResourceHandle {
        self.emplace_with(|_| value)
    }

    /// Construct the value from `args` directly into a new slot
    ///
    /// 由 `args` 直接在新 slot 中构造值
    ///
    /// # Examples (示例)
    ///
    /// ```
    /// use resource_table::ResourceTable;
    ///
    /// let mut table: ResourceTable<String> = ResourceTable::new(1, 3);
    /// let handle = table.emplace("1");
    /// assert_eq!(table.item_at(handle), "1");
    /// ```
    #[inline]
    pub fn emplace<A>(&mut self, args: A) -> ResourceHandle
    where
        T: From<A>,
    {
        self.insert(T::from(args))
    }

    /// Construct the value with a closure that receives its future handle
    ///
    /// Useful for values that store their own id.
    ///
    /// 用闭包构造值，闭包会收到该值将来的 handle；适用于保存自身 id 的值
    ///
    /// # Examples (示例)
    ///
    /// ```
    /// use resource_table::{ResourceHandle, ResourceTable};
    ///
    /// let mut table = ResourceTable::new(1, 0);
    /// let handle = table.emplace_with(|own: ResourceHandle| own);
    /// assert_eq!(table[handle], handle);
    /// ```
    pub fn emplace_with<F>(&mut self, f: F) -> ResourceHandle
    where
        F: FnOnce(ResourceHandle) -> T,
    {
        let Some(handle) = self.ledger.peek() else {
            warn!(
                resource_type = self.ledger.resource_type(),
                "handle index space exhausted, value dropped"
            );
            return ResourceHandle::invalid();
        };

        // Build the value before touching the ledger so a panicking
        // constructor leaves the table unchanged.
        let value = f(handle);

        let dense = self.items.len() as HandleIndex;
        let acquired = self.ledger.acquire(dense);
        debug_assert_eq!(acquired, Some(handle));

        self.items.push(value);
        self.slot_of.push(handle.index());
        handle
    }

    /// Check whether `handle` addresses a live value of this table
    ///
    /// True iff the handle's type matches the table, its index is in bounds,
    /// the slot is occupied and the generations match.
    ///
    /// 检查 `handle` 是否指向本表中存活的值
    ///
    /// 当且仅当类型匹配、索引在范围内、slot 已占用且代数一致时返回 true
    #[inline]
    pub fn contains(&self, handle: ResourceHandle) -> bool {
        self.ledger.lookup(handle).is_ok()
    }

    /// Get the value addressed by `handle`
    ///
    /// 获取 `handle` 指向的值
    #[inline]
    pub fn get(&self, handle: ResourceHandle) -> Option<&T> {
        let dense = self.ledger.lookup(handle).ok()?;
        // SAFETY: an accepted handle's slot record points inside `items`
        Some(unsafe { self.items.get_unchecked(dense as usize) })
    }

    /// Get a mutable reference to the value addressed by `handle`
    ///
    /// 获取 `handle` 指向值的可变引用
    #[inline]
    pub fn get_mut(&mut self, handle: ResourceHandle) -> Option<&mut T> {
        let dense = self.ledger.lookup(handle).ok()?;
        // SAFETY: an accepted handle's slot record points inside `items`
        Some(unsafe { self.items.get_unchecked_mut(dense as usize) })
    }

    /// Like `get`, but reports why a handle was rejected
    ///
    /// 与 `get` 相同，但会报告 handle 被拒绝的原因
    ///
    /// # Examples (示例)
    ///
    /// ```
    /// use resource_table::{ResourceTable, ResourceTableError};
    ///
    /// let mut table = ResourceTable::new(1, 1);
    /// let handle = table.insert(10);
    /// table.erase(handle);
    /// table.insert(11);
    ///
    /// assert_eq!(
    ///     table.try_get(handle),
    ///     Err(ResourceTableError::GenerationMismatch { expected: 1, found: 0 })
    /// );
    /// ```
    #[inline]
    pub fn try_get(&self, handle: ResourceHandle) -> Result<&T, ResourceTableError> {
        let dense = self.ledger.lookup(handle)?;
        Ok(&self.items[dense as usize])
    }

    /// Like `get_mut`, but reports why a handle was rejected
    ///
    /// 与 `get_mut` 相同，但会报告 handle 被拒绝的原因
    #[inline]
    pub fn try_get_mut(&mut self, handle: ResourceHandle) -> Result<&mut T, ResourceTableError> {
        let dense = self.ledger.lookup(handle)?;
        Ok(&mut self.items[dense as usize])
    }

    /// Get the value addressed by a handle the caller already validated
    ///
    /// Presenting a handle that `contains` rejects is a contract violation.
    /// Validating policies panic; `Unchecked` resolves it to an unspecified
    /// element or panics on a bounds check.
    ///
    /// 获取调用者已校验过的 handle 所指向的值
    ///
    /// 传入 `contains` 会拒绝的 handle 属于违约行为。校验策略下会 panic；
    /// `Unchecked` 下会解析到不确定的元素或触发边界检查 panic。
    ///
    /// # Panics
    ///
    /// Under a validating policy, if `contains(handle)` is false.
    #[inline]
    pub fn item_at(&self, handle: ResourceHandle) -> &T {
        if P::VALIDATE {
            match self.ledger.lookup(handle) {
                // SAFETY: an accepted handle's slot record points inside `items`
                Ok(dense) => unsafe { self.items.get_unchecked(dense as usize) },
                Err(err) => panic!("item_at with rejected handle {handle}: {err}"),
            }
        } else {
            &self.items[self.ledger.dense_index_unchecked(handle)]
        }
    }

    /// Mutable counterpart of `item_at`
    ///
    /// `item_at` 的可变版本
    ///
    /// # Panics
    ///
    /// Under a validating policy, if `contains(handle)` is false.
    #[inline]
    pub fn item_at_mut(&mut self, handle: ResourceHandle) -> &mut T {
        if P::VALIDATE {
            match self.ledger.lookup(handle) {
                // SAFETY: an accepted handle's slot record points inside `items`
                Ok(dense) => unsafe { self.items.get_unchecked_mut(dense as usize) },
                Err(err) => panic!("item_at_mut with rejected handle {handle}: {err}"),
            }
        } else {
            let dense = self.ledger.dense_index_unchecked(handle);
            &mut self.items[dense]
        }
    }

    /// Remove and return the value addressed by `handle`
    ///
    /// The slot moves to its next generation and goes on top of the free list.
    ///
    /// 移除并返回 `handle` 指向的值；slot 进入下一代并被压入空闲列表顶部
    ///
    /// # Examples (示例)
    ///
    /// ```
    /// use resource_table::ResourceTable;
    ///
    /// let mut table = ResourceTable::new(1, 1);
    /// let handle = table.insert(42);
    /// assert_eq!(table.remove(handle), Some(42));
    /// assert_eq!(table.remove(handle), None);
    /// ```
    #[inline]
    pub fn remove(&mut self, handle: ResourceHandle) -> Option<T> {
        let dense = self.ledger.lookup(handle).ok()?;
        Some(self.remove_dense(dense as usize))
    }

    /// Drop the value addressed by `handle`
    ///
    /// Returns 1 if a value was erased, 0 if the handle was rejected.
    ///
    /// 销毁 `handle` 指向的值；成功删除返回 1，handle 被拒绝返回 0
    #[inline]
    pub fn erase(&mut self, handle: ResourceHandle) -> usize {
        match self.remove(handle) {
            Some(_) => 1,
            None => 0,
        }
    }

    /// Erase every handle in `handles`, returning how many values were erased
    ///
    /// 删除 `handles` 中的每个 handle，返回实际删除的数量
    ///
    /// # Examples (示例)
    ///
    /// ```
    /// use resource_table::{HandleSet, ResourceTable};
    ///
    /// let mut table = ResourceTable::new(1, 3);
    /// let handles: HandleSet = (0..3).map(|i| table.insert(i)).collect();
    /// assert_eq!(table.erase_items(&handles), 3);
    /// assert!(table.is_empty());
    /// ```
    pub fn erase_items<I>(&mut self, handles: I) -> usize
    where
        I: IntoIterator,
        I::Item: Borrow<ResourceHandle>,
    {
        handles
            .into_iter()
            .map(|handle| self.erase(*handle.borrow()))
            .sum()
    }

    /// Keep only the values for which `f` returns `true`
    ///
    /// Rejected values are erased like `erase` would, advancing generations.
    ///
    /// 仅保留 `f` 返回 `true` 的值；被拒绝的值按 `erase` 的方式删除并推进代数
    pub fn retain<F>(&mut self, mut f: F)
    where
        F: FnMut(ResourceHandle, &mut T) -> bool,
    {
        let mut dense = 0;
        while dense < self.items.len() {
            let handle = self.ledger.handle_at(self.slot_of[dense]);
            if f(handle, &mut self.items[dense]) {
                dense += 1;
            } else {
                // The last value is swapped into `dense` and checked next
                drop(self.remove_dense(dense));
            }
        }
    }

    /// Sort the dense storage by `less_than` with the fewest element swaps
    ///
    /// `less_than` must be a strict weak ordering. Equivalent values keep
    /// their relative order. Returns the number of swaps performed, which is
    /// the element count minus the number of cycles in the sorting
    /// permutation. Handles stay valid and keep addressing the same values;
    /// only the storage order changes, so positional reads through
    /// `as_slice` must happen after the call.
    ///
    /// 按 `less_than` 以最少的元素交换次数排序稠密存储
    ///
    /// `less_than` 必须是严格弱序，等价元素保持相对顺序。返回执行的交换次数，
    /// 即元素数量减去排序置换中的环数。handle 保持有效并仍指向相同的值；
    /// 只有存储顺序改变。
    ///
    /// # Examples (示例)
    ///
    /// ```
    /// use resource_table::ResourceTable;
    ///
    /// let mut table = ResourceTable::new(1, 3);
    /// let h3 = table.insert(3);
    /// table.insert(1);
    /// table.insert(2);
    ///
    /// let swaps = table.defragment(|a, b| a < b);
    /// assert_eq!(swaps, 2);
    /// assert_eq!(table.as_slice(), &[1, 2, 3]);
    /// assert_eq!(table[h3], 3);
    /// ```
    pub fn defragment<F>(&mut self, mut less_than: F) -> usize
    where
        F: FnMut(&T, &T) -> bool,
    {
        let len = self.items.len();
        if len < 2 {
            return 0;
        }

        let mut order: Vec<usize> = (0..len).collect();
        let items = &self.items;
        order.sort_by(|&a, &b| {
            if less_than(&items[a], &items[b]) {
                Ordering::Less
            } else if less_than(&items[b], &items[a]) {
                Ordering::Greater
            } else {
                Ordering::Equal
            }
        });

        // target[i] is the final position of the value currently at i
        let mut target = vec![0; len];
        for (position, &source) in order.iter().enumerate() {
            target[source] = position;
        }

        // Every swap puts one value in its final place
        let mut swaps = 0;
        for dense in 0..len {
            while target[dense] != dense {
                let other = target[dense];
                self.swap_dense(dense, other);
                target.swap(dense, other);
                swaps += 1;
            }
        }

        trace!(
            resource_type = self.ledger.resource_type(),
            len,
            swaps,
            "defragmented"
        );
        swaps
    }

    /// Number of live values
    ///
    /// 存活值的数量
    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of slots ever allocated, free or occupied
    ///
    /// 已分配的 slot 数量（包括空闲和占用）
    #[inline]
    pub fn capacity(&self) -> usize {
        self.ledger.capacity()
    }

    #[inline]
    pub fn resource_type(&self) -> ResourceType {
        self.ledger.resource_type()
    }

    /// Add `additional` free slots up front
    ///
    /// 预先追加 `additional` 个空闲 slot
    pub fn reserve(&mut self, additional: usize) {
        self.ledger.grow(additional);
        self.items.reserve(additional);
        self.slot_of.reserve(additional);
    }

    /// Drop every value and free every slot, keeping generations
    ///
    /// Released slots move to their next generation, so handles issued before
    /// the clear are rejected even after their slots are reused.
    ///
    /// 销毁所有值并释放所有 slot，保留代数；释放的 slot 进入下一代，
    /// 清空前签发的 handle 在 slot 复用后仍会被拒绝
    ///
    /// # Examples (示例)
    ///
    /// ```
    /// use resource_table::ResourceTable;
    ///
    /// let mut table = ResourceTable::new(1, 1);
    /// let old = table.insert(1);
    /// table.clear();
    /// let new = table.insert(2);
    /// assert_eq!(new.index(), old.index());
    /// assert!(new.generation() > old.generation());
    /// assert!(!table.contains(old));
    /// ```
    pub fn clear(&mut self) {
        let released = self.slot_of.len();
        for index in self.slot_of.drain(..) {
            self.ledger.release(index);
        }
        self.items.clear();

        debug!(
            resource_type = self.ledger.resource_type(),
            released,
            capacity = self.ledger.capacity(),
            "resource table cleared"
        );
    }

    /// Drop every value and reinitialize the table as newly constructed
    ///
    /// Generations restart at 0 and capacity returns to the construction
    /// capacity. Handles issued before the reset may alias new values.
    ///
    /// 销毁所有值并将表重新初始化为新建状态；代数从 0 重新开始，
    /// 容量恢复为构造时的容量。重置前签发的 handle 可能与新值重叠。
    pub fn reset(&mut self) {
        let released = self.items.len();
        self.items.clear();
        self.slot_of.clear();
        self.ledger.reset(self.initial_capacity);

        debug!(
            resource_type = self.ledger.resource_type(),
            released,
            capacity = self.initial_capacity,
            "resource table reset"
        );
    }

    /// Values in storage order
    ///
    /// 按存储顺序排列的值
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    /// Iterate over `(handle, value)` pairs in storage order
    ///
    /// 按存储顺序遍历 `(handle, value)` 对
    ///
    /// # Examples (示例)
    ///
    /// ```
    /// use resource_table::ResourceTable;
    ///
    /// let mut table = ResourceTable::new(1, 2);
    /// table.insert(1);
    /// table.insert(2);
    ///
    /// let sum: i32 = table.iter().map(|(_, v)| v).sum();
    /// assert_eq!(sum, 3);
    /// ```
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = (ResourceHandle, &T)> {
        let ledger = &self.ledger;
        self.slot_of
            .iter()
            .zip(self.items.iter())
            .map(move |(&index, item)| (ledger.handle_at(index), item))
    }

    /// Iterate over `(handle, mutable value)` pairs in storage order
    ///
    /// 按存储顺序遍历 `(handle, 可变值)` 对
    #[inline]
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (ResourceHandle, &mut T)> {
        let ledger = &self.ledger;
        self.slot_of
            .iter()
            .zip(self.items.iter_mut())
            .map(move |(&index, item)| (ledger.handle_at(index), item))
    }

    /// Handles of all live values in storage order
    ///
    /// 按存储顺序返回所有存活值的 handle
    #[inline]
    pub fn handles(&self) -> impl Iterator<Item = ResourceHandle> {
        self.slot_of
            .iter()
            .map(move |&index| self.ledger.handle_at(index))
    }

    fn remove_dense(&mut self, dense: usize) -> T {
        let index = self.slot_of.swap_remove(dense);
        let value = self.items.swap_remove(dense);
        if let Some(&moved) = self.slot_of.get(dense) {
            self.ledger.relocate(moved, dense as HandleIndex);
        }
        self.ledger.release(index);
        value
    }

    fn swap_dense(&mut self, a: usize, b: usize) {
        self.items.swap(a, b);
        self.slot_of.swap(a, b);
        self.ledger.relocate(self.slot_of[a], a as HandleIndex);
        self.ledger.relocate(self.slot_of[b], b as HandleIndex);
    }
}

impl<T, P: CheckPolicy> Index<ResourceHandle> for ResourceTable<T, P> {
    type Output = T;

    #[inline]
    fn index(&self, handle: ResourceHandle) -> &T {
        self.item_at(handle)
    }
}

impl<T, P: CheckPolicy> IndexMut<ResourceHandle> for ResourceTable<T, P> {
    #[inline]
    fn index_mut(&mut self, handle: ResourceHandle) -> &mut T {
        self.item_at_mut(handle)
    }
}

impl<T: Clone, P: CheckPolicy> Clone for ResourceTable<T, P> {
    #[inline]
    fn clone(&self) -> Self {
        Self {
            items: self.items.clone(),
            slot_of: self.slot_of.clone(),
            ledger: self.ledger.clone(),
            initial_capacity: self.initial_capacity,
            _policy: PhantomData,
        }
    }

    #[inline]
    fn clone_from(&mut self, source: &Self) {
        self.items.clone_from(&source.items);
        self.slot_of.clone_from(&source.slot_of);
        self.ledger.clone_from(&source.ledger);
        self.initial_capacity = source.initial_capacity;
    }
}

impl<T: fmt::Debug, P: CheckPolicy> fmt::Debug for ResourceTable<T, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        struct Items<'a, T, P: CheckPolicy>(&'a ResourceTable<T, P>);

        impl<T: fmt::Debug, P: CheckPolicy> fmt::Debug for Items<'_, T, P> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.debug_map().entries(self.0.iter()).finish()
            }
        }

        f.debug_struct("ResourceTable")
            .field("resource_type", &self.resource_type())
            .field("len", &self.len())
            .field("capacity", &self.capacity())
            .field("items", &Items(self))
            .finish()
    }
}
