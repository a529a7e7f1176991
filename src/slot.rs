use tracing::{debug, trace};

use crate::error::ResourceTableError;
use crate::handle::{HandleIndex, ResourceHandle, ResourceType};
use crate::utils::unlikely;

const NO_FREE_SLOT: HandleIndex = ResourceHandle::INVALID_INDEX;

/// Slot records of a ResourceTable, one `ResourceHandle` per slot
///
/// Each record is both the generation ledger of its slot and a node of the
/// intrusive free list:
/// - free record: free flag set, index field holds the next free slot
///   (`INVALID_INDEX` terminates the list)
/// - occupied record: free flag clear, index field holds the dense position
///   of the slot's value
///
/// ResourceTable 的 slot 记录，每个 slot 一个 `ResourceHandle`
///
/// 每条记录既是该 slot 的代数账本，也是侵入式空闲列表的节点：
/// - 空闲记录：设置空闲标志，索引字段保存下一个空闲 slot（`INVALID_INDEX` 表示结尾）
/// - 占用记录：清除空闲标志，索引字段保存该 slot 值在稠密存储中的位置
#[derive(Clone, Debug)]
pub(crate) struct SlotLedger {
    records: Vec<ResourceHandle>,
    free_head: HandleIndex, // Head of free list | 空闲列表的头部索引
    resource_type: ResourceType,
}

impl SlotLedger {
    /// Create a ledger with `capacity` free slots at generation 0
    ///
    /// 创建含 `capacity` 个空闲 slot（代数为 0）的账本
    pub(crate) fn new(resource_type: ResourceType, capacity: usize) -> Self {
        debug_assert!(
            resource_type <= ResourceHandle::RESOURCE_TYPE_MAX,
            "resource type {resource_type:#x} out of range"
        );
        let mut ledger = Self {
            records: Vec::new(),
            free_head: NO_FREE_SLOT,
            resource_type,
        };
        ledger.grow(capacity);
        ledger
    }

    #[inline(always)]
    pub(crate) fn resource_type(&self) -> ResourceType {
        self.resource_type
    }

    /// Number of slots, free or occupied
    ///
    /// slot 总数（包括空闲和占用）
    #[inline(always)]
    pub(crate) fn capacity(&self) -> usize {
        self.records.len()
    }

    /// Append up to `additional` free slots
    ///
    /// New slots are pushed on the free list so that the lowest new index is
    /// handed out first. Growth stops at the last addressable index.
    ///
    /// 追加最多 `additional` 个空闲 slot，最小的新索引最先被分配；
    /// 增长在最后一个可寻址索引处停止
    pub(crate) fn grow(&mut self, additional: usize) {
        let start = self.records.len();
        let end = start
            .saturating_add(additional)
            .min(NO_FREE_SLOT as usize);
        if end <= start {
            return;
        }

        self.records.reserve(end - start);
        for index in start..end {
            let next = if index + 1 < end {
                (index + 1) as HandleIndex
            } else {
                self.free_head
            };
            let mut record = ResourceHandle::new(next, self.resource_type);
            record.set_free(true);
            self.records.push(record);
        }
        self.free_head = start as HandleIndex;
    }

    /// The handle the next `acquire` will hand out, without taking the slot
    ///
    /// Returns `None` once the index space is exhausted.
    ///
    /// 返回下一次 `acquire` 将分配的 handle，但不占用 slot；索引空间耗尽时返回 `None`
    #[inline]
    pub(crate) fn peek(&self) -> Option<ResourceHandle> {
        if self.free_head != NO_FREE_SLOT {
            let record = &self.records[self.free_head as usize];
            Some(ResourceHandle::from_parts(
                self.free_head,
                record.generation(),
                self.resource_type,
            ))
        } else if unlikely(self.records.len() >= NO_FREE_SLOT as usize) {
            None
        } else {
            Some(ResourceHandle::from_parts(
                self.records.len() as HandleIndex,
                0,
                self.resource_type,
            ))
        }
    }

    /// Take a slot for a value stored at `dense` and return its handle
    ///
    /// Pops the free list head, or appends one slot when the list is empty.
    ///
    /// 为位于 `dense` 的值占用一个 slot 并返回其 handle；
    /// 弹出空闲列表头部，列表为空时追加一个 slot
    pub(crate) fn acquire(&mut self, dense: HandleIndex) -> Option<ResourceHandle> {
        if self.free_head == NO_FREE_SLOT {
            if unlikely(self.records.len() >= NO_FREE_SLOT as usize) {
                return None;
            }
            trace!(
                resource_type = self.resource_type,
                index = self.records.len(),
                "free list empty, appending slot"
            );
            self.grow(1);
        }

        let index = self.free_head;
        let record = &mut self.records[index as usize];
        debug_assert!(record.is_free(), "free list points at an occupied slot");

        self.free_head = record.index();
        record.set_index(dense);
        record.set_free(false);

        Some(ResourceHandle::from_parts(
            index,
            record.generation(),
            self.resource_type,
        ))
    }

    /// Resolve a handle to the dense position of its value
    ///
    /// 将 handle 解析为其值在稠密存储中的位置
    #[inline]
    pub(crate) fn lookup(&self, handle: ResourceHandle) -> Result<HandleIndex, ResourceTableError> {
        if unlikely(!handle.is_valid()) {
            return Err(ResourceTableError::InvalidHandle);
        }
        if unlikely(handle.resource_type() != self.resource_type) {
            return Err(ResourceTableError::TypeMismatch {
                expected: self.resource_type,
                found: handle.resource_type(),
            });
        }

        let index = handle.index();
        let Some(record) = self.records.get(index as usize) else {
            return Err(ResourceTableError::IndexOutOfBounds {
                index,
                capacity: self.records.len(),
            });
        };

        if record.is_free() {
            return Err(ResourceTableError::Vacant { index });
        }
        if record.generation() != handle.generation() {
            return Err(ResourceTableError::GenerationMismatch {
                expected: record.generation(),
                found: handle.generation(),
            });
        }
        Ok(record.index())
    }

    /// Dense position stored in the handle's slot record, skipping validation
    ///
    /// Panics if the index is beyond the ledger.
    ///
    /// 跳过校验，直接读取 handle 对应 slot 记录中的稠密位置；索引越界时 panic
    #[inline(always)]
    pub(crate) fn dense_index_unchecked(&self, handle: ResourceHandle) -> usize {
        self.records[handle.index() as usize].index() as usize
    }

    /// Handle currently addressing the occupied slot `index`
    ///
    /// 当前指向已占用 slot `index` 的 handle
    #[inline(always)]
    pub(crate) fn handle_at(&self, index: HandleIndex) -> ResourceHandle {
        let record = &self.records[index as usize];
        debug_assert!(!record.is_free());
        ResourceHandle::from_parts(index, record.generation(), self.resource_type)
    }

    /// Point the occupied slot `index` at a new dense position
    ///
    /// 将已占用 slot `index` 指向新的稠密位置
    #[inline(always)]
    pub(crate) fn relocate(&mut self, index: HandleIndex, dense: HandleIndex) {
        let record = &mut self.records[index as usize];
        debug_assert!(!record.is_free());
        record.set_index(dense);
    }

    /// Return the occupied slot `index` to the free list
    ///
    /// The slot moves to its next generation, so every handle issued for it
    /// so far becomes stale.
    ///
    /// 将已占用 slot `index` 归还到空闲列表；slot 进入下一代，之前签发的 handle 全部失效
    pub(crate) fn release(&mut self, index: HandleIndex) {
        let record = &mut self.records[index as usize];
        debug_assert!(!record.is_free(), "slot {index} released twice");

        record.new_generation();
        if unlikely(record.generation() == 0) {
            debug!(
                resource_type = self.resource_type,
                index, "slot generation wrapped"
            );
        }
        record.set_index(self.free_head);
        record.set_free(true);
        self.free_head = index;
    }

    /// Drop every record and start over with `capacity` fresh slots
    ///
    /// 丢弃所有记录并以 `capacity` 个新 slot 重新开始
    pub(crate) fn reset(&mut self, capacity: usize) {
        self.records.clear();
        self.free_head = NO_FREE_SLOT;
        self.grow(capacity);
    }
}
