use std::fmt;

/// Slot position inside a table
///
/// 表内的 slot 位置
pub type HandleIndex = u32;

/// Per-slot generation counter
///
/// 每个 slot 的代数计数器
pub type HandleGeneration = u16;

/// Tag identifying the logical kind of resource a handle addresses
///
/// 标识 handle 所指向资源种类的标签
pub type ResourceType = u16;

const HANDLE_BITS: u32 = u64::BITS;
const GENERATION_BITS: u32 = 16;
const RESOURCE_TYPE_BITS: u32 = 15;
const INDEX_BITS: u32 = HANDLE_BITS - GENERATION_BITS - RESOURCE_TYPE_BITS - 1;

const GENERATION_SHIFT: u32 = INDEX_BITS;
const RESOURCE_TYPE_SHIFT: u32 = INDEX_BITS + GENERATION_BITS;
const FREE_SHIFT: u32 = HANDLE_BITS - 1;

const HANDLE_MASK: u64 = u64::MAX;
const INDEX_MASK: u64 = (1 << INDEX_BITS) - 1;
const GENERATION_MASK: u64 = (1 << GENERATION_BITS) - 1;
const RESOURCE_TYPE_MASK: u64 = (1 << RESOURCE_TYPE_BITS) - 1;
const FREE_BIT: u64 = 1 << FREE_SHIFT;

/// A 64-bit handle addressing one slot of a `ResourceTable`
///
/// The fields are laid out so that the raw integer ordering sorts by free
/// flag, then resource type, then generation, then index:
///
/// ```text
///  63  62 ........ 48 47 ........ 32 31 ..................... 0
/// [F ][ resource type ][ generation ][          index          ]
///  1        15              16                   32
/// ```
///
/// The free flag is only set on the slot records a table keeps for its free
/// list; handles given out to callers always have it cleared.
///
/// 寻址 `ResourceTable` 中某个 slot 的 64 位 handle
///
/// 字段排列使得原始整数顺序依次按空闲标志、资源类型、代数、索引排序。
/// 空闲标志只在表内部的空闲列表记录上设置，返回给调用者的 handle 总是清除该位。
///
/// # Examples (示例)
///
/// ```
/// use resource_table::ResourceHandle;
///
/// let handle = ResourceHandle::new(1, 0x04);
/// assert_eq!(handle.raw(), 0x0004_0000_0000_0001);
/// assert_eq!(handle.index(), 1);
/// assert_eq!(handle.resource_type(), 0x04);
/// assert_eq!(handle.generation(), 0);
/// ```
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
#[repr(transparent)]
pub struct ResourceHandle {
    raw: u64,
}

impl ResourceHandle {
    pub const GENERATION_MAX: HandleGeneration = GENERATION_MASK as HandleGeneration;
    pub const RESOURCE_TYPE_MAX: ResourceType = RESOURCE_TYPE_MASK as ResourceType;
    /// The maximum type value is reserved for handles whose type was never set
    pub const TYPE_NOT_INITIALIZED: ResourceType = Self::RESOURCE_TYPE_MAX;
    pub const INDEX_MAX: HandleIndex = INDEX_MASK as HandleIndex;
    pub const INVALID_INDEX: HandleIndex = Self::INDEX_MAX;

    /// Create a handle for `index` tagged with `resource_type`
    ///
    /// Generation starts at 0 and the free flag is cleared.
    ///
    /// 为 `index` 创建一个带 `resource_type` 标签的 handle，代数从 0 开始，空闲标志清除
    #[inline]
    pub fn new(index: HandleIndex, resource_type: ResourceType) -> Self {
        let mut handle = Self { raw: HANDLE_MASK };
        handle.set_index(index);
        handle.set_resource_type(resource_type);
        handle.set_generation(0);
        handle.set_free(false);
        handle
    }

    /// Create a handle for `index` whose resource type is not initialized
    ///
    /// 创建资源类型未初始化的 handle
    #[inline]
    pub fn with_index(index: HandleIndex) -> Self {
        Self::new(index, Self::TYPE_NOT_INITIALIZED)
    }

    /// Create a handle from a `usize` index
    ///
    /// Indices that do not fit in the index field produce an invalid handle
    /// rather than a truncated one.
    ///
    /// 从 `usize` 索引创建 handle；超出索引字段范围时返回无效 handle 而不是截断
    #[inline]
    pub fn from_index_usize(index: usize, resource_type: ResourceType) -> Self {
        let index = HandleIndex::try_from(index).unwrap_or(Self::INVALID_INDEX);
        Self::new(index, resource_type)
    }

    /// The universally invalid handle (all bits set)
    ///
    /// 通用的无效 handle（所有位均为 1）
    #[inline(always)]
    pub const fn invalid() -> Self {
        Self { raw: HANDLE_MASK }
    }

    #[inline(always)]
    pub(crate) fn from_parts(
        index: HandleIndex,
        generation: HandleGeneration,
        resource_type: ResourceType,
    ) -> Self {
        let mut handle = Self::new(index, resource_type);
        handle.set_generation(generation);
        handle
    }

    /// Rebuild a handle from its raw encoding
    ///
    /// 从原始编码重建 handle
    #[inline(always)]
    pub const fn from_raw(raw: u64) -> Self {
        Self { raw }
    }

    /// Raw 64-bit encoding, usable as a sort or hash key
    ///
    /// 原始 64 位编码，可用作排序或哈希键
    #[inline(always)]
    pub const fn raw(&self) -> u64 {
        self.raw
    }

    #[inline(always)]
    pub fn is_valid(&self) -> bool {
        self.index() != Self::INVALID_INDEX
    }

    /// Set every bit, turning this into `ResourceHandle::invalid()`
    ///
    /// 将所有位置 1，使其变为 `ResourceHandle::invalid()`
    #[inline(always)]
    pub fn invalidate(&mut self) {
        self.raw = HANDLE_MASK;
    }

    #[inline(always)]
    pub fn index(&self) -> HandleIndex {
        (self.raw & INDEX_MASK) as HandleIndex
    }

    /// Set the index field
    ///
    /// The index field spans the whole of `HandleIndex`, so no value can
    /// overflow into the generation; `INVALID_INDEX` invalidates the handle.
    ///
    /// 设置索引字段；`INVALID_INDEX` 会使 handle 无效
    #[inline(always)]
    pub fn set_index(&mut self, index: HandleIndex) {
        self.raw = (self.raw & !INDEX_MASK) | (index as u64 & INDEX_MASK);
    }

    #[inline(always)]
    pub fn generation(&self) -> HandleGeneration {
        ((self.raw >> GENERATION_SHIFT) & GENERATION_MASK) as HandleGeneration
    }

    #[inline(always)]
    fn set_generation(&mut self, generation: HandleGeneration) {
        self.raw = (self.raw & !(GENERATION_MASK << GENERATION_SHIFT))
            | ((generation as u64 & GENERATION_MASK) << GENERATION_SHIFT);
    }

    /// Advance the generation by one, wrapping from `GENERATION_MAX` to 0
    ///
    /// 代数加一，从 `GENERATION_MAX` 回绕到 0
    #[inline(always)]
    pub fn new_generation(&mut self) {
        let next = if self.generation() == Self::GENERATION_MAX {
            0
        } else {
            self.generation() + 1
        };
        self.set_generation(next);
    }

    #[inline(always)]
    pub fn resource_type(&self) -> ResourceType {
        ((self.raw >> RESOURCE_TYPE_SHIFT) & RESOURCE_TYPE_MASK) as ResourceType
    }

    /// Set the resource type tag
    ///
    /// Values above `RESOURCE_TYPE_MAX` do not fit in 15 bits and are masked.
    ///
    /// 设置资源类型标签；超过 `RESOURCE_TYPE_MAX` 的值会被截掩
    #[inline(always)]
    pub fn set_resource_type(&mut self, resource_type: ResourceType) {
        debug_assert!(
            resource_type <= Self::RESOURCE_TYPE_MAX,
            "resource type {:#x} does not fit in {} bits",
            resource_type,
            RESOURCE_TYPE_BITS
        );
        self.raw = (self.raw & !(RESOURCE_TYPE_MASK << RESOURCE_TYPE_SHIFT))
            | ((resource_type as u64 & RESOURCE_TYPE_MASK) << RESOURCE_TYPE_SHIFT);
    }

    /// Copy of this handle tagged with another resource type
    ///
    /// Used when two resource kinds share index and generation by
    /// construction, e.g. an entity and its transform.
    ///
    /// 返回带有另一资源类型的 handle 副本
    #[inline]
    pub fn with_resource_type(mut self, resource_type: ResourceType) -> Self {
        self.set_resource_type(resource_type);
        self
    }

    #[inline(always)]
    pub fn is_free(&self) -> bool {
        self.raw & FREE_BIT != 0
    }

    #[inline(always)]
    pub fn set_free(&mut self, flag: bool) {
        self.raw &= !FREE_BIT;
        if flag {
            self.raw |= FREE_BIT;
        }
    }
}

impl Default for ResourceHandle {
    /// Invalid index, uninitialized type, generation 0, not free
    #[inline]
    fn default() -> Self {
        let mut handle = Self::invalid();
        handle.set_generation(0);
        handle.set_free(false);
        handle
    }
}

impl From<ResourceHandle> for u64 {
    #[inline(always)]
    fn from(handle: ResourceHandle) -> Self {
        handle.raw
    }
}

impl fmt::Debug for ResourceHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceHandle")
            .field("index", &self.index())
            .field("generation", &self.generation())
            .field("resource_type", &self.resource_type())
            .field("free", &self.is_free())
            .finish()
    }
}

impl fmt::Display for ResourceHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_valid() {
            write!(
                f,
                "{:#x}:{}@{}",
                self.resource_type(),
                self.index(),
                self.generation()
            )
        } else {
            write!(f, "{:#x}:invalid", self.resource_type())
        }
    }
}
