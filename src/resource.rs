use crate::handle::{ResourceHandle, ResourceType};

/// A handle bound to one resource type at compile time
///
/// Higher-level records (entities, transforms, ...) wrap their id in a
/// `Resource` so that the type tag of the handle is fixed by the Rust type.
///
/// 在编译期绑定到某一资源类型的 handle
///
/// 上层记录（实体、变换等）用 `Resource` 包装自己的 id，使 handle 的类型标签由 Rust 类型固定。
///
/// # Examples (示例)
///
/// ```
/// use resource_table::{Resource, ResourceTable};
///
/// const ENTITY: u16 = 1;
/// type Entity = Resource<ENTITY>;
///
/// let mut table = ResourceTable::new(ENTITY, 4);
/// let entity = Entity::new(table.insert("player"));
/// assert!(entity.is_valid());
/// assert_eq!(table[entity.id()], "player");
///
/// assert!(!Entity::default().is_valid());
/// ```
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct Resource<const TYPE: ResourceType> {
    id: ResourceHandle,
}

impl<const TYPE: ResourceType> Resource<TYPE> {
    pub const RESOURCE_TYPE: ResourceType = TYPE;

    /// Wrap `id`, which must be invalid or tagged with `TYPE`
    ///
    /// 包装 `id`；它必须无效或带有 `TYPE` 标签
    #[inline]
    pub fn new(id: ResourceHandle) -> Self {
        debug_assert!(
            !id.is_valid() || id.resource_type() == TYPE,
            "handle {} is not a resource of type {:#x}",
            id,
            TYPE
        );
        Self { id }
    }

    #[inline(always)]
    pub fn id(&self) -> ResourceHandle {
        self.id
    }

    #[inline(always)]
    pub fn is_valid(&self) -> bool {
        self.id.is_valid()
    }

    /// Forget the wrapped handle
    ///
    /// 丢弃所包装的 handle
    #[inline]
    pub fn invalidate(&mut self) {
        *self = Self::default();
    }
}

impl<const TYPE: ResourceType> Default for Resource<TYPE> {
    #[inline]
    fn default() -> Self {
        Self {
            id: ResourceHandle::default().with_resource_type(TYPE),
        }
    }
}

impl<const TYPE: ResourceType> From<Resource<TYPE>> for ResourceHandle {
    #[inline(always)]
    fn from(resource: Resource<TYPE>) -> Self {
        resource.id
    }
}
