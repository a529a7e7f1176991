use std::fmt;

use crate::handle::{HandleGeneration, HandleIndex, ResourceType};

/// Reason a handle was rejected by a ResourceTable
///
/// ResourceTable 拒绝 handle 的原因
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceTableError {
    /// Handle carries the invalid index sentinel
    ///
    /// Handle 带有无效索引哨兵值
    InvalidHandle,

    /// Handle belongs to another kind of resource
    ///
    /// Handle 属于另一种资源
    TypeMismatch {
        expected: ResourceType,
        found: ResourceType,
    },

    /// Index is beyond the table's capacity
    ///
    /// 索引超出表的容量
    IndexOutOfBounds { index: HandleIndex, capacity: usize },

    /// Slot is on the free list
    ///
    /// Slot 位于空闲列表中
    Vacant { index: HandleIndex },

    /// Slot has been recycled since the handle was issued
    ///
    /// Handle 签发后 slot 已被回收
    GenerationMismatch {
        expected: HandleGeneration,
        found: HandleGeneration,
    },
}

impl fmt::Display for ResourceTableError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceTableError::InvalidHandle => write!(f, "Invalid handle"),
            ResourceTableError::TypeMismatch { expected, found } => write!(
                f,
                "Resource type mismatch: table holds {expected:#x}, handle is {found:#x}"
            ),
            ResourceTableError::IndexOutOfBounds { index, capacity } => write!(
                f,
                "Index {index} out of bounds for capacity {capacity}"
            ),
            ResourceTableError::Vacant { index } => write!(f, "Slot {index} is vacant"),
            ResourceTableError::GenerationMismatch { expected, found } => write!(
                f,
                "Generation mismatch: slot is at {expected}, handle is at {found}"
            ),
        }
    }
}

impl std::error::Error for ResourceTableError {}
