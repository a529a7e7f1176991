//! Generational, type-tagged resource handles and the slot table they address
//!
//! A [`ResourceHandle`] packs a free flag, a resource type, a generation and
//! an index into one `u64`. A [`ResourceTable`] stores values of one resource
//! type densely and hands out such handles, with O(1) insert, erase, lookup
//! and stale-handle detection.
//!
//! 带代数与类型标签的资源 handle，以及由其寻址的 slot 表
//!
//! [`ResourceHandle`] 将空闲标志、资源类型、代数和索引打包进一个 `u64`。
//! [`ResourceTable`] 紧密存储同一资源类型的值并签发这种 handle，
//! 插入、删除、查找和过期 handle 检测均为 O(1)。
//!
//! ```
//! use resource_table::{ResourceHandle, ResourceTable};
//!
//! let mut table: ResourceTable<String> = ResourceTable::new(1, 3);
//! let handle = table.emplace("1");
//! table.erase(handle);
//!
//! let reused: ResourceHandle = table.emplace("2");
//! assert_eq!(reused.index(), handle.index());
//! assert_eq!(reused.generation(), 1);
//! assert!(!table.contains(handle));
//! ```

mod error;
mod handle;
mod policy;
mod resource;
mod slot;
mod table;
mod utils;

pub use error::ResourceTableError;
pub use handle::{HandleGeneration, HandleIndex, ResourceHandle, ResourceType};
pub use policy::{CheckPolicy, Checked, DebugChecked, Unchecked};
pub use resource::Resource;
pub use table::{HandleSet, ResourceTable};
