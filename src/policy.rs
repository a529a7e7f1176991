/// Selects whether a `ResourceTable` validates handles on the `item_at` path
///
/// `contains`, `get` and `erase` always validate; the policy only decides
/// whether dereferencing a handle the caller should already have checked
/// pays for the check again.
///
/// 决定 `ResourceTable` 是否在 `item_at` 路径上校验 handle
///
/// `contains`、`get` 和 `erase` 总是校验；该策略只决定对调用者本应已校验过的
/// handle 解引用时是否再次校验。
pub trait CheckPolicy {
    /// `true` to validate and panic on misuse
    ///
    /// 为 `true` 时校验并在误用时 panic
    const VALIDATE: bool;
}

/// Validates when `debug_assertions` are enabled, trusts the caller otherwise
///
/// 启用 `debug_assertions` 时校验，否则信任调用者
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DebugChecked;

/// Always validates
///
/// 总是校验
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Checked;

/// Never validates on the `item_at` path
///
/// A rejected handle then resolves to an unspecified element or panics on a
/// bounds check; it never reads out of bounds.
///
/// 从不在 `item_at` 路径上校验；被拒绝的 handle 会解析到不确定的元素或触发边界检查 panic
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Unchecked;

impl CheckPolicy for DebugChecked {
    const VALIDATE: bool = cfg!(debug_assertions);
}

impl CheckPolicy for Checked {
    const VALIDATE: bool = true;
}

impl CheckPolicy for Unchecked {
    const VALIDATE: bool = false;
}
