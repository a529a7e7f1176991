/// Branch prediction hint: marks code path as unlikely (cold)
///
/// 分支预测提示：标记代码路径为不太可能执行（冷路径）
#[inline(always)]
#[cold]
pub(crate) fn cold() {}

/// Branch prediction hint: unlikely condition
///
/// Returns the original boolean value.
///
/// 分支预测提示：提示编译器这个条件很可能为假，返回原始的布尔值
#[inline(always)]
pub(crate) fn unlikely(b: bool) -> bool {
    if b {
        cold();
    }
    b
}
