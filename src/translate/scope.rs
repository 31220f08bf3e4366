use crate::translate::cursor::XmlEvent;
use crate::translate::vocabulary::TAG_HASH_TREE;

/// 子树范围跟踪器
///
/// 源格式把 "节点 X 的子节点" 放在 X 之后的同级容器标签里，
/// 容器可以任意嵌套。通过计数容器的开始/结束标签判断一棵
/// 逻辑子树何时被完整消费。
///
/// 前置条件：调用方必须把每个事件先交给 `enter_if_container_start`，
/// 再依赖 `exit_if_container_end` 的归零判断，两者不配对使用会错位。
#[derive(Debug, Default)]
pub struct ScopeTracker {
    depth: usize,
}

impl ScopeTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// 记一个已经被调用方消费掉的容器开始标签
    pub fn enter(&mut self) {
        self.depth += 1;
    }

    /// 事件是容器开始标签时加深一层
    pub fn enter_if_container_start(&mut self, event: &XmlEvent) {
        if event.is_start_of(TAG_HASH_TREE) {
            self.depth += 1;
        }
    }

    /// 事件是容器结束标签时退出一层
    ///
    /// 恰好在归零（逻辑子树被完整消费）时返回 true。
    pub fn exit_if_container_end(&mut self, event: &XmlEvent) -> bool {
        if event.is_end_of(TAG_HASH_TREE) {
            self.depth = self.depth.saturating_sub(1);
            self.depth == 0
        } else {
            false
        }
    }

    pub fn depth(&self) -> usize {
        self.depth
    }
}
