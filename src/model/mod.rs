pub mod action;
pub mod modes;
pub mod validation;

// Re-export commonly used types
pub use action::{Action, ActionBuilder, ModelError};
pub use modes::{ModeError, ModeSet, RawMode, SelectionMode, SubSelectionMode, ValidationMode};
pub use validation::{Extraction, Validation, ValidationBuilder};

/// 一个线程组翻译出的完整结果
///
/// store 保存需要写入输出 Store 块的已解析变量绑定。
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ActionList {
    pub store: Vec<(String, String)>,
    pub actions: Vec<Action>,
}

impl ActionList {
    pub fn new() -> Self {
        Self::default()
    }
}
