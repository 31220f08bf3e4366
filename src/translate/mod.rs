//! 翻译引擎 - 把源格式的测试计划转换成动作列表
//!
//! 流式单遍遍历：事件游标产出已解码的事件，范围跟踪器界定逻辑
//! 子树，装配器按 (标签, 深度) 分发并构造动作。任何会改变请求
//! 语义的无法表示构造都以错误终止，产出宁缺毋滥。

pub mod assembler;
pub mod cursor;
pub mod defaults;
pub mod mapper;
pub mod scope;
pub mod vocabulary;

mod driver;

pub use assembler::ActionAssembler;
pub use cursor::{EventCursor, Tag, XmlEvent};
pub use defaults::{DefaultContext, ParameterDefault};
pub use driver::{TranslatedPlan, TranslationDriver};
pub use mapper::AssertionTarget;
pub use scope::ScopeTracker;

use std::path::PathBuf;
use thiserror::Error;

/// 翻译过程的错误类型
#[derive(Error, Debug)]
pub enum TranslateError {
    #[error("输入文件不存在: {0}")]
    InputNotFound(PathBuf),

    #[error("输入格式错误: {0}")]
    MalformedInput(String),

    /// 源构造在目标模型里没有等价物，翻译结果会失真
    #[error("无法表示的构造: {0}")]
    UnsupportedConstruct(String),

    #[error("XML 解析错误: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("IO 错误: {0}")]
    Io(#[from] std::io::Error),

    #[error("模型错误: {0}")]
    Model(#[from] crate::model::ModelError),
}

/// 翻译结果类型别名
pub type TranslateResult<T> = std::result::Result<T, TranslateError>;

/// 翻译一个测试计划文件
pub fn translate_file(
    path: impl AsRef<std::path::Path>,
) -> TranslateResult<TranslatedPlan> {
    TranslationDriver::new().translate_file(path)
}

/// 翻译内存中的测试计划文本
pub fn translate_content(content: &str) -> TranslateResult<TranslatedPlan> {
    TranslationDriver::new().translate_content(content)
}
