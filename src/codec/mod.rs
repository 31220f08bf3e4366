//! 动作列表的文本编解码
//!
//! 块结构的 key/value 文档，人可直接编辑。写出和读回共享同一套
//! 记录形状；缺失字段整行省略。

mod reader;
mod writer;

pub use reader::read_action_list;
pub use writer::write_action_list;

use crate::model::ActionList;
use std::path::Path;
use thiserror::Error;

/// 编解码错误类型
#[derive(Error, Debug)]
pub enum CodecError {
    #[error("语法错误 (第 {line} 行): {message}")]
    Syntax { line: usize, message: String },

    #[error("IO 错误: {0}")]
    Io(#[from] std::io::Error),
}

/// 把动作列表写入文件
pub fn write_action_list_file(
    path: impl AsRef<Path>,
    list: &ActionList,
) -> Result<(), CodecError> {
    std::fs::write(path, write_action_list(list))?;
    Ok(())
}

/// 从文件读取动作列表
pub fn read_action_list_file(path: impl AsRef<Path>) -> Result<ActionList, CodecError> {
    let content = std::fs::read_to_string(path)?;
    read_action_list(&content)
}
