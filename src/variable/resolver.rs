use crate::variable::types::VariableContext;
use regex::{Captures, Regex};
use std::sync::OnceLock;

/// 变量替换器
pub struct VariableResolver;

impl VariableResolver {
    /// 替换文本中的所有 ${variable} 占位符
    ///
    /// 未绑定的占位符保持原样，调用方可以在之后的读取点再次解析。
    pub fn resolve(text: &str, context: &VariableContext) -> String {
        static VAR_REGEX: OnceLock<Regex> = OnceLock::new();
        let re = VAR_REGEX
            .get_or_init(|| Regex::new(r"\$\{([a-zA-Z_][a-zA-Z0-9_.-]*)\}").unwrap());

        re.replace_all(text, |caps: &Captures| {
            let var_name = &caps[1];
            context.get(var_name).unwrap_or(&caps[0]).to_string()
        })
        .to_string()
    }

    /// 文本是否包含 ${variable} 引用
    pub fn has_placeholder(text: &str) -> bool {
        static VAR_REGEX: OnceLock<Regex> = OnceLock::new();
        let re = VAR_REGEX
            .get_or_init(|| Regex::new(r"\$\{([a-zA-Z_][a-zA-Z0-9_.-]*)\}").unwrap());
        re.is_match(text)
    }
}
