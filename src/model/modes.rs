use crate::variable::{VariableContext, VariableResolver};
use std::fmt;

/// 模式字段错误类型
#[derive(Debug, thiserror::Error)]
pub enum ModeError {
    #[error("Unknown {kind} '{value}'")]
    UnknownMode { kind: &'static str, value: String },
}

/// 封闭模式集合：每个模式枚举都能从字符串解析、转回字符串
pub trait ModeSet: Sized + Copy {
    /// 集合名称，用于错误报告
    const KIND: &'static str;

    /// 从字符串解析模式，不在集合内返回 None
    fn parse(s: &str) -> Option<Self>;

    /// 转换为字符串表示
    fn as_str(&self) -> &'static str;
}

/// 选择模式 - 校验/提取从响应的哪个位置读取输入
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionMode {
    /// 从已绑定的变量读取
    Variable,
    /// 对响应体执行 XPath 查询
    XPath,
    /// 对响应体执行正则匹配
    Regex,
    /// 读取指定响应 Header
    Header,
    /// 读取指定 Cookie
    Cookie,
}

impl ModeSet for SelectionMode {
    const KIND: &'static str = "selection mode";

    fn parse(s: &str) -> Option<Self> {
        match s {
            "Variable" => Some(Self::Variable),
            "XPath" => Some(Self::XPath),
            "Regex" => Some(Self::Regex),
            "Header" => Some(Self::Header),
            "Cookie" => Some(Self::Cookie),
            _ => None,
        }
    }

    fn as_str(&self) -> &'static str {
        match self {
            Self::Variable => "Variable",
            Self::XPath => "XPath",
            Self::Regex => "Regex",
            Self::Header => "Header",
            Self::Cookie => "Cookie",
        }
    }
}

impl fmt::Display for SelectionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// 校验模式 - 如何比较选取到的值
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationMode {
    /// 完整文本相等
    Text,
    /// 模式匹配
    Matches,
    /// 出现次数
    Count,
    /// 仅要求存在
    Exists,
}

impl ModeSet for ValidationMode {
    const KIND: &'static str = "validation mode";

    fn parse(s: &str) -> Option<Self> {
        match s {
            "Text" => Some(Self::Text),
            "Matches" => Some(Self::Matches),
            "Count" => Some(Self::Count),
            "Exists" => Some(Self::Exists),
            _ => None,
        }
    }

    fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "Text",
            Self::Matches => "Matches",
            Self::Count => "Count",
            Self::Exists => "Exists",
        }
    }
}

impl fmt::Display for ValidationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// 次级选择模式 - 对正则匹配结果的进一步收窄
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubSelectionMode {
    /// 取第 N 个捕获组
    RegexGroup,
}

impl ModeSet for SubSelectionMode {
    const KIND: &'static str = "sub-selection mode";

    fn parse(s: &str) -> Option<Self> {
        match s {
            "RegexGroup" => Some(Self::RegexGroup),
            _ => None,
        }
    }

    fn as_str(&self) -> &'static str {
        match self {
            Self::RegexGroup => "RegexGroup",
        }
    }
}

impl fmt::Display for SubSelectionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// 未解析的模式字段
///
/// 原始值可能本身是 ${name} 占位符，构造时不做校验；
/// 只有在首次读取（resolve）时才先做占位符替换、再对封闭集合做检查。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawMode(String);

impl RawMode {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// 原始字符串，未经替换
    pub fn raw(&self) -> &str {
        &self.0
    }

    /// 解析为封闭集合中的模式
    ///
    /// 先通过变量上下文替换占位符，替换结果必须落在集合内。
    pub fn resolve<T: ModeSet>(&self, context: &VariableContext) -> Result<T, ModeError> {
        let resolved = VariableResolver::resolve(&self.0, context);
        T::parse(&resolved).ok_or(ModeError::UnknownMode {
            kind: T::KIND,
            value: resolved,
        })
    }
}

impl<T: ModeSet> From<T> for RawMode {
    fn from(mode: T) -> Self {
        Self(mode.as_str().to_string())
    }
}
