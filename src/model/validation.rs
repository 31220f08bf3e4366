use crate::model::action::ModelError;
use crate::model::modes::{ModeError, RawMode, SelectionMode, SubSelectionMode, ValidationMode};
use crate::variable::VariableContext;

/// 一条响应校验记录
///
/// 模式字段以原始字符串保存：原始值可能是占位符，
/// 只有读取时才解析并检查是否落在封闭集合内（见 RawMode）。
#[derive(Debug, Clone, PartialEq)]
pub struct Validation {
    pub name: String,
    selection: RawMode,
    selection_content: String,
    sub_selection: Option<RawMode>,
    sub_selection_content: Option<String>,
    validation: RawMode,
    validation_content: Option<String>,
}

impl Validation {
    /// 从原始字符串构造，不做任何校验（codec 读取路径）
    pub fn from_raw(
        name: impl Into<String>,
        selection: impl Into<String>,
        selection_content: impl Into<String>,
        sub_selection: Option<String>,
        sub_selection_content: Option<String>,
        validation: impl Into<String>,
        validation_content: Option<String>,
    ) -> Self {
        Self {
            name: name.into(),
            selection: RawMode::new(selection),
            selection_content: selection_content.into(),
            sub_selection: sub_selection.map(RawMode::new),
            sub_selection_content,
            validation: RawMode::new(validation),
            validation_content,
        }
    }

    pub fn selection_mode(&self, ctx: &VariableContext) -> Result<SelectionMode, ModeError> {
        self.selection.resolve(ctx)
    }

    pub fn validation_mode(&self, ctx: &VariableContext) -> Result<ValidationMode, ModeError> {
        self.validation.resolve(ctx)
    }

    pub fn sub_selection_mode(
        &self,
        ctx: &VariableContext,
    ) -> Result<Option<SubSelectionMode>, ModeError> {
        self.sub_selection.as_ref().map(|m| m.resolve(ctx)).transpose()
    }

    pub fn selection_raw(&self) -> &str {
        self.selection.raw()
    }

    pub fn selection_content(&self) -> &str {
        &self.selection_content
    }

    pub fn sub_selection_raw(&self) -> Option<&str> {
        self.sub_selection.as_ref().map(|m| m.raw())
    }

    pub fn sub_selection_content(&self) -> Option<&str> {
        self.sub_selection_content.as_deref()
    }

    pub fn validation_raw(&self) -> &str {
        self.validation.raw()
    }

    pub fn validation_content(&self) -> Option<&str> {
        self.validation_content.as_deref()
    }
}

/// Validation 的构建器，翻译引擎使用
///
/// 构建时执行模式组合的不变量检查。
#[derive(Debug, Clone)]
pub struct ValidationBuilder {
    name: String,
    selection: SelectionMode,
    selection_content: String,
    sub_selection_group: Option<u32>,
    validation: ValidationMode,
    validation_content: Option<String>,
}

impl ValidationBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            selection: SelectionMode::Regex,
            // `.*` 表示整个响应体
            selection_content: ".*".to_string(),
            sub_selection_group: None,
            validation: ValidationMode::Matches,
            validation_content: None,
        }
    }

    pub fn selection(mut self, mode: SelectionMode, content: impl Into<String>) -> Self {
        self.selection = mode;
        self.selection_content = content.into();
        self
    }

    pub fn capture_group(mut self, group: u32) -> Self {
        self.sub_selection_group = Some(group);
        self
    }

    pub fn validation(mut self, mode: ValidationMode, content: Option<String>) -> Self {
        self.validation = mode;
        self.validation_content = content;
        self
    }

    pub fn build(self) -> Result<Validation, ModelError> {
        let mut validation = self.validation;

        // 变量引用总有值，"存在" 没有意义，提升为 Matches
        if self.selection == SelectionMode::Variable && validation == ValidationMode::Exists {
            validation = ValidationMode::Matches;
        }

        // 只有 Exists 允许缺省期望值
        if validation != ValidationMode::Exists && self.validation_content.is_none() {
            return Err(ModelError::MissingValidationField {
                name: self.name,
                field: "validation content",
            });
        }

        Ok(Validation {
            name: self.name,
            selection: self.selection.into(),
            selection_content: self.selection_content,
            sub_selection: self
                .sub_selection_group
                .map(|_| SubSelectionMode::RegexGroup.into()),
            sub_selection_content: self.sub_selection_group.map(|g| g.to_string()),
            validation: validation.into(),
            validation_content: self.validation_content,
        })
    }
}

/// 一条提取记录：从响应取值并绑定到变量
#[derive(Debug, Clone, PartialEq)]
pub struct Extraction {
    pub name: String,
    selection: RawMode,
    selection_content: String,
    sub_selection: Option<RawMode>,
    sub_selection_content: Option<String>,
}

impl Extraction {
    /// 从原始字符串构造，不做任何校验（codec 读取路径）
    pub fn from_raw(
        name: impl Into<String>,
        selection: impl Into<String>,
        selection_content: impl Into<String>,
        sub_selection: Option<String>,
        sub_selection_content: Option<String>,
    ) -> Self {
        Self {
            name: name.into(),
            selection: RawMode::new(selection),
            selection_content: selection_content.into(),
            sub_selection: sub_selection.map(RawMode::new),
            sub_selection_content,
        }
    }

    /// 引擎构造路径：已知类型的选择模式
    pub fn new(
        name: impl Into<String>,
        selection: SelectionMode,
        selection_content: impl Into<String>,
        capture_group: Option<u32>,
    ) -> Self {
        Self {
            name: name.into(),
            selection: selection.into(),
            selection_content: selection_content.into(),
            sub_selection: capture_group.map(|_| SubSelectionMode::RegexGroup.into()),
            sub_selection_content: capture_group.map(|g| g.to_string()),
        }
    }

    pub fn selection_mode(&self, ctx: &VariableContext) -> Result<SelectionMode, ModeError> {
        self.selection.resolve(ctx)
    }

    pub fn selection_raw(&self) -> &str {
        self.selection.raw()
    }

    pub fn selection_content(&self) -> &str {
        &self.selection_content
    }

    pub fn sub_selection_raw(&self) -> Option<&str> {
        self.sub_selection.as_ref().map(|m| m.raw())
    }

    pub fn sub_selection_content(&self) -> Option<&str> {
        self.sub_selection_content.as_deref()
    }
}
