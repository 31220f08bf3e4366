use serde::Deserialize;
use std::collections::HashMap;

/// 引擎内建的保留变量名，声明同名绑定会触发 BindingConflict
pub const RESERVED_NAMES: &[&str] = &["random", "timestamp", "iteration"];

/// 变量绑定错误类型
#[derive(Debug, thiserror::Error)]
pub enum BindingError {
    /// 与保留标识符冲突
    #[error("Variable '{0}' collides with a reserved identifier")]
    ReservedName(String),
}

/// 变量上下文，存储一次翻译内的所有绑定
#[derive(Debug, Clone, Default)]
pub struct VariableContext {
    /// 变量映射表
    variables: HashMap<String, String>,
}

impl VariableContext {
    /// 创建新的空变量上下文
    pub fn new() -> Self {
        Self::default()
    }

    /// 插入变量，不做保留名检查（引擎内部使用）
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.variables.insert(key.into(), value.into());
    }

    /// 声明变量，保留名冲突时返回错误
    ///
    /// 冲突不是致命错误：调用方记录警告并跳过该绑定即可。
    pub fn declare(
        &mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<(), BindingError> {
        let key = key.into();
        if RESERVED_NAMES.contains(&key.as_str()) {
            return Err(BindingError::ReservedName(key));
        }
        self.variables.insert(key, value.into());
        Ok(())
    }

    /// 获取变量值
    pub fn get(&self, key: &str) -> Option<&str> {
        self.variables.get(key).map(|s| s.as_str())
    }

    /// 是否存在绑定
    pub fn has(&self, key: &str) -> bool {
        self.variables.contains_key(key)
    }

    /// 批量插入变量
    pub fn extend(&mut self, vars: HashMap<String, String>) {
        self.variables.extend(vars);
    }

    /// 按名称排序的绑定快照
    pub fn bindings(&self) -> Vec<(String, String)> {
        let mut all: Vec<_> = self
            .variables
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        all.sort();
        all
    }

    /// 变量数量
    pub fn len(&self) -> usize {
        self.variables.len()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }
}

/// 环境配置
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Environment {
    /// 变量映射
    #[serde(flatten)]
    pub variables: HashMap<String, String>,
}

/// 完整的变量配置文件
#[derive(Debug, Clone, Deserialize, Default)]
pub struct VariableConfig {
    /// 所有环境配置
    #[serde(default)]
    pub environments: HashMap<String, Environment>,
}

impl VariableConfig {
    /// 获取指定环境的变量
    pub fn get_environment(&self, env_name: &str) -> Option<&Environment> {
        self.environments.get(env_name)
    }
}
