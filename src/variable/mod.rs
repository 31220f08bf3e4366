pub mod resolver;
pub mod types;

// Re-export commonly used types
pub use resolver::VariableResolver;
pub use types::{BindingError, Environment, RESERVED_NAMES, VariableConfig, VariableContext};

/// 从 TOML 文件加载指定环境的变量
pub fn load_environment<P: AsRef<std::path::Path>>(
    path: P,
    env_name: &str,
) -> crate::Result<VariableContext> {
    let content = std::fs::read_to_string(path.as_ref())?;
    let config: VariableConfig = toml::from_str(&content)?;
    let mut context = VariableContext::new();
    if let Some(environment) = config.get_environment(env_name) {
        context.extend(environment.variables.clone());
    } else {
        tracing::warn!("environment '{}' not found in variable file", env_name);
    }
    Ok(context)
}
