use crate::model::ActionBuilder;

/// 线程组级别的参数声明（带编码标记）
pub type ParameterDefault = (String, String, Option<bool>);

/// 默认值上下文
///
/// 保存遍历 "test configuration" 节点时收集到的线程组级回退值。
/// 配置节点的子树消费完之后只读；每个线程组开始时重置，
/// 不跨组泄漏。
#[derive(Debug, Clone, Default)]
pub struct DefaultContext {
    protocol: Option<String>,
    host: Option<String>,
    port: Option<String>,
    path: Option<String>,
    parameters: Vec<ParameterDefault>,
    headers: Vec<(String, String)>,
}

impl DefaultContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn protocol(&self) -> Option<&str> {
        self.protocol.as_deref()
    }

    pub fn host(&self) -> Option<&str> {
        self.host.as_deref()
    }

    pub fn port(&self) -> Option<&str> {
        self.port.as_deref()
    }

    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    pub fn default_parameters(&self) -> &[ParameterDefault] {
        &self.parameters
    }

    pub fn default_headers(&self) -> &[(String, String)] {
        &self.headers
    }

    pub fn set_protocol(&mut self, value: impl Into<String>) {
        let value = value.into();
        if !value.is_empty() {
            self.protocol = Some(value);
        }
    }

    pub fn set_host(&mut self, value: impl Into<String>) {
        let value = value.into();
        if !value.is_empty() {
            self.host = Some(value);
        }
    }

    pub fn set_port(&mut self, value: impl Into<String>) {
        let value = value.into();
        if !value.is_empty() {
            self.port = Some(value);
        }
    }

    pub fn set_path(&mut self, value: impl Into<String>) {
        let value = value.into();
        if !value.is_empty() {
            self.path = Some(value);
        }
    }

    pub fn add_parameter(&mut self, name: String, value: String, encode: Option<bool>) {
        self.parameters.push((name, value, encode));
    }

    pub fn add_header(&mut self, name: String, value: String) {
        self.headers.push((name, value));
    }

    /// 把默认值套到一个动作上
    ///
    /// 动作缺失的字段原样代入；参数和 header 前置在动作自身的
    /// 条目之前（追加语义，不替换）。必须在动作自身的参数加入
    /// 之前调用。
    pub fn apply_to(&self, builder: &mut ActionBuilder) {
        if !builder.has_protocol() {
            if let Some(protocol) = &self.protocol {
                builder.protocol(protocol.clone());
            }
        }
        if !builder.has_host() {
            if let Some(host) = &self.host {
                builder.host(host.clone());
                if let Some(port) = &self.port {
                    builder.port(port.clone());
                }
            }
        }
        if !builder.has_path() {
            if let Some(path) = &self.path {
                builder.path(path.clone());
            }
        }
        for (name, value, encode) in &self.parameters {
            builder.add_parameter(name.clone(), value.clone(), *encode);
        }
        for (name, value) in &self.headers {
            builder.add_header(name.clone(), value.clone());
        }
    }
}
