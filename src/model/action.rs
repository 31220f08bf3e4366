use crate::model::validation::{Extraction, Validation};
use crate::variable::VariableResolver;

/// 模型构造错误类型
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    /// 动作缺少名称
    #[error("Action has no name")]
    MissingName,

    /// 回退之后仍然没有主机名，无法拼出 URL
    #[error("Cannot determine target host for action '{action}'")]
    MissingHost { action: String },

    /// 拼出的 URL 不合法
    #[error("Invalid URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        source: url::ParseError,
    },

    /// 校验记录缺少字段
    #[error("Validation '{name}' is missing {field}")]
    MissingValidationField { name: String, field: &'static str },
}

/// 单个待执行的请求动作
///
/// 在一次树遍历中完整填充，build 之后不可变。
#[derive(Debug, Clone, PartialEq)]
pub struct Action {
    /// 动作名称，可能仍含未解析的占位符
    pub name: String,

    /// 由 protocol + host + path 拼出的完整 URL
    pub url: String,

    /// HTTP 方法，缺省为 GET
    pub method: String,

    /// 参数列表，线程组默认参数在前、动作自身参数在后
    pub parameters: Vec<(String, String)>,

    /// Header 列表，继承规则与参数一致
    pub headers: Vec<(String, String)>,

    /// 参数编码开关，三态：整个动作只取第一个参数的编码标记
    pub encode_parameters: Option<bool>,

    /// 期望的响应状态码
    pub http_response_code: Option<String>,

    /// 响应校验列表，按出现顺序
    pub validations: Vec<Validation>,

    /// 响应提取列表，按出现顺序
    pub extractions: Vec<Extraction>,
}

/// Action 的构建器
///
/// 聚合遍历过程中读到的字段，build 时做兜底检查并拼 URL。
#[derive(Debug, Clone, Default)]
pub struct ActionBuilder {
    name: Option<String>,
    protocol: Option<String>,
    host: Option<String>,
    port: Option<String>,
    path: Option<String>,
    method: Option<String>,
    parameters: Vec<(String, String)>,
    headers: Vec<(String, String)>,
    encode_parameters: Option<bool>,
    http_response_code: Option<String>,
    validations: Vec<Validation>,
    extractions: Vec<Extraction>,
}

impl ActionBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn protocol(&mut self, protocol: impl Into<String>) -> &mut Self {
        let protocol = protocol.into();
        if !protocol.is_empty() {
            self.protocol = Some(protocol);
        }
        self
    }

    pub fn host(&mut self, host: impl Into<String>) -> &mut Self {
        let host = host.into();
        if !host.is_empty() {
            self.host = Some(host);
        }
        self
    }

    pub fn port(&mut self, port: impl Into<String>) -> &mut Self {
        let port = port.into();
        if !port.is_empty() {
            self.port = Some(port);
        }
        self
    }

    pub fn path(&mut self, path: impl Into<String>) -> &mut Self {
        let path = path.into();
        if !path.is_empty() {
            self.path = Some(path);
        }
        self
    }

    pub fn method(&mut self, method: impl Into<String>) -> &mut Self {
        let method = method.into();
        if !method.is_empty() {
            self.method = Some(method);
        }
        self
    }

    pub fn has_host(&self) -> bool {
        self.host.is_some()
    }

    pub fn has_protocol(&self) -> bool {
        self.protocol.is_some()
    }

    pub fn has_path(&self) -> bool {
        self.path.is_some()
    }

    /// 追加一个参数；编码标记只在第一个参数上生效
    pub fn add_parameter(
        &mut self,
        name: impl Into<String>,
        value: impl Into<String>,
        encode: Option<bool>,
    ) -> &mut Self {
        if self.parameters.is_empty() {
            self.encode_parameters = encode;
        }
        self.parameters.push((name.into(), value.into()));
        self
    }

    pub fn add_header(&mut self, name: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn http_response_code(&mut self, code: impl Into<String>) -> &mut Self {
        self.http_response_code = Some(code.into());
        self
    }

    pub fn add_validation(&mut self, validation: Validation) -> &mut Self {
        self.validations.push(validation);
        self
    }

    pub fn add_extraction(&mut self, extraction: Extraction) -> &mut Self {
        self.extractions.push(extraction);
        self
    }

    /// 完成构建
    ///
    /// host 在默认值回退之后仍缺失是硬错误；URL 不含占位符时做合法性检查。
    pub fn build(self) -> Result<Action, ModelError> {
        let name = self.name.ok_or(ModelError::MissingName)?;
        let host = self.host.ok_or_else(|| ModelError::MissingHost {
            action: name.clone(),
        })?;

        let protocol = self.protocol.unwrap_or_else(|| "http".to_string());
        let mut path = self.path.unwrap_or_default();
        if !path.is_empty() && !path.starts_with('/') {
            path.insert(0, '/');
        }
        let url = match &self.port {
            Some(port) => format!("{}://{}:{}{}", protocol, host, port, path),
            None => format!("{}://{}{}", protocol, host, path),
        };

        // 占位符在运行时才解析，此时无法检查
        if !VariableResolver::has_placeholder(&url) {
            url::Url::parse(&url).map_err(|source| ModelError::InvalidUrl {
                url: url.clone(),
                source,
            })?;
        }

        Ok(Action {
            name,
            url,
            method: self.method.unwrap_or_else(|| "GET".to_string()),
            parameters: self.parameters,
            headers: self.headers,
            encode_parameters: self.encode_parameters,
            http_response_code: self.http_response_code,
            validations: self.validations,
            extractions: self.extractions,
        })
    }
}
