use crate::model::{
    Action, ActionBuilder, ActionList, Extraction, SelectionMode, ValidationBuilder,
};
use crate::translate::cursor::{EventCursor, Tag, XmlEvent};
use crate::translate::defaults::{DefaultContext, ParameterDefault};
use crate::translate::mapper;
use crate::translate::scope::ScopeTracker;
use crate::translate::vocabulary::*;
use crate::translate::{TranslateError, TranslateResult};
use crate::variable::{VariableContext, VariableResolver};
use std::io::BufRead;
use tracing::{debug, warn};

/// 动作装配器 - 把一个线程组的子树走完，产出有序的动作列表
///
/// 驱动事件游标，按 (标签, 深度) 分发；终止条件只有一个：
/// 范围跟踪器报告线程组容器闭合，绝不按固定标签数终止。
pub struct ActionAssembler {
    vars: VariableContext,
    defaults: DefaultContext,
    store: Vec<(String, String)>,
}

impl ActionAssembler {
    pub fn new(vars: VariableContext) -> Self {
        Self {
            vars,
            defaults: DefaultContext::new(),
            store: Vec::new(),
        }
    }

    /// 声明一个变量绑定
    ///
    /// 值先经过当前上下文解析；引用了其他变量的绑定记入 Store 块。
    /// 与保留名冲突只跳过该绑定，不中断翻译。
    pub fn declare_variable(&mut self, name: &str, value: &str) {
        let resolved = VariableResolver::resolve(value, &self.vars);
        match self.vars.declare(name, resolved.clone()) {
            Ok(()) => {
                if VariableResolver::has_placeholder(value) {
                    self.store.push((name.to_string(), resolved));
                }
            }
            Err(err) => warn!("binding skipped: {}", err),
        }
    }

    /// 消费一个线程组的子树
    ///
    /// 前置条件：游标刚消费完线程组的容器开始标签。
    pub fn assemble<R: BufRead>(
        mut self,
        cursor: &mut EventCursor<R>,
    ) -> TranslateResult<ActionList> {
        let mut scope = ScopeTracker::new();
        scope.enter();
        let mut actions = Vec::new();

        loop {
            let event = cursor.next()?;
            scope.enter_if_container_start(&event);
            if scope.exit_if_container_end(&event) {
                return Ok(ActionList {
                    store: self.store,
                    actions,
                });
            }
            match &event {
                XmlEvent::Start(tag) => match tag.name.as_str() {
                    TAG_CONFIG if scope.depth() == 1 => self.read_defaults(cursor)?,
                    TAG_SAMPLER | TAG_SAMPLER_ALT => {
                        actions.push(self.read_action(cursor, tag)?);
                    }
                    TAG_ARGUMENTS if scope.depth() == 1 => {
                        for (name, value, _) in read_arguments(cursor, TAG_ARGUMENTS)? {
                            self.declare_variable(&name, &value);
                        }
                    }
                    TAG_HEADER_MANAGER if scope.depth() == 1 => {
                        for (name, value) in read_headers(cursor)? {
                            self.defaults.add_header(name, value);
                        }
                    }
                    TAG_HASH_TREE => {}
                    other => {
                        warn!("narrowing: element <{}> has no equivalent, skipped", other);
                        skip_element_with_container(cursor, other)?;
                    }
                },
                XmlEvent::Empty(_) => {}
                XmlEvent::Eof => {
                    return Err(TranslateError::MalformedInput(
                        "stream ended inside a thread group".to_string(),
                    ));
                }
                _ => {}
            }
        }
    }

    /// 读取 "test configuration" 节点，填充默认值上下文
    fn read_defaults<R: BufRead>(&mut self, cursor: &mut EventCursor<R>) -> TranslateResult<()> {
        loop {
            let event = cursor.next()?;
            match &event {
                XmlEvent::Start(tag) if tag.name == TAG_STRING_PROP => {
                    let value = cursor.read_text(TAG_STRING_PROP)?;
                    match tag.attr(ATTR_NAME) {
                        Some(PROP_PROTOCOL) => self.defaults.set_protocol(value),
                        Some(PROP_DOMAIN) => self.defaults.set_host(value),
                        Some(PROP_PORT) => self.defaults.set_port(value),
                        Some(PROP_PATH) => self.defaults.set_path(value),
                        _ => {}
                    }
                }
                XmlEvent::Start(tag)
                    if tag.name == TAG_ELEMENT_PROP
                        && tag.attr_equals(ATTR_NAME, PROP_SAMPLER_ARGUMENTS) =>
                {
                    for (name, value, encode) in read_arguments(cursor, TAG_ELEMENT_PROP)? {
                        self.defaults.add_parameter(name, value, encode);
                    }
                }
                XmlEvent::Start(tag) => cursor.skip_to_end(&tag.name.clone())?,
                XmlEvent::End(name) if name == TAG_CONFIG => {
                    debug!(
                        "defaults collected: host={:?} path={:?}",
                        self.defaults.host(),
                        self.defaults.path()
                    );
                    return Ok(());
                }
                XmlEvent::Eof => {
                    return Err(TranslateError::MalformedInput(
                        "stream ended inside test configuration".to_string(),
                    ));
                }
                _ => {}
            }
        }
    }

    /// 读取一个 HTTP 采样器及其附属子树，产出一个动作
    fn read_action<R: BufRead>(
        &mut self,
        cursor: &mut EventCursor<R>,
        tag: &Tag,
    ) -> TranslateResult<Action> {
        let sampler_tag = tag.name.clone();
        let name = tag.attr(ATTR_TESTNAME).ok_or_else(|| {
            TranslateError::MalformedInput("sampler without a test name".to_string())
        })?;
        let mut builder = ActionBuilder::new(name);
        let mut own_parameters: Vec<ParameterDefault> = Vec::new();

        // 采样器自身的字段
        loop {
            let event = cursor.next()?;
            match &event {
                XmlEvent::Start(prop) if prop.name == TAG_STRING_PROP => {
                    let value = cursor.read_text(TAG_STRING_PROP)?;
                    match prop.attr(ATTR_NAME) {
                        Some(PROP_PROTOCOL) => {
                            builder.protocol(value);
                        }
                        Some(PROP_DOMAIN) => {
                            builder.host(value);
                        }
                        Some(PROP_PORT) => {
                            builder.port(value);
                        }
                        Some(PROP_PATH) => {
                            builder.path(value);
                        }
                        Some(PROP_METHOD) => {
                            builder.method(value);
                        }
                        _ => {}
                    }
                }
                XmlEvent::Start(prop)
                    if prop.name == TAG_ELEMENT_PROP
                        && prop.attr_equals(ATTR_NAME, PROP_SAMPLER_ARGUMENTS) =>
                {
                    own_parameters = read_arguments(cursor, TAG_ELEMENT_PROP)?;
                }
                XmlEvent::Start(prop) => cursor.skip_to_end(&prop.name.clone())?,
                XmlEvent::End(end) if *end == sampler_tag => break,
                XmlEvent::Eof => {
                    return Err(TranslateError::MalformedInput(
                        "stream ended inside a sampler".to_string(),
                    ));
                }
                _ => {}
            }
        }

        // 默认值回退在动作自身参数之前生效
        self.defaults.apply_to(&mut builder);
        for (name, value, encode) in own_parameters {
            builder.add_parameter(name, value, encode);
        }

        // 附属子树：断言、提取器、header
        let event = cursor.next()?;
        if event.is_start_of(TAG_HASH_TREE) {
            self.read_attachments(cursor, &mut builder)?;
        } else if !event.is_empty_of(TAG_HASH_TREE) {
            return Err(TranslateError::MalformedInput(format!(
                "sampler '{}' not followed by a children container",
                sampler_tag
            )));
        }

        Ok(builder.build()?)
    }

    /// 采样器的附属子树：按出现顺序收集校验、提取和 header
    fn read_attachments<R: BufRead>(
        &mut self,
        cursor: &mut EventCursor<R>,
        builder: &mut ActionBuilder,
    ) -> TranslateResult<()> {
        let mut scope = ScopeTracker::new();
        scope.enter();
        loop {
            let event = cursor.next()?;
            scope.enter_if_container_start(&event);
            if scope.exit_if_container_end(&event) {
                return Ok(());
            }
            match &event {
                XmlEvent::Start(tag) => match tag.name.as_str() {
                    TAG_RESPONSE_ASSERTION => self.read_response_assertion(cursor, tag, builder)?,
                    TAG_XPATH_EXTRACTOR => {
                        builder.add_extraction(read_xpath_extractor(cursor, tag)?);
                    }
                    TAG_REGEX_EXTRACTOR => {
                        builder.add_extraction(read_regex_extractor(cursor, tag)?);
                    }
                    TAG_HEADER_MANAGER => {
                        for (name, value) in read_headers(cursor)? {
                            builder.add_header(name, value);
                        }
                    }
                    TAG_HASH_TREE => {}
                    other => {
                        warn!("narrowing: element <{}> has no equivalent, skipped", other);
                        skip_element_with_container(cursor, other)?;
                    }
                },
                XmlEvent::Empty(_) => {}
                XmlEvent::Eof => {
                    return Err(TranslateError::MalformedInput(
                        "stream ended inside a sampler subtree".to_string(),
                    ));
                }
                _ => {}
            }
        }
    }

    /// 读取一个响应断言
    ///
    /// 目标是响应码时产出一次 httpResponseCode 赋值，否则每条
    /// 原始断言值产出一条校验记录。
    fn read_response_assertion<R: BufRead>(
        &mut self,
        cursor: &mut EventCursor<R>,
        tag: &Tag,
        builder: &mut ActionBuilder,
    ) -> TranslateResult<()> {
        let name = tag
            .attr(ATTR_TESTNAME)
            .unwrap_or(TAG_RESPONSE_ASSERTION)
            .to_string();

        let mut raw_values: Vec<String> = Vec::new();
        let mut field = String::new();
        let mut bitmask: Option<i64> = None;
        let mut assume_success = false;
        let mut scope_kind: Option<String> = None;
        let mut scope_variable: Option<String> = None;

        loop {
            let event = cursor.next()?;
            match &event {
                XmlEvent::Start(prop) if prop.name == TAG_COLLECTION_PROP => {
                    if prop.attr_equals(ATTR_NAME, PROP_TEST_STRINGS) {
                        raw_values = read_string_list(cursor)?;
                    } else {
                        cursor.skip_to_end(TAG_COLLECTION_PROP)?;
                    }
                }
                XmlEvent::Start(prop)
                    if prop.name == TAG_STRING_PROP || prop.name == TAG_INT_PROP =>
                {
                    let prop_tag = prop.name.clone();
                    let attr = prop.attr(ATTR_NAME).map(str::to_string);
                    let value = cursor.read_text(&prop_tag)?;
                    match attr.as_deref() {
                        Some(PROP_TEST_FIELD) => field = value,
                        Some(PROP_TEST_TYPE) => {
                            bitmask = Some(value.trim().parse().map_err(|_| {
                                TranslateError::MalformedInput(format!(
                                    "matching rule '{}' is not an integer",
                                    value
                                ))
                            })?);
                        }
                        Some(PROP_ASSERTION_SCOPE) => scope_kind = Some(value),
                        Some(PROP_SCOPE_VARIABLE) => scope_variable = Some(value),
                        _ => {}
                    }
                }
                XmlEvent::Start(prop) if prop.name == TAG_BOOL_PROP => {
                    let attr = prop.attr(ATTR_NAME).map(str::to_string);
                    let value = cursor.read_text(TAG_BOOL_PROP)?;
                    if attr.as_deref() == Some(PROP_ASSUME_SUCCESS) {
                        assume_success = value.trim() == "true";
                    }
                }
                XmlEvent::Start(prop) => cursor.skip_to_end(&prop.name.clone())?,
                XmlEvent::End(end) if end == TAG_RESPONSE_ASSERTION => break,
                XmlEvent::Eof => {
                    return Err(TranslateError::MalformedInput(
                        "stream ended inside a response assertion".to_string(),
                    ));
                }
                _ => {}
            }
        }

        if assume_success {
            // 合法的收窄：忽略该标记仍然产出断言
            warn!(
                "narrowing: 'ignore status' flag on assertion '{}' has no equivalent, dropped",
                name
            );
        }

        let preset = (scope_kind.as_deref() == Some(SCOPE_VARIABLE))
            .then_some(SelectionMode::Variable);
        let target = mapper::map_field_to_selection(&field, preset)?;
        let bitmask = bitmask.ok_or_else(|| {
            TranslateError::MalformedInput(format!("assertion '{}' has no matching rule", name))
        })?;
        // 无法表示的匹配规则对任何目标都是致命的
        let validation_mode = mapper::map_bitmask_to_validation(bitmask)?;

        match target {
            mapper::AssertionTarget::ResponseCode => {
                let mut values = raw_values.into_iter();
                match values.next() {
                    Some(code) => {
                        builder.http_response_code(code);
                    }
                    None => warn!("narrowing: assertion '{}' has no expected code", name),
                }
                for extra in values {
                    warn!(
                        "narrowing: extra expected code '{}' on assertion '{}' dropped",
                        extra, name
                    );
                }
            }
            mapper::AssertionTarget::Selection(selection) => {
                let fan_out = raw_values.len() > 1;
                for (index, raw) in raw_values.into_iter().enumerate() {
                    let entry_name = if fan_out {
                        format!("{}-{}", name, index + 1)
                    } else {
                        name.clone()
                    };
                    let validation = match selection {
                        SelectionMode::Header => {
                            let (header, mode, content) =
                                mapper::reconcile_header_assertion(&raw)?;
                            ValidationBuilder::new(entry_name)
                                .selection(SelectionMode::Header, header)
                                .validation(mode, content)
                        }
                        SelectionMode::Variable => {
                            let variable = scope_variable.as_deref().ok_or_else(|| {
                                TranslateError::MalformedInput(format!(
                                    "variable-scoped assertion '{}' names no variable",
                                    name
                                ))
                            })?;
                            ValidationBuilder::new(entry_name)
                                .selection(SelectionMode::Variable, format!("${{{}}}", variable))
                                .validation(validation_mode, Some(raw))
                        }
                        // 响应体：`.*` 选中整个 body
                        _ => ValidationBuilder::new(entry_name)
                            .selection(SelectionMode::Regex, ".*")
                            .validation(validation_mode, Some(raw)),
                    };
                    builder.add_validation(validation.build()?);
                }
            }
        }
        Ok(())
    }
}

/// 整体跳过一个无法翻译的元素：元素本身加上它后面的子节点容器
///
/// 在元素的开始标签之后调用。没有容器跟随时把多读的事件退回，
/// 留给调用方的循环处理。
pub(crate) fn skip_element_with_container<R: BufRead>(
    cursor: &mut EventCursor<R>,
    tag: &str,
) -> TranslateResult<()> {
    cursor.skip_to_end(tag)?;
    let event = cursor.next()?;
    if event.is_start_of(TAG_HASH_TREE) {
        cursor.skip_to_end(TAG_HASH_TREE)?;
    } else if !event.is_empty_of(TAG_HASH_TREE) {
        cursor.push_back(event);
    }
    Ok(())
}

/// 读取一串 stringProp 的文本值，直到集合闭合
fn read_string_list<R: BufRead>(cursor: &mut EventCursor<R>) -> TranslateResult<Vec<String>> {
    let mut values = Vec::new();
    loop {
        let event = cursor.next()?;
        match &event {
            XmlEvent::Start(tag) if tag.name == TAG_STRING_PROP => {
                values.push(cursor.read_text(TAG_STRING_PROP)?);
            }
            XmlEvent::Empty(tag) if tag.name == TAG_STRING_PROP => values.push(String::new()),
            XmlEvent::Start(tag) => cursor.skip_to_end(&tag.name.clone())?,
            XmlEvent::End(end) if end == TAG_COLLECTION_PROP => return Ok(values),
            XmlEvent::Eof => {
                return Err(TranslateError::MalformedInput(
                    "stream ended inside a value collection".to_string(),
                ));
            }
            _ => {}
        }
    }
}

/// 读取参数声明列表（Argument / HTTPArgument 条目）
///
/// 在 `outer_tag` 的开始标签之后调用，消费到它的结束标签为止。
pub(crate) fn read_arguments<R: BufRead>(
    cursor: &mut EventCursor<R>,
    outer_tag: &str,
) -> TranslateResult<Vec<ParameterDefault>> {
    let mut entries = Vec::new();
    loop {
        let event = cursor.next()?;
        match &event {
            XmlEvent::Start(tag) if tag.name == TAG_ELEMENT_PROP => {
                entries.push(read_argument_entry(cursor)?);
            }
            // 参数集合的包装标签：下探即可
            XmlEvent::Start(tag)
                if tag.name == TAG_COLLECTION_PROP
                    && tag.attr_equals(ATTR_NAME, PROP_ARGUMENTS_LIST) => {}
            XmlEvent::Start(tag) => cursor.skip_to_end(&tag.name.clone())?,
            XmlEvent::End(end) if end == outer_tag => return Ok(entries),
            XmlEvent::Eof => {
                return Err(TranslateError::MalformedInput(
                    "stream ended inside an argument list".to_string(),
                ));
            }
            _ => {}
        }
    }
}

fn read_argument_entry<R: BufRead>(
    cursor: &mut EventCursor<R>,
) -> TranslateResult<ParameterDefault> {
    let mut name = String::new();
    let mut value = String::new();
    let mut encode: Option<bool> = None;
    loop {
        let event = cursor.next()?;
        match &event {
            XmlEvent::Start(tag) if tag.name == TAG_STRING_PROP => {
                let attr = tag.attr(ATTR_NAME).map(str::to_string);
                let text = cursor.read_text(TAG_STRING_PROP)?;
                match attr.as_deref() {
                    Some(PROP_ARGUMENT_NAME) => name = text,
                    Some(PROP_ARGUMENT_VALUE) => value = text,
                    _ => {}
                }
            }
            XmlEvent::Start(tag) if tag.name == TAG_BOOL_PROP => {
                let attr = tag.attr(ATTR_NAME).map(str::to_string);
                let text = cursor.read_text(TAG_BOOL_PROP)?;
                if attr.as_deref() == Some(PROP_ALWAYS_ENCODE) {
                    encode = Some(text.trim() == "true");
                }
            }
            XmlEvent::Start(tag) => cursor.skip_to_end(&tag.name.clone())?,
            XmlEvent::End(end) if end == TAG_ELEMENT_PROP => return Ok((name, value, encode)),
            XmlEvent::Eof => {
                return Err(TranslateError::MalformedInput(
                    "stream ended inside an argument entry".to_string(),
                ));
            }
            _ => {}
        }
    }
}

/// 读取 header manager 的条目
fn read_headers<R: BufRead>(cursor: &mut EventCursor<R>) -> TranslateResult<Vec<(String, String)>> {
    let mut headers = Vec::new();
    loop {
        let event = cursor.next()?;
        match &event {
            XmlEvent::Start(tag) if tag.name == TAG_ELEMENT_PROP => {
                let mut name = String::new();
                let mut value = String::new();
                loop {
                    let event = cursor.next()?;
                    match &event {
                        XmlEvent::Start(prop) if prop.name == TAG_STRING_PROP => {
                            let attr = prop.attr(ATTR_NAME).map(str::to_string);
                            let text = cursor.read_text(TAG_STRING_PROP)?;
                            match attr.as_deref() {
                                Some(PROP_HEADER_NAME) => name = text,
                                Some(PROP_HEADER_VALUE) => value = text,
                                _ => {}
                            }
                        }
                        XmlEvent::Start(prop) => cursor.skip_to_end(&prop.name.clone())?,
                        XmlEvent::End(end) if end == TAG_ELEMENT_PROP => break,
                        XmlEvent::Eof => {
                            return Err(TranslateError::MalformedInput(
                                "stream ended inside a header entry".to_string(),
                            ));
                        }
                        _ => {}
                    }
                }
                headers.push((name, value));
            }
            XmlEvent::Start(tag)
                if tag.name == TAG_COLLECTION_PROP
                    && tag.attr_equals(ATTR_NAME, PROP_HEADERS_LIST) => {}
            XmlEvent::Start(tag) => cursor.skip_to_end(&tag.name.clone())?,
            XmlEvent::End(end) if end == TAG_HEADER_MANAGER => return Ok(headers),
            XmlEvent::Eof => {
                return Err(TranslateError::MalformedInput(
                    "stream ended inside a header manager".to_string(),
                ));
            }
            _ => {}
        }
    }
}

/// 读取一个 XPath 提取器
fn read_xpath_extractor<R: BufRead>(
    cursor: &mut EventCursor<R>,
    tag: &Tag,
) -> TranslateResult<Extraction> {
    let label = tag.attr(ATTR_TESTNAME).unwrap_or(TAG_XPATH_EXTRACTOR).to_string();
    let mut refname: Option<String> = None;
    let mut query: Option<String> = None;
    let mut scope_kind: Option<String> = None;

    loop {
        let event = cursor.next()?;
        match &event {
            XmlEvent::Start(prop) if prop.name == TAG_STRING_PROP => {
                let attr = prop.attr(ATTR_NAME).map(str::to_string);
                let value = cursor.read_text(TAG_STRING_PROP)?;
                match attr.as_deref() {
                    Some(PROP_XPATH_REFNAME) => refname = Some(value),
                    Some(PROP_XPATH_QUERY) => query = Some(value),
                    Some(PROP_SAMPLE_SCOPE) => scope_kind = Some(value),
                    _ => {}
                }
            }
            XmlEvent::Start(prop) => cursor.skip_to_end(&prop.name.clone())?,
            XmlEvent::End(end) if end == TAG_XPATH_EXTRACTOR => break,
            XmlEvent::Eof => {
                return Err(TranslateError::MalformedInput(
                    "stream ended inside an extractor".to_string(),
                ));
            }
            _ => {}
        }
    }

    if scope_kind.as_deref() == Some(SCOPE_VARIABLE) {
        return Err(TranslateError::UnsupportedConstruct(format!(
            "extractor '{}' extracts from a variable",
            label
        )));
    }
    let refname = refname.filter(|s| !s.is_empty()).ok_or_else(|| {
        TranslateError::MalformedInput(format!("extractor '{}' has no reference name", label))
    })?;
    let query = query.filter(|s| !s.is_empty()).ok_or_else(|| {
        TranslateError::MalformedInput(format!("extractor '{}' has no query", label))
    })?;
    Ok(Extraction::new(refname, SelectionMode::XPath, query, None))
}

/// 读取一个正则提取器
fn read_regex_extractor<R: BufRead>(
    cursor: &mut EventCursor<R>,
    tag: &Tag,
) -> TranslateResult<Extraction> {
    let label = tag.attr(ATTR_TESTNAME).unwrap_or(TAG_REGEX_EXTRACTOR).to_string();
    let mut refname: Option<String> = None;
    let mut pattern: Option<String> = None;
    let mut template = String::new();
    let mut match_number: Option<String> = None;
    let mut use_headers = false;
    let mut scope_kind: Option<String> = None;

    loop {
        let event = cursor.next()?;
        match &event {
            XmlEvent::Start(prop)
                if prop.name == TAG_STRING_PROP || prop.name == TAG_INT_PROP =>
            {
                let prop_tag = prop.name.clone();
                let attr = prop.attr(ATTR_NAME).map(str::to_string);
                let value = cursor.read_text(&prop_tag)?;
                match attr.as_deref() {
                    Some(PROP_REGEX_REFNAME) => refname = Some(value),
                    Some(PROP_REGEX_PATTERN) => pattern = Some(value),
                    Some(PROP_REGEX_TEMPLATE) => template = value,
                    Some(PROP_REGEX_MATCH_NUMBER) => {
                        if !value.trim().is_empty() {
                            match_number = Some(value.trim().to_string());
                        }
                    }
                    Some(PROP_SAMPLE_SCOPE) => scope_kind = Some(value),
                    _ => {}
                }
            }
            XmlEvent::Start(prop) if prop.name == TAG_BOOL_PROP => {
                let attr = prop.attr(ATTR_NAME).map(str::to_string);
                let value = cursor.read_text(TAG_BOOL_PROP)?;
                if attr.as_deref() == Some(PROP_REGEX_USE_HEADERS) {
                    use_headers = value.trim() == "true";
                }
            }
            XmlEvent::Start(prop) => cursor.skip_to_end(&prop.name.clone())?,
            XmlEvent::End(end) if end == TAG_REGEX_EXTRACTOR => break,
            XmlEvent::Eof => {
                return Err(TranslateError::MalformedInput(
                    "stream ended inside an extractor".to_string(),
                ));
            }
            _ => {}
        }
    }

    if scope_kind.as_deref() == Some(SCOPE_VARIABLE) {
        return Err(TranslateError::UnsupportedConstruct(format!(
            "extractor '{}' extracts from a variable",
            label
        )));
    }
    if use_headers {
        return Err(TranslateError::UnsupportedConstruct(format!(
            "extractor '{}' extracts from response headers",
            label
        )));
    }
    match match_number.as_deref() {
        None => {
            // 合法的收窄：没写匹配序号时按第一个匹配处理
            warn!(
                "narrowing: extractor '{}' has no match number, assuming first match",
                label
            );
        }
        Some("0") => {
            warn!(
                "narrowing: extractor '{}' requests a random match, degraded to first",
                label
            );
        }
        Some("1") => {}
        Some(other) => {
            return Err(TranslateError::UnsupportedConstruct(format!(
                "extractor '{}' requests match {}, only the first match is representable",
                label, other
            )));
        }
    }

    let group = mapper::resolve_capture_group_template(&template)?;
    let refname = refname.filter(|s| !s.is_empty()).ok_or_else(|| {
        TranslateError::MalformedInput(format!("extractor '{}' has no reference name", label))
    })?;
    let pattern = pattern.filter(|s| !s.is_empty()).ok_or_else(|| {
        TranslateError::MalformedInput(format!("extractor '{}' has no pattern", label))
    })?;
    Ok(Extraction::new(refname, SelectionMode::Regex, pattern, group))
}
