use crate::model::ActionList;
use crate::translate::assembler::{ActionAssembler, read_arguments, skip_element_with_container};
use crate::translate::cursor::{EventCursor, XmlEvent};
use crate::translate::vocabulary::*;
use crate::translate::{TranslateError, TranslateResult};
use crate::variable::VariableContext;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::{info, warn};

/// 翻译产物 - 按出现顺序排列的线程组及其动作列表
#[derive(Debug, Default, PartialEq)]
pub struct TranslatedPlan {
    groups: Vec<(String, ActionList)>,
}

impl TranslatedPlan {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn groups(&self) -> &[(String, ActionList)] {
        &self.groups
    }

    pub fn get(&self, name: &str) -> Option<&ActionList> {
        self.groups
            .iter()
            .find(|(group, _)| group == name)
            .map(|(_, list)| list)
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// 登记一个线程组，同名时后者覆盖前者
    pub fn insert(&mut self, name: impl Into<String>, list: ActionList) {
        let name = name.into();
        if let Some(pos) = self.groups.iter().position(|(group, _)| *group == name) {
            warn!("duplicate group '{}', keeping the later definition", name);
            self.groups.remove(pos);
        }
        self.groups.push((name, list));
    }
}

/// 翻译驱动器 - 遍历文档顶层，逐线程组调用装配器
///
/// 驱动器本身只认识计划级节点：根级变量声明和线程组。
/// 每个线程组得到一个独立的装配器，组内绑定不跨组泄漏。
pub struct TranslationDriver {
    seed: VariableContext,
}

impl Default for TranslationDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl TranslationDriver {
    pub fn new() -> Self {
        Self {
            seed: VariableContext::new(),
        }
    }

    /// 预置外部变量（如环境配置文件的绑定）
    pub fn with_seed(seed: VariableContext) -> Self {
        Self { seed }
    }

    /// 翻译一个测试计划文件
    pub fn translate_file(&self, path: impl AsRef<Path>) -> TranslateResult<TranslatedPlan> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(TranslateError::InputNotFound(path.to_path_buf()));
        }
        info!("translating {}", path.display());
        let reader = BufReader::new(File::open(path)?);
        self.translate(EventCursor::new(reader))
    }

    /// 翻译内存中的测试计划文本
    pub fn translate_content(&self, content: &str) -> TranslateResult<TranslatedPlan> {
        self.translate(EventCursor::new(content.as_bytes()))
    }

    fn translate<R: BufRead>(&self, mut cursor: EventCursor<R>) -> TranslateResult<TranslatedPlan> {
        let mut plan = TranslatedPlan::new();
        let mut root_vars: Vec<(String, String)> = Vec::new();

        loop {
            let event = cursor.next()?;
            match &event {
                XmlEvent::Start(tag) => match tag.name.as_str() {
                    // 根节点和容器：下探
                    TAG_TEST_PLAN_ROOT | TAG_HASH_TREE => {}
                    TAG_TEST_PLAN => {
                        root_vars.extend(read_plan_variables(&mut cursor)?);
                    }
                    TAG_ARGUMENTS => {
                        for (name, value, _) in read_arguments(&mut cursor, TAG_ARGUMENTS)? {
                            root_vars.push((name, value));
                        }
                    }
                    TAG_THREAD_GROUP => {
                        let name = tag.attr(ATTR_TESTNAME).ok_or_else(|| {
                            TranslateError::MalformedInput(
                                "thread group without a test name".to_string(),
                            )
                        })?;
                        let name = name.to_string();
                        cursor.skip_to_end(TAG_THREAD_GROUP)?;
                        let list = self.read_group(&mut cursor, &name, &root_vars)?;
                        info!("group '{}': {} actions", name, list.actions.len());
                        plan.insert(name, list);
                    }
                    other => {
                        warn!("narrowing: element <{}> has no equivalent, skipped", other);
                        skip_element_with_container(&mut cursor, other)?;
                    }
                },
                XmlEvent::Eof => return Ok(plan),
                _ => {}
            }
        }
    }

    /// 消费线程组之后的容器子树
    fn read_group<R: BufRead>(
        &self,
        cursor: &mut EventCursor<R>,
        name: &str,
        root_vars: &[(String, String)],
    ) -> TranslateResult<ActionList> {
        let event = cursor.next()?;
        if event.is_empty_of(TAG_HASH_TREE) {
            return Ok(ActionList::new());
        }
        if !event.is_start_of(TAG_HASH_TREE) {
            return Err(TranslateError::MalformedInput(format!(
                "thread group '{}' not followed by a children container",
                name
            )));
        }
        let mut assembler = ActionAssembler::new(self.seed.clone());
        for (name, value) in root_vars {
            assembler.declare_variable(name, value);
        }
        assembler.assemble(cursor)
    }
}

/// 读取计划节点里的根级变量声明
fn read_plan_variables<R: BufRead>(
    cursor: &mut EventCursor<R>,
) -> TranslateResult<Vec<(String, String)>> {
    let mut vars = Vec::new();
    loop {
        let event = cursor.next()?;
        match &event {
            XmlEvent::Start(tag)
                if tag.name == TAG_ELEMENT_PROP
                    && tag.attr_equals(ATTR_NAME, PROP_USER_DEFINED_VARIABLES) =>
            {
                for (name, value, _) in read_arguments(cursor, TAG_ELEMENT_PROP)? {
                    vars.push((name, value));
                }
            }
            XmlEvent::Start(tag) => cursor.skip_to_end(&tag.name.clone())?,
            XmlEvent::End(end) if end == TAG_TEST_PLAN => return Ok(vars),
            XmlEvent::Eof => {
                return Err(TranslateError::MalformedInput(
                    "stream ended inside the plan node".to_string(),
                ));
            }
            _ => {}
        }
    }
}
