use crate::translate::{TranslateError, TranslateResult};
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use std::io::BufRead;

/// 已解码的开始标签
#[derive(Debug, Clone, PartialEq)]
pub struct Tag {
    pub name: String,
    attrs: Vec<(String, String)>,
}

impl Tag {
    /// 读取属性值
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// 属性是否等于期望值
    pub fn attr_equals(&self, name: &str, expected: &str) -> bool {
        self.attr(name) == Some(expected)
    }
}

/// 游标产出的事件，在边界处完成解码，不向外泄漏借用
#[derive(Debug, Clone, PartialEq)]
pub enum XmlEvent {
    Start(Tag),
    /// 自闭合标签，如 <hashTree/>
    Empty(Tag),
    End(String),
    Text(String),
    Eof,
}

impl XmlEvent {
    pub fn is_start_of(&self, tag: &str) -> bool {
        matches!(self, XmlEvent::Start(t) if t.name == tag)
    }

    pub fn is_empty_of(&self, tag: &str) -> bool {
        matches!(self, XmlEvent::Empty(t) if t.name == tag)
    }

    pub fn is_end_of(&self, tag: &str) -> bool {
        matches!(self, XmlEvent::End(name) if name == tag)
    }
}

/// 事件游标 - 单向流式读取源 XML
///
/// 缓冲不超过一个事件，所有前瞻都表达为 "前进、检查、必要时退回"。
pub struct EventCursor<R: BufRead> {
    reader: Reader<R>,
    buf: Vec<u8>,
    pending: Option<XmlEvent>,
}

impl<R: BufRead> EventCursor<R> {
    pub fn new(source: R) -> Self {
        Self {
            reader: Reader::from_reader(source),
            buf: Vec::new(),
            pending: None,
        }
    }

    /// 退回一个事件，下一次读取先返回它
    ///
    /// 退回槽只有一个；前一个退回的事件必须先被消费。
    pub fn push_back(&mut self, event: XmlEvent) {
        debug_assert!(self.pending.is_none());
        self.pending = Some(event);
    }

    /// 下一个结构性事件
    ///
    /// 跳过 XML 声明、注释、处理指令和标签间的纯空白文本。
    pub fn next(&mut self) -> TranslateResult<XmlEvent> {
        loop {
            let event = self.next_raw()?;
            if let XmlEvent::Text(text) = &event {
                if text.trim().is_empty() {
                    continue;
                }
            }
            return Ok(event);
        }
    }

    /// 下一个事件，不跳过空白文本（元素文本内容经由这里读取）
    fn next_raw(&mut self) -> TranslateResult<XmlEvent> {
        if let Some(event) = self.pending.take() {
            return Ok(event);
        }
        loop {
            self.buf.clear();
            let event = match self.reader.read_event_into(&mut self.buf)? {
                Event::Start(tag) => XmlEvent::Start(decode_tag(&tag)?),
                Event::Empty(tag) => XmlEvent::Empty(decode_tag(&tag)?),
                Event::End(tag) => {
                    XmlEvent::End(String::from_utf8_lossy(tag.name().into_inner()).into_owned())
                }
                Event::Text(text) => {
                    let text = text.unescape().map_err(quick_xml::Error::from)?;
                    XmlEvent::Text(text.into_owned())
                }
                Event::CData(data) => {
                    XmlEvent::Text(String::from_utf8_lossy(data.as_ref()).into_owned())
                }
                Event::Eof => XmlEvent::Eof,
                // 声明、注释、处理指令与翻译无关
                Event::Decl(_) | Event::Comment(_) | Event::PI(_) | Event::DocType(_) => continue,
            };
            return Ok(event);
        }
    }

    /// 读取刚打开的元素 `tag` 的文本内容，并消费其结束标签
    ///
    /// 空元素（紧跟结束标签）返回空串；出现其他标记说明文件结构
    /// 不符合预期，始终是致命的 MalformedInput。
    pub fn read_text(&mut self, tag: &str) -> TranslateResult<String> {
        let mut text = String::new();
        loop {
            match self.next_raw()? {
                XmlEvent::Text(chunk) => text.push_str(&chunk),
                XmlEvent::End(name) if name == tag => return Ok(text),
                other => {
                    return Err(TranslateError::MalformedInput(format!(
                        "expected text inside <{}>, found {:?}",
                        tag, other
                    )));
                }
            }
        }
    }

    /// 跳过当前元素余下的内容，直到匹配的结束标签
    ///
    /// 同名标签可以嵌套，按深度配对。
    pub fn skip_to_end(&mut self, tag: &str) -> TranslateResult<()> {
        let mut depth = 1usize;
        loop {
            match self.next()? {
                XmlEvent::Start(t) if t.name == tag => depth += 1,
                XmlEvent::End(name) if name == tag => {
                    depth -= 1;
                    if depth == 0 {
                        return Ok(());
                    }
                }
                XmlEvent::Eof => {
                    return Err(TranslateError::MalformedInput(format!(
                        "stream ended while skipping <{}>",
                        tag
                    )));
                }
                _ => {}
            }
        }
    }
}

fn decode_tag(tag: &BytesStart<'_>) -> TranslateResult<Tag> {
    let name = String::from_utf8_lossy(tag.name().into_inner()).into_owned();
    let mut attrs = Vec::new();
    for attr in tag.attributes() {
        let attr = attr.map_err(quick_xml::Error::from)?;
        let key = String::from_utf8_lossy(attr.key.into_inner()).into_owned();
        let value = attr
            .unescape_value()
            .map_err(quick_xml::Error::from)?
            .into_owned();
        attrs.push((key, value));
    }
    Ok(Tag { name, attrs })
}
