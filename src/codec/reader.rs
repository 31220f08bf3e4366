use crate::codec::CodecError;
use crate::model::{Action, ActionList, Extraction, Validation};

/// 解析文本格式的动作列表
///
/// 逐行递归下降。模式字段原样保留为原始字符串，不在读取时
/// 解析：占位符要等运行时上下文就绪才能检查。
pub fn read_action_list(input: &str) -> Result<ActionList, CodecError> {
    let mut scanner = Scanner::new(input);
    let mut list = ActionList::new();

    while let Some((lineno, line)) = scanner.next_line()? {
        match line {
            Line::Open { key, bracket: '{' } if key == "Store" => {
                list.store = read_pairs(&mut scanner)?;
            }
            Line::Open { key, bracket: '{' } if key == "Action" => {
                list.actions.push(read_action(&mut scanner, lineno)?);
            }
            _ => {
                return Err(CodecError::Syntax {
                    line: lineno,
                    message: "expected a Store or Action block".to_string(),
                });
            }
        }
    }
    Ok(list)
}

fn read_action(scanner: &mut Scanner<'_>, opened_at: usize) -> Result<Action, CodecError> {
    let mut name: Option<String> = None;
    let mut url: Option<String> = None;
    let mut method: Option<String> = None;
    let mut encode: Option<bool> = None;
    let mut parameters = Vec::new();
    let mut headers = Vec::new();
    let mut http_response_code: Option<String> = None;
    let mut validations = Vec::new();
    let mut extractions = Vec::new();

    loop {
        let (lineno, line) = scanner.expect_line()?;
        match line {
            Line::Entry { key, value } if key == "Name" => name = value,
            Line::Open { key, bracket: '{' } if key == "Request" => loop {
                let (lineno, line) = scanner.expect_line()?;
                match line {
                    Line::Entry { key, value } if key == "Url" => url = value,
                    Line::Entry { key, value } if key == "Method" => method = value,
                    Line::Entry { key, value } if key == "Encode" => {
                        encode = Some(match value.as_deref() {
                            Some("true") => true,
                            Some("false") => false,
                            _ => {
                                return Err(CodecError::Syntax {
                                    line: lineno,
                                    message: "Encode must be true or false".to_string(),
                                });
                            }
                        });
                    }
                    Line::Open { key, bracket: '{' } if key == "Parameters" => {
                        parameters = read_pairs(scanner)?;
                    }
                    Line::Open { key, bracket: '{' } if key == "Headers" => {
                        headers = read_pairs(scanner)?;
                    }
                    Line::Close('}') => break,
                    _ => {
                        return Err(CodecError::Syntax {
                            line: lineno,
                            message: "unexpected line in a Request block".to_string(),
                        });
                    }
                }
            },
            Line::Open { key, bracket: '{' } if key == "Response" => loop {
                let (lineno, line) = scanner.expect_line()?;
                match line {
                    Line::Entry { key, value } if key == "Httpcode" => http_response_code = value,
                    Line::Open { key, bracket: '[' } if key == "Validate" => {
                        validations = read_validations(scanner)?;
                    }
                    Line::Open { key, bracket: '[' } if key == "Store" => {
                        extractions = read_extractions(scanner)?;
                    }
                    Line::Close('}') => break,
                    _ => {
                        return Err(CodecError::Syntax {
                            line: lineno,
                            message: "unexpected line in a Response block".to_string(),
                        });
                    }
                }
            },
            Line::Close('}') => break,
            _ => {
                return Err(CodecError::Syntax {
                    line: lineno,
                    message: "unexpected line in an Action block".to_string(),
                });
            }
        }
    }

    let name = name.ok_or_else(|| CodecError::Syntax {
        line: opened_at,
        message: "Action block has no Name".to_string(),
    })?;
    let url = url.ok_or_else(|| CodecError::Syntax {
        line: opened_at,
        message: format!("action '{}' has no Url", name),
    })?;
    Ok(Action {
        name,
        url,
        method: method.unwrap_or_else(|| "GET".to_string()),
        parameters,
        headers,
        encode_parameters: encode,
        http_response_code,
        validations,
        extractions,
    })
}

/// 读取一串 `key: value` 行，直到块闭合；允许重复键，保持顺序
fn read_pairs(scanner: &mut Scanner<'_>) -> Result<Vec<(String, String)>, CodecError> {
    let mut pairs = Vec::new();
    loop {
        let (lineno, line) = scanner.expect_line()?;
        match line {
            Line::Entry { key, value } => pairs.push((key, value.unwrap_or_default())),
            Line::Close('}') => return Ok(pairs),
            _ => {
                return Err(CodecError::Syntax {
                    line: lineno,
                    message: "expected a key/value entry".to_string(),
                });
            }
        }
    }
}

fn read_validations(scanner: &mut Scanner<'_>) -> Result<Vec<Validation>, CodecError> {
    let mut validations = Vec::new();
    loop {
        let (lineno, line) = scanner.expect_line()?;
        match line {
            Line::Open { key, bracket: '{' } => {
                let fields = read_fields(scanner)?;
                // 行的位置决定角色：首行选择、末行校验、中间是次级选择
                let validation = match fields.len() {
                    2 => Validation::from_raw(
                        key,
                        fields[0].0.clone(),
                        fields[0].1.clone().unwrap_or_default(),
                        None,
                        None,
                        fields[1].0.clone(),
                        fields[1].1.clone(),
                    ),
                    3 => Validation::from_raw(
                        key,
                        fields[0].0.clone(),
                        fields[0].1.clone().unwrap_or_default(),
                        Some(fields[1].0.clone()),
                        fields[1].1.clone(),
                        fields[2].0.clone(),
                        fields[2].1.clone(),
                    ),
                    _ => {
                        return Err(CodecError::Syntax {
                            line: lineno,
                            message: "a validation entry needs two or three fields".to_string(),
                        });
                    }
                };
                validations.push(validation);
            }
            Line::Close(']') => return Ok(validations),
            _ => {
                return Err(CodecError::Syntax {
                    line: lineno,
                    message: "expected a validation entry".to_string(),
                });
            }
        }
    }
}

fn read_extractions(scanner: &mut Scanner<'_>) -> Result<Vec<Extraction>, CodecError> {
    let mut extractions = Vec::new();
    loop {
        let (lineno, line) = scanner.expect_line()?;
        match line {
            Line::Open { key, bracket: '{' } => {
                let fields = read_fields(scanner)?;
                let extraction = match fields.len() {
                    1 => Extraction::from_raw(
                        key,
                        fields[0].0.clone(),
                        fields[0].1.clone().unwrap_or_default(),
                        None,
                        None,
                    ),
                    2 => Extraction::from_raw(
                        key,
                        fields[0].0.clone(),
                        fields[0].1.clone().unwrap_or_default(),
                        Some(fields[1].0.clone()),
                        fields[1].1.clone(),
                    ),
                    _ => {
                        return Err(CodecError::Syntax {
                            line: lineno,
                            message: "an extraction entry needs one or two fields".to_string(),
                        });
                    }
                };
                extractions.push(extraction);
            }
            Line::Close(']') => return Ok(extractions),
            _ => {
                return Err(CodecError::Syntax {
                    line: lineno,
                    message: "expected an extraction entry".to_string(),
                });
            }
        }
    }
}

/// 读取一个条目块内的字段行，内容缺省时为 None
fn read_fields(scanner: &mut Scanner<'_>) -> Result<Vec<(String, Option<String>)>, CodecError> {
    let mut fields = Vec::new();
    loop {
        let (lineno, line) = scanner.expect_line()?;
        match line {
            Line::Entry { key, value } => fields.push((key, value)),
            Line::Close('}') => return Ok(fields),
            _ => {
                return Err(CodecError::Syntax {
                    line: lineno,
                    message: "expected a field line".to_string(),
                });
            }
        }
    }
}

#[derive(Debug)]
enum Line {
    Open { key: String, bracket: char },
    Close(char),
    Entry { key: String, value: Option<String> },
}

/// 行扫描器，跳过空行，记住行号用于报错
///
/// 只剥行首缩进；行尾空白保留，"键后有分隔符" 和 "键后没有内容"
/// 由它区分（`k: ` 是空内容，`k:` 是缺省）。
struct Scanner<'a> {
    lines: Vec<(usize, &'a str)>,
    pos: usize,
}

impl<'a> Scanner<'a> {
    fn new(input: &'a str) -> Self {
        let lines = input
            .lines()
            .enumerate()
            .map(|(i, line)| (i + 1, line.trim_start()))
            .filter(|(_, line)| !line.is_empty())
            .collect();
        Self { lines, pos: 0 }
    }

    fn next_line(&mut self) -> Result<Option<(usize, Line)>, CodecError> {
        let Some(&(lineno, text)) = self.lines.get(self.pos) else {
            return Ok(None);
        };
        self.pos += 1;
        Ok(Some((lineno, parse_line(lineno, text)?)))
    }

    fn expect_line(&mut self) -> Result<(usize, Line), CodecError> {
        let last = self.lines.last().map(|(n, _)| *n).unwrap_or(0);
        self.next_line()?.ok_or(CodecError::Syntax {
            line: last,
            message: "unexpected end of input".to_string(),
        })
    }
}

fn parse_line(lineno: usize, text: &str) -> Result<Line, CodecError> {
    match text.trim_end() {
        "}" => return Ok(Line::Close('}')),
        "]" => return Ok(Line::Close(']')),
        // 块的键按后缀识别，键本身可以含冒号（如断言的显示名）
        open => {
            if let Some(key) = open.strip_suffix(": {") {
                return Ok(Line::Open {
                    key: key.to_string(),
                    bracket: '{',
                });
            }
            if let Some(key) = open.strip_suffix(": [") {
                return Ok(Line::Open {
                    key: key.to_string(),
                    bracket: '[',
                });
            }
        }
    }
    let (key, rest) = text.split_once(':').ok_or_else(|| CodecError::Syntax {
        line: lineno,
        message: format!("expected 'key: value', found '{}'", text),
    })?;
    let key = key.trim().to_string();
    if rest.is_empty() {
        Ok(Line::Entry { key, value: None })
    } else {
        // 只剥一个分隔空格，值内部的空白和冒号原样保留
        let value = rest.strip_prefix(' ').unwrap_or(rest);
        Ok(Line::Entry {
            key,
            value: Some(value.to_string()),
        })
    }
}
