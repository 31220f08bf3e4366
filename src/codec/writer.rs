use crate::model::{Action, ActionList, Extraction, Validation};

/// 把一个动作列表编码成文本
///
/// 缺失字段整行省略，不会写成空值。
pub fn write_action_list(list: &ActionList) -> String {
    let mut emitter = Emitter::new();
    if !list.store.is_empty() {
        emitter.open("Store", '{');
        for (name, value) in &list.store {
            emitter.entry(name, value);
        }
        emitter.close('}');
    }
    for action in &list.actions {
        write_action(&mut emitter, action);
    }
    emitter.finish()
}

fn write_action(emitter: &mut Emitter, action: &Action) {
    emitter.open("Action", '{');
    emitter.entry("Name", &action.name);

    emitter.open("Request", '{');
    emitter.entry("Url", &action.url);
    emitter.entry("Method", &action.method);
    if let Some(encode) = action.encode_parameters {
        emitter.entry("Encode", if encode { "true" } else { "false" });
    }
    if !action.parameters.is_empty() {
        emitter.open("Parameters", '{');
        for (name, value) in &action.parameters {
            emitter.entry(name, value);
        }
        emitter.close('}');
    }
    if !action.headers.is_empty() {
        emitter.open("Headers", '{');
        for (name, value) in &action.headers {
            emitter.entry(name, value);
        }
        emitter.close('}');
    }
    emitter.close('}');

    let has_response = action.http_response_code.is_some()
        || !action.validations.is_empty()
        || !action.extractions.is_empty();
    if has_response {
        emitter.open("Response", '{');
        if let Some(code) = &action.http_response_code {
            emitter.entry("Httpcode", code);
        }
        if !action.validations.is_empty() {
            emitter.open("Validate", '[');
            for validation in &action.validations {
                write_validation(emitter, validation);
            }
            emitter.close(']');
        }
        if !action.extractions.is_empty() {
            emitter.open("Store", '[');
            for extraction in &action.extractions {
                write_extraction(emitter, extraction);
            }
            emitter.close(']');
        }
        emitter.close('}');
    }
    emitter.close('}');
}

fn write_validation(emitter: &mut Emitter, validation: &Validation) {
    emitter.open(&validation.name, '{');
    emitter.entry(validation.selection_raw(), validation.selection_content());
    if let Some(sub) = validation.sub_selection_raw() {
        match validation.sub_selection_content() {
            Some(content) => emitter.entry(sub, content),
            None => emitter.bare(sub),
        }
    }
    match validation.validation_content() {
        Some(content) => emitter.entry(validation.validation_raw(), content),
        // Exists 没有期望值，键后面不写内容
        None => emitter.bare(validation.validation_raw()),
    }
    emitter.close('}');
}

fn write_extraction(emitter: &mut Emitter, extraction: &Extraction) {
    emitter.open(&extraction.name, '{');
    emitter.entry(extraction.selection_raw(), extraction.selection_content());
    if let Some(sub) = extraction.sub_selection_raw() {
        match extraction.sub_selection_content() {
            Some(content) => emitter.entry(sub, content),
            None => emitter.bare(sub),
        }
    }
    emitter.close('}');
}

/// 带缩进的行发射器
struct Emitter {
    out: String,
    indent: usize,
}

impl Emitter {
    fn new() -> Self {
        Self {
            out: String::new(),
            indent: 0,
        }
    }

    fn line(&mut self, text: &str) {
        for _ in 0..self.indent {
            self.out.push_str("  ");
        }
        self.out.push_str(text);
        self.out.push('\n');
    }

    fn open(&mut self, key: &str, bracket: char) {
        self.line(&format!("{}: {}", key, bracket));
        self.indent += 1;
    }

    fn close(&mut self, bracket: char) {
        self.indent -= 1;
        self.line(&bracket.to_string());
    }

    fn entry(&mut self, key: &str, value: &str) {
        self.line(&format!("{}: {}", key, value));
    }

    fn bare(&mut self, key: &str) {
        self.line(&format!("{}:", key));
    }

    fn finish(self) -> String {
        self.out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ActionBuilder, SelectionMode, ValidationBuilder, ValidationMode};

    #[test]
    fn test_minimal_action() {
        let mut builder = ActionBuilder::new("Search");
        builder.host("example.net").path("/search");
        let list = ActionList {
            store: Vec::new(),
            actions: vec![builder.build().unwrap()],
        };
        let text = write_action_list(&list);
        assert_eq!(
            text,
            "Action: {\n  Name: Search\n  Request: {\n    Url: http://example.net/search\n    Method: GET\n  }\n}\n"
        );
    }

    #[test]
    fn test_store_block_comes_first() {
        let list = ActionList {
            store: vec![("token".to_string(), "abc".to_string())],
            actions: Vec::new(),
        };
        let text = write_action_list(&list);
        assert!(text.starts_with("Store: {\n  token: abc\n}\n"));
    }

    #[test]
    fn test_exists_validation_has_bare_key() {
        let mut builder = ActionBuilder::new("Check");
        builder.host("example.net");
        builder.add_validation(
            ValidationBuilder::new("expires-present")
                .selection(SelectionMode::Header, "Expires")
                .validation(ValidationMode::Exists, None)
                .build()
                .unwrap(),
        );
        let list = ActionList {
            store: Vec::new(),
            actions: vec![builder.build().unwrap()],
        };
        let text = write_action_list(&list);
        assert!(text.contains("Header: Expires\n"));
        assert!(text.contains("Exists:\n"));
    }

    #[test]
    fn test_empty_expected_value_round_trips() {
        let mut builder = ActionBuilder::new("Check");
        builder.host("example.net");
        builder.add_validation(
            ValidationBuilder::new("blank")
                .validation(ValidationMode::Matches, Some(String::new()))
                .build()
                .unwrap(),
        );
        let list = ActionList {
            store: Vec::new(),
            actions: vec![builder.build().unwrap()],
        };
        let text = write_action_list(&list);
        // 空期望值写成 "键、分隔符、无内容"，与无内容的 "Exists:" 不同
        assert!(text.contains("Matches: \n"));
        let reloaded = crate::codec::read_action_list(&text).unwrap();
        assert_eq!(reloaded, list);
    }

    #[test]
    fn test_absent_fields_omitted() {
        let mut builder = ActionBuilder::new("Plain");
        builder.host("example.net");
        let list = ActionList {
            store: Vec::new(),
            actions: vec![builder.build().unwrap()],
        };
        let text = write_action_list(&list);
        assert!(!text.contains("Encode"));
        assert!(!text.contains("Parameters"));
        assert!(!text.contains("Response"));
    }
}
