//! 模式映射 - 源格式编码到目标模式分类的纯函数
//!
//! 源格式用整数位掩码和字段名字符串表达匹配规则，目标用封闭的
//! 字符串枚举。"无法表示" 的判定只发生在这里：没有等价映射的
//! 构造一律以 UnsupportedConstruct 失败，绝不静默猜测。

use crate::model::{SelectionMode, ValidationMode};
use crate::translate::vocabulary::*;
use crate::translate::{TranslateError, TranslateResult};
use regex::Regex;
use std::sync::OnceLock;

/// 断言的目标位置：普通选择模式，或 "响应码" 哨兵
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssertionTarget {
    /// 期望状态码，翻译成动作的 httpResponseCode 而非校验记录
    ResponseCode,
    Selection(SelectionMode),
}

/// 把源格式的 field-to-test 标识映射到选择模式
///
/// 上游已经识别出变量作用域时（preset 为 Variable），字段信息被忽略。
/// 无法支持的目标（response message、sampled URL 等）始终致命：
/// 静默猜一个校验目标会校验到错误的东西。
pub fn map_field_to_selection(
    field: &str,
    preset: Option<SelectionMode>,
) -> TranslateResult<AssertionTarget> {
    if preset == Some(SelectionMode::Variable) {
        return Ok(AssertionTarget::Selection(SelectionMode::Variable));
    }
    match field {
        // 空字段在源格式里表示默认目标（响应体）
        FIELD_RESPONSE_DATA | "" => Ok(AssertionTarget::Selection(SelectionMode::Regex)),
        FIELD_RESPONSE_HEADERS => Ok(AssertionTarget::Selection(SelectionMode::Header)),
        FIELD_RESPONSE_CODE => Ok(AssertionTarget::ResponseCode),
        other => Err(TranslateError::UnsupportedConstruct(format!(
            "assertion target '{}' has no equivalent",
            other
        ))),
    }
}

/// 把源格式的匹配规则位掩码映射到校验模式
///
/// 已知值：1 → Matches，2 → Exists，8 → Text，16 → Exists。
/// 带取反位的组合（5、6、12、20）致命：目标分类没有取反。
pub fn map_bitmask_to_validation(bitmask: i64) -> TranslateResult<ValidationMode> {
    match bitmask {
        1 => Ok(ValidationMode::Matches),
        2 => Ok(ValidationMode::Exists),
        8 => Ok(ValidationMode::Text),
        16 => Ok(ValidationMode::Exists),
        5 | 6 | 12 | 20 => Err(TranslateError::UnsupportedConstruct(format!(
            "negated matching rule {} has no equivalent",
            bitmask
        ))),
        other => Err(TranslateError::UnsupportedConstruct(format!(
            "unrecognized matching rule {}",
            other
        ))),
    }
}

/// 解析捕获组模板
///
/// 模板最多引用一个捕获组；引用多个组是致命错误，不做部分提取。
/// 组 0 表示整个匹配，等价于没有次级选择。
pub fn resolve_capture_group_template(template: &str) -> TranslateResult<Option<u32>> {
    static GROUP_REF: OnceLock<Regex> = OnceLock::new();
    let re = GROUP_REF.get_or_init(|| Regex::new(r"\$(\d+)\$").unwrap());

    let mut groups = re.captures_iter(template);
    let first = match groups.next() {
        // 没有组引用：整个匹配
        None => return Ok(None),
        Some(cap) => cap,
    };
    if groups.next().is_some() {
        return Err(TranslateError::UnsupportedConstruct(format!(
            "template '{}' requires multiple capture groups",
            template
        )));
    }
    let index: u32 = first[1].parse().map_err(|_| {
        TranslateError::MalformedInput(format!("capture group index out of range in '{}'", template))
    })?;
    Ok(if index == 0 { None } else { Some(index) })
}

/// 调和 Header 断言
///
/// 源格式把 Header 断言写成一条 "Name: Value" 字符串：
/// 没有冒号是存在性检查，恰好一个冒号是精确匹配，
/// 多个冒号无法消歧、致命。
pub fn reconcile_header_assertion(
    raw: &str,
) -> TranslateResult<(String, ValidationMode, Option<String>)> {
    if raw.matches(':').count() > 1 {
        return Err(TranslateError::UnsupportedConstruct(format!(
            "ambiguous header assertion '{}'",
            raw
        )));
    }
    match raw.split_once(':') {
        None => Ok((raw.trim().to_string(), ValidationMode::Exists, None)),
        Some((name, value)) => Ok((
            name.trim().to_string(),
            ValidationMode::Matches,
            Some(value.trim().to_string()),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bitmask_known_values() {
        assert_eq!(map_bitmask_to_validation(1).unwrap(), ValidationMode::Matches);
        assert_eq!(map_bitmask_to_validation(2).unwrap(), ValidationMode::Exists);
        assert_eq!(map_bitmask_to_validation(8).unwrap(), ValidationMode::Text);
        assert_eq!(map_bitmask_to_validation(16).unwrap(), ValidationMode::Exists);
    }

    #[test]
    fn test_bitmask_negated_values_fatal() {
        for mask in [5, 6, 12, 20] {
            let err = map_bitmask_to_validation(mask).unwrap_err();
            assert!(
                matches!(err, TranslateError::UnsupportedConstruct(_)),
                "mask {} should be unsupported",
                mask
            );
        }
    }

    #[test]
    fn test_bitmask_unknown_values_fatal() {
        for mask in [0, 3, 7, 32, 64, -1] {
            assert!(map_bitmask_to_validation(mask).is_err(), "mask {}", mask);
        }
    }

    #[test]
    fn test_template_single_group() {
        assert_eq!(resolve_capture_group_template("$2$").unwrap(), Some(2));
        assert_eq!(resolve_capture_group_template("$1$").unwrap(), Some(1));
    }

    #[test]
    fn test_template_group_zero_is_whole_match() {
        assert_eq!(resolve_capture_group_template("$0$").unwrap(), None);
    }

    #[test]
    fn test_template_without_group_refs() {
        assert_eq!(resolve_capture_group_template("").unwrap(), None);
    }

    #[test]
    fn test_template_multiple_groups_fatal() {
        for template in ["$1$$2$", "$1$-$2$", "$1$ $2$ $3$"] {
            let err = resolve_capture_group_template(template).unwrap_err();
            assert!(
                matches!(err, TranslateError::UnsupportedConstruct(_)),
                "template {} should be unsupported",
                template
            );
        }
    }

    #[test]
    fn test_header_assertion_name_only() {
        let (name, mode, content) = reconcile_header_assertion("Expires").unwrap();
        assert_eq!(name, "Expires");
        assert_eq!(mode, ValidationMode::Exists);
        assert_eq!(content, None);
    }

    #[test]
    fn test_header_assertion_exact_match() {
        let (name, mode, content) = reconcile_header_assertion("Expires: -1").unwrap();
        assert_eq!(name, "Expires");
        assert_eq!(mode, ValidationMode::Matches);
        assert_eq!(content, Some("-1".to_string()));
    }

    #[test]
    fn test_header_assertion_multiple_colons_fatal() {
        let err = reconcile_header_assertion("A: B: C").unwrap_err();
        assert!(matches!(err, TranslateError::UnsupportedConstruct(_)));
    }

    #[test]
    fn test_field_mapping() {
        assert_eq!(
            map_field_to_selection(FIELD_RESPONSE_DATA, None).unwrap(),
            AssertionTarget::Selection(SelectionMode::Regex)
        );
        assert_eq!(
            map_field_to_selection(FIELD_RESPONSE_HEADERS, None).unwrap(),
            AssertionTarget::Selection(SelectionMode::Header)
        );
        assert_eq!(
            map_field_to_selection(FIELD_RESPONSE_CODE, None).unwrap(),
            AssertionTarget::ResponseCode
        );
    }

    #[test]
    fn test_field_mapping_variable_preset_wins() {
        // 上游已识别变量作用域时字段信息被忽略
        let target =
            map_field_to_selection(FIELD_RESPONSE_CODE, Some(SelectionMode::Variable)).unwrap();
        assert_eq!(target, AssertionTarget::Selection(SelectionMode::Variable));
    }

    #[test]
    fn test_field_mapping_unsupported_fatal() {
        for field in ["Assertion.response_message", "Assertion.sample_label"] {
            let err = map_field_to_selection(field, None).unwrap_err();
            assert!(matches!(err, TranslateError::UnsupportedConstruct(_)));
        }
    }
}
