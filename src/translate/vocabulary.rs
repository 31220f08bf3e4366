//! 源格式（JMeter 测试计划）的封闭词汇表
//!
//! 标签、属性和属性名只在这里出现一次；游标边界之外的代码
//! 一律通过这些常量分发，不做散落的字符串比较。

pub const TAG_TEST_PLAN_ROOT: &str = "jmeterTestPlan";
pub const TAG_TEST_PLAN: &str = "TestPlan";
/// 递归的 "children container" 标签：任何有后代的节点后面都跟一个
pub const TAG_HASH_TREE: &str = "hashTree";
pub const TAG_THREAD_GROUP: &str = "ThreadGroup";
pub const TAG_CONFIG: &str = "ConfigTestElement";
pub const TAG_ARGUMENTS: &str = "Arguments";
pub const TAG_SAMPLER: &str = "HTTPSamplerProxy";
pub const TAG_SAMPLER_ALT: &str = "HTTPSampler";
pub const TAG_HEADER_MANAGER: &str = "HeaderManager";
pub const TAG_RESPONSE_ASSERTION: &str = "ResponseAssertion";
pub const TAG_XPATH_EXTRACTOR: &str = "XPathExtractor";
pub const TAG_REGEX_EXTRACTOR: &str = "RegexExtractor";

pub const TAG_STRING_PROP: &str = "stringProp";
pub const TAG_BOOL_PROP: &str = "boolProp";
pub const TAG_INT_PROP: &str = "intProp";
pub const TAG_ELEMENT_PROP: &str = "elementProp";
pub const TAG_COLLECTION_PROP: &str = "collectionProp";

pub const ATTR_NAME: &str = "name";
pub const ATTR_TESTNAME: &str = "testname";

pub const PROP_PROTOCOL: &str = "HTTPSampler.protocol";
pub const PROP_DOMAIN: &str = "HTTPSampler.domain";
pub const PROP_PORT: &str = "HTTPSampler.port";
pub const PROP_PATH: &str = "HTTPSampler.path";
pub const PROP_METHOD: &str = "HTTPSampler.method";
/// 源格式对 sampler 参数集合的命名，小写 s 是源格式自带的
pub const PROP_SAMPLER_ARGUMENTS: &str = "HTTPsampler.Arguments";
pub const PROP_ARGUMENTS_LIST: &str = "Arguments.arguments";
pub const PROP_ARGUMENT_NAME: &str = "Argument.name";
pub const PROP_ARGUMENT_VALUE: &str = "Argument.value";
pub const PROP_ALWAYS_ENCODE: &str = "HTTPArgument.always_encode";
pub const PROP_USER_DEFINED_VARIABLES: &str = "TestPlan.user_defined_variables";

pub const PROP_HEADERS_LIST: &str = "HeaderManager.headers";
pub const PROP_HEADER_NAME: &str = "Header.name";
pub const PROP_HEADER_VALUE: &str = "Header.value";

/// 源格式自带的拼写错误，保留原样
pub const PROP_TEST_STRINGS: &str = "Asserion.test_strings";
pub const PROP_TEST_FIELD: &str = "Assertion.test_field";
pub const PROP_TEST_TYPE: &str = "Assertion.test_type";
pub const PROP_ASSUME_SUCCESS: &str = "Assertion.assume_success";
pub const PROP_ASSERTION_SCOPE: &str = "Assertion.scope";
pub const PROP_SAMPLE_SCOPE: &str = "Sample.scope";
pub const PROP_SCOPE_VARIABLE: &str = "Scope.variable";
pub const SCOPE_VARIABLE: &str = "variable";

pub const FIELD_RESPONSE_DATA: &str = "Assertion.response_data";
pub const FIELD_RESPONSE_CODE: &str = "Assertion.response_code";
pub const FIELD_RESPONSE_HEADERS: &str = "Assertion.response_headers";

pub const PROP_XPATH_REFNAME: &str = "XPathExtractor.refname";
pub const PROP_XPATH_QUERY: &str = "XPathExtractor.xpathQuery";
pub const PROP_REGEX_REFNAME: &str = "RegexExtractor.refname";
pub const PROP_REGEX_PATTERN: &str = "RegexExtractor.regex";
pub const PROP_REGEX_TEMPLATE: &str = "RegexExtractor.template";
pub const PROP_REGEX_MATCH_NUMBER: &str = "RegexExtractor.match_number";
pub const PROP_REGEX_USE_HEADERS: &str = "RegexExtractor.useHeaders";
