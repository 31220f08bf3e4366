use rumeter::translate::{TranslateError, TranslationDriver, translate_content, translate_file};
use rumeter::variable::VariableContext;
use std::io::Write;

/// 把线程组内容包进一个最小的完整测试计划
fn plan_with_group(group_body: &str) -> String {
    format!(
        concat!(
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n",
            "<jmeterTestPlan version=\"1.2\"><hashTree>",
            "<ThreadGroup testname=\"Main\">",
            "<stringProp name=\"ThreadGroup.num_threads\">1</stringProp>",
            "</ThreadGroup>",
            "<hashTree>{}</hashTree>",
            "</hashTree></jmeterTestPlan>"
        ),
        group_body
    )
}

const DEFAULTS: &str = r#"
<ConfigTestElement testname="HTTP Request Defaults">
  <stringProp name="HTTPSampler.domain">production.example.net</stringProp>
  <stringProp name="HTTPSampler.path">/search</stringProp>
  <elementProp name="HTTPsampler.Arguments" elementType="Arguments">
    <collectionProp name="Arguments.arguments">
      <elementProp name="lang" elementType="HTTPArgument">
        <boolProp name="HTTPArgument.always_encode">false</boolProp>
        <stringProp name="Argument.name">lang</stringProp>
        <stringProp name="Argument.value">en</stringProp>
      </elementProp>
    </collectionProp>
  </elementProp>
</ConfigTestElement>
<hashTree/>
"#;

#[test]
fn test_defaults_and_response_code_assertion() {
    let body = format!(
        r#"{DEFAULTS}
<HTTPSamplerProxy testname="Search">
  <stringProp name="HTTPSampler.method">GET</stringProp>
</HTTPSamplerProxy>
<hashTree>
  <ResponseAssertion testname="redirected">
    <collectionProp name="Asserion.test_strings">
      <stringProp name="49587">302</stringProp>
    </collectionProp>
    <stringProp name="Assertion.test_field">Assertion.response_code</stringProp>
    <intProp name="Assertion.test_type">8</intProp>
  </ResponseAssertion>
  <hashTree/>
</hashTree>
"#
    );
    let plan = translate_content(&plan_with_group(&body)).unwrap();
    let list = plan.get("Main").unwrap();

    assert_eq!(list.actions.len(), 1);
    let action = &list.actions[0];
    assert_eq!(action.url, "http://production.example.net/search");
    assert_eq!(action.method, "GET");
    // 响应码断言不产出校验记录
    assert_eq!(action.http_response_code.as_deref(), Some("302"));
    assert!(action.validations.is_empty());
    // 组级默认参数被继承
    assert_eq!(
        action.parameters,
        vec![("lang".to_string(), "en".to_string())]
    );
    assert_eq!(action.encode_parameters, Some(false));
}

#[test]
fn test_regex_extractor_without_match_number() {
    let body = r#"
<HTTPSamplerProxy testname="Search">
  <stringProp name="HTTPSampler.domain">example.net</stringProp>
</HTTPSamplerProxy>
<hashTree>
  <RegexExtractor testname="pick term">
    <stringProp name="RegexExtractor.refname">term</stringProp>
    <stringProp name="RegexExtractor.regex">.*</stringProp>
    <stringProp name="RegexExtractor.template">$2$</stringProp>
    <stringProp name="RegexExtractor.match_number"></stringProp>
  </RegexExtractor>
  <hashTree/>
</hashTree>
"#;
    // 缺少匹配序号只是收窄，翻译照常成功
    let plan = translate_content(&plan_with_group(body)).unwrap();
    let action = &plan.get("Main").unwrap().actions[0];

    assert_eq!(action.extractions.len(), 1);
    let extraction = &action.extractions[0];
    assert_eq!(extraction.name, "term");
    assert_eq!(extraction.selection_raw(), "Regex");
    assert_eq!(extraction.selection_content(), ".*");
    assert_eq!(extraction.sub_selection_raw(), Some("RegexGroup"));
    assert_eq!(extraction.sub_selection_content(), Some("2"));
}

#[test]
fn test_parameter_inheritance_appends_own_pairs() {
    let body = format!(
        r#"{DEFAULTS}
<HTTPSamplerProxy testname="Bare"></HTTPSamplerProxy>
<hashTree/>
<HTTPSamplerProxy testname="WithOwn">
  <elementProp name="HTTPsampler.Arguments" elementType="Arguments">
    <collectionProp name="Arguments.arguments">
      <elementProp name="q" elementType="HTTPArgument">
        <boolProp name="HTTPArgument.always_encode">true</boolProp>
        <stringProp name="Argument.name">q</stringProp>
        <stringProp name="Argument.value">rust</stringProp>
      </elementProp>
    </collectionProp>
  </elementProp>
</HTTPSamplerProxy>
<hashTree/>
"#
    );
    let plan = translate_content(&plan_with_group(&body)).unwrap();
    let list = plan.get("Main").unwrap();
    assert_eq!(list.actions.len(), 2);

    // 零参数的动作恰好得到默认参数
    assert_eq!(
        list.actions[0].parameters,
        vec![("lang".to_string(), "en".to_string())]
    );
    // 自带参数追加在默认参数之后，编码开关取第一个参数的
    assert_eq!(
        list.actions[1].parameters,
        vec![
            ("lang".to_string(), "en".to_string()),
            ("q".to_string(), "rust".to_string())
        ]
    );
    assert_eq!(list.actions[1].encode_parameters, Some(false));
}

#[test]
fn test_header_assertion_fans_out_per_raw_value() {
    let body = r#"
<HTTPSamplerProxy testname="Fetch">
  <stringProp name="HTTPSampler.domain">example.net</stringProp>
</HTTPSamplerProxy>
<hashTree>
  <ResponseAssertion testname="hdr">
    <collectionProp name="Asserion.test_strings">
      <stringProp name="1">Expires</stringProp>
      <stringProp name="2">Cache-Control: no-store</stringProp>
    </collectionProp>
    <stringProp name="Assertion.test_field">Assertion.response_headers</stringProp>
    <intProp name="Assertion.test_type">16</intProp>
  </ResponseAssertion>
  <hashTree/>
</hashTree>
"#;
    let plan = translate_content(&plan_with_group(body)).unwrap();
    let action = &plan.get("Main").unwrap().actions[0];
    assert_eq!(action.validations.len(), 2);

    let first = &action.validations[0];
    assert_eq!(first.name, "hdr-1");
    assert_eq!(first.selection_raw(), "Header");
    assert_eq!(first.selection_content(), "Expires");
    assert_eq!(first.validation_raw(), "Exists");
    assert_eq!(first.validation_content(), None);

    let second = &action.validations[1];
    assert_eq!(second.name, "hdr-2");
    assert_eq!(second.selection_content(), "Cache-Control");
    assert_eq!(second.validation_raw(), "Matches");
    assert_eq!(second.validation_content(), Some("no-store"));
}

#[test]
fn test_variable_scoped_assertion_promotes_exists() {
    let body = r#"
<HTTPSamplerProxy testname="Check">
  <stringProp name="HTTPSampler.domain">example.net</stringProp>
</HTTPSamplerProxy>
<hashTree>
  <ResponseAssertion testname="token-check">
    <collectionProp name="Asserion.test_strings">
      <stringProp name="1">abc</stringProp>
    </collectionProp>
    <stringProp name="Assertion.test_field">Assertion.response_data</stringProp>
    <stringProp name="Assertion.scope">variable</stringProp>
    <stringProp name="Scope.variable">token</stringProp>
    <intProp name="Assertion.test_type">2</intProp>
  </ResponseAssertion>
  <hashTree/>
</hashTree>
"#;
    let plan = translate_content(&plan_with_group(body)).unwrap();
    let validation = &plan.get("Main").unwrap().actions[0].validations[0];

    assert_eq!(validation.selection_raw(), "Variable");
    assert_eq!(validation.selection_content(), "${token}");
    // Variable + Exists 被提升为 Matches
    assert_eq!(validation.validation_raw(), "Matches");
    assert_eq!(validation.validation_content(), Some("abc"));
}

#[test]
fn test_group_variables_feed_store_block() {
    let body = r#"
<Arguments testname="User Defined Variables">
  <collectionProp name="Arguments.arguments">
    <elementProp name="host" elementType="Argument">
      <stringProp name="Argument.name">host</stringProp>
      <stringProp name="Argument.value">example.net</stringProp>
    </elementProp>
    <elementProp name="greeting" elementType="Argument">
      <stringProp name="Argument.name">greeting</stringProp>
      <stringProp name="Argument.value">hello ${host}</stringProp>
    </elementProp>
    <elementProp name="random" elementType="Argument">
      <stringProp name="Argument.name">random</stringProp>
      <stringProp name="Argument.value">7</stringProp>
    </elementProp>
  </collectionProp>
</Arguments>
<hashTree/>
<HTTPSamplerProxy testname="Visit">
  <stringProp name="HTTPSampler.domain">example.net</stringProp>
</HTTPSamplerProxy>
<hashTree/>
"#;
    let plan = translate_content(&plan_with_group(body)).unwrap();
    let list = plan.get("Main").unwrap();

    // 只有引用了其他变量的绑定进 Store；保留名冲突被跳过
    assert_eq!(
        list.store,
        vec![("greeting".to_string(), "hello example.net".to_string())]
    );
    assert_eq!(list.actions.len(), 1);
}

#[test]
fn test_plan_level_variables_seed_every_group() {
    let xml = r#"<jmeterTestPlan><hashTree>
<TestPlan testname="Plan">
  <elementProp name="TestPlan.user_defined_variables" elementType="Arguments">
    <collectionProp name="Arguments.arguments">
      <elementProp name="host" elementType="Argument">
        <stringProp name="Argument.name">host</stringProp>
        <stringProp name="Argument.value">example.net</stringProp>
      </elementProp>
    </collectionProp>
  </elementProp>
</TestPlan>
<hashTree>
  <ThreadGroup testname="G1"><stringProp name="ThreadGroup.num_threads">1</stringProp></ThreadGroup>
  <hashTree>
    <Arguments testname="vars">
      <collectionProp name="Arguments.arguments">
        <elementProp name="target" elementType="Argument">
          <stringProp name="Argument.name">target</stringProp>
          <stringProp name="Argument.value">${host}</stringProp>
        </elementProp>
      </collectionProp>
    </Arguments>
    <hashTree/>
  </hashTree>
</hashTree>
</hashTree></jmeterTestPlan>"#;
    let plan = translate_content(xml).unwrap();
    let list = plan.get("G1").unwrap();
    assert_eq!(
        list.store,
        vec![("target".to_string(), "example.net".to_string())]
    );
}

#[test]
fn test_seeded_context_resolves_group_bindings() {
    let mut seed = VariableContext::new();
    seed.insert("host", "staging.example.net");

    let body = r#"
<Arguments testname="vars">
  <collectionProp name="Arguments.arguments">
    <elementProp name="target" elementType="Argument">
      <stringProp name="Argument.name">target</stringProp>
      <stringProp name="Argument.value">${host}</stringProp>
    </elementProp>
  </collectionProp>
</Arguments>
<hashTree/>
<HTTPSamplerProxy testname="Visit">
  <stringProp name="HTTPSampler.domain">${host}</stringProp>
</HTTPSamplerProxy>
<hashTree/>
"#;
    let plan = TranslationDriver::with_seed(seed)
        .translate_content(&plan_with_group(body))
        .unwrap();
    let list = plan.get("Main").unwrap();
    // 绑定值用种子上下文解析，URL 里的占位符则原样保留到运行时
    assert_eq!(
        list.store,
        vec![("target".to_string(), "staging.example.net".to_string())]
    );
    assert_eq!(list.actions[0].url, "http://${host}");
}

#[test]
fn test_missing_host_after_fallback_is_fatal() {
    let body = r#"
<HTTPSamplerProxy testname="Orphan">
  <stringProp name="HTTPSampler.path">/x</stringProp>
</HTTPSamplerProxy>
<hashTree/>
"#;
    let err = translate_content(&plan_with_group(body)).unwrap_err();
    assert!(matches!(err, TranslateError::Model(_)));
    assert!(err.to_string().contains("Orphan"));
}

#[test]
fn test_negated_matching_rule_is_fatal() {
    let body = r#"
<HTTPSamplerProxy testname="Check">
  <stringProp name="HTTPSampler.domain">example.net</stringProp>
</HTTPSamplerProxy>
<hashTree>
  <ResponseAssertion testname="not-found">
    <collectionProp name="Asserion.test_strings">
      <stringProp name="1">error</stringProp>
    </collectionProp>
    <stringProp name="Assertion.test_field">Assertion.response_data</stringProp>
    <intProp name="Assertion.test_type">5</intProp>
  </ResponseAssertion>
  <hashTree/>
</hashTree>
"#;
    let err = translate_content(&plan_with_group(body)).unwrap_err();
    assert!(matches!(err, TranslateError::UnsupportedConstruct(_)));
}

#[test]
fn test_extractor_from_headers_is_fatal() {
    let body = r#"
<HTTPSamplerProxy testname="Fetch">
  <stringProp name="HTTPSampler.domain">example.net</stringProp>
</HTTPSamplerProxy>
<hashTree>
  <RegexExtractor testname="bad">
    <stringProp name="RegexExtractor.refname">x</stringProp>
    <stringProp name="RegexExtractor.regex">.*</stringProp>
    <boolProp name="RegexExtractor.useHeaders">true</boolProp>
  </RegexExtractor>
  <hashTree/>
</hashTree>
"#;
    let err = translate_content(&plan_with_group(body)).unwrap_err();
    assert!(matches!(err, TranslateError::UnsupportedConstruct(_)));
}

#[test]
fn test_extractor_non_first_match_is_fatal() {
    let body = r#"
<HTTPSamplerProxy testname="Fetch">
  <stringProp name="HTTPSampler.domain">example.net</stringProp>
</HTTPSamplerProxy>
<hashTree>
  <RegexExtractor testname="third">
    <stringProp name="RegexExtractor.refname">x</stringProp>
    <stringProp name="RegexExtractor.regex">.*</stringProp>
    <stringProp name="RegexExtractor.match_number">3</stringProp>
  </RegexExtractor>
  <hashTree/>
</hashTree>
"#;
    let err = translate_content(&plan_with_group(body)).unwrap_err();
    assert!(matches!(err, TranslateError::UnsupportedConstruct(_)));
}

#[test]
fn test_multi_group_template_is_fatal() {
    let body = r#"
<HTTPSamplerProxy testname="Fetch">
  <stringProp name="HTTPSampler.domain">example.net</stringProp>
</HTTPSamplerProxy>
<hashTree>
  <RegexExtractor testname="pair">
    <stringProp name="RegexExtractor.refname">x</stringProp>
    <stringProp name="RegexExtractor.regex">(a)(b)</stringProp>
    <stringProp name="RegexExtractor.template">$1$$2$</stringProp>
    <stringProp name="RegexExtractor.match_number">1</stringProp>
  </RegexExtractor>
  <hashTree/>
</hashTree>
"#;
    let err = translate_content(&plan_with_group(body)).unwrap_err();
    assert!(matches!(err, TranslateError::UnsupportedConstruct(_)));
}

#[test]
fn test_xpath_extractor() {
    let body = r#"
<HTTPSamplerProxy testname="Fetch">
  <stringProp name="HTTPSampler.domain">example.net</stringProp>
</HTTPSamplerProxy>
<hashTree>
  <XPathExtractor testname="title">
    <stringProp name="XPathExtractor.refname">title</stringProp>
    <stringProp name="XPathExtractor.xpathQuery">//title/text()</stringProp>
  </XPathExtractor>
  <hashTree/>
</hashTree>
"#;
    let plan = translate_content(&plan_with_group(body)).unwrap();
    let extraction = &plan.get("Main").unwrap().actions[0].extractions[0];
    assert_eq!(extraction.name, "title");
    assert_eq!(extraction.selection_raw(), "XPath");
    assert_eq!(extraction.selection_content(), "//title/text()");
    assert_eq!(extraction.sub_selection_raw(), None);
}

#[test]
fn test_unknown_group_members_skipped_with_their_subtree() {
    let body = r#"
<ConstantTimer testname="wait">
  <stringProp name="ConstantTimer.delay">300</stringProp>
</ConstantTimer>
<hashTree/>
<HTTPSamplerProxy testname="Visit">
  <stringProp name="HTTPSampler.domain">example.net</stringProp>
</HTTPSamplerProxy>
<hashTree/>
"#;
    let plan = translate_content(&plan_with_group(body)).unwrap();
    // 计时器整个被跳过，动作照常产出
    assert_eq!(plan.get("Main").unwrap().actions.len(), 1);
}

#[test]
fn test_controller_subtree_members_not_hoisted() {
    let body = r#"
<HTTPSamplerProxy testname="TopLevel">
  <stringProp name="HTTPSampler.domain">example.net</stringProp>
</HTTPSamplerProxy>
<hashTree/>
<LoopController testname="loop">
  <boolProp name="LoopController.continue_forever">false</boolProp>
  <stringProp name="LoopController.loops">3</stringProp>
</LoopController>
<hashTree>
  <HTTPSamplerProxy testname="InsideController">
    <stringProp name="HTTPSampler.domain">example.net</stringProp>
  </HTTPSamplerProxy>
  <hashTree/>
</hashTree>
"#;
    let plan = translate_content(&plan_with_group(body)).unwrap();
    let list = plan.get("Main").unwrap();
    // 控制器连同它的整个容器被跳过，里面的采样器不会上浮
    assert_eq!(list.actions.len(), 1);
    assert_eq!(list.actions[0].name, "TopLevel");
}

#[test]
fn test_foreign_attachment_subtree_skipped_whole() {
    let body = r#"
<HTTPSamplerProxy testname="Visit">
  <stringProp name="HTTPSampler.domain">example.net</stringProp>
</HTTPSamplerProxy>
<hashTree>
  <JSR223PostProcessor testname="script">
    <stringProp name="script">prev.getResponseCode()</stringProp>
  </JSR223PostProcessor>
  <hashTree>
    <ResponseAssertion testname="inner">
      <collectionProp name="Asserion.test_strings">
        <stringProp name="1">ok</stringProp>
      </collectionProp>
      <stringProp name="Assertion.test_field">Assertion.response_data</stringProp>
      <intProp name="Assertion.test_type">8</intProp>
    </ResponseAssertion>
    <hashTree/>
  </hashTree>
</hashTree>
"#;
    let plan = translate_content(&plan_with_group(body)).unwrap();
    let action = &plan.get("Main").unwrap().actions[0];
    // 脚本节点容器里的断言属于脚本，不属于采样器
    assert!(action.validations.is_empty());
}

#[test]
fn test_duplicate_group_names_last_definition_wins() {
    let xml = r#"<jmeterTestPlan><hashTree>
<ThreadGroup testname="G"><stringProp name="ThreadGroup.num_threads">1</stringProp></ThreadGroup>
<hashTree>
  <HTTPSamplerProxy testname="First">
    <stringProp name="HTTPSampler.domain">example.net</stringProp>
  </HTTPSamplerProxy>
  <hashTree/>
</hashTree>
<ThreadGroup testname="G"><stringProp name="ThreadGroup.num_threads">1</stringProp></ThreadGroup>
<hashTree>
  <HTTPSamplerProxy testname="Second">
    <stringProp name="HTTPSampler.domain">example.net</stringProp>
  </HTTPSamplerProxy>
  <hashTree/>
</hashTree>
</hashTree></jmeterTestPlan>"#;
    let plan = translate_content(xml).unwrap();
    assert_eq!(plan.len(), 1);
    assert_eq!(plan.get("G").unwrap().actions[0].name, "Second");
}

#[test]
fn test_translate_file_from_disk() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    let body = r#"
<HTTPSamplerProxy testname="Visit">
  <stringProp name="HTTPSampler.domain">example.net</stringProp>
</HTTPSamplerProxy>
<hashTree/>
"#;
    file.write_all(plan_with_group(body).as_bytes()).unwrap();

    let plan = translate_file(file.path()).unwrap();
    assert_eq!(plan.get("Main").unwrap().actions.len(), 1);
}

#[test]
fn test_truncated_document_is_malformed() {
    let xml = r#"<jmeterTestPlan><hashTree>
<ThreadGroup testname="G"><stringProp name="ThreadGroup.num_threads">1</stringProp></ThreadGroup>
<hashTree>
  <HTTPSamplerProxy testname="Visit">
    <stringProp name="HTTPSampler.domain">example.net</stringProp>"#;
    let err = translate_content(xml).unwrap_err();
    assert!(matches!(
        err,
        TranslateError::MalformedInput(_) | TranslateError::Xml(_)
    ));
}
