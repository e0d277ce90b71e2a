use serde_json::{Value, json};

use form_spec::{
    FormDocument, Question, QuestionType, Rule, RuleToggle, Step, ValidationRules, validate,
    validate_step, validate_submission,
};

fn make_two_step_form() -> FormDocument {
    let mut first = Step::new("step_1", "Basics");
    let mut a = Question::new("A", QuestionType::Text, "product_name", "Product Name");
    a.set_rule_enabled(RuleToggle::Required, true);
    first.questions.push(a);
    let mut document = FormDocument::new("two-step", "Two Step", first);
    document.steps.push(Step::new("step_2", "Details"));
    document.validated().expect("valid document")
}

fn question(kind: QuestionType) -> Question {
    Question::new("f", kind, "field_1", "Field")
}

#[test]
fn required_scenario() {
    let document = make_two_step_form();
    let a = document.question("A").expect("A");
    assert_eq!(validate(a, Some(&json!(""))), vec![Rule::Required]);
    assert_eq!(validate(a, Some(&json!("x"))), Vec::<Rule>::new());
    assert_eq!(validate(a, None), vec![Rule::Required]);
    assert_eq!(validate(a, Some(&json!([]))), vec![Rule::Required]);
    assert_eq!(validate(a, Some(&Value::Null)), vec![Rule::Required]);
}

#[test]
fn empty_optional_answers_skip_other_rules() {
    let mut q = question(QuestionType::Text);
    q.validation.min_length = Some(3);
    q.validation.email = true;
    assert!(validate(&q, Some(&json!(""))).is_empty());
    assert!(validate(&q, None).is_empty());
}

#[test]
fn length_bounds_use_characters_and_array_sizes() {
    let mut q = question(QuestionType::Text);
    q.validation.min_length = Some(2);
    q.validation.max_length = Some(4);
    assert_eq!(validate(&q, Some(&json!("a"))), vec![Rule::MinLength]);
    assert!(validate(&q, Some(&json!("äöü"))).is_empty());
    assert_eq!(validate(&q, Some(&json!("abcde"))), vec![Rule::MaxLength]);

    let mut multi = question(QuestionType::Checkbox);
    multi.validation.max_length = Some(1);
    assert_eq!(
        validate(&multi, Some(&json!(["red", "blue"]))),
        vec![Rule::MaxLength]
    );
}

#[test]
fn pattern_email_and_number_rules() {
    let mut sku = question(QuestionType::Text);
    sku.validation.pattern = Some("^SKU-[0-9]+$".into());
    assert!(validate(&sku, Some(&json!("SKU-42"))).is_empty());
    assert_eq!(validate(&sku, Some(&json!("42"))), vec![Rule::Pattern]);

    let mut email = question(QuestionType::Email);
    email.set_rule_enabled(RuleToggle::Email, true);
    assert!(validate(&email, Some(&json!("ops@example.com"))).is_empty());
    assert_eq!(validate(&email, Some(&json!("ops@example"))), vec![Rule::Email]);

    let mut number = question(QuestionType::Number);
    number.set_rule_enabled(RuleToggle::Number, true);
    number.validation.min = Some(0.0);
    assert!(validate(&number, Some(&json!("12.5"))).is_empty());
    assert_eq!(validate(&number, Some(&json!("twelve"))), vec![Rule::Number]);
    assert_eq!(validate(&number, Some(&json!(-1))), vec![Rule::Min]);
}

#[test]
fn rule_names_match_config_keys() {
    assert_eq!(Rule::MinLength.to_string(), "min_length");
    assert_eq!(
        serde_json::to_value(Rule::MaxLength).expect("serialize"),
        json!("max_length")
    );

    let rules = ValidationRules {
        min_length: Some(1),
        max_length: Some(2),
        ..ValidationRules::default()
    };
    let config = serde_json::to_value(&rules).expect("serialize");
    for rule in [Rule::MinLength, Rule::MaxLength] {
        assert!(config.get(rule.as_str()).is_some(), "{} is a config key", rule);
    }
}

#[test]
fn step_report_lists_violations() {
    let document = make_two_step_form();
    let report = validate_step(&document, 0, &json!({})).expect("step exists");
    assert!(!report.valid);
    assert_eq!(report.violations[0].question_id, "A");
    assert_eq!(report.violations[0].rules, vec![Rule::Required]);

    let report = validate_step(&document, 1, &json!({})).expect("step exists");
    assert!(report.valid);
    assert!(validate_step(&document, 2, &json!({})).is_err());
}

#[test]
fn submission_skips_hidden_questions_and_flags_unknown_fields() {
    let document = FormDocument::from_json_str(include_str!("../tests/fixtures/product_form.json"))
        .expect("deserialize");

    let answers = json!({ "q1": "Lamp", "q2": "home", "q3": 25 });
    let report = validate_submission(&document, &answers);
    assert!(report.valid, "{:?}", report);

    let answers = json!({ "q1": "Lamp", "q2": "home", "q3": -4, "extra": true });
    let report = validate_submission(&document, &answers);
    assert!(!report.valid);
    assert_eq!(report.violations.len(), 1);
    assert_eq!(report.violations[0].rules, vec![Rule::Min]);
    assert_eq!(report.unknown_fields, vec!["extra"]);
}
