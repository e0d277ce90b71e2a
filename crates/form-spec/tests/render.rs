use serde_json::json;

use form_spec::{
    FormDocument, Navigator, StepStatus, build_outline, render_json, render_markdown, render_text,
};

fn fixture(name: &str) -> &'static str {
    match name {
        "product_form" => include_str!("../tests/fixtures/product_form.json"),
        _ => panic!("unknown fixture {}", name),
    }
}

fn product_form() -> FormDocument {
    FormDocument::from_json_str(fixture("product_form")).expect("deserialize")
}

#[test]
fn outline_reports_progress_and_visibility() {
    let document = product_form();
    let mut navigator = Navigator::for_document(&document);
    navigator.set_step(1);
    let payload = build_outline(&document, &navigator, &json!({ "q2": "electronics" }));

    assert_eq!(payload.percent_complete, 67);
    assert_eq!(payload.total_questions, 4);
    assert_eq!(payload.steps[0].status, StepStatus::Completed);
    assert_eq!(payload.steps[1].status, StepStatus::Current);
    assert!(payload.steps[1].questions[1].visible);
    assert!(!payload.steps[2].visible);
    assert_eq!(payload.steps[0].questions[0].violations, vec!["required"]);
}

#[test]
fn render_text_marks_hidden_and_required_entries() {
    let document = product_form();
    let navigator = Navigator::for_document(&document);
    let payload = build_outline(&document, &navigator, &json!({ "q1": "Desk Lamp" }));

    let text = render_text(&payload);
    assert!(text.contains("Form: Product Information Form (form_001)"));
    assert!(text.contains("Step 1/3 (33% complete)"));
    assert!(text.contains("Product Name (product_name, text) [required] = Desk Lamp"));
    assert!(text.contains("Warranty (months) (warranty_months, text) (hidden)"));
}

#[test]
fn render_json_exposes_structure() {
    let document = product_form();
    let navigator = Navigator::for_document(&document);
    let payload = build_outline(&document, &navigator, &json!({}));

    let ui = render_json(&payload);
    assert_eq!(ui["form_id"], "form_001");
    assert_eq!(ui["progress"]["step_count"], 3);
    assert_eq!(ui["steps"][0]["status"], "current");
    assert_eq!(ui["steps"][0]["questions"][1]["type"], "select");
}

#[test]
fn render_markdown_lists_steps() {
    let document = product_form();
    let navigator = Navigator::for_document(&document);
    let payload = build_outline(&document, &navigator, &json!({ "q2": "home" }));

    let markdown = render_markdown(&payload).expect("render");
    assert!(markdown.starts_with("# Product Information Form"));
    assert!(markdown.contains("## 2. Pricing & Specifications"));
    assert!(markdown.contains("- **Product Category** `product_category` (select) *required* = home"));
    assert!(markdown.contains("_No questions in this step._"));
}
