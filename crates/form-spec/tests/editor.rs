use form_spec::{
    EditAction, FormDocument, FormEditor, FormError, FormStatus, QuestionTemplate, QuestionType,
    SequentialIds, StepPatch, catalog,
};

fn product_form() -> FormDocument {
    FormDocument::from_json_str(include_str!("../tests/fixtures/product_form.json"))
        .expect("deserialize")
}

fn text_template() -> QuestionTemplate {
    catalog::template(QuestionType::Text).expect("text template")
}

#[test]
fn add_question_targets_active_step() {
    let mut editor = FormEditor::open(product_form());
    editor
        .apply(EditAction::SetStep { step_index: 2 })
        .expect("set step");
    editor
        .apply(EditAction::AddQuestion {
            step_index: None,
            template: text_template(),
        })
        .expect("add");

    let document = editor.document();
    assert_eq!(document.steps[2].questions.len(), 1);
    assert_eq!(document.steps[2].questions[0].label, "Text Input");
    assert_eq!(document.total_questions, 5);
}

#[test]
fn add_step_activates_new_step_and_delete_reclamps() {
    let mut editor = FormEditor::open(product_form());
    editor
        .apply(EditAction::AddStep {
            title: "Shipping".into(),
            description: None,
        })
        .expect("add step");
    assert_eq!(editor.current_step(), 3);

    editor
        .apply(EditAction::DeleteStep { step_index: 3 })
        .expect("delete step");
    assert_eq!(editor.current_step(), 2);

    editor
        .apply(EditAction::DeleteStep { step_index: 2 })
        .expect("delete step");
    assert_eq!(editor.current_step(), 1);
    assert_eq!(editor.document().steps.len(), 2);
}

#[test]
fn failed_actions_leave_session_untouched() {
    let mut editor = FormEditor::open(product_form());
    let before = editor.document().clone();

    let err = editor
        .apply(EditAction::AddStep {
            title: "   ".into(),
            description: None,
        })
        .expect_err("blank title");
    assert!(matches!(err, FormError::Validation(_)));
    assert_eq!(editor.document(), &before);
    assert!(!editor.can_undo());

    let err = editor
        .apply(EditAction::UpdateStep {
            step_index: 9,
            patch: StepPatch::default(),
        })
        .expect_err("bad index");
    assert!(matches!(err, FormError::IndexOutOfRange { .. }));
    assert_eq!(editor.document(), &before);
}

#[test]
fn deleting_selected_question_clears_selection() {
    let mut editor = FormEditor::open(product_form());
    editor
        .apply(EditAction::Select {
            question_id: Some("q2".into()),
        })
        .expect("select");
    assert_eq!(editor.selected(), Some("q2"));

    editor
        .apply(EditAction::DeleteQuestion {
            question_id: "q2".into(),
        })
        .expect("delete");
    assert_eq!(editor.selected(), None);

    let err = editor
        .apply(EditAction::Select {
            question_id: Some("q2".into()),
        })
        .expect_err("gone");
    assert!(matches!(err, FormError::NotFound(_)));
}

#[test]
fn undo_and_redo_restore_document_and_step() {
    let mut editor = FormEditor::open(product_form());
    let original = editor.document().clone();

    editor
        .apply(EditAction::DuplicateQuestion {
            question_id: "q1".into(),
        })
        .expect("duplicate");
    editor
        .apply(EditAction::AddStep {
            title: "Extras".into(),
            description: None,
        })
        .expect("add step");
    let edited = editor.document().clone();

    assert!(editor.undo());
    assert_eq!(editor.document().steps.len(), 3);
    assert!(editor.undo());
    assert_eq!(editor.document(), &original);
    assert!(!editor.undo());

    assert!(editor.redo());
    assert!(editor.redo());
    assert_eq!(editor.document(), &edited);
    assert_eq!(editor.current_step(), 3);
    assert!(!editor.can_redo());
}

#[test]
fn ids_are_not_recycled_after_undo() {
    let mut editor = FormEditor::with_ids(product_form(), SequentialIds::starting_at(100));
    editor
        .apply(EditAction::AddQuestion {
            step_index: Some(0),
            template: text_template(),
        })
        .expect("add");
    let first = editor.document().steps[0].questions[2].id.clone();
    assert!(editor.undo());
    editor
        .apply(EditAction::AddQuestion {
            step_index: Some(0),
            template: text_template(),
        })
        .expect("add");
    assert_ne!(editor.document().steps[0].questions[2].id, first);
}

#[test]
fn history_is_bounded() {
    let mut editor = FormEditor::open(product_form()).with_history_limit(2);
    for _ in 0..4 {
        editor
            .apply(EditAction::AddQuestion {
                step_index: Some(1),
                template: text_template(),
            })
            .expect("add");
    }
    assert!(editor.undo());
    assert!(editor.undo());
    assert!(!editor.undo());
    assert_eq!(editor.document().total_questions, 6);
}

#[test]
fn publish_through_editor() {
    let mut editor = FormEditor::open(product_form());
    editor.apply(EditAction::Publish).expect("publish");
    assert_eq!(editor.document().status, FormStatus::Published);
}

#[test]
fn actions_deserialize_from_tagged_json() {
    let actions: Vec<EditAction> = serde_json::from_str(
        r#"[
            { "action": "add_step", "title": "Shipping" },
            { "action": "add_question", "template": { "type": "price", "name": "Price" } },
            { "action": "move_step", "from": 3, "to": 0 },
            { "action": "publish" }
        ]"#,
    )
    .expect("actions");

    let mut editor = FormEditor::open(product_form());
    for action in actions {
        editor.apply(action).expect("apply");
    }
    let document = editor.document();
    assert_eq!(document.steps[0].title, "Shipping");
    assert_eq!(document.steps[0].questions[0].kind, QuestionType::Price);
    assert_eq!(editor.current_step(), 0);
    assert_eq!(document.status, FormStatus::Published);
}
