//! Question bank: the static list of field templates users drag into steps.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::spec::question::{QuestionTemplate, QuestionType};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct TemplateCategory {
    pub id: String,
    pub name: String,
    pub icon: String,
    pub templates: Vec<QuestionTemplate>,
}

type Entry = (QuestionType, &'static str, &'static str, &'static str);

const BASIC: &[Entry] = &[
    (QuestionType::Text, "Text Input", "Type", "Single line text field"),
    (QuestionType::Textarea, "Text Area", "AlignLeft", "Multi-line text field"),
    (QuestionType::Number, "Number", "Hash", "Numeric input field"),
    (QuestionType::Email, "Email", "Mail", "Email address field"),
    (QuestionType::Phone, "Phone", "Phone", "Phone number field"),
    (QuestionType::Date, "Date", "Calendar", "Date picker field"),
];

const SELECTION: &[Entry] = &[
    (QuestionType::Select, "Dropdown", "ChevronDown", "Single selection dropdown"),
    (QuestionType::Radio, "Radio Group", "Circle", "Single choice options"),
    (QuestionType::Checkbox, "Checkbox Group", "CheckSquare", "Multiple choice options"),
    (QuestionType::Rating, "Rating", "Star", "Star rating field"),
];

const ADVANCED: &[Entry] = &[
    (QuestionType::File, "File Upload", "Upload", "File attachment field"),
    (QuestionType::Signature, "Signature", "PenTool", "Digital signature field"),
    (QuestionType::Matrix, "Matrix", "Grid", "Grid of questions"),
    (QuestionType::Section, "Section Break", "Minus", "Visual section separator"),
];

const PRODUCT: &[Entry] = &[
    (QuestionType::ProductName, "Product Name", "Tag", "Product title field"),
    (QuestionType::ProductCategory, "Category", "Folder", "Product category selector"),
    (QuestionType::Price, "Price", "DollarSign", "Price input field"),
    (QuestionType::Specifications, "Specifications", "List", "Product specs table"),
    (QuestionType::Images, "Product Images", "Image", "Multiple image upload"),
];

const CATEGORIES: &[(&str, &str, &str, &[Entry])] = &[
    ("basic", "Basic Fields", "Type", BASIC),
    ("selection", "Selection Fields", "CheckSquare", SELECTION),
    ("advanced", "Advanced Fields", "Settings", ADVANCED),
    ("product", "Product Specific", "Package", PRODUCT),
];

fn to_template(&(kind, name, icon, description): &Entry) -> QuestionTemplate {
    QuestionTemplate {
        kind,
        name: name.to_string(),
        icon: Some(icon.to_string()),
        description: Some(description.to_string()),
    }
}

/// All categories in display order.
pub fn categories() -> Vec<TemplateCategory> {
    CATEGORIES
        .iter()
        .map(|&(id, name, icon, entries)| TemplateCategory {
            id: id.to_string(),
            name: name.to_string(),
            icon: icon.to_string(),
            templates: entries.iter().map(to_template).collect(),
        })
        .collect()
}

/// Case-insensitive match on template name or description. Categories left
/// without templates are dropped.
pub fn search(term: &str) -> Vec<TemplateCategory> {
    let needle = term.trim().to_lowercase();
    categories()
        .into_iter()
        .filter_map(|mut category| {
            category.templates.retain(|template| {
                template.name.to_lowercase().contains(&needle)
                    || template
                        .description
                        .as_deref()
                        .is_some_and(|description| description.to_lowercase().contains(&needle))
            });
            (!category.templates.is_empty()).then_some(category)
        })
        .collect()
}

pub fn template(kind: QuestionType) -> Option<QuestionTemplate> {
    CATEGORIES
        .iter()
        .flat_map(|(_, _, _, entries)| entries.iter())
        .find(|entry| entry.0 == kind)
        .map(to_template)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_type_has_a_template() {
        let total: usize = categories().iter().map(|c| c.templates.len()).sum();
        assert_eq!(total, 19);
        assert_eq!(
            template(QuestionType::Price).map(|t| t.name),
            Some("Price".to_string())
        );
    }

    #[test]
    fn search_matches_descriptions_and_drops_empty_categories() {
        let found = search("UPLOAD");
        let ids: Vec<_> = found.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["advanced", "product"]);
        assert!(search("no such field").is_empty());
        assert_eq!(search("").len(), 4);
    }
}
