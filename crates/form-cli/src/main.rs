use clap::{Parser, Subcommand, ValueEnum};
use form_spec::{
    EditAction, FormDocument, FormEditor, Navigator, Step, ValidationReport, build_outline,
    catalog, render_json, render_markdown, render_text, resolve_visibility, validate_step,
    validate_submission,
};
use serde::Serialize;
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Multi-step product form builder CLI",
    long_about = "Creates, edits, previews and checks multi-step form documents stored as JSON"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum RenderMode {
    Text,
    Json,
    Markdown,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum SchemaTarget {
    Document,
    Actions,
}

#[derive(Subcommand)]
enum Command {
    /// Create a draft form with a single empty step.
    New {
        /// Human readable form title.
        #[arg(long)]
        title: String,
        /// Form identifier (defaults to a slug of the title).
        #[arg(long)]
        id: Option<String>,
        /// Optional form description.
        #[arg(long)]
        description: Option<String>,
        /// Title of the first step.
        #[arg(long, default_value = "Step 1")]
        first_step: String,
        /// Output file (defaults to PRODUCTFORM_OUTPUT or `<id>.form.json`).
        #[arg(long, value_name = "FILE", env = "PRODUCTFORM_OUTPUT")]
        out: Option<PathBuf>,
        /// Overwrite an existing file.
        #[arg(long)]
        force: bool,
    },
    /// Apply a JSON array of edit actions to a form document.
    Apply {
        /// Path to the form document JSON.
        #[arg(long, value_name = "DOC")]
        doc: PathBuf,
        /// Path to a JSON array of edit actions.
        #[arg(long, value_name = "ACTIONS")]
        actions: PathBuf,
        /// Where to write the result (defaults to overwriting DOC).
        #[arg(long, value_name = "FILE")]
        out: Option<PathBuf>,
    },
    /// Check answers against the form's validation rules.
    Validate {
        /// Path to the form document JSON.
        #[arg(long, value_name = "DOC")]
        doc: PathBuf,
        /// Path to the answers JSON file.
        #[arg(long, value_name = "ANSWERS")]
        answers: PathBuf,
        /// Only check the step at this index.
        #[arg(long)]
        step: Option<usize>,
    },
    /// Print which steps and questions are visible for a set of answers.
    Visibility {
        /// Path to the form document JSON.
        #[arg(long, value_name = "DOC")]
        doc: PathBuf,
        /// Path to the answers JSON file.
        #[arg(long, value_name = "ANSWERS")]
        answers: Option<PathBuf>,
    },
    /// Render an outline of the form.
    Preview {
        /// Path to the form document JSON.
        #[arg(long, value_name = "DOC")]
        doc: PathBuf,
        /// Optional answers JSON used for visibility and values.
        #[arg(long, value_name = "ANSWERS")]
        answers: Option<PathBuf>,
        /// Active step index (clamped to the form's steps).
        #[arg(long, default_value_t = 0)]
        step: usize,
        /// Output format.
        #[arg(long, value_enum, default_value_t = RenderMode::Text)]
        format: RenderMode,
    },
    /// List the question bank templates.
    Catalog {
        /// Filter templates by name or description.
        #[arg(long)]
        search: Option<String>,
        /// Emit JSON instead of text.
        #[arg(long)]
        json: bool,
    },
    /// Print the JSON Schema of form documents or edit actions.
    Schema {
        #[arg(value_enum, default_value_t = SchemaTarget::Document)]
        target: SchemaTarget,
    },
}

fn main() -> CliResult<()> {
    init_tracing();
    let cli = Cli::parse();
    match cli.command {
        Command::New {
            title,
            id,
            description,
            first_step,
            out,
            force,
        } => run_new(title, id, description, first_step, out, force),
        Command::Apply { doc, actions, out } => run_apply(doc, actions, out),
        Command::Validate { doc, answers, step } => run_validate(doc, answers, step),
        Command::Visibility { doc, answers } => run_visibility(doc, answers),
        Command::Preview {
            doc,
            answers,
            step,
            format,
        } => run_preview(doc, answers, step, format),
        Command::Catalog { search, json } => run_catalog(search, json),
        Command::Schema { target } => run_schema(target),
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn run_new(
    title: String,
    id: Option<String>,
    description: Option<String>,
    first_step: String,
    out: Option<PathBuf>,
    force: bool,
) -> CliResult<()> {
    if title.trim().is_empty() {
        return Err("form title cannot be empty".into());
    }
    if first_step.trim().is_empty() {
        return Err("first step title cannot be empty".into());
    }
    let id = id.unwrap_or_else(|| slugify(&title));
    let out = out.unwrap_or_else(|| PathBuf::from(format!("{}.form.json", id)));
    if out.exists() && !force {
        return Err(format!(
            "{} already exists; rerun with --force to overwrite",
            out.display()
        )
        .into());
    }

    let mut document = FormDocument::new(id, title.trim(), Step::new("step_1", first_step.trim()));
    document.description = description.filter(|text| !text.trim().is_empty());
    write_json(&out, &document)?;
    info!(path = %out.display(), "created form document");
    println!("Created form {} at {}", document.id, out.display());
    Ok(())
}

fn run_apply(doc_path: PathBuf, actions_path: PathBuf, out: Option<PathBuf>) -> CliResult<()> {
    let document = load_document(&doc_path)?;
    let actions_json = fs::read_to_string(&actions_path)?;
    let actions: Vec<EditAction> = serde_json::from_str(&actions_json)?;

    let mut editor = FormEditor::open(document);
    for (index, action) in actions.into_iter().enumerate() {
        let label = action.label();
        editor
            .apply(action)
            .map_err(|err| format!("action #{} ({}) failed: {}", index + 1, label, err))?;
        debug!(index, action = label, "applied action");
    }

    let target = out.unwrap_or(doc_path);
    let document = editor.into_document();
    write_json(&target, &document)?;
    println!(
        "Wrote {} ({} steps, {} questions, {})",
        target.display(),
        document.steps.len(),
        document.total_questions,
        document.status.as_str()
    );
    Ok(())
}

fn run_validate(doc_path: PathBuf, answers_path: PathBuf, step: Option<usize>) -> CliResult<()> {
    let document = load_document(&doc_path)?;
    let answers = load_answers(Some(&answers_path))?;

    let report = match step {
        Some(index) => validate_step(&document, index, &answers)?,
        None => validate_submission(&document, &answers),
    };
    println!(
        "Validation result: {}",
        if report.valid { "valid" } else { "invalid" }
    );
    describe_validation(&report);

    if report.valid {
        Ok(())
    } else {
        Err("validation failed".into())
    }
}

fn describe_validation(report: &ValidationReport) {
    if !report.violations.is_empty() {
        println!("Violations:");
        for violation in &report.violations {
            let rules = violation
                .rules
                .iter()
                .map(|rule| rule.as_str())
                .collect::<Vec<_>>()
                .join(", ");
            match &violation.message {
                Some(message) => println!(
                    "  {}/{} ({}) - {}: {}",
                    violation.step_id, violation.question_id, violation.name, rules, message
                ),
                None => println!(
                    "  {}/{} ({}) - {}",
                    violation.step_id, violation.question_id, violation.name, rules
                ),
            }
        }
    }
    if !report.unknown_fields.is_empty() {
        println!(
            "Unknown answer fields: {}",
            report.unknown_fields.join(", ")
        );
    }
}

fn run_visibility(doc_path: PathBuf, answers_path: Option<PathBuf>) -> CliResult<()> {
    let document = load_document(&doc_path)?;
    let answers = load_answers(answers_path.as_deref())?;
    let visibility = resolve_visibility(&document, &answers);
    println!("{}", serde_json::to_string_pretty(&visibility)?);
    Ok(())
}

fn run_preview(
    doc_path: PathBuf,
    answers_path: Option<PathBuf>,
    step: usize,
    format: RenderMode,
) -> CliResult<()> {
    let document = load_document(&doc_path)?;
    let answers = load_answers(answers_path.as_deref())?;
    let mut navigator = Navigator::for_document(&document);
    navigator.set_step(step);
    let payload = build_outline(&document, &navigator, &answers);

    match format {
        RenderMode::Text => println!("{}", render_text(&payload)),
        RenderMode::Json => println!("{}", serde_json::to_string_pretty(&render_json(&payload))?),
        RenderMode::Markdown => println!("{}", render_markdown(&payload)?),
    }
    Ok(())
}

fn run_catalog(search: Option<String>, json: bool) -> CliResult<()> {
    let categories = match search.as_deref() {
        Some(term) => catalog::search(term),
        None => catalog::categories(),
    };
    if json {
        println!("{}", serde_json::to_string_pretty(&categories)?);
        return Ok(());
    }
    if categories.is_empty() {
        println!("No question templates found.");
    }
    for category in &categories {
        println!("{} ({})", category.name, category.id);
        for template in &category.templates {
            println!(
                "  - {} [{}]: {}",
                template.name,
                template.kind.as_str(),
                template.description.as_deref().unwrap_or("")
            );
        }
    }
    Ok(())
}

fn run_schema(target: SchemaTarget) -> CliResult<()> {
    let schema = match target {
        SchemaTarget::Document => schemars::schema_for!(FormDocument),
        SchemaTarget::Actions => schemars::schema_for!(Vec<EditAction>),
    };
    println!("{}", serde_json::to_string_pretty(&schema)?);
    Ok(())
}

fn load_document(path: &Path) -> CliResult<FormDocument> {
    let contents = fs::read_to_string(path)?;
    let document = FormDocument::from_json_str(&contents)
        .map_err(|err| format!("{}: {}", path.display(), err))?;
    debug!(path = %path.display(), steps = document.steps.len(), "loaded form document");
    Ok(document)
}

fn load_answers(path: Option<&Path>) -> CliResult<Value> {
    let Some(path) = path else {
        return Ok(Value::Object(Map::new()));
    };
    let contents = fs::read_to_string(path)?;
    let answers: Value = serde_json::from_str(&contents)?;
    if !answers.is_object() {
        return Err(format!("{}: answers must be a JSON object", path.display()).into());
    }
    Ok(answers)
}

fn write_json(path: &Path, value: &impl Serialize) -> CliResult<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }
    let contents = serde_json::to_string_pretty(value)?;
    fs::write(path, contents)?;
    Ok(())
}

fn slugify(value: &str) -> String {
    let mut slug = String::new();
    for ch in value.trim().chars() {
        if ch.is_ascii_alphanumeric() {
            slug.push(ch.to_ascii_lowercase());
        } else if !slug.ends_with('-') && !slug.is_empty() {
            slug.push('-');
        }
    }
    let slug = slug.trim_end_matches('-').to_string();
    if slug.is_empty() { "form".into() } else { slug }
}
