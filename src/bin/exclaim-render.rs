use anyhow::Context;
use exclaim::{example_registry, ExclaimError, TracingDiagnostics, Ui, UiOptions, Value};
use std::env;
use std::fs;
use std::process;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("exclaim=warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut args: Vec<String> = env::args().skip(1).collect();
    let escape_html = match args.iter().position(|arg| arg == "--no-escape") {
        Some(index) => {
            args.remove(index);
            false
        }
        None => true,
    };

    if args.is_empty() || args.len() > 2 {
        eprintln!("Usage: exclaim-render [--no-escape] <ui.json|ui.yaml> [env.json|env.yaml]");
        eprintln!();
        eprintln!("Examples:");
        eprintln!("  exclaim-render page.yaml");
        eprintln!("  exclaim-render page.json data.json");
        eprintln!("  RUST_LOG=exclaim=debug exclaim-render --no-escape page.yaml data.yaml");
        process::exit(1);
    }

    match render_files(&args[0], args.get(1).map(String::as_str), escape_html) {
        Ok(output) => println!("{}", output),
        Err(e) => {
            eprintln!("✗ {} could not be rendered:", args[0]);
            print_error(&e);
            process::exit(1);
        }
    }
}

fn render_files(
    declaration_path: &str,
    env_path: Option<&str>,
    escape_html: bool,
) -> anyhow::Result<String> {
    let declaration = read_document(declaration_path)?;
    let env = match env_path {
        Some(path) => Value::from(read_document(path)?),
        None => Value::Null,
    };

    let mut ui = Ui::with_options(example_registry()?, UiOptions { escape_html })
        .with_diagnostics(Arc::new(TracingDiagnostics));
    ui.parse_ui(&declaration)?;
    Ok(ui.render(&env)?.to_string())
}

/// YAML is a superset of JSON, so one reader covers both file kinds.
fn read_document(path: &str) -> anyhow::Result<serde_json::Value> {
    let content = fs::read_to_string(path).with_context(|| format!("Failed to read {}", path))?;
    serde_yaml::from_str(&content).with_context(|| format!("Failed to parse {}", path))
}

fn print_error(error: &anyhow::Error) {
    let Some(error) = error.downcast_ref::<ExclaimError>() else {
        eprintln!("  {:#}", error);
        return;
    };
    match error {
        ExclaimError::Configuration(e) => {
            eprintln!("  Configuration error:");
            eprintln!("    {}", e);
        }
        ExclaimError::Rendering { element, message } => {
            eprintln!("  Rendering error in '{}':", element);
            eprintln!("    {}", message);
        }
        ExclaimError::Internal(msg) => {
            eprintln!("  {}", msg);
        }
    }
}
