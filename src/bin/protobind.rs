//! protobind CLI - resolve HTTP request-binding options into struct tags
//!
//! Reads a compiled descriptor set and writes a binding manifest for code generators.

use clap::{Parser, Subcommand};
use protobind::binding::{Extension, SchemaBindings};
use protobind::{BindingConfig, BindingManifest, OutputFormat};
use std::path::{Path, PathBuf};
use std::process;

#[derive(Parser)]
#[command(name = "protobind")]
#[command(
    version,
    about = "Resolve protobuf request-binding options into struct tags",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve bindings and write the manifest
    Resolve {
        /// Descriptor set file (JSON/YAML) or directory of descriptor files
        #[arg(short, long)]
        descriptor: PathBuf,

        /// Path to protobind.yaml (default: ./protobind.yaml if present)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Manifest format (overrides output.format from config)
        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Only emit this fully-qualified message
        #[arg(short, long)]
        message: Option<String>,

        /// Exit with an error if any message or field failed
        #[arg(long)]
        strict: bool,
    },

    /// Run the full pipeline and report every error without writing a manifest
    Validate {
        /// Descriptor set file (JSON/YAML) or directory of descriptor files
        #[arg(short, long)]
        descriptor: PathBuf,

        /// Path to protobind.yaml (default: ./protobind.yaml if present)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// List the binding extensions and their field numbers
    Extensions {
        /// Path to protobind.yaml (default: ./protobind.yaml if present)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "protobind=info".into()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Resolve {
            descriptor,
            config,
            format,
            output,
            message,
            strict,
        } => resolve(descriptor, config, format, output, message, strict),
        Commands::Validate { descriptor, config } => validate(descriptor, config),
        Commands::Extensions { config } => list_extensions(config),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn load_config(config: Option<PathBuf>) -> Result<BindingConfig, String> {
    BindingConfig::discover(config.as_deref())
        .map_err(|e| format!("Failed to load configuration: {}", e))
}

fn bind(descriptor: &Path, config: &BindingConfig) -> Result<SchemaBindings, String> {
    protobind::bind_path(descriptor, config)
        .map_err(|e| format!("Failed to load descriptors from {}: {}", descriptor.display(), e))
}

/// Print every message failure and field format error to stderr
fn report_errors(bindings: &SchemaBindings) -> usize {
    for failure in &bindings.failures {
        eprintln!("  ✗ {}: {}", failure.message, failure.error);
    }
    for message in &bindings.messages {
        for error in message.format_errors() {
            eprintln!("  ✗ {}: {}", message.message, error);
        }
    }
    bindings.failures.len() + bindings.format_error_count()
}

fn resolve(
    descriptor: PathBuf,
    config: Option<PathBuf>,
    format: Option<OutputFormat>,
    output: Option<PathBuf>,
    message: Option<String>,
    strict: bool,
) -> Result<(), String> {
    let config = load_config(config)?;
    let format = format.unwrap_or(config.output.format);
    let mut bindings = bind(&descriptor, &config)?;
    if let Some(name) = &message {
        bindings.retain_message(name);
        if bindings.messages.is_empty() && bindings.failures.is_empty() {
            return Err(format!("Message not found: {}", name));
        }
    }

    let manifest = BindingManifest::from_bindings(&bindings);

    match &output {
        Some(path) => {
            manifest
                .write_to(path, format)
                .map_err(|e| format!("Failed to write manifest: {}", e))?;
            println!(
                "  ✓ Wrote {} message(s) to {}",
                manifest.messages.len(),
                path.display()
            );
        }
        None => {
            let rendered = manifest
                .render(format)
                .map_err(|e| format!("Failed to render manifest: {}", e))?;
            println!("{}", rendered);
        }
    }

    let errors = report_errors(&bindings);
    if strict && errors > 0 {
        return Err(format!("{} binding error(s) reported", errors));
    }

    Ok(())
}

fn validate(descriptor: PathBuf, config: Option<PathBuf>) -> Result<(), String> {
    println!("🔍 Validating bindings in {}...", descriptor.display());

    let config = load_config(config)?;
    let bindings = bind(&descriptor, &config)?;

    let field_count: usize = bindings.messages.iter().map(|m| m.fields.len()).sum();
    println!(
        "  ✓ {} message(s), {} field(s) resolved",
        bindings.messages.len(),
        field_count
    );

    let errors = report_errors(&bindings);
    if errors > 0 {
        return Err(format!("{} binding error(s) found", errors));
    }

    println!("✅ All bindings are valid!");
    Ok(())
}

fn list_extensions(config: Option<PathBuf>) -> Result<(), String> {
    let config = load_config(config)?;
    let extensions = config.extension_set();

    for extension in Extension::ALL {
        println!(
            "{:<40} {:>10}  {}",
            extensions.option_key(extension),
            extension.number(),
            extension.scope()
        );
    }

    Ok(())
}
