//! rowgen - table-driven header/source generation

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use rowgen::config::{DiagnosticFormat, GenConfig, JoinConfig, RenderConfig};
use rowgen::output::render_to_stderr;
use rowgen::{gen, join, render};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliDiagnosticFormat {
    Terminal,
    Json,
}

impl From<CliDiagnosticFormat> for DiagnosticFormat {
    fn from(f: CliDiagnosticFormat) -> Self {
        match f {
            CliDiagnosticFormat::Terminal => DiagnosticFormat::Terminal,
            CliDiagnosticFormat::Json => DiagnosticFormat::Json,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LineMode {
    /// Precede each block with a #line directive
    #[value(alias = "add_line")]
    AddLine,
    /// Emit blocks only
    #[value(alias = "no_line")]
    NoLine,
}

/// Table-driven header/source generator
#[derive(Parser, Debug)]
#[command(name = "rowgen")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Diagnostic output format
    #[arg(long, value_enum, default_value = "terminal", global = true)]
    format: CliDiagnosticFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Expand table documents into a header and a source file
    Gen {
        /// Source file to write
        source: PathBuf,

        /// Header file to write
        header: PathBuf,

        /// Documents with `tables` and `gen` sections
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Start the source file with an include of the header
        #[arg(long)]
        include_header: bool,

        /// Write outputs even when errors were reported
        #[arg(long)]
        keep_on_error: bool,
    },

    /// Concatenate the named pattern from every input
    Join {
        /// File to write
        output: PathBuf,

        /// Name of the pattern to collect
        pattern: String,

        /// Whether to emit #line directives
        #[arg(value_enum)]
        line_mode: LineMode,

        /// Documents with `pattern` elements
        #[arg(required = true)]
        inputs: Vec<PathBuf>,
    },

    /// Render a text template with JSON data
    Render {
        /// Template file
        template: PathBuf,

        /// JSON data file (root must be an object)
        data: PathBuf,

        /// File to write
        output: PathBuf,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    match run() {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1), // Errors were reported
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(2)
        }
    }
}

fn run() -> Result<bool> {
    let cli = Cli::parse();
    let format: DiagnosticFormat = cli.format.into();

    match cli.command {
        Command::Gen {
            source,
            header,
            inputs,
            include_header,
            keep_on_error,
        } => {
            let config = GenConfig::new(source, header)
                .with_inputs(inputs)
                .with_diagnostic_format(format)
                .with_include_header(include_header)
                .with_keep_on_error(keep_on_error);
            run_gen(&config)
        }
        Command::Join {
            output,
            pattern,
            line_mode,
            inputs,
        } => {
            let config = JoinConfig::new(output, pattern)
                .with_line_directives(line_mode == LineMode::AddLine)
                .with_inputs(inputs)
                .with_diagnostic_format(format);
            run_join(&config)
        }
        Command::Render {
            template,
            data,
            output,
        } => {
            let config = RenderConfig::new(template, data, output).with_diagnostic_format(format);
            run_render(&config)
        }
    }
}

fn run_gen(config: &GenConfig) -> Result<bool> {
    info!(inputs = config.inputs.len(), "Generating");
    let generated = gen::generate_files(config);
    render_to_stderr(&generated.diagnostics, config.diagnostic_format)?;

    if generated.success() || config.keep_on_error {
        gen::write_outputs(config, &generated)?;
    } else {
        warn!("Errors reported, outputs not written");
    }

    Ok(generated.success())
}

fn run_join(config: &JoinConfig) -> Result<bool> {
    let joined = join::join_files(config);
    render_to_stderr(&joined.diagnostics, config.diagnostic_format)?;

    if joined.success() {
        join::write_output(config, &joined)?;
    } else {
        warn!("Errors reported, output not written");
    }

    Ok(joined.success())
}

fn run_render(config: &RenderConfig) -> Result<bool> {
    let rendered = render::render_files(config)?;
    render_to_stderr(&rendered.diagnostics, config.diagnostic_format)?;
    render::write_output(config, &rendered)?;

    Ok(rendered.diagnostics.is_success())
}
