//! The Basil translator CLI.
//!
//! Provides the `basilc` command with the following subcommands:
//!
//! - `basilc translate <dir>` - Translate every VBA module of a project to
//!   VB.NET, write the results and optionally compile them
//! - `basilc check <dir>` - Parse every module and report syntax errors
//!
//! Options:
//! - `--out` - Output directory (default `<dir>/out`)
//! - `--config` - Config file (default `<dir>/basil.toml` when present)
//! - `--runtime` - Runtime-support source to ship instead of the built-in one
//! - `--no-compile` - Skip the compiler even when one is configured
//! - `--json` - Output syntax errors as JSON (one object per line)
//! - `--no-color` - Disable colorized output
//! - `-v` / `-q` - More or less logging

mod compiler;
mod config;
mod discovery;
mod report;

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::process;
use std::time::Instant;

use basil_rewrite::{ModuleSource, Translation};
use clap::{Args, Parser, Subcommand};
use tracing::Level;

use crate::compiler::{CommandCompiler, Compiler};
use crate::config::Config;
use crate::report::ReportOptions;

/// Runtime-support module shipped with every translation.
const DEFAULT_RUNTIME: &str = include_str!("../runtime/Runtime.vb");
const RUNTIME_FILE: &str = "Runtime.vb";
const TRANSPILED_DIR: &str = "transpiled_files";
const COMPILATION_DIR: &str = "compilation";

#[derive(Parser)]
#[command(name = "basilc", version, about = "Translate VBA projects to VB.NET")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log progress of every file
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Only log warnings and errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Translate a VBA project to VB.NET
    Translate {
        #[command(flatten)]
        project: ProjectArgs,

        /// Output directory (default: <dir>/out)
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Runtime-support source file to ship with the output
        #[arg(long)]
        runtime: Option<PathBuf>,

        /// Do not run the configured compiler
        #[arg(long = "no-compile")]
        no_compile: bool,
    },
    /// Parse every module and report syntax errors
    Check {
        #[command(flatten)]
        project: ProjectArgs,
    },
}

#[derive(Args)]
struct ProjectArgs {
    /// Project directory holding the VBA modules
    dir: PathBuf,

    /// Config file (default: <dir>/basil.toml when present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output syntax errors as JSON (one object per line)
    #[arg(long)]
    json: bool,

    /// Disable colorized output
    #[arg(long = "no-color")]
    no_color: bool,
}

impl ProjectArgs {
    fn report_options(&self) -> ReportOptions {
        ReportOptions {
            color: !self.no_color && !self.json,
            json: self.json,
        }
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    let started = Instant::now();
    let result = match &cli.command {
        Commands::Translate {
            project,
            out,
            runtime,
            no_compile,
        } => translate(project, out.as_deref(), runtime.as_deref(), *no_compile),
        Commands::Check { project } => check(project),
    };
    tracing::info!(elapsed = ?started.elapsed(), "done");

    if let Err(e) = result {
        eprintln!("error: {}", e);
        process::exit(1);
    }
}

fn init_logging(verbose: bool, quiet: bool) {
    let level = if verbose {
        Level::DEBUG
    } else if quiet {
        Level::WARN
    } else {
        Level::INFO
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(level)
        .with_target(false)
        .init();
}

/// Discovered modules of a project, with paths relative to the project dir.
struct Project {
    dir: PathBuf,
    config: Config,
    sources: Vec<ModuleSource>,
}

fn load_project(args: &ProjectArgs) -> Result<Project, String> {
    let dir = &args.dir;
    if !dir.is_dir() {
        return Err(format!("Project directory '{}' does not exist", dir.display()));
    }
    let config = Config::load(dir, args.config.as_deref())?;
    let files = discovery::discover_modules(dir, &config.project.extensions)?;
    if files.is_empty() {
        return Err(format!(
            "No modules with extension {} found in '{}'",
            config.project.extensions.join("/"),
            dir.display()
        ));
    }

    let mut sources = Vec::with_capacity(files.len());
    for file in files {
        let text = discovery::read_module(&dir.join(&file))?;
        sources.push(ModuleSource::new(file, text));
    }
    tracing::info!(modules = sources.len(), dir = %dir.display(), "discovered");
    Ok(Project {
        dir: dir.clone(),
        config,
        sources,
    })
}

/// Print syntax errors to stderr. Returns an error if there were any.
fn report_syntax_errors(
    errors: &[basil_rewrite::SyntaxError],
    sources: &[ModuleSource],
    options: ReportOptions,
) -> Result<(), String> {
    let texts: HashMap<String, &str> = sources
        .iter()
        .map(|s| (s.path.display().to_string(), s.text.as_str()))
        .collect();
    eprint!(
        "{}",
        report::render_errors(errors, |file| texts.get(file).copied(), options)
    );
    match report::summary(errors) {
        Some(summary) => Err(summary),
        None => Ok(()),
    }
}

fn check(args: &ProjectArgs) -> Result<(), String> {
    let project = load_project(args)?;
    let errors = basil_rewrite::check(&project.sources);
    report_syntax_errors(&errors, &project.sources, args.report_options())
}

/// Discover -> Pass 1 -> registry -> Pass 2 -> write -> compile.
fn translate(
    args: &ProjectArgs,
    out: Option<&Path>,
    runtime: Option<&Path>,
    no_compile: bool,
) -> Result<(), String> {
    let project = load_project(args)?;
    let options = project.config.translate_options();
    let translation =
        basil_rewrite::translate(&project.sources, &options).map_err(|e| e.to_string())?;

    let out_dir = match (out, &project.config.project.output) {
        (Some(out), _) => out.to_path_buf(),
        (None, Some(configured)) => project.dir.join(configured),
        (None, None) => project.dir.join("out"),
    };
    let runtime = match (runtime, &project.config.translate.runtime) {
        (Some(path), _) => Some(path.to_path_buf()),
        (None, Some(configured)) => Some(project.dir.join(configured)),
        (None, None) => None,
    };
    let written = write_output(&translation, &out_dir, runtime.as_deref())?;

    let syntax =
        report_syntax_errors(&translation.errors, &project.sources, args.report_options());

    let program_name = translation
        .program_name()
        .unwrap_or(&project.config.project.name)
        .to_string();
    tracing::info!(program = %program_name, out = %out_dir.display(), "translated");

    // Modules with syntax errors are still compiled so the compiler's view
    // of them lands in errors.txt.
    let compiled = match &project.config.compiler {
        Some(compiler) if !no_compile => {
            let compiler = CommandCompiler::new(compiler.clone());
            compile(&compiler, &written, &out_dir, &program_name)
        }
        _ => Ok(()),
    };
    syntax.and(compiled)
}

/// Write every translated module plus the runtime file. Returns the paths
/// written.
fn write_output(
    translation: &Translation,
    out_dir: &Path,
    runtime: Option<&Path>,
) -> Result<Vec<PathBuf>, String> {
    let target = out_dir.join(TRANSPILED_DIR);
    if target.exists() {
        std::fs::remove_dir_all(&target)
            .map_err(|e| format!("Failed to clear '{}': {}", target.display(), e))?;
    }
    std::fs::create_dir_all(&target)
        .map_err(|e| format!("Failed to create '{}': {}", target.display(), e))?;

    let mut written = Vec::with_capacity(translation.modules.len() + 1);
    let mut taken: HashMap<String, usize> = HashMap::new();
    for module in &translation.modules {
        let mut name = module.output_name();
        let seen = taken.entry(name.to_ascii_lowercase()).or_insert(0);
        *seen += 1;
        if *seen > 1 {
            let stem = name.trim_end_matches(".vb").to_string();
            tracing::warn!(file = %module.path.display(), "output name {name} already used");
            name = format!("{stem}_{}.vb", *seen - 1);
        }
        let path = target.join(&name);
        std::fs::write(&path, &module.text)
            .map_err(|e| format!("Failed to write '{}': {}", path.display(), e))?;
        tracing::debug!(file = %path.display(), "written");
        written.push(path);
    }

    let runtime_text = match runtime {
        Some(path) => std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read runtime '{}': {}", path.display(), e))?,
        None => DEFAULT_RUNTIME.to_string(),
    };
    let runtime_path = target.join(RUNTIME_FILE);
    std::fs::write(&runtime_path, runtime_text)
        .map_err(|e| format!("Failed to write '{}': {}", runtime_path.display(), e))?;
    written.push(runtime_path);
    Ok(written)
}

fn compile(
    compiler: &dyn Compiler,
    files: &[PathBuf],
    out_dir: &Path,
    program_name: &str,
) -> Result<(), String> {
    let dir = out_dir.join(COMPILATION_DIR);
    std::fs::create_dir_all(&dir)
        .map_err(|e| format!("Failed to create '{}': {}", dir.display(), e))?;
    let artifact = dir.join(format!("{program_name}.exe"));

    let report = compiler.compile(files, &artifact)?;
    if report.success {
        tracing::info!(artifact = %artifact.display(), "compiled");
        return Ok(());
    }

    for diagnostic in report.errors() {
        eprintln!("{diagnostic}");
    }
    compiler::write_errors(&report, &dir.join("errors.txt"))?;
    Err(format!(
        "Compilation failed with {} error(s), see {}",
        report.errors().count(),
        dir.join("errors.txt").display()
    ))
}
