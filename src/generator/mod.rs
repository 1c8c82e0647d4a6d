//! Project scaffolding: renders the entry-point templates into a new project.
//!
//! # Layout of a generated project
//! - `Cargo.toml`, `config.yaml`
//! - `src/main.rs` from the simple or mode-dispatch entry-point template
//! - `src/stages.rs` with the `InputValidator` and `Main` stages
//! - `src/<runner_file>.rs` with `<runner_class>` (simple entry point only)

pub mod render;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow, bail};
use heck::{ToKebabCase, ToSnakeCase};
use tracing::info;

use render::{is_identifier, unresolved_placeholders};

/// Module and crate names already in scope in a generated project.
const RESERVED_MODULES: &[&str] = &["main", "stages", "surround", "anyhow", "std", "core", "alloc"];

/// Names the entry-point and runner templates import or define.
const RESERVED_TYPES: &[&str] = &[
    "Assembler",
    "Config",
    "InputValidator",
    "Main",
    "Path",
    "PipelineData",
    "Result",
    "Runner",
    "State",
];

/// Dependency line used when no local checkout is given.
const SURROUND_VERSION: &str = "\"0.1\"";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryPoint {
    /// Hand the assembler to `runner_class`, defined in `src/<runner_file>.rs`.
    Simple {
        runner_file: String,
        runner_class: String,
    },
    /// Parse `--mode` and drive the batch runner.
    ModeDispatch,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectSpec {
    pub project_name: String,
    pub entry_point: EntryPoint,
    /// Local checkout of this crate to depend on instead of the registry release.
    pub surround_path: Option<PathBuf>,
}

impl ProjectSpec {
    /// Simple entry point. `runner_file` defaults to the snake_case form of `runner_class`.
    pub fn simple(project_name: &str, runner_class: &str, runner_file: Option<&str>) -> Self {
        let runner_file = runner_file
            .map(str::to_string)
            .unwrap_or_else(|| runner_class.to_snake_case());
        Self {
            project_name: project_name.to_string(),
            entry_point: EntryPoint::Simple {
                runner_file,
                runner_class: runner_class.to_string(),
            },
            surround_path: None,
        }
    }

    pub fn mode_dispatch(project_name: &str) -> Self {
        Self {
            project_name: project_name.to_string(),
            entry_point: EntryPoint::ModeDispatch,
            surround_path: None,
        }
    }

    pub fn with_surround_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.surround_path = Some(path.into());
        self
    }

    /// Cargo package name, the kebab-case form of the project name.
    pub fn crate_name(&self) -> String {
        self.project_name.to_kebab_case()
    }

    pub fn validate(&self) -> Result<()> {
        let name = self.project_name.trim();
        if name.is_empty() {
            bail!("project name must not be empty");
        }
        if self
            .project_name
            .chars()
            .any(|c| c == '"' || c == '\\' || c.is_control())
        {
            bail!(
                "project name {:?} may not contain quotes, backslashes or control characters",
                self.project_name
            );
        }
        let crate_name = self.crate_name();
        if !crate_name.starts_with(|c: char| c.is_ascii_alphabetic()) {
            bail!(
                "project name {:?} must start with a letter (crate name would be {:?})",
                self.project_name,
                crate_name
            );
        }

        if let EntryPoint::Simple {
            runner_file,
            runner_class,
        } = &self.entry_point
        {
            if !is_identifier(runner_class) {
                bail!("runner class {runner_class:?} is not a valid Rust identifier");
            }
            if !is_identifier(runner_file) {
                bail!("runner file {runner_file:?} is not a valid Rust module name");
            }
            if RESERVED_TYPES.contains(&runner_class.as_str()) {
                bail!("runner class {runner_class:?} clashes with a name the generated code imports");
            }
            if RESERVED_MODULES.contains(&runner_file.as_str()) {
                bail!("runner file {runner_file:?} clashes with a module or crate in scope");
            }
        }

        if let Some(path) = &self.surround_path {
            let text = path.to_str().ok_or_else(|| {
                anyhow!("surround path {} is not valid UTF-8", path.display())
            })?;
            if text.contains('\'') || text.chars().any(char::is_control) {
                bail!("surround path {text:?} may not contain quotes or control characters");
            }
        }
        Ok(())
    }

    /// Right-hand side of the `surround` line in the generated `Cargo.toml`.
    fn surround_dep(&self) -> String {
        match &self.surround_path {
            Some(path) => format!("{{ path = '{}' }}", path.display()),
            None => SURROUND_VERSION.to_string(),
        }
    }

    fn values(&self) -> Vec<(&'static str, String)> {
        let mut values = vec![
            ("project_name", self.project_name.clone()),
            ("crate_name", self.crate_name()),
            ("surround_dep", self.surround_dep()),
        ];
        if let EntryPoint::Simple {
            runner_file,
            runner_class,
        } = &self.entry_point
        {
            values.push(("runner_file", runner_file.clone()));
            values.push(("runner_class", runner_class.clone()));
        }
        values
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    /// Path relative to the project directory.
    pub path: PathBuf,
    pub contents: String,
}

#[derive(Debug, Clone)]
pub struct GenerationResult {
    pub project_dir: PathBuf,
    pub files: Vec<GeneratedFile>,
    /// False for dry runs.
    pub written: bool,
}

/// Render every file of the project in memory.
pub fn render_project(spec: &ProjectSpec) -> Result<Vec<GeneratedFile>> {
    spec.validate()?;
    let owned = spec.values();
    let values: Vec<(&str, &str)> = owned.iter().map(|(k, v)| (*k, v.as_str())).collect();

    let mut plan = vec![
        (PathBuf::from("Cargo.toml"), render::CARGO_TOML),
        (PathBuf::from("config.yaml"), render::CONFIG_YAML),
        (PathBuf::from("src/stages.rs"), render::STAGES),
    ];
    match &spec.entry_point {
        EntryPoint::Simple { runner_file, .. } => {
            plan.push((PathBuf::from("src/main.rs"), render::MAIN_SIMPLE));
            plan.push((
                PathBuf::from(format!("src/{runner_file}.rs")),
                render::RUNNER,
            ));
        }
        EntryPoint::ModeDispatch => {
            plan.push((PathBuf::from("src/main.rs"), render::MAIN_MODE_DISPATCH));
        }
    }

    plan.into_iter()
        .map(|(path, template)| {
            let contents = render::render(template, &values);
            let missing = unresolved_placeholders(&contents);
            if !missing.is_empty() {
                return Err(anyhow!(
                    "template for {} left placeholders unresolved: {}",
                    path.display(),
                    missing.join(", ")
                ));
            }
            Ok(GeneratedFile { path, contents })
        })
        .collect()
}

/// Render the project and write it to `output/<crate_name>`.
///
/// Refuses to write into an existing non-empty directory. With `dry_run`
/// nothing is written.
pub fn generate_project(spec: &ProjectSpec, output: &Path, dry_run: bool) -> Result<GenerationResult> {
    let files = render_project(spec)?;
    let project_dir = output.join(spec.crate_name());

    if project_dir.exists() {
        let occupied = fs::read_dir(&project_dir)
            .with_context(|| format!("failed to read {}", project_dir.display()))?
            .next()
            .is_some();
        if occupied {
            bail!("directory {} already exists and is not empty", project_dir.display());
        }
    }

    if dry_run {
        for file in &files {
            info!(path = %project_dir.join(&file.path).display(), bytes = file.contents.len(), "dry-run: would write");
        }
        return Ok(GenerationResult {
            project_dir,
            files,
            written: false,
        });
    }

    for file in &files {
        let target = project_dir.join(&file.path);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        fs::write(&target, &file.contents)
            .with_context(|| format!("failed to write {}", target.display()))?;
    }
    info!(path = %project_dir.display(), files = files.len(), "generated project");

    Ok(GenerationResult {
        project_dir,
        files,
        written: true,
    })
}
