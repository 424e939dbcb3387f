//! Build pipeline.
//!
//! A run is four explicit stages, each consuming the previous stage's output:
//!
//! 1. reset the staging tree
//! 2. resolve every resource spec
//! 3. package every resolved resource
//! 4. compile with the flattened list of artifact identifiers
//!
//! Tools are located before the staging tree is touched, so a missing tool
//! leaves the previous build output in place.

mod types;

use tracing::info;

use crate::compile::{compile, compiler_command};
use crate::config::BuildConfig;
use crate::consts::TOKEN_WIDTH;
use crate::execute::{OutputMode, find_tool};
use crate::naming::{ArtifactId, NameAllocator};
use crate::package::{PackageOutcome, Packager};
use crate::resource::{resolve_all, select_secondary};
use crate::staging;

pub use types::{BuildError, BuildReport, Plan, PlannedResource, PlannedSpec, PlannedTool, SpecReport};

/// Run a full build with identifiers drawn from fresh entropy.
///
/// `compiler_output` decides whether the compiler's diagnostics are captured
/// into the report or streamed as it runs.
pub async fn build(config: &BuildConfig, compiler_output: OutputMode) -> Result<BuildReport, BuildError> {
  build_with(config, NameAllocator::from_entropy(), compiler_output).await
}

/// Run a full build using `names` for artifact identifiers.
pub async fn build_with(
  config: &BuildConfig,
  names: NameAllocator,
  compiler_output: OutputMode,
) -> Result<BuildReport, BuildError> {
  let packager_path = find_tool(&config.tools.packager).map_err(BuildError::Tool)?;
  let compiler_path = find_tool(&config.tools.compiler).map_err(BuildError::Tool)?;

  let tree = config.staging();
  tree.reset()?;

  let resolved = resolve_all(&config.resources)?;
  info!(
    specs = resolved.len(),
    resources = resolved.iter().map(|(_, r)| r.len()).sum::<usize>(),
    "resolved resources"
  );

  let mut packager = Packager::new(&tree, packager_path, names)
    .with_timeout(config.tools.timeout)
    .with_policy(config.packaging.on_failure);

  let mut specs = Vec::with_capacity(resolved.len());
  for (spec, resources) in resolved {
    let mut outcomes = Vec::with_capacity(resources.len());
    for resource in &resources {
      outcomes.push(packager.package(resource).await?);
    }
    specs.push(SpecReport {
      spec: spec.to_string(),
      outcomes,
    });
  }

  let ids = flatten_ids(&specs);
  info!(artifacts = ids.len(), "packaging complete");

  let cmd = compiler_command(config, &tree, compiler_path, &ids);
  let compiler = compile(&cmd, config.tools.timeout, compiler_output).await.map_err(BuildError::Compile)?;

  Ok(BuildReport {
    staging_dir: tree.root().to_path_buf(),
    output: tree.output_path(&config.output),
    specs,
    compiler,
  })
}

/// Describe what [`build`] would do without touching the staging tree or
/// running any tool.
pub fn plan(config: &BuildConfig) -> Result<Plan, BuildError> {
  let tree = config.staging();
  let arch = tree.arch();
  let resolved = resolve_all(&config.resources)?;

  let placeholders: Vec<ArtifactId> = resolved
    .iter()
    .flat_map(|(_, resources)| resources)
    .map(|r| ArtifactId(format!("{}{}", "#".repeat(TOKEN_WIDTH), r.base_name())))
    .collect();

  let specs = resolved
    .into_iter()
    .map(|(spec, resources)| PlannedSpec {
      spec: spec.to_string(),
      resources: resources
        .iter()
        .map(|r| PlannedResource {
          source: r.path.clone(),
          secondary_source: select_secondary(r, arch),
        })
        .collect(),
    })
    .collect();

  let compiler = planned_tool(&config.tools.compiler);
  let program = compiler.path.clone().unwrap_or_else(|| compiler.program.clone().into());

  Ok(Plan {
    staging_dir: tree.root().to_path_buf(),
    secondary_arch: arch,
    packager: planned_tool(&config.tools.packager),
    compiler_command: compiler_command(config, &tree, program, &placeholders),
    compiler,
    specs,
  })
}

/// Remove the staging directory. Returns whether it existed.
pub fn clean(config: &BuildConfig) -> Result<bool, BuildError> {
  Ok(staging::remove(&config.staging_dir)?)
}

fn flatten_ids(specs: &[SpecReport]) -> Vec<ArtifactId> {
  specs
    .iter()
    .flat_map(|s| &s.outcomes)
    .filter_map(|o| match o {
      PackageOutcome::Packaged(artifact) => Some(artifact.id.clone()),
      PackageOutcome::Skipped(_) => None,
    })
    .collect()
}

fn planned_tool(program: &str) -> PlannedTool {
  PlannedTool {
    program: program.to_string(),
    path: find_tool(program).ok(),
  }
}
