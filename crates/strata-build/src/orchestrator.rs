//! The build entry point and per-output state machine.

use std::sync::Arc;

use strata_codegen::{OutputDescriptor, OutputTree, RenderContext, RenderError, Renderer};
use strata_core::{
    ResolvedPermutation, ResolverDocument, StrataError, ValidationOptions,
};
use strata_resolver::{
    load, FileCache, Preprocessor, ResolutionEngine, ResolverSource, DEFAULT_ALIAS_DEPTH,
    DEFAULT_REFERENCE_DEPTH,
};
use strata_transform::{apply_output_pipeline, Filter, PipelineError, Transform};
use thiserror::Error;
use tracing::{debug, warn};

/// Depth bounds for reference and alias chains.
#[derive(Debug, Clone, Copy)]
pub struct Limits {
    pub reference_depth: u32,
    pub alias_depth: u32,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            reference_depth: DEFAULT_REFERENCE_DEPTH,
            alias_depth: DEFAULT_ALIAS_DEPTH,
        }
    }
}

/// One configured output: a renderer plus its filters and transforms.
#[derive(Clone)]
pub struct OutputConfig {
    pub name: String,
    /// Filename template with `{<modifier>}` / `{_base}` placeholders.
    pub file: String,
    pub renderer: Arc<dyn Renderer>,
    pub filters: Vec<Arc<dyn Filter>>,
    pub transforms: Vec<Arc<dyn Transform>>,
}

impl OutputConfig {
    pub fn new(
        name: impl Into<String>,
        file: impl Into<String>,
        renderer: Arc<dyn Renderer>,
    ) -> Self {
        Self {
            name: name.into(),
            file: file.into(),
            renderer,
            filters: Vec::new(),
            transforms: Vec::new(),
        }
    }

    pub fn with_filter(mut self, filter: Arc<dyn Filter>) -> Self {
        self.filters.push(filter);
        self
    }

    pub fn with_transform(mut self, transform: Arc<dyn Transform>) -> Self {
        self.transforms.push(transform);
        self
    }
}

/// Full build configuration.
pub struct BuildConfig {
    pub resolver: ResolverSource,
    pub outputs: Vec<OutputConfig>,
    pub preprocessors: Vec<Arc<dyn Preprocessor>>,
    pub validation: ValidationOptions,
    pub limits: Limits,
}

impl BuildConfig {
    pub fn new(resolver: ResolverSource) -> Self {
        Self {
            resolver,
            outputs: Vec::new(),
            preprocessors: Vec::new(),
            validation: ValidationOptions::default(),
            limits: Limits::default(),
        }
    }

    pub fn with_output(mut self, output: OutputConfig) -> Self {
        self.outputs.push(output);
        self
    }
}

/// Errors collected during a build.
#[derive(Debug, Error)]
pub enum BuildError {
    /// Resolver loading, permutation resolution, or enumeration failure.
    #[error(transparent)]
    Pipeline(#[from] StrataError),

    /// A permutation task died.
    #[error("permutation task failed: {message}")]
    Task { message: String },

    /// An output's filter/transform stage failed.
    #[error("output '{output}': {source}")]
    Transform {
        output: String,
        #[source]
        source: PipelineError,
    },

    /// An output's renderer failed.
    #[error("output '{output}': {source}")]
    Render {
        output: String,
        #[source]
        source: RenderError,
    },
}

/// Lifecycle of one output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputState {
    Pending,
    Rendering,
    Succeeded,
    Failed,
    /// Set by the external writer once the tree is persisted.
    Written,
}

/// One output's rendered files and final state.
#[derive(Debug)]
pub struct OutputResult {
    pub name: String,
    pub state: OutputState,
    pub files: OutputTree,
}

impl OutputResult {
    /// Record that the external writer persisted this output's tree.
    pub fn mark_written(&mut self) {
        if self.state == OutputState::Succeeded {
            self.state = OutputState::Written;
        }
    }
}

/// The outcome of a build. `success` is true iff `errors` is empty; the
/// external CLI maps that to its exit code.
#[derive(Debug)]
pub struct BuildReport {
    pub success: bool,
    pub outputs: Vec<OutputResult>,
    pub errors: Vec<BuildError>,
}

/// Run a build: resolve every permutation in parallel, then render every
/// configured output.
pub async fn build(config: BuildConfig) -> BuildReport {
    // Stage 1: resolver loading. A failure here aborts everything.
    let loaded = match load(&config.resolver).await {
        Ok(loaded) => loaded,
        Err(err) => {
            return BuildReport {
                success: false,
                outputs: Vec::new(),
                errors: vec![BuildError::Pipeline(err)],
            }
        }
    };
    let resolver = Arc::new(loaded.document.clone());

    let cache = Arc::new(FileCache::new());
    let engine = Arc::new(
        ResolutionEngine::new(loaded.document, loaded.base_dir, cache)
            .with_reference_depth(config.limits.reference_depth)
            .with_alias_depth(config.limits.alias_depth),
    );

    // Stages 2-7: one task per permutation, shared file cache, private
    // visited sets. Results are collected in permutation order.
    let inputs_list = engine.permutations();
    debug!(permutations = inputs_list.len(), "resolving permutations");
    let preprocessors: Arc<[Arc<dyn Preprocessor>]> = config.preprocessors.clone().into();
    let mut handles = Vec::with_capacity(inputs_list.len());
    for inputs in inputs_list {
        let engine = engine.clone();
        let preprocessors = preprocessors.clone();
        let validation = config.validation.clone();
        handles.push(tokio::spawn(async move {
            engine
                .resolve_permutation(&inputs, &preprocessors, &validation)
                .await
        }));
    }

    let mut errors = Vec::new();
    let mut permutations = Vec::new();
    for handle in handles {
        match handle.await {
            Ok(Ok(permutation)) => permutations.push(permutation),
            Ok(Err(err)) => {
                warn!(error = %err, "permutation failed");
                errors.push(BuildError::Pipeline(err));
            }
            Err(join) => errors.push(BuildError::Task {
                message: join.to_string(),
            }),
        }
    }
    let permutations: Arc<[ResolvedPermutation]> = permutations.into();

    // Stages 8-10: each output renders on its own task; a failure marks
    // that output failed without cancelling siblings.
    let mut output_handles = Vec::with_capacity(config.outputs.len());
    for output in config.outputs {
        let permutations = permutations.clone();
        let resolver = resolver.clone();
        output_handles.push((
            output.name.clone(),
            tokio::spawn(async move { render_output(output, &permutations, &resolver) }),
        ));
    }

    let mut outputs = Vec::with_capacity(output_handles.len());
    for (name, handle) in output_handles {
        let mut result = OutputResult {
            name: name.clone(),
            state: OutputState::Rendering,
            files: OutputTree::new(),
        };
        match handle.await {
            Ok(Ok(files)) => {
                result.files = files;
                result.state = OutputState::Succeeded;
            }
            Ok(Err(err)) => {
                warn!(output = %name, error = %err, "output failed");
                result.state = OutputState::Failed;
                errors.push(err);
            }
            Err(join) => {
                result.state = OutputState::Failed;
                errors.push(BuildError::Task {
                    message: join.to_string(),
                });
            }
        }
        outputs.push(result);
    }

    BuildReport {
        success: errors.is_empty(),
        outputs,
        errors,
    }
}

/// Run one output's filters, transforms and renderer.
fn render_output(
    config: OutputConfig,
    permutations: &[ResolvedPermutation],
    resolver: &ResolverDocument,
) -> Result<OutputTree, BuildError> {
    let mut processed = Vec::with_capacity(permutations.len());
    for permutation in permutations {
        let table = apply_output_pipeline(&permutation.tokens, &config.filters, &config.transforms)
            .map_err(|source| BuildError::Transform {
                output: config.name.clone(),
                source,
            })?;
        processed.push(permutation.with_tokens(table));
    }

    let descriptor = OutputDescriptor {
        name: config.name.clone(),
        file: config.file.clone(),
    };
    let ctx = RenderContext::new(&processed, resolver, &descriptor);
    debug!(output = %config.name, renderer = config.renderer.name(), "rendering");
    config
        .renderer
        .format(&ctx)
        .map_err(|source| BuildError::Render {
            output: config.name,
            source,
        })
}
