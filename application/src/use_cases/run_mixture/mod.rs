//! Run Mixture use case
//!
//! Orchestrates the Mixture of Agents flow:
//!
//! ```text
//! for each iteration (sequential):
//!     input = prompt
//!     for each layer (sequential):
//!         input = combine(fan_out(layer, input))
//!     iteration_outputs.push(input)
//! aggregator(aggregation_prompt(combine(iteration_outputs)))
//! ```
//!
//! The only parallelism is across the agents of a single layer.

mod fan_out;
mod types;

pub use types::{BackendRole, Layer, MixtureError};

use crate::context::CallContext;
use crate::ports::backend::Backend;
use crate::ports::backend_factory::BackendFactory;
use crate::ports::progress::{MixtureProgress, NoProgress};
use fan_out::{FanOutLimits, fan_out};
use moa_domain::{BackendSpec, MixtureConfig, PromptTemplate, combine_results};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// A Mixture of Agents: layers of concurrent agents plus one aggregator.
///
/// Built once and immutable afterwards. `generate` only allocates per-call
/// state, so one instance can serve many concurrent callers.
pub struct MixtureOfAgents {
    config: MixtureConfig,
    layers: Vec<Layer>,
    aggregator: Arc<dyn Backend>,
}

impl MixtureOfAgents {
    /// Build every backend through `factory`.
    ///
    /// The shape is validated before anything is constructed. Construction
    /// then proceeds layer by layer and stops at the first backend that
    /// cannot be built; the aggregator is built last.
    pub fn build(
        config: MixtureConfig,
        layer_specs: &[Vec<BackendSpec>],
        aggregator_spec: &BackendSpec,
        factory: &dyn BackendFactory,
    ) -> Result<Self, MixtureError> {
        let counts: Vec<usize> = layer_specs.iter().map(Vec::len).collect();
        config.validate(&counts)?;

        let mut layers = Vec::with_capacity(layer_specs.len());
        for (layer, specs) in layer_specs.iter().enumerate() {
            let mut agents = Vec::with_capacity(specs.len());
            for (agent, spec) in specs.iter().enumerate() {
                let backend = factory.create(spec).map_err(|source| {
                    MixtureError::BackendConstruction {
                        role: BackendRole::Agent { layer, agent },
                        spec: spec.to_string(),
                        source,
                    }
                })?;
                debug!("Constructed layer {} agent {}: {}", layer, agent, spec);
                agents.push(backend);
            }
            layers.push(Layer::new(agents));
        }

        let aggregator = factory.create(aggregator_spec).map_err(|source| {
            MixtureError::BackendConstruction {
                role: BackendRole::Aggregator,
                spec: aggregator_spec.to_string(),
                source,
            }
        })?;

        Self::assemble(config, layers, aggregator)
    }

    /// Assemble a mixture from already constructed backends
    pub fn from_backends(
        config: MixtureConfig,
        layers: Vec<Vec<Arc<dyn Backend>>>,
        aggregator: Arc<dyn Backend>,
    ) -> Result<Self, MixtureError> {
        let counts: Vec<usize> = layers.iter().map(Vec::len).collect();
        config.validate(&counts)?;
        Self::assemble(
            config,
            layers.into_iter().map(Layer::new).collect(),
            aggregator,
        )
    }

    fn assemble(
        config: MixtureConfig,
        layers: Vec<Layer>,
        aggregator: Arc<dyn Backend>,
    ) -> Result<Self, MixtureError> {
        info!(
            "Mixture ready: {} layer(s), {} iteration(s), aggregator {}",
            layers.len(),
            config.iterations,
            aggregator.name()
        );
        Ok(Self {
            config,
            layers,
            aggregator,
        })
    }

    pub fn config(&self) -> &MixtureConfig {
        &self.config
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn aggregator_name(&self) -> &str {
        self.aggregator.name()
    }

    /// Run the mixture with default (no-op) progress
    pub async fn generate(&self, ctx: &CallContext, prompt: &str) -> Result<String, MixtureError> {
        self.generate_with_progress(ctx, prompt, &NoProgress).await
    }

    /// Run the mixture with progress callbacks.
    ///
    /// Any layer or aggregation failure aborts the whole run; no partial
    /// output is returned.
    pub async fn generate_with_progress(
        &self,
        ctx: &CallContext,
        prompt: &str,
        progress: &dyn MixtureProgress,
    ) -> Result<String, MixtureError> {
        let iterations = self.config.iterations;
        let limits = FanOutLimits {
            max_parallel: self.config.parallel_limit(),
            call_timeout: self.config.call_timeout(),
        };

        let mut iteration_outputs = Vec::new();
        for iteration in 0..iterations {
            info!("Iteration {}/{}", iteration + 1, iterations);
            progress.on_iteration_start(iteration, iterations);

            let mut layer_input = prompt.to_string();
            for (index, layer) in self.layers.iter().enumerate() {
                let outputs = fan_out(
                    ctx,
                    iteration,
                    index,
                    layer,
                    &layer_input,
                    limits,
                    progress,
                )
                .await?;
                layer_input = combine_results(&outputs);
            }
            iteration_outputs.push(layer_input);
        }

        self.aggregate(ctx, &iteration_outputs, progress).await
    }

    async fn aggregate(
        &self,
        ctx: &CallContext,
        iteration_outputs: &[String],
        progress: &dyn MixtureProgress,
    ) -> Result<String, MixtureError> {
        info!(
            "Aggregating {} iteration output(s) with {}",
            iteration_outputs.len(),
            self.aggregator.name()
        );
        progress.on_aggregation_start(self.aggregator.name());

        let prompt = PromptTemplate::aggregation_prompt_for(iteration_outputs);
        let result = ctx.run(self.aggregator.generate(ctx, &prompt)).await;

        progress.on_aggregation_complete(result.is_ok());
        result.map_err(|source| {
            warn!("Aggregator {} failed: {}", self.aggregator.name(), source);
            MixtureError::Aggregation {
                aggregator: self.aggregator.name().to_string(),
                source,
            }
        })
    }
}
