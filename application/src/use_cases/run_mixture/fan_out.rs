//! Layer fan-out with bounded concurrency.
//!
//! Every agent in a layer is spawned onto its own task. An optional
//! semaphore caps how many are in flight, each call gets its own child
//! context (bounded by the per-call timeout), and the coordinator waits for
//! all of them before looking at any result.

use super::types::{Layer, MixtureError};
use crate::context::CallContext;
use crate::ports::backend::{Backend, BackendError};
use crate::ports::progress::MixtureProgress;
use moa_domain::{AgentPosition, Stage};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, warn};

/// Concurrency and deadline settings for one fan-out
#[derive(Debug, Clone, Copy)]
pub(super) struct FanOutLimits {
    pub max_parallel: Option<usize>,
    pub call_timeout: Option<Duration>,
}

/// Run every agent of `layer` on `input` and return their outputs in agent order.
///
/// Siblings are never cancelled early: a failing agent only fails the layer
/// after every other agent has finished or timed out. The reported error is
/// the one at the lowest agent index, whatever order the failures arrived in.
pub(super) async fn fan_out(
    ctx: &CallContext,
    iteration: usize,
    layer_index: usize,
    layer: &Layer,
    input: &str,
    limits: FanOutLimits,
    progress: &dyn MixtureProgress,
) -> Result<Vec<String>, MixtureError> {
    let stage = Stage::Layer {
        iteration,
        layer: layer_index,
    };
    progress.on_layer_start(stage, layer.len());

    let input: Arc<str> = Arc::from(input);
    let admission = limits.max_parallel.map(|n| Arc::new(Semaphore::new(n)));

    let mut join_set = JoinSet::new();
    for (index, agent) in layer.agents().iter().enumerate() {
        let agent = Arc::clone(agent);
        let input = Arc::clone(&input);
        let ctx = ctx.clone();
        let admission = admission.clone();
        let call_timeout = limits.call_timeout;

        join_set.spawn(async move {
            let result = call_agent(agent.as_ref(), &ctx, &input, admission, call_timeout).await;
            (index, result)
        });
    }

    // One slot per agent, written once by the coordinator as tasks finish
    let mut slots: Vec<Option<Result<String, BackendError>>> = vec![None; layer.len()];

    while let Some(joined) = join_set.join_next().await {
        match joined {
            Ok((index, result)) => {
                let position = AgentPosition::new(iteration, layer_index, index);
                let agent = layer.agents()[index].name();
                match &result {
                    Ok(output) => debug!("{} ({}) returned {} bytes", position, agent, output.len()),
                    Err(e) => warn!("{} ({}) failed: {}", position, agent, e),
                }
                progress.on_agent_complete(position, agent, result.is_ok());
                slots[index] = Some(result);
            }
            Err(e) => {
                // The slot stays empty and is reported below
                warn!("Agent task in {} did not complete: {}", stage, e);
            }
        }
    }

    let mut outputs = Vec::with_capacity(slots.len());
    let mut failure = None;
    for (index, slot) in slots.into_iter().enumerate() {
        let result = slot.unwrap_or_else(|| {
            let position = AgentPosition::new(iteration, layer_index, index);
            progress.on_agent_complete(position, layer.agents()[index].name(), false);
            Err(BackendError::Other("agent task panicked".to_string()))
        });
        match result {
            Ok(output) => outputs.push(output),
            Err(source) if failure.is_none() => {
                failure = Some(MixtureError::Layer {
                    position: AgentPosition::new(iteration, layer_index, index),
                    agent: layer.agents()[index].name().to_string(),
                    source,
                });
            }
            Err(_) => {}
        }
    }

    progress.on_layer_complete(stage, failure.is_none());
    match failure {
        Some(err) => Err(err),
        None => Ok(outputs),
    }
}

/// One agent call: wait for admission, then run under a per-call child context.
///
/// The permit and the child context are both released when this returns,
/// on success, failure, timeout or cancellation alike.
async fn call_agent(
    agent: &dyn Backend,
    ctx: &CallContext,
    input: &str,
    admission: Option<Arc<Semaphore>>,
    call_timeout: Option<Duration>,
) -> Result<String, BackendError> {
    let _permit = match admission {
        Some(semaphore) => Some(tokio::select! {
            biased;
            reason = ctx.done() => return Err(reason.into()),
            permit = semaphore.acquire_owned() => permit
                .map_err(|_| BackendError::Other("admission closed".to_string()))?,
        }),
        None => None,
    };

    let call_ctx = match call_timeout {
        Some(timeout) => ctx.child_with_timeout(timeout),
        None => ctx.child(),
    };
    // Cancel the call's own scope once we stop waiting for it
    let _scope = call_ctx.token().clone().drop_guard();

    call_ctx.run(agent.generate(&call_ctx, input)).await
}
