//! Progress reporting for mixture runs

use colored::Colorize;
use indicatif::{MultiProgress, ProgressBar, ProgressDrawTarget, ProgressStyle};
use moa_application::MixtureProgress;
use moa_domain::{AgentPosition, Stage};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Reports progress during a mixture run with one bar per layer
pub struct ProgressReporter {
    multi: MultiProgress,
    layer_bar: Mutex<Option<ProgressBar>>,
    aggregation_spinner: Mutex<Option<ProgressBar>>,
    total_iterations: AtomicUsize,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self::with_draw_target(ProgressDrawTarget::stderr())
    }

    pub fn with_draw_target(target: ProgressDrawTarget) -> Self {
        Self {
            multi: MultiProgress::with_draw_target(target),
            layer_bar: Mutex::new(None),
            aggregation_spinner: Mutex::new(None),
            total_iterations: AtomicUsize::new(1),
        }
    }

    fn layer_style() -> ProgressStyle {
        ProgressStyle::default_bar()
            .template("{spinner:.green} {prefix:.bold.cyan} [{bar:30.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-")
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {prefix:.bold} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }

    /// "Iteration 1/2 · Layer 1" (1-based for display)
    fn stage_label(stage: Stage, total_iterations: usize) -> String {
        match stage {
            Stage::Layer { iteration, layer } => format!(
                "Iteration {}/{} · Layer {}",
                iteration + 1,
                total_iterations,
                layer + 1
            ),
            Stage::Aggregation => "Aggregation".to_string(),
        }
    }

    fn lock_bar(slot: &Mutex<Option<ProgressBar>>) -> std::sync::MutexGuard<'_, Option<ProgressBar>> {
        slot.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl MixtureProgress for ProgressReporter {
    fn on_iteration_start(&self, _iteration: usize, total: usize) {
        self.total_iterations.store(total, Ordering::Relaxed);
    }

    fn on_layer_start(&self, stage: Stage, agents: usize) {
        let pb = self.multi.add(ProgressBar::new(agents as u64));
        pb.set_style(Self::layer_style());
        pb.set_prefix(Self::stage_label(
            stage,
            self.total_iterations.load(Ordering::Relaxed),
        ));
        pb.set_message("Starting...");
        pb.enable_steady_tick(Duration::from_millis(120));

        *Self::lock_bar(&self.layer_bar) = Some(pb);
    }

    fn on_agent_complete(&self, _position: AgentPosition, agent: &str, success: bool) {
        if let Some(pb) = Self::lock_bar(&self.layer_bar).as_ref() {
            let status = if success {
                format!("{} {}", "v".green(), agent)
            } else {
                format!("{} {}", "x".red(), agent)
            };
            pb.set_message(status);
            pb.inc(1);
        }
    }

    fn on_layer_complete(&self, _stage: Stage, success: bool) {
        if let Some(pb) = Self::lock_bar(&self.layer_bar).take() {
            if success {
                pb.finish_with_message(format!("{}", "done".green()));
            } else {
                pb.abandon_with_message(format!("{}", "failed".red()));
            }
        }
    }

    fn on_aggregation_start(&self, aggregator: &str) {
        let pb = self.multi.add(ProgressBar::new_spinner());
        pb.set_style(Self::spinner_style());
        pb.set_prefix("Aggregation");
        pb.set_message(aggregator.to_string());
        pb.enable_steady_tick(Duration::from_millis(120));

        *Self::lock_bar(&self.aggregation_spinner) = Some(pb);
    }

    fn on_aggregation_complete(&self, success: bool) {
        if let Some(pb) = Self::lock_bar(&self.aggregation_spinner).take() {
            if success {
                pb.finish_with_message(format!("{}", "done".green()));
            } else {
                pb.abandon_with_message(format!("{}", "failed".red()));
            }
        }
    }
}

/// Simple line-based progress on stderr (no fancy UI)
pub struct SimpleProgress;

impl MixtureProgress for SimpleProgress {
    fn on_iteration_start(&self, iteration: usize, total: usize) {
        eprintln!(
            "{} {}",
            "->".cyan(),
            format!("Iteration {}/{}", iteration + 1, total).bold()
        );
    }

    fn on_layer_start(&self, stage: Stage, agents: usize) {
        if let Stage::Layer { layer, .. } = stage {
            eprintln!("  {} ({} agents)", format!("Layer {}", layer + 1).bold(), agents);
        }
    }

    fn on_agent_complete(&self, _position: AgentPosition, agent: &str, success: bool) {
        if success {
            eprintln!("    {} {}", "v".green(), agent);
        } else {
            eprintln!("    {} {} (failed)", "x".red(), agent);
        }
    }

    fn on_layer_complete(&self, _stage: Stage, _success: bool) {}

    fn on_aggregation_start(&self, aggregator: &str) {
        eprintln!("{} {} {}", "->".cyan(), "Aggregating with".bold(), aggregator);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_label_is_one_based() {
        assert_eq!(
            ProgressReporter::stage_label(Stage::Layer { iteration: 0, layer: 2 }, 2),
            "Iteration 1/2 · Layer 3"
        );
        assert_eq!(
            ProgressReporter::stage_label(Stage::Aggregation, 1),
            "Aggregation"
        );
    }

    #[test]
    fn test_reporter_tracks_layer_bar() {
        let reporter = ProgressReporter::with_draw_target(ProgressDrawTarget::hidden());
        let stage = Stage::Layer {
            iteration: 0,
            layer: 0,
        };

        reporter.on_iteration_start(0, 1);
        reporter.on_layer_start(stage, 2);
        reporter.on_agent_complete(AgentPosition::new(0, 0, 1), "b", true);
        reporter.on_agent_complete(AgentPosition::new(0, 0, 0), "a", false);
        assert_eq!(
            ProgressReporter::lock_bar(&reporter.layer_bar)
                .as_ref()
                .map(|pb| pb.position()),
            Some(2)
        );

        reporter.on_layer_complete(stage, false);
        assert!(ProgressReporter::lock_bar(&reporter.layer_bar).is_none());
    }

    #[test]
    fn test_aggregation_spinner_lifecycle() {
        let reporter = ProgressReporter::with_draw_target(ProgressDrawTarget::hidden());
        reporter.on_aggregation_start("openai/gpt-4o");
        assert!(ProgressReporter::lock_bar(&reporter.aggregation_spinner).is_some());
        reporter.on_aggregation_complete(true);
        assert!(ProgressReporter::lock_bar(&reporter.aggregation_spinner).is_none());
    }
}
