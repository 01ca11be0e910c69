//! Progress reporting for pipeline execution

use colored::Colorize;
use concord_application::ProgressNotifier;
use concord_domain::{AgentId, Phase};
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::sync::Mutex;

/// Reports progress during a run with a per-phase spinner
pub struct ProgressReporter {
    multi: MultiProgress,
    phase_bar: Mutex<Option<ProgressBar>>,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self {
            multi: MultiProgress::new(),
            phase_bar: Mutex::new(None),
        }
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {prefix:.bold.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }

    fn phase_prefix(phase: Phase) -> String {
        format!("Phase {}: {}", phase.number(), phase.display_name())
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressNotifier for ProgressReporter {
    fn on_phase_start(&self, phase: Phase, agents: usize) {
        let pb = self.multi.add(ProgressBar::new_spinner());
        pb.set_style(Self::spinner_style());
        pb.set_prefix(Self::phase_prefix(phase));
        pb.set_message(format!("{} agent(s) drafting...", agents));
        pb.enable_steady_tick(std::time::Duration::from_millis(100));

        if let Ok(mut bar) = self.phase_bar.lock() {
            *bar = Some(pb);
        }
    }

    fn on_critique(&self, _phase: Phase, agent: &AgentId, accepted: bool) {
        if let Ok(bar) = self.phase_bar.lock()
            && let Some(pb) = bar.as_ref()
        {
            let verdict = if accepted {
                format!("{} {} accepted", "v".green(), agent)
            } else {
                format!("{} {} rejected", "x".red(), agent)
            };
            pb.set_message(verdict);
        }
    }

    fn on_revision(&self, _phase: Phase, agent: &AgentId) {
        if let Ok(bar) = self.phase_bar.lock()
            && let Some(pb) = bar.as_ref()
        {
            pb.set_message(format!("{} revising...", agent));
        }
    }

    fn on_merge(&self, _phase: Phase, candidates: usize) {
        if let Ok(bar) = self.phase_bar.lock()
            && let Some(pb) = bar.as_ref()
        {
            pb.set_message(format!("merging {} drafts...", candidates));
        }
    }

    fn on_phase_complete(&self, phase: Phase, consensus: bool) {
        if let Ok(mut bar) = self.phase_bar.lock()
            && let Some(pb) = bar.take()
        {
            let status = if consensus {
                format!("{} consensus", "v".green())
            } else {
                format!("{} advanced without consensus", "!".yellow())
            };
            pb.finish_with_message(format!(
                "{} - {}",
                Self::phase_prefix(phase).bold(),
                status
            ));
        }
    }
}

/// Simple text-based progress (no fancy UI)
pub struct SimpleProgress;

impl ProgressNotifier for SimpleProgress {
    fn on_phase_start(&self, phase: Phase, agents: usize) {
        println!(
            "{} {} ({} agent(s))",
            "->".cyan(),
            ProgressReporter::phase_prefix(phase).bold(),
            agents
        );
    }

    fn on_critique(&self, _phase: Phase, agent: &AgentId, accepted: bool) {
        if accepted {
            println!("  {} {} accepted", "v".green(), agent);
        } else {
            println!("  {} {} rejected", "x".red(), agent);
        }
    }

    fn on_revision(&self, _phase: Phase, agent: &AgentId) {
        println!("  {} {} revised the draft", "~".yellow(), agent);
    }

    fn on_merge(&self, _phase: Phase, candidates: usize) {
        println!("  {} merging {} drafts", "*".cyan(), candidates);
    }

    fn on_phase_complete(&self, _phase: Phase, consensus: bool) {
        if !consensus {
            println!("  {} advanced without consensus", "!".yellow());
        }
        println!();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drive(notifier: &dyn ProgressNotifier) {
        let agent = AgentId::indexed(0);
        notifier.on_phase_start(Phase::Understanding, 2);
        notifier.on_critique(Phase::Understanding, &agent, false);
        notifier.on_revision(Phase::Understanding, &agent);
        notifier.on_merge(Phase::Understanding, 2);
        notifier.on_phase_complete(Phase::Understanding, true);
    }

    #[test]
    fn test_simple_progress_handles_full_phase() {
        drive(&SimpleProgress);
    }

    #[test]
    fn test_reporter_handles_full_phase() {
        drive(&ProgressReporter::new());
    }

    #[test]
    fn test_reporter_complete_without_start_is_noop() {
        ProgressReporter::new().on_phase_complete(Phase::Compilation, false);
    }
}
