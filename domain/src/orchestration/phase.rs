//! Pipeline phases
//!
//! A run visits every phase in [`Phase::ALL`] order, exactly once.
//! There are no backward transitions: once a [`PhaseState`] is marked
//! completed it never reopens.

use serde::{Deserialize, Serialize};

/// A stage of the fixed problem-solving sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// Build a shared understanding of the problem
    Understanding,
    /// Decompose the problem into a workable representation
    Representation,
    /// Produce an ordered sequence of plan steps
    Planning,
    /// Carry out the plan steps against the representation
    Execution,
    /// Check the execution output against the problem
    Verification,
    /// Compile the verified work into a final answer
    Compilation,
}

impl Phase {
    /// All phases in execution order
    pub const ALL: [Phase; 6] = [
        Phase::Understanding,
        Phase::Representation,
        Phase::Planning,
        Phase::Execution,
        Phase::Verification,
        Phase::Compilation,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Understanding => "understanding",
            Phase::Representation => "representation",
            Phase::Planning => "planning",
            Phase::Execution => "execution",
            Phase::Verification => "verification",
            Phase::Compilation => "compilation",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Phase::Understanding => "Understanding",
            Phase::Representation => "Decomposition & Representation",
            Phase::Planning => "Planning",
            Phase::Execution => "Execution",
            Phase::Verification => "Verification",
            Phase::Compilation => "Compilation",
        }
    }

    /// Textual goal description embedded in phase prompts
    pub fn goal(&self) -> &'static str {
        match self {
            Phase::Understanding => {
                "Analyze the problem statement and articulate what is actually being asked: \
                 the givens, the unknowns, the constraints, and any implicit assumptions."
            }
            Phase::Representation => {
                "Decompose the problem into parts and choose a representation (notation, \
                 structure, intermediate quantities) that makes the parts tractable."
            }
            Phase::Planning => {
                "Produce an ordered list of concrete steps. Each step names what it does, \
                 the method it uses, the input it requires, and the output it yields."
            }
            Phase::Execution => {
                "Carry out the plan step by step against the chosen representation, \
                 showing intermediate work."
            }
            Phase::Verification => {
                "Check the executed work: test edge cases, confirm each step's output, \
                 and flag anything inconsistent with the problem statement."
            }
            Phase::Compilation => {
                "Compile the verified work into one clear, self-contained final answer."
            }
        }
    }

    /// The phase after this one, if any
    pub fn next(&self) -> Option<Phase> {
        let idx = Phase::ALL.iter().position(|p| p == self)?;
        Phase::ALL.get(idx + 1).copied()
    }

    /// 1-indexed position in the sequence, for display
    pub fn number(&self) -> usize {
        Phase::ALL.iter().position(|p| p == self).unwrap_or(0) + 1
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Mutable completion state for one phase of a run (Entity)
///
/// `is_completed` flips false to true exactly once, when the controller
/// decides to advance. It never resets.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhaseState {
    phase: Phase,
    is_completed: bool,
}

impl PhaseState {
    pub fn new(phase: Phase) -> Self {
        Self {
            phase,
            is_completed: false,
        }
    }

    /// Construct the full sequence of phase states for a run
    pub fn full_sequence() -> Vec<PhaseState> {
        Phase::ALL.iter().map(|p| PhaseState::new(*p)).collect()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_completed(&self) -> bool {
        self.is_completed
    }

    /// Mark the phase completed. Completion is monotone: calling this
    /// on an already-completed phase is a no-op.
    pub fn complete(&mut self) {
        self.is_completed = true;
    }
}
