//! Enrolled-subject progress tracking for the dashboard.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ModuleStatus {
    pub name: String,
    pub completed: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Subject {
    pub id: u32,
    pub name: String,
    pub next_topic: String,
    pub next_session: String,
    pub modules: Vec<ModuleStatus>,
}

impl Subject {
    /// Flip the completion checkbox for a module. Out-of-range is a no-op.
    pub fn toggle_module(&mut self, index: usize) -> bool {
        match self.modules.get_mut(index) {
            Some(module) => {
                module.completed = !module.completed;
                true
            }
            None => false,
        }
    }

    /// Completed modules as a percentage, rounded to the nearest integer.
    pub fn progress(&self) -> u32 {
        if self.modules.is_empty() {
            return 0;
        }
        let completed = self.modules.iter().filter(|m| m.completed).count();
        (completed as f64 / self.modules.len() as f64 * 100.0).round() as u32
    }
}

/// Mean of the subjects' progress percentages, rounded to the nearest
/// integer; 0 for an empty enrollment.
pub fn average_progress(subjects: &[Subject]) -> u32 {
    if subjects.is_empty() {
        return 0;
    }
    let sum: u32 = subjects.iter().map(Subject::progress).sum();
    (f64::from(sum) / subjects.len() as f64).round() as u32
}

/// Seeded demo enrollment used by the dashboard view.
pub fn sample_subjects() -> Vec<Subject> {
    let module = |name: &str| ModuleStatus {
        name: name.to_string(),
        completed: false,
    };
    vec![
        Subject {
            id: 1,
            name: "Operating Systems".to_string(),
            next_topic: "Process Scheduling".to_string(),
            next_session: "Tomorrow, 10:00 AM".to_string(),
            modules: vec![
                module("Introduction to OS"),
                module("Process Management"),
                module("Memory Management"),
                module("File Systems"),
                module("I/O Systems"),
            ],
        },
        Subject {
            id: 2,
            name: "Computer Networks".to_string(),
            next_topic: "Network Layer".to_string(),
            next_session: "Wednesday, 2:00 PM".to_string(),
            modules: vec![
                module("Physical Layer"),
                module("Data Link Layer"),
                module("Network Layer"),
                module("Transport Layer"),
                module("Application Layer"),
            ],
        },
    ]
}
