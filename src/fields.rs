//! Enumerations and field types for tasks and views.
//!
//! This module defines the fixed priority scale attached to every task and the
//! sort keys the view engine understands.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Three-step priority scale, ordered from most to least important.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, ValueEnum, PartialEq, Eq, Hash)]
pub enum Priority {
    #[serde(alias = "Yüksek", alias = "high")]
    High,
    #[default]
    #[serde(alias = "Orta", alias = "medium")]
    Medium,
    #[serde(alias = "Düşük", alias = "low")]
    Low,
}

impl Priority {
    /// Sort rank: High=0, Medium=1, Low=2.
    pub fn rank(self) -> u8 {
        match self {
            Priority::High => 0,
            Priority::Medium => 1,
            Priority::Low => 2,
        }
    }
}

/// Available sorting options for the derived task view.
#[derive(Debug, Clone, Copy, Default, ValueEnum, PartialEq, Eq)]
pub enum SortKey {
    /// Most recently created first.
    #[default]
    Date,
    Priority,
    Title,
}

/// Format a priority for display.
pub fn format_priority(p: Priority) -> &'static str {
    match p {
        Priority::High => "High",
        Priority::Medium => "Medium",
        Priority::Low => "Low",
    }
}
