//! Enumerations and field types for task management.
//!
//! This module defines the structured values used to classify tasks: completion
//! status, priority and category. Their serde names double as the persisted
//! string values.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Task completion status.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ValueEnum, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum Status {
    Pending,
    Completed,
}

/// Priority classification for task importance.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ValueEnum, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    /// Fixed display rank: high sorts first.
    pub fn rank(self) -> u8 {
        match self {
            Priority::High => 0,
            Priority::Medium => 1,
            Priority::Low => 2,
        }
    }
}

/// Category a task belongs to.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ValueEnum, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    Work,
    Personal,
    Shopping,
    Health,
    Education,
    Other,
}

pub const ALL_STATUSES: [Status; 2] = [Status::Pending, Status::Completed];

pub const ALL_PRIORITIES: [Priority; 3] = [Priority::High, Priority::Medium, Priority::Low];

pub const ALL_CATEGORIES: [Category; 6] = [
    Category::Work,
    Category::Personal,
    Category::Shopping,
    Category::Health,
    Category::Education,
    Category::Other,
];
