use serde::{Deserialize, Serialize};

/// A single numbered step in a routine
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RoutineStep {
    pub step: u8,
    pub name: String,
    pub description: String,
}

impl RoutineStep {
    pub fn new(step: u8, name: &str, description: impl Into<String>) -> Self {
        Self {
            step,
            name: name.to_string(),
            description: description.into(),
        }
    }
}

/// Daily skincare routine split into morning and evening phases
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SkincareRoutine {
    pub morning: Vec<RoutineStep>,
    pub evening: Vec<RoutineStep>,
}

/// Haircare routine split into wash day and in-between maintenance
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HaircareRoutine {
    pub wash_day: Vec<RoutineStep>,
    pub maintenance: Vec<RoutineStep>,
}

/// Either kind of routine, serialized without a tag
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum Routine {
    Skincare(SkincareRoutine),
    Haircare(HaircareRoutine),
}
