//! Service catalog entries

use serde::{Deserialize, Serialize};

/// A plan offered by a service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Plan {
    /// Plan id, unique within the broker
    pub id: String,
    /// CLI-friendly plan name
    pub name: String,
    /// Human readable description
    pub description: String,
    /// Whether the plan is free of charge
    #[serde(default = "default_true")]
    pub free: bool,
}

impl Plan {
    /// Create a free plan
    pub fn new(id: impl Into<String>, name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: description.into(),
            free: true,
        }
    }
}

/// A service offered by the broker
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceDefinition {
    /// Service id, unique within the broker
    pub id: String,
    /// CLI-friendly service name
    pub name: String,
    /// Human readable description
    pub description: String,
    /// Whether instances of this service can be bound to applications
    pub bindable: bool,
    /// Plans offered for this service
    #[serde(default)]
    pub plans: Vec<Plan>,
}

impl ServiceDefinition {
    /// Create a service definition
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
        bindable: bool,
        plans: Vec<Plan>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: description.into(),
            bindable,
            plans,
        }
    }

    /// Look up a plan by id
    pub fn plan(&self, plan_id: &str) -> Option<&Plan> {
        self.plans.iter().find(|plan| plan.id == plan_id)
    }
}

fn default_true() -> bool {
    true
}
