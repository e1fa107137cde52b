//! Catalog types
//!
//! The catalog is what the platform shows to its users: every service a
//! registered deployer can materialize, with the plans it offers. It is
//! rebuilt on each request and never cached.

use crate::{PlanId, ServiceId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Full catalog returned to the platform
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    pub services: Vec<Service>,
}

impl Catalog {
    pub fn new(services: Vec<Service>) -> Self {
        Self { services }
    }

    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }

    /// Find a service entry by id
    pub fn service(&self, id: &ServiceId) -> Option<&Service> {
        self.services.iter().find(|s| &s.id == id)
    }

    /// Ids of every service, in catalog order
    pub fn service_ids(&self) -> Vec<&ServiceId> {
        self.services.iter().map(|s| &s.id).collect()
    }
}

/// A managed service offered through the broker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Service {
    /// Unique service name shown by the platform
    pub name: String,

    /// Service identifier used in provisioning requests
    pub id: ServiceId,

    /// Human readable description
    pub description: String,

    /// Searchable tags
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,

    /// Whether instances of this service can be bound
    #[serde(default)]
    pub bindable: bool,

    /// Whether the plan of an existing instance can be changed
    #[serde(default)]
    pub plan_updateable: bool,

    /// Free-form metadata
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: BTreeMap<String, String>,

    /// Plans offered for this service
    pub plans: Vec<ServicePlan>,
}

impl Service {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            id: ServiceId::new(id),
            description: description.into(),
            tags: Vec::new(),
            bindable: false,
            plan_updateable: false,
            metadata: BTreeMap::new(),
            plans: Vec::new(),
        }
    }

    pub fn with_plan(mut self, plan: ServicePlan) -> Self {
        self.plans.push(plan);
        self
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    pub fn bindable(mut self, bindable: bool) -> Self {
        self.bindable = bindable;
        self
    }

    /// Find a plan by id
    pub fn plan(&self, id: &PlanId) -> Option<&ServicePlan> {
        self.plans.iter().find(|p| &p.id == id)
    }
}

/// A plan of a service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServicePlan {
    pub name: String,
    pub id: PlanId,
    pub description: String,

    /// Whether the plan is free of charge
    #[serde(default = "default_free")]
    pub free: bool,

    /// Parameter schemas for instance and binding creation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schemas: Option<Schemas>,
}

fn default_free() -> bool {
    true
}

impl ServicePlan {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            id: PlanId::new(id),
            description: description.into(),
            free: true,
            schemas: None,
        }
    }

    pub fn paid(mut self) -> Self {
        self.free = false;
        self
    }

    pub fn with_schemas(mut self, schemas: Schemas) -> Self {
        self.schemas = Some(schemas);
        self
    }
}

/// Parameter schemas attached to a plan
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Schemas {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_instance: Option<ServiceInstanceSchema>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_binding: Option<ServiceBindingSchema>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServiceInstanceSchema {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub create: Option<InputParametersSchema>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update: Option<InputParametersSchema>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServiceBindingSchema {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub create: Option<RequestResponseSchema>,
}

/// JSON schema describing accepted input parameters
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InputParametersSchema {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<serde_json::Value>,
}

impl InputParametersSchema {
    pub fn new(parameters: serde_json::Value) -> Self {
        Self {
            parameters: Some(parameters),
        }
    }
}

/// Schema for both the input parameters and the response of an operation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RequestResponseSchema {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<serde_json::Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<serde_json::Value>,
}
