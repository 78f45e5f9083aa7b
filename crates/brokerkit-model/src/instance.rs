//! Service instances and their lifecycle requests

use crate::catalog::ServiceDefinition;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Request to provision a service instance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateServiceInstanceRequest {
    /// Id of the service being provisioned
    #[serde(rename = "service_id")]
    pub service_definition_id: String,
    /// Id of the selected plan
    pub plan_id: String,
    /// Organization the instance belongs to
    pub organization_guid: String,
    /// Space the instance belongs to
    pub space_guid: String,
    /// Arbitrary provisioning parameters
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<BTreeMap<String, serde_json::Value>>,
    /// Instance id, carried in the URL rather than the body
    #[serde(skip)]
    pub service_instance_id: Option<String>,
    /// Resolved service definition, attached by the broker
    #[serde(skip)]
    pub service_definition: Option<ServiceDefinition>,
}

impl CreateServiceInstanceRequest {
    /// Create a request without instance id or resolved definition
    pub fn new(
        service_definition_id: impl Into<String>,
        plan_id: impl Into<String>,
        organization_guid: impl Into<String>,
        space_guid: impl Into<String>,
    ) -> Self {
        Self {
            service_definition_id: service_definition_id.into(),
            plan_id: plan_id.into(),
            organization_guid: organization_guid.into(),
            space_guid: space_guid.into(),
            parameters: None,
            service_instance_id: None,
            service_definition: None,
        }
    }

    /// Attach the instance id
    pub fn with_service_instance_id(mut self, service_instance_id: impl Into<String>) -> Self {
        self.service_instance_id = Some(service_instance_id.into());
        self
    }

    /// Attach the resolved service definition
    pub fn with_service_definition(mut self, service_definition: ServiceDefinition) -> Self {
        self.service_definition = Some(service_definition);
        self
    }

    /// Attach provisioning parameters
    pub fn with_parameters(mut self, parameters: BTreeMap<String, serde_json::Value>) -> Self {
        self.parameters = Some(parameters);
        self
    }
}

/// A provisioned service instance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceInstance {
    /// Instance id
    pub service_instance_id: String,
    /// Id of the service the instance was provisioned from
    #[serde(rename = "service_id")]
    pub service_definition_id: String,
    /// Id of the plan
    pub plan_id: String,
    /// Owning organization
    pub organization_guid: String,
    /// Owning space
    pub space_guid: String,
    /// Dashboard for the instance, if the broker exposes one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dashboard_url: Option<String>,
}

impl ServiceInstance {
    /// Instance described by a create request
    ///
    /// A request without an instance id yields an empty id.
    pub fn from_request(request: &CreateServiceInstanceRequest) -> Self {
        Self {
            service_instance_id: request.service_instance_id.clone().unwrap_or_default(),
            service_definition_id: request.service_definition_id.clone(),
            plan_id: request.plan_id.clone(),
            organization_guid: request.organization_guid.clone(),
            space_guid: request.space_guid.clone(),
            dashboard_url: None,
        }
    }

    /// Set the dashboard url
    pub fn with_dashboard_url(mut self, dashboard_url: impl Into<String>) -> Self {
        self.dashboard_url = Some(dashboard_url.into());
        self
    }
}

/// Request to deprovision a service instance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteServiceInstanceRequest {
    /// Instance id
    pub service_instance_id: String,
    /// Id of the service
    pub service_id: String,
    /// Id of the plan
    pub plan_id: String,
}

impl DeleteServiceInstanceRequest {
    /// Create a delete request
    pub fn new(
        service_instance_id: impl Into<String>,
        service_id: impl Into<String>,
        plan_id: impl Into<String>,
    ) -> Self {
        Self {
            service_instance_id: service_instance_id.into(),
            service_id: service_id.into(),
            plan_id: plan_id.into(),
        }
    }
}
