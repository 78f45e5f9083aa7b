//! Service bindings and their lifecycle requests

use crate::instance::ServiceInstance;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Credentials handed to a bound application
pub type Credentials = BTreeMap<String, serde_json::Value>;

/// Request to bind an application to a service instance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateServiceInstanceBindingRequest {
    /// Id of the service
    #[serde(rename = "service_id")]
    pub service_definition_id: String,
    /// Id of the plan
    pub plan_id: String,
    /// Application being bound
    pub app_guid: String,
    /// Platform-specific bind resource
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bind_resource: Option<BTreeMap<String, serde_json::Value>>,
    /// Binding id, carried in the URL rather than the body
    #[serde(skip)]
    pub binding_id: Option<String>,
    /// Instance id, carried in the URL rather than the body
    #[serde(skip)]
    pub service_instance_id: Option<String>,
}

impl CreateServiceInstanceBindingRequest {
    /// Create a bind request without binding or instance id
    pub fn new(
        service_definition_id: impl Into<String>,
        plan_id: impl Into<String>,
        app_guid: impl Into<String>,
        bind_resource: Option<BTreeMap<String, serde_json::Value>>,
    ) -> Self {
        Self {
            service_definition_id: service_definition_id.into(),
            plan_id: plan_id.into(),
            app_guid: app_guid.into(),
            bind_resource,
            binding_id: None,
            service_instance_id: None,
        }
    }

    /// Attach the instance id
    pub fn with_service_instance_id(mut self, service_instance_id: impl Into<String>) -> Self {
        self.service_instance_id = Some(service_instance_id.into());
        self
    }

    /// Attach the binding id
    pub fn with_binding_id(mut self, binding_id: impl Into<String>) -> Self {
        self.binding_id = Some(binding_id.into());
        self
    }
}

/// A binding between an application and a service instance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceInstanceBinding {
    /// Binding id
    pub id: String,
    /// Instance the binding belongs to
    pub service_instance_id: String,
    /// Credentials handed to the application
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credentials: Option<Credentials>,
    /// Syslog drain for the application, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub syslog_drain_url: Option<String>,
    /// Bound application
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_guid: Option<String>,
}

impl ServiceInstanceBinding {
    /// Create a binding
    pub fn new(
        id: impl Into<String>,
        service_instance_id: impl Into<String>,
        credentials: Option<Credentials>,
        syslog_drain_url: Option<String>,
        app_guid: Option<String>,
    ) -> Self {
        Self {
            id: id.into(),
            service_instance_id: service_instance_id.into(),
            credentials,
            syslog_drain_url,
            app_guid,
        }
    }
}

/// Request to unbind an application
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteServiceInstanceBindingRequest {
    /// Binding id
    pub binding_id: String,
    /// Instance the binding belongs to
    pub instance: ServiceInstance,
    /// Id of the service
    pub service_id: String,
    /// Id of the plan
    pub plan_id: String,
}

impl DeleteServiceInstanceBindingRequest {
    /// Create an unbind request
    pub fn new(
        binding_id: impl Into<String>,
        instance: ServiceInstance,
        service_id: impl Into<String>,
        plan_id: impl Into<String>,
    ) -> Self {
        Self {
            binding_id: binding_id.into(),
            instance,
            service_id: service_id.into(),
            plan_id: plan_id.into(),
        }
    }
}
