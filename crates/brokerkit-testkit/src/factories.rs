//! Test data factories
//!
//! Well-formed service broker model objects for use as fixtures. Ids come
//! from an [`IdSource`]: random UUIDs by default, or a seeded ChaCha20
//! stream when a test needs the same ids on every run.

use brokerkit_model::{
    CreateServiceInstanceBindingRequest, CreateServiceInstanceRequest, Credentials,
    DeleteServiceInstanceBindingRequest, DeleteServiceInstanceRequest, ServiceDefinition,
    ServiceInstance, ServiceInstanceBinding,
};
use parking_lot::Mutex;
use rand_chacha::rand_core::{RngCore, SeedableRng};
use rand_chacha::ChaCha20Rng;
use uuid::Uuid;

/// Id of the fixture service definition
pub const SERVICE_DEFINITION_ID: &str = "def";

/// Syslog drain url attached to fixture bindings
pub const SYSLOG_DRAIN_URL: &str = "url";

/// Where fixture ids come from
#[derive(Debug)]
pub enum IdSource {
    /// Random v4 UUIDs
    Random,
    /// v4-shaped UUIDs from a seeded ChaCha20 stream
    Seeded(Mutex<ChaCha20Rng>),
}

impl IdSource {
    fn next_id(&self) -> String {
        match self {
            IdSource::Random => Uuid::new_v4().to_string(),
            IdSource::Seeded(rng) => {
                let mut bytes = [0u8; 16];
                rng.lock().fill_bytes(&mut bytes);
                uuid::Builder::from_random_bytes(bytes)
                    .into_uuid()
                    .to_string()
            }
        }
    }
}

/// The service definition every fixture refers to
pub fn service_definition() -> ServiceDefinition {
    ServiceDefinition::new(SERVICE_DEFINITION_ID, "name", "desc", true, Vec::new())
}

/// Factory for service broker fixtures
#[derive(Debug)]
pub struct CfModelsFactory {
    ids: IdSource,
}

impl Default for CfModelsFactory {
    fn default() -> Self {
        Self::random()
    }
}

impl CfModelsFactory {
    /// Factory producing random ids
    pub fn random() -> Self {
        Self {
            ids: IdSource::Random,
        }
    }

    /// Factory producing the same id sequence for the same seed
    pub fn deterministic(seed: u64) -> Self {
        Self {
            ids: IdSource::Seeded(Mutex::new(ChaCha20Rng::seed_from_u64(seed))),
        }
    }

    /// Next id from the factory's source
    pub fn random_id(&self) -> String {
        self.ids.next_id()
    }

    /// Instance with fresh ids throughout
    pub fn service_instance(&self) -> ServiceInstance {
        let instance_id = self.random_id();
        self.service_instance_with_id(&instance_id)
    }

    /// Instance with the given id and a fresh plan
    pub fn service_instance_with_id(&self, instance_id: &str) -> ServiceInstance {
        let plan_id = self.random_id();
        self.service_instance_with_plan(instance_id, &plan_id)
    }

    /// Instance with the given id and plan, in a fresh organization and space
    pub fn service_instance_with_plan(&self, instance_id: &str, plan_id: &str) -> ServiceInstance {
        let organization_id = self.random_id();
        let space_id = self.random_id();
        let request = CreateServiceInstanceRequest::new(
            service_definition().id,
            plan_id,
            organization_id,
            space_id,
        );
        Self::service_instance_from_request(request, instance_id)
    }

    /// Instance provisioned by `request` under `instance_id`
    pub fn service_instance_from_request(
        request: CreateServiceInstanceRequest,
        instance_id: &str,
    ) -> ServiceInstance {
        ServiceInstance::from_request(&request.with_service_instance_id(instance_id))
    }

    /// Binding to a fresh instance
    pub fn service_binding(&self) -> ServiceInstanceBinding {
        let instance_id = self.random_id();
        self.service_binding_for_instance(&instance_id)
    }

    /// Binding without credentials to the given instance
    pub fn service_binding_for_instance(&self, instance_id: &str) -> ServiceInstanceBinding {
        ServiceInstanceBinding::new(
            self.random_id(),
            instance_id,
            None,
            Some(SYSLOG_DRAIN_URL.to_string()),
            Some(self.random_id()),
        )
    }

    /// Copy of `binding` carrying `credentials`
    pub fn service_binding_with_credentials(
        binding: &ServiceInstanceBinding,
        credentials: Credentials,
    ) -> ServiceInstanceBinding {
        ServiceInstanceBinding::new(
            binding.id.clone(),
            binding.service_instance_id.clone(),
            Some(credentials),
            binding.syslog_drain_url.clone(),
            binding.app_guid.clone(),
        )
    }

    /// Binding a broker would return for `request`
    ///
    /// Missing binding or instance ids in the request become empty strings.
    pub fn service_binding_from_request(
        request: &CreateServiceInstanceBindingRequest,
        credentials: Credentials,
    ) -> ServiceInstanceBinding {
        ServiceInstanceBinding::new(
            request.binding_id.clone().unwrap_or_default(),
            request.service_instance_id.clone().unwrap_or_default(),
            Some(credentials),
            None,
            Some(request.app_guid.clone()),
        )
    }

    /// Create request that would provision `instance`
    pub fn create_instance_request(instance: &ServiceInstance) -> CreateServiceInstanceRequest {
        let definition = service_definition();
        CreateServiceInstanceRequest::new(
            definition.id.clone(),
            instance.plan_id.clone(),
            instance.organization_guid.clone(),
            instance.space_guid.clone(),
        )
        .with_service_instance_id(instance.service_instance_id.clone())
        .with_service_definition(definition)
    }

    /// Bind request for a fresh instance
    pub fn create_binding_request(&self) -> CreateServiceInstanceBindingRequest {
        let instance_id = self.random_id();
        self.create_binding_request_for_instance(&instance_id)
    }

    /// Bind request for the given instance with a fresh plan
    pub fn create_binding_request_for_instance(
        &self,
        instance_id: &str,
    ) -> CreateServiceInstanceBindingRequest {
        let plan_id = self.random_id();
        self.create_binding_request_with_plan(instance_id, &plan_id)
    }

    /// Bind request for the given instance and plan, from a fresh application
    pub fn create_binding_request_with_plan(
        &self,
        instance_id: &str,
        plan_id: &str,
    ) -> CreateServiceInstanceBindingRequest {
        let app_id = self.random_id();
        CreateServiceInstanceBindingRequest::new(service_definition().id, plan_id, app_id, None)
            .with_service_instance_id(instance_id)
            .with_binding_id(self.random_id())
    }

    /// Request deprovisioning `instance`
    pub fn delete_instance_request(instance: &ServiceInstance) -> DeleteServiceInstanceRequest {
        DeleteServiceInstanceRequest::new(
            instance.service_instance_id.clone(),
            instance.service_definition_id.clone(),
            instance.plan_id.clone(),
        )
    }

    /// Request removing the binding created by `bind_request` from a fresh instance
    pub fn delete_binding_request(
        &self,
        instance_id: &str,
        bind_request: &CreateServiceInstanceBindingRequest,
    ) -> DeleteServiceInstanceBindingRequest {
        DeleteServiceInstanceBindingRequest::new(
            bind_request.binding_id.clone().unwrap_or_default(),
            self.service_instance_with_id(instance_id),
            bind_request.service_definition_id.clone(),
            bind_request.plan_id.clone(),
        )
    }
}

/// Instance with random ids
pub fn service_instance() -> ServiceInstance {
    CfModelsFactory::random().service_instance()
}

/// Binding with random ids
pub fn service_binding() -> ServiceInstanceBinding {
    CfModelsFactory::random().service_binding()
}

/// Bind request with random ids
pub fn create_binding_request() -> CreateServiceInstanceBindingRequest {
    CfModelsFactory::random().create_binding_request()
}
