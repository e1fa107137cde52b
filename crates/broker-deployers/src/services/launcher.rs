//! Launcher: GitHub backed project bootstrapping

use crate::client::Manifest;
use crate::definition::{DashboardSource, DeployerDefinition};
use crate::template::ManifestTemplate;
use broker_types::{
    InputParametersSchema, RequestResponseSchema, Schemas, Service, ServiceBindingSchema,
    ServiceInstanceSchema, ServicePlan,
};
use serde_json::json;

pub const DEPLOYER_ID: &str = "launcher";
pub const SERVICE_ID: &str = "launcher-service-id";
pub const PLAN_ID: &str = "default-launcher";

pub const GITHUB_CLIENT_ID: &str = "GITHUB_CLIENT_ID";
pub const GITHUB_CLIENT_SECRET: &str = "GITHUB_CLIENT_SECRET";

fn instance_parameters() -> serde_json::Value {
    json!({
        "$schema": "http://json-schema.org/draft-04/schema#",
        "type": "object",
        "properties": {
            GITHUB_CLIENT_ID: {
                "description": "Github oauth app client id",
                "type": "string",
                "required": true
            },
            GITHUB_CLIENT_SECRET: {
                "description": "Github oauth app client secret",
                "type": "string",
                "required": true
            }
        }
    })
}

pub fn catalog() -> Service {
    let schemas = Schemas {
        service_instance: Some(ServiceInstanceSchema {
            create: Some(InputParametersSchema::new(instance_parameters())),
            update: None,
        }),
        service_binding: Some(ServiceBindingSchema {
            create: Some(RequestResponseSchema::default()),
        }),
    };

    Service::new(SERVICE_ID, "launcher", "launcher")
        .with_metadata("serviceName", "launcher")
        .with_metadata("serviceType", "launcher")
        .with_plan(
            ServicePlan::new(PLAN_ID, "default-launcher", "default launcher plan")
                .with_schemas(schemas),
        )
}

/// Definition of the launcher deployer
pub fn definition(dashboard: DashboardSource) -> DeployerDefinition {
    DeployerDefinition::new(DEPLOYER_ID, "launcher")
        .with_service(catalog())
        .with_dashboard(dashboard)
        .with_required_parameter(GITHUB_CLIENT_ID)
        .with_required_parameter(GITHUB_CLIENT_SECRET)
        .with_template(ManifestTemplate::new(
            "create github oauth secret for launcher service",
            Manifest::new("v1", "Secret", "launcher-oauth-github").with_spec(json!({
                "stringData": {
                    "clientId": "${param:GITHUB_CLIENT_ID}",
                    "secret": "${param:GITHUB_CLIENT_SECRET}"
                }
            })),
        ))
}
