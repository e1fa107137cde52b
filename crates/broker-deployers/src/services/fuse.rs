//! Fuse (Syndesis) integration platform

use crate::client::Manifest;
use crate::definition::{DashboardSource, DeployerDefinition};
use crate::probe::DEPLOYMENT_CONFIG_KIND;
use crate::template::ManifestTemplate;
use broker_types::{Service, ServicePlan};
use serde_json::json;

pub const DEPLOYER_ID: &str = "fuse";
pub const SERVICE_ID: &str = "fuse-service-id";
pub const PLAN_ID: &str = "default-fuse";

const OPERATOR: &str = "syndesis-operator";
const OPERATOR_IMAGE: &str = "docker.io/syndesis/syndesis-operator:latest";

/// Rollouts that make up a running fuse instance, in readiness order
pub const ROLLOUTS: [&str; 3] = ["syndesis-oauthproxy", "syndesis-server", "syndesis-ui"];

/// Dashboard host derived from the router of the `registry-console` route
pub fn default_dashboard() -> DashboardSource {
    DashboardSource::Route {
        namespace: "default".into(),
        name: "registry-console".into(),
    }
}

pub fn catalog() -> Service {
    Service::new(SERVICE_ID, "fuse", "fuse")
        .bindable(true)
        .with_metadata("serviceName", "fuse")
        .with_metadata("serviceType", "fuse")
        .with_plan(ServicePlan::new(PLAN_ID, "default-fuse", "default fuse plan"))
}

fn role_binding(
    api_version: &str,
    name: &str,
    role: &str,
    subjects: serde_json::Value,
) -> Manifest {
    Manifest::new(api_version, "RoleBinding", name).with_spec(json!({
        "roleRef": {"name": role},
        "subjects": subjects
    }))
}

fn system_role_binding(role: &str, group: &str) -> ManifestTemplate {
    ManifestTemplate::new(
        format!("create rolebinding for {role}"),
        role_binding(
            "rbac.authorization.k8s.io/v1beta1",
            role,
            role,
            json!([{"kind": "Group", "name": format!("{group}:${{namespace}}")}]),
        ),
    )
}

fn operator_account() -> serde_json::Value {
    json!([{"kind": "ServiceAccount", "name": OPERATOR, "namespace": "${namespace}"}])
}

/// Definition of the fuse deployer
pub fn definition(dashboard: DashboardSource) -> DeployerDefinition {
    let mut definition = DeployerDefinition::new(DEPLOYER_ID, "fuse")
        .with_service(catalog())
        .with_dashboard(dashboard)
        .with_template(ManifestTemplate::new(
            "create service account for fuse service",
            Manifest::new("v1", "ServiceAccount", OPERATOR),
        ))
        .with_template(ManifestTemplate::new(
            "create role for fuse service",
            Manifest::new("rbac.authorization.k8s.io/v1beta1", "Role", OPERATOR).with_spec(json!({
                "rules": [{
                    "apiGroups": ["", "apps", "extensions", "route.openshift.io", "syndesis.io"],
                    "resources": ["*"],
                    "verbs": ["get", "list", "create", "update", "delete", "watch"]
                }]
            })),
        ))
        .with_template(system_role_binding("system:image-pullers", "system:serviceaccounts"))
        .with_template(system_role_binding("system:image-builders", "system:serviceaccounts"))
        .with_template(system_role_binding("system:deployers", "system:serviceaccounts"))
        .with_template(ManifestTemplate::new(
            "create install role binding for fuse service",
            role_binding(
                "rbac.authorization.k8s.io/v1beta1",
                "syndesis-operator:install",
                OPERATOR,
                operator_account(),
            ),
        ))
        .with_template(ManifestTemplate::new(
            "create view role binding for fuse service",
            role_binding(
                "authorization.openshift.io/v1",
                "syndesis-operator:view",
                "view",
                operator_account(),
            ),
        ))
        .with_template(ManifestTemplate::new(
            "create edit role binding for fuse service",
            role_binding(
                "authorization.openshift.io/v1",
                "syndesis-operator:edit",
                "edit",
                operator_account(),
            ),
        ))
        .with_template(ManifestTemplate::new(
            "create image stream for fuse service",
            Manifest::new("image.openshift.io/v1", "ImageStream", OPERATOR).with_spec(json!({
                "tags": [{
                    "name": "latest",
                    "from": {"kind": "DockerImage", "name": OPERATOR_IMAGE}
                }]
            })),
        ))
        .with_template(ManifestTemplate::new(
            "create deployment config for fuse service",
            Manifest::new("apps.openshift.io/v1", DEPLOYMENT_CONFIG_KIND, OPERATOR)
                .with_label("app", "syndesis")
                .with_spec(json!({
                    "replicas": 1,
                    "selector": {"name": OPERATOR},
                    "template": {
                        "metadata": {"labels": {"name": OPERATOR}},
                        "spec": {
                            "serviceAccountName": OPERATOR,
                            "containers": [{"name": OPERATOR, "image": OPERATOR}]
                        }
                    }
                })),
        ))
        .with_template(ManifestTemplate::new(
            "create a fuse custom resource",
            Manifest::new("syndesis.io/v1alpha1", "Syndesis", "fuse").with_spec(json!({
                "routeHostName": "${dashboard_host}",
                "sarNamespace": "${user_namespace}",
                "demoData": false
            })),
        ));

    for rollout in ROLLOUTS {
        definition = definition.with_rollout(rollout);
    }
    definition
}
