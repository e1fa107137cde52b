//! Manifest templates
//!
//! A template is a manifest whose string values may reference
//! per-instance variables as `${name}`:
//!
//! - `${instance_id}`: the instance being provisioned
//! - `${namespace}`: the namespace created for the instance
//! - `${user_namespace}`: the namespace of the requesting user
//! - `${dashboard_host}`: host of the instance dashboard, if any
//! - `${param:KEY}`: a user supplied string parameter
//!
//! Unknown references are left untouched.

use crate::client::Manifest;
use serde_json::Value;

/// One provisioning step: create a manifest
#[derive(Debug, Clone, PartialEq)]
pub struct ManifestTemplate {
    /// Step description used in error messages ("create role for fuse service")
    pub step: String,
    pub manifest: Manifest,
}

impl ManifestTemplate {
    pub fn new(step: impl Into<String>, manifest: Manifest) -> Self {
        Self {
            step: step.into(),
            manifest,
        }
    }

    /// Instantiate the template inside `vars.namespace`
    pub fn render(&self, vars: &TemplateVars<'_>) -> Manifest {
        let mut manifest = self.manifest.clone();
        manifest.metadata.name = vars.substitute(&manifest.metadata.name);
        if !manifest.is_cluster_scoped() {
            manifest.metadata.namespace = vars.namespace.to_string();
        }
        for value in manifest.metadata.labels.values_mut() {
            *value = vars.substitute(value);
        }
        manifest.spec = render_value(&manifest.spec, vars);
        manifest
    }
}

/// Values available to templates
#[derive(Debug, Clone)]
pub struct TemplateVars<'a> {
    pub instance_id: &'a str,
    pub namespace: &'a str,
    pub user_namespace: &'a str,
    pub dashboard_host: Option<&'a str>,
    pub parameters: &'a serde_json::Map<String, Value>,
}

impl TemplateVars<'_> {
    fn lookup(&self, name: &str) -> Option<&str> {
        match name {
            "instance_id" => Some(self.instance_id),
            "namespace" => Some(self.namespace),
            "user_namespace" => Some(self.user_namespace),
            "dashboard_host" => self.dashboard_host,
            other => other
                .strip_prefix("param:")
                .and_then(|key| self.parameters.get(key))
                .and_then(Value::as_str),
        }
    }

    /// Replace every known `${name}` reference in `input`
    pub fn substitute(&self, input: &str) -> String {
        let mut out = String::with_capacity(input.len());
        let mut rest = input;

        while let Some(start) = rest.find("${") {
            out.push_str(&rest[..start]);
            let after = &rest[start + 2..];
            match after.find('}') {
                Some(end) => {
                    let name = &after[..end];
                    match self.lookup(name) {
                        Some(value) => out.push_str(value),
                        None => {
                            out.push_str("${");
                            out.push_str(name);
                            out.push('}');
                        }
                    }
                    rest = &after[end + 1..];
                }
                None => {
                    out.push_str(&rest[start..]);
                    rest = "";
                }
            }
        }

        out.push_str(rest);
        out
    }
}

fn render_value(value: &Value, vars: &TemplateVars<'_>) -> Value {
    match value {
        Value::String(s) => Value::String(vars.substitute(s)),
        Value::Array(items) => Value::Array(items.iter().map(|v| render_value(v, vars)).collect()),
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(k, v)| (k.clone(), render_value(v, vars)))
                .collect(),
        ),
        other => other.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn params() -> serde_json::Map<String, Value> {
        let mut map = serde_json::Map::new();
        map.insert("GITHUB_CLIENT_ID".into(), json!("gh-123"));
        map.insert("REPLICAS".into(), json!(3));
        map
    }

    fn vars<'a>(parameters: &'a serde_json::Map<String, Value>) -> TemplateVars<'a> {
        TemplateVars {
            instance_id: "abc",
            namespace: "fuse-abc",
            user_namespace: "team-a",
            dashboard_host: Some("fuse-abc.apps.example.com"),
            parameters,
        }
    }

    #[test]
    fn test_substitute_known_and_unknown() {
        let parameters = params();
        let vars = vars(&parameters);

        assert_eq!(vars.substitute("ns=${namespace}"), "ns=fuse-abc");
        assert_eq!(vars.substitute("${param:GITHUB_CLIENT_ID}"), "gh-123");
        assert_eq!(vars.substitute("${nope}-${instance_id}"), "${nope}-abc");
        // Non-string parameters are not substituted
        assert_eq!(vars.substitute("${param:REPLICAS}"), "${param:REPLICAS}");
        assert_eq!(vars.substitute("dangling ${namespace"), "dangling ${namespace");
    }

    #[test]
    fn test_render_places_object_in_namespace() {
        let parameters = params();
        let template = ManifestTemplate::new(
            "create fuse custom resource",
            Manifest::new("syndesis.io/v1alpha1", "Syndesis", "fuse-${instance_id}").with_spec(
                json!({
                    "routeHostname": "${dashboard_host}",
                    "sarNamespace": "${user_namespace}",
                    "replicas": 1,
                    "tags": ["${namespace}"]
                }),
            ),
        );

        let rendered = template.render(&vars(&parameters));
        assert_eq!(rendered.name(), "fuse-abc");
        assert_eq!(rendered.namespace_name(), "fuse-abc");
        assert_eq!(
            rendered.spec,
            json!({
                "routeHostname": "fuse-abc.apps.example.com",
                "sarNamespace": "team-a",
                "replicas": 1,
                "tags": ["fuse-abc"]
            })
        );
    }
}
