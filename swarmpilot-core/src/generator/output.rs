//! Rendering generated profiles as scenario documents

use crate::error::GeneratorError;
use crate::scenario::CONFIGMAP_SCENARIO_KEY;
use serde::{Deserialize, Serialize};

/// One generated minute. Integer fields keep the emitted JSON identical to
/// what the cluster tooling already consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedPhase {
    pub n_users: u32,
    pub spawn_rate: u32,
    pub duration: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigMapMeta {
    pub name: String,
    pub namespace: String,
}

impl Default for ConfigMapMeta {
    fn default() -> Self {
        Self {
            name: "test-scenario".to_string(),
            namespace: "microservices-demo".to_string(),
        }
    }
}

/// One-minute phases, user counts truncated toward zero
pub fn to_scenario_json(values: &[f64], spawn_rate: u32) -> Vec<GeneratedPhase> {
    values
        .iter()
        .map(|value| GeneratedPhase {
            n_users: *value as u32,
            spawn_rate,
            duration: 1,
        })
        .collect()
}

/// Wrap a scenario in a ConfigMap manifest with the JSON as a block scalar
pub fn to_configmap_yaml(
    phases: &[GeneratedPhase],
    meta: &ConfigMapMeta,
) -> Result<String, GeneratorError> {
    let json = serde_json::to_string_pretty(phases)?;
    let indented = json
        .lines()
        .map(|line| format!("    {}", line))
        .collect::<Vec<_>>()
        .join("\n");

    Ok(format!(
        "apiVersion: v1\nkind: ConfigMap\nmetadata:\n  name: {}\n  namespace: {}\ndata:\n  {}: |\n{}\n",
        meta.name, meta.namespace, CONFIGMAP_SCENARIO_KEY, indented
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenario::Scenario;

    #[test]
    fn test_values_truncate_to_whole_users() {
        let phases = to_scenario_json(&[1.0, 39.9, 851.2], 50);
        let users: Vec<_> = phases.iter().map(|p| p.n_users).collect();
        assert_eq!(users, vec![1, 39, 851]);
        assert!(phases.iter().all(|p| p.spawn_rate == 50 && p.duration == 1));
    }

    #[test]
    fn test_json_keeps_integer_fields() {
        let phases = to_scenario_json(&[12.7], 1);
        let json = serde_json::to_string(&phases).unwrap();
        assert_eq!(json, r#"[{"n_users":12,"spawn_rate":1,"duration":1}]"#);
    }

    #[test]
    fn test_configmap_layout() {
        let phases = to_scenario_json(&[40.0], 50);
        let yaml = to_configmap_yaml(&phases, &ConfigMapMeta::default()).unwrap();

        let expected = concat!(
            "apiVersion: v1\n",
            "kind: ConfigMap\n",
            "metadata:\n",
            "  name: test-scenario\n",
            "  namespace: microservices-demo\n",
            "data:\n",
            "  scenario.json: |\n",
            "    [\n",
            "      {\n",
            "        \"n_users\": 40,\n",
            "        \"spawn_rate\": 50,\n",
            "        \"duration\": 1\n",
            "      }\n",
            "    ]\n",
        );
        assert_eq!(yaml, expected);
    }

    #[test]
    fn test_configmap_loads_as_scenario() {
        let phases = to_scenario_json(&[40.0, 650.0, 0.4], 50);
        let meta = ConfigMapMeta {
            name: "spike".to_string(),
            namespace: "load".to_string(),
        };
        let yaml = to_configmap_yaml(&phases, &meta).unwrap();

        let scenario = Scenario::parse(&yaml).unwrap();
        assert_eq!(scenario.len(), 3);
        assert_eq!(scenario.get(1).unwrap().n_users, 650);
        assert!(scenario.get(2).unwrap().is_quiet());
    }
}
