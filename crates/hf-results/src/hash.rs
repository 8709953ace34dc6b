//! Content-based hashing for run IDs.

use hf_project::schema::NetworkDef;
use sha2::{Digest, Sha256};

use crate::types::SolveSettings;

pub fn compute_run_id(network: &NetworkDef, solve: &SolveSettings, solver_version: &str) -> String {
    let mut hasher = Sha256::new();

    let network_json = serde_json::to_string(network).unwrap_or_default();
    hasher.update(network_json.as_bytes());

    let solve_json = serde_json::to_string(solve).unwrap_or_default();
    hasher.update(solve_json.as_bytes());

    hasher.update(solver_version.as_bytes());

    let result = hasher.finalize();
    format!("{:x}", result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SolveMode;
    use hf_project::schema::*;

    fn network(id: &str) -> NetworkDef {
        NetworkDef {
            id: id.to_string(),
            name: "Test".to_string(),
            elements: vec![ElementDef::new("pump", RoleDef::Source)],
            connections: vec![],
            observers: vec![],
            solve: SolveDef::default(),
        }
    }

    fn settings(iterations: usize) -> SolveSettings {
        SolveSettings {
            mode: SolveMode::Fixed { iterations },
            record_history: true,
        }
    }

    #[test]
    fn hash_stability() {
        let a = compute_run_id(&network("n1"), &settings(10), "v1");
        let b = compute_run_id(&network("n1"), &settings(10), "v1");
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
    }

    #[test]
    fn hash_differs_for_different_inputs() {
        let base = compute_run_id(&network("n1"), &settings(10), "v1");
        assert_ne!(base, compute_run_id(&network("n2"), &settings(10), "v1"));
        assert_ne!(base, compute_run_id(&network("n1"), &settings(11), "v1"));
        assert_ne!(base, compute_run_id(&network("n1"), &settings(10), "v2"));
    }
}
