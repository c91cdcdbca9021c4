//! Pipeline state: the ordered operator arrangement a user has assembled.
//!
//! Order is presentation order, left to right; execution always targets a
//! single instance, so no data flows between neighbors. Reads hand out
//! owned copies: callers routinely read, tweak a draft and write it back,
//! and aliasing the internal list would let two callers corrupt each
//! other without any locking being involved.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::params::ParamBag;
use super::registry::OperatorRegistry;
use super::PipelineError;

/// One configured operator occurrence in the pipeline.
///
/// The id stays stable across reorders and parameter edits; two instances
/// of the same operator type coexist with different ids. `result_count`
/// is `None` until the instance has executed at least once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperatorInstance {
    pub id: String,
    pub name: String,
    pub params: ParamBag,
    pub result_count: Option<usize>,
}

/// Ordered, mutable sequence of operator instances. One per session.
#[derive(Debug, Default)]
pub struct PipelineState {
    operators: Vec<OperatorInstance>,
}

impl PipelineState {
    pub fn new() -> Self {
        Self::default()
    }

    fn find_index(&self, instance_id: &str) -> Option<usize> {
        self.operators.iter().position(|op| op.id == instance_id)
    }

    /// Append a new instance of the named operator. The name is checked
    /// against the registry up front so a typo cannot plant an
    /// unexecutable instance in the pipeline.
    pub fn add_operator(
        &mut self,
        name: &str,
        registry: &OperatorRegistry,
    ) -> Result<String, PipelineError> {
        if !registry.is_registered(name) {
            return Err(PipelineError::UnknownOperator {
                name: name.to_string(),
                available: registry.names().join(", "),
            });
        }

        let id = Uuid::new_v4().to_string();
        self.operators.push(OperatorInstance {
            id: id.clone(),
            name: name.to_string(),
            params: ParamBag::new(),
            result_count: None,
        });
        tracing::info!(operator = name, pipeline = ?self.operator_names(), "Added operator");
        Ok(id)
    }

    /// Remove by id. Missing ids are a no-op, not a failure.
    pub fn remove_operator(&mut self, instance_id: &str) -> bool {
        match self.find_index(instance_id) {
            Some(index) => {
                let removed = self.operators.remove(index);
                tracing::info!(
                    operator = %removed.name,
                    pipeline = ?self.operator_names(),
                    "Removed operator"
                );
                true
            }
            None => false,
        }
    }

    /// Owned copy of one instance, or `None` when the id is unknown.
    pub fn get_operator(&self, instance_id: &str) -> Option<OperatorInstance> {
        self.find_index(instance_id)
            .map(|index| self.operators[index].clone())
    }

    /// Owned copies of all instances, in pipeline order.
    pub fn get_all_operators(&self) -> Vec<OperatorInstance> {
        self.operators.clone()
    }

    /// Replace an instance's parameter bag wholesale (no merging).
    pub fn update_params(&mut self, instance_id: &str, params: ParamBag) -> bool {
        match self.find_index(instance_id) {
            Some(index) => {
                self.operators[index].params = params;
                true
            }
            None => false,
        }
    }

    /// Cache the total match count after an execution.
    pub fn update_result_count(&mut self, instance_id: &str, count: usize) -> bool {
        match self.find_index(instance_id) {
            Some(index) => {
                self.operators[index].result_count = Some(count);
                tracing::info!(instance = instance_id, count, "Updated result count");
                true
            }
            None => false,
        }
    }

    /// Swap the instance with its left neighbor. Returns `false` when the
    /// id is unknown or the instance is already leftmost.
    pub fn move_left(&mut self, instance_id: &str) -> bool {
        match self.find_index(instance_id) {
            Some(index) if index > 0 => {
                self.operators.swap(index - 1, index);
                true
            }
            _ => false,
        }
    }

    /// Swap the instance with its right neighbor. Returns `false` when the
    /// id is unknown or the instance is already rightmost.
    pub fn move_right(&mut self, instance_id: &str) -> bool {
        match self.find_index(instance_id) {
            Some(index) if index + 1 < self.operators.len() => {
                self.operators.swap(index, index + 1);
                true
            }
            _ => false,
        }
    }

    pub fn clear(&mut self) {
        self.operators.clear();
        tracing::info!("Pipeline cleared");
    }

    pub fn len(&self) -> usize {
        self.operators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operators.is_empty()
    }

    /// Export the pipeline as a JSON array of instances, in order.
    pub fn serialize(&self) -> Result<String, PipelineError> {
        Ok(serde_json::to_string_pretty(&self.operators)?)
    }

    /// Replace the whole pipeline with the instances in `json`.
    ///
    /// Structure is validated; operator names are deliberately not checked
    /// against a registry here. A file referencing an unknown name loads
    /// fine and fails later, at creation time, with the full list of known
    /// operators in the error.
    pub fn deserialize(&mut self, json: &str) -> Result<(), PipelineError> {
        let operators: Vec<OperatorInstance> = serde_json::from_str(json)?;
        self.operators = operators;
        tracing::info!(count = self.operators.len(), "Loaded pipeline from JSON");
        Ok(())
    }

    fn operator_names(&self) -> Vec<&str> {
        self.operators.iter().map(|op| op.name.as_str()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::operator::{Operator, SearchOutcome};
    use crate::pipeline::params::ParamValue;
    use crate::pipeline::schema::OperatorBuilder;

    struct NullOperator;

    impl Operator for NullOperator {
        fn name(&self) -> &str {
            "Null"
        }

        fn execute(&self, _params: &ParamBag) -> Result<SearchOutcome, PipelineError> {
            Ok(SearchOutcome::empty())
        }

        fn is_configured(&self, _params: &ParamBag) -> bool {
            true
        }
    }

    fn registry() -> OperatorRegistry {
        let mut registry = OperatorRegistry::new();
        for name in ["Metadata Filter", "Semantic Search", "Similarity Search"] {
            let (_, metadata) = OperatorBuilder::new(name).build();
            registry.register(name, metadata, || Box::new(NullOperator));
        }
        registry
    }

    fn bag(entries: &[(&str, ParamValue)]) -> ParamBag {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    // ── Basic operations ────────────────────────────────────

    #[test]
    fn add_get_remove_roundtrip() {
        let registry = registry();
        let mut state = PipelineState::new();
        assert!(state.is_empty());

        let id = state.add_operator("Metadata Filter", &registry).unwrap();
        assert_eq!(state.len(), 1);

        let instance = state.get_operator(&id).unwrap();
        assert_eq!(instance.name, "Metadata Filter");
        assert_eq!(instance.id, id);
        assert_eq!(instance.result_count, None);

        assert!(state.remove_operator(&id));
        assert!(state.is_empty());
        assert!(!state.remove_operator(&id));
    }

    #[test]
    fn unknown_name_is_rejected_and_leaves_state_untouched() {
        let registry = registry();
        let mut state = PipelineState::new();
        state.add_operator("Semantic Search", &registry).unwrap();

        let err = state
            .add_operator("Nonexistent Operator", &registry)
            .unwrap_err();
        assert!(matches!(err, PipelineError::UnknownOperator { .. }));
        assert!(err.to_string().contains("Semantic Search"));
        assert_eq!(state.len(), 1);
    }

    #[test]
    fn instance_ids_stay_unique_through_churn() {
        let registry = registry();
        let mut state = PipelineState::new();
        let mut ids = Vec::new();

        for _ in 0..4 {
            ids.push(state.add_operator("Semantic Search", &registry).unwrap());
        }
        state.remove_operator(&ids[1]);
        ids.push(state.add_operator("Metadata Filter", &registry).unwrap());
        ids.push(state.add_operator("Semantic Search", &registry).unwrap());

        let current: Vec<String> = state.get_all_operators().into_iter().map(|op| op.id).collect();
        let mut deduped = current.clone();
        deduped.sort();
        deduped.dedup();
        assert_eq!(current.len(), deduped.len());
    }

    // ── Copy isolation ──────────────────────────────────────

    #[test]
    fn mutating_a_fetched_copy_does_not_touch_the_pipeline() {
        let registry = registry();
        let mut state = PipelineState::new();
        let id = state.add_operator("Semantic Search", &registry).unwrap();
        state.update_params(
            &id,
            bag(&[("query_text", ParamValue::Text("test".to_string()))]),
        );

        let mut copy = state.get_operator(&id).unwrap();
        copy.params.insert(
            "query_text".to_string(),
            ParamValue::Text("HACKED".to_string()),
        );
        copy.params
            .insert("new_param".to_string(), ParamValue::Integer(1));
        copy.name = "HACKED".to_string();

        let original = state.get_operator(&id).unwrap();
        assert_eq!(
            original.params.get("query_text"),
            Some(&ParamValue::Text("test".to_string()))
        );
        assert!(!original.params.contains_key("new_param"));
        assert_eq!(original.name, "Semantic Search");

        let mut all = state.get_all_operators();
        all[0].name = "HACKED".to_string();
        assert_eq!(state.get_all_operators()[0].name, "Semantic Search");
    }

    // ── Parameters and counts ───────────────────────────────

    #[test]
    fn update_params_replaces_the_whole_bag() {
        let registry = registry();
        let mut state = PipelineState::new();
        let id = state.add_operator("Metadata Filter", &registry).unwrap();

        state.update_params(
            &id,
            bag(&[
                ("artist", ParamValue::Text("James Ensor".to_string())),
                ("year_range", ParamValue::Range(Some(1880), Some(1900))),
            ]),
        );
        state.update_params(
            &id,
            bag(&[("title", ParamValue::Text("Intrigue".to_string()))]),
        );

        let params = state.get_operator(&id).unwrap().params;
        assert!(!params.contains_key("artist"));
        assert_eq!(
            params.get("title"),
            Some(&ParamValue::Text("Intrigue".to_string()))
        );
    }

    #[test]
    fn result_count_updates_are_cached_per_instance() {
        let registry = registry();
        let mut state = PipelineState::new();
        let id = state.add_operator("Metadata Filter", &registry).unwrap();

        assert!(state.update_result_count(&id, 42));
        assert_eq!(state.get_operator(&id).unwrap().result_count, Some(42));
        assert!(!state.update_result_count("no-such-id", 7));
    }

    // ── Reordering ──────────────────────────────────────────

    #[test]
    fn move_left_and_right_swap_neighbors() {
        let registry = registry();
        let mut state = PipelineState::new();
        let first = state.add_operator("Metadata Filter", &registry).unwrap();
        let second = state.add_operator("Semantic Search", &registry).unwrap();
        let third = state.add_operator("Similarity Search", &registry).unwrap();

        assert!(state.move_left(&second));
        let order: Vec<String> = state.get_all_operators().into_iter().map(|op| op.id).collect();
        assert_eq!(order, vec![second.clone(), first.clone(), third.clone()]);

        assert!(state.move_right(&second));
        let order: Vec<String> = state.get_all_operators().into_iter().map(|op| op.id).collect();
        assert_eq!(order, vec![first, second, third]);
    }

    #[test]
    fn moves_at_the_boundaries_are_noops() {
        let registry = registry();
        let mut state = PipelineState::new();
        let first = state.add_operator("Metadata Filter", &registry).unwrap();
        let last = state.add_operator("Semantic Search", &registry).unwrap();

        assert!(!state.move_left(&first));
        assert!(!state.move_right(&last));
        assert!(!state.move_left("no-such-id"));

        let order: Vec<String> = state.get_all_operators().into_iter().map(|op| op.id).collect();
        assert_eq!(order, vec![first, last]);
    }

    #[test]
    fn move_left_then_right_restores_order() {
        let registry = registry();
        let mut state = PipelineState::new();
        for _ in 0..4 {
            state.add_operator("Semantic Search", &registry).unwrap();
        }
        let before: Vec<String> = state.get_all_operators().into_iter().map(|op| op.id).collect();

        // Any non-boundary instance: left then right is the identity.
        for id in &before[1..] {
            assert!(state.move_left(id));
            assert!(state.move_right(id));
        }
        let after: Vec<String> = state.get_all_operators().into_iter().map(|op| op.id).collect();
        assert_eq!(before, after);
    }

    // ── Persistence ─────────────────────────────────────────

    #[test]
    fn serialize_then_deserialize_preserves_everything() {
        let registry = registry();
        let mut state = PipelineState::new();

        let first = state.add_operator("Metadata Filter", &registry).unwrap();
        state.update_params(
            &first,
            bag(&[("artist", ParamValue::Text("Ensor".to_string()))]),
        );
        state.update_result_count(&first, 25);

        let second = state.add_operator("Semantic Search", &registry).unwrap();
        state.update_params(
            &second,
            bag(&[(
                "query_text",
                ParamValue::Text("dark dramatic painting".to_string()),
            )]),
        );

        let json = state.serialize().unwrap();

        let mut restored = PipelineState::new();
        restored
            .deserialize("[{\"id\":\"stale\",\"name\":\"Old\",\"params\":{},\"result_count\":null}]")
            .unwrap();
        restored.deserialize(&json).unwrap();

        let ops = restored.get_all_operators();
        assert_eq!(ops.len(), 2);
        assert_eq!(ops[0].id, first);
        assert_eq!(ops[0].name, "Metadata Filter");
        assert_eq!(
            ops[0].params.get("artist"),
            Some(&ParamValue::Text("Ensor".to_string()))
        );
        assert_eq!(ops[0].result_count, Some(25));
        assert_eq!(ops[1].id, second);
        assert_eq!(
            ops[1].params.get("query_text"),
            Some(&ParamValue::Text("dark dramatic painting".to_string()))
        );
        assert_eq!(ops[1].result_count, None);
    }

    #[test]
    fn empty_pipeline_round_trips() {
        let state = PipelineState::new();
        let json = state.serialize().unwrap();
        let mut restored = PipelineState::new();
        restored.deserialize(&json).unwrap();
        assert!(restored.is_empty());
    }

    #[test]
    fn persisted_shape_is_the_documented_contract() {
        let registry = registry();
        let mut state = PipelineState::new();
        let id = state.add_operator("Semantic Search", &registry).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&state.serialize().unwrap()).unwrap();
        let entry = &value.as_array().unwrap()[0];
        assert_eq!(entry["id"], serde_json::Value::String(id));
        assert_eq!(entry["name"], "Semantic Search");
        assert!(entry["params"].is_object());
        assert!(entry["result_count"].is_null());
    }

    #[test]
    fn malformed_json_is_a_serialization_error() {
        let mut state = PipelineState::new();
        let err = state.deserialize("{not json").unwrap_err();
        assert!(matches!(err, PipelineError::Serialization(_)));
    }

    #[test]
    fn load_does_not_validate_operator_names() {
        // Deliberate: unknown names surface at execution time instead.
        let mut state = PipelineState::new();
        state
            .deserialize(
                "[{\"id\":\"a\",\"name\":\"Retired Operator\",\"params\":{},\"result_count\":3}]",
            )
            .unwrap();
        assert_eq!(state.len(), 1);
        assert_eq!(state.get_operator("a").unwrap().result_count, Some(3));
    }
}
