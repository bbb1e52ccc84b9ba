use crowdfund_types::{InputValue, UserInputs};
use std::collections::BTreeMap;

/// Nests string-coerced `fields` under `node_id` in the shape step
/// evaluations expect: `{node_id: {field: {value: "<string>"}}}`.
pub fn create_user_inputs<K, V, I>(node_id: &str, fields: I) -> UserInputs
where
	K: Into<String>,
	V: ToString,
	I: IntoIterator<Item = (K, V)>,
{
	let node_inputs: BTreeMap<String, InputValue> = fields
		.into_iter()
		.map(|(key, value)| (key.into(), InputValue::new(value)))
		.collect();

	let mut inputs = UserInputs::new();
	inputs.insert(node_id.to_string(), node_inputs);
	inputs
}
