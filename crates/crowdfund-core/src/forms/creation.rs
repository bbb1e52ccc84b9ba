//! Campaign creation form.

use super::{create_user_inputs, max_length, positive_amount, require, submit_step, FormError};
use crate::engine::TransactionOrchestrator;
use crowdfund_types::{TrailRef, TransactionState};
use serde::{Deserialize, Serialize};
use std::fmt;

pub const CREATE_NODE: &str = "create_crowdfund_node";
pub const CREATE_STEP: u32 = 1;

pub const MAX_TITLE_LENGTH: usize = 100;
pub const MAX_DESCRIPTION_LENGTH: usize = 500;
/// Campaign durations offered, in days.
pub const DURATIONS: [u32; 5] = [7, 14, 30, 60, 90];

fn default_duration() -> u32 {
	30
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
	#[default]
	General,
	Technology,
	Art,
	Community,
	Charity,
	Education,
}

impl fmt::Display for Category {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let name = match self {
			Category::General => "general",
			Category::Technology => "technology",
			Category::Art => "art",
			Category::Community => "community",
			Category::Charity => "charity",
			Category::Education => "education",
		};
		f.write_str(name)
	}
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreationInput {
	pub title: String,
	pub description: String,
	/// Funding goal in ETH.
	pub goal_amount: String,
	#[serde(default = "default_duration")]
	pub duration: u32,
	#[serde(default)]
	pub category: Category,
}

impl CreationInput {
	pub fn validate(&self) -> Result<(), FormError> {
		require("Title", &self.title)?;
		max_length("Title", &self.title, MAX_TITLE_LENGTH)?;
		require("Description", &self.description)?;
		max_length("Description", &self.description, MAX_DESCRIPTION_LENGTH)?;
		positive_amount("Goal amount", &self.goal_amount)?;
		if !DURATIONS.contains(&self.duration) {
			return Err(FormError::Invalid(format!(
				"Duration must be one of {:?} days",
				DURATIONS
			)));
		}
		Ok(())
	}

	fn fields(&self) -> [(&'static str, String); 5] {
		[
			("inputs.title", self.title.clone()),
			("inputs.description", self.description.clone()),
			("inputs.goalAmount", self.goal_amount.clone()),
			("inputs.duration", self.duration.to_string()),
			("inputs.category", self.category.to_string()),
		]
	}
}

pub struct CreationForm {
	orchestrator: TransactionOrchestrator,
	trail: TrailRef,
}

impl CreationForm {
	pub fn new(orchestrator: TransactionOrchestrator, trail: TrailRef) -> Self {
		Self {
			orchestrator,
			trail,
		}
	}

	pub fn orchestrator(&self) -> &TransactionOrchestrator {
		&self.orchestrator
	}

	/// Creates a campaign from `input`.
	pub async fn submit(&self, input: &CreationInput) -> Result<TransactionState, FormError> {
		input.validate()?;
		let user_inputs = create_user_inputs(CREATE_NODE, input.fields());
		submit_step(
			&self.orchestrator,
			&self.trail,
			CREATE_STEP,
			CREATE_NODE,
			&user_inputs,
		)
		.await
	}

	pub fn reset(&self) {
		self.orchestrator.reset();
	}
}
