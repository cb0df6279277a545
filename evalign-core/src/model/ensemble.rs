use serde::{Deserialize, Serialize};

use evalign_types::EvalignError;

/// Ordered ensemble member values with optional member labels.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Ensemble {
    members: Vec<f64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    labels: Vec<String>,
}

impl Ensemble {
    /// Unlabelled members.
    #[must_use]
    pub const fn new(members: Vec<f64>) -> Self {
        Self {
            members,
            labels: Vec::new(),
        }
    }

    /// Labelled members; one label per member.
    ///
    /// # Errors
    /// Returns `InvalidArg` when the label count differs from the member count.
    pub fn with_labels(members: Vec<f64>, labels: Vec<String>) -> Result<Self, EvalignError> {
        if !labels.is_empty() && labels.len() != members.len() {
            return Err(EvalignError::invalid_arg(format!(
                "expected {} ensemble labels, got {}",
                members.len(),
                labels.len()
            )));
        }
        Ok(Self { members, labels })
    }

    /// Member values in order.
    #[must_use]
    pub fn members(&self) -> &[f64] {
        &self.members
    }

    /// Member labels, if any.
    #[must_use]
    pub fn labels(&self) -> Option<&[String]> {
        (!self.labels.is_empty()).then_some(self.labels.as_slice())
    }

    /// Number of members.
    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Returns true when there are no members.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Value of the member with the given label.
    #[must_use]
    pub fn member_by_label(&self, label: &str) -> Option<f64> {
        let idx = self.labels.iter().position(|l| l == label)?;
        self.members.get(idx).copied()
    }
}
