use crate::foundation::error::{WaypostError, WaypostResult};

/// Validated step identifier.
///
/// Ids match `^[a-z][a-z0-9]*$`; anything else is rejected before the step can
/// reach the surface.
#[derive(Clone, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct StepId(String);

impl StepId {
    /// Validate and wrap an id.
    pub fn new(id: impl Into<String>) -> WaypostResult<Self> {
        let id = id.into();
        let mut chars = id.chars();
        let head_ok = chars.next().is_some_and(|c| c.is_ascii_lowercase());
        let tail_ok = chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit());
        if !(head_ok && tail_ok) {
            return Err(WaypostError::validation(format!(
                "invalid step id '{id}': must match ^[a-z][a-z0-9]*$"
            )));
        }
        Ok(Self(id))
    }

    /// The id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for StepId {
    type Error = WaypostError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<StepId> for String {
    fn from(value: StepId) -> Self {
        value.0
    }
}

impl std::fmt::Display for StepId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// One highlighted-element-plus-text unit in a tour.
///
/// `target` is a CSS selector string so sequences persist as plain structured
/// data; a missing target degrades to a centered, connector-less text box.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Step {
    /// Unique step identifier.
    pub id: StepId,
    /// Explanatory text; may contain markup.
    pub text: String,
    /// Target element selector, e.g. `"#save-button"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
}

impl Step {
    /// Build a step, validating the id.
    pub fn new(
        id: impl Into<String>,
        text: impl Into<String>,
        target: Option<&str>,
    ) -> WaypostResult<Self> {
        Ok(Self {
            id: StepId::new(id)?,
            text: text.into(),
            target: target.map(str::to_string),
        })
    }
}

/// The full ordered list of steps for one tour.
pub type Sequence = Vec<Step>;

/// Parse a JSON-serialized sequence.
pub fn parse_sequence(json: &str) -> WaypostResult<Sequence> {
    serde_json::from_str(json).map_err(|e| WaypostError::serde(format!("invalid sequence: {e}")))
}

/// Serialize a sequence to JSON.
pub fn sequence_to_json(sequence: &Sequence) -> WaypostResult<String> {
    serde_json::to_string(sequence).map_err(|e| WaypostError::serde(e.to_string()))
}

#[cfg(test)]
#[path = "../../tests/unit/tour/step.rs"]
mod tests;
