use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::RelayError;

/// The two fixed model configurations exposed by the relay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelSlot {
    First,
    Second,
}

#[derive(Debug, Serialize)]
pub struct ModelInfo {
    pub internal_id: &'static str,
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
}

impl ModelSlot {
    pub const ALL: [ModelSlot; 2] = [ModelSlot::First, ModelSlot::Second];

    pub fn info(self) -> ModelInfo {
        match self {
            ModelSlot::First => ModelInfo {
                internal_id: "llm1",
                id: "gemini-2.0-pro-exp-02-05",
                name: "Gemini 2.0 Pro Experimental",
                description: "First-pass model for generating responses",
            },
            ModelSlot::Second => ModelInfo {
                internal_id: "llm2",
                id: "gemini-2.0-flash-thinking-exp-01-21",
                name: "Gemini 2.0 Flash Thinking Experimental",
                description: "Model for refining and improving responses",
            },
        }
    }

    pub fn external_id(self) -> &'static str {
        self.info().id
    }

    /// Only the refinement slot honours `use_refinement`.
    pub fn supports_refinement(self) -> bool {
        matches!(self, ModelSlot::Second)
    }
}

impl fmt::Display for ModelSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.info().internal_id)
    }
}

impl FromStr for ModelSlot {
    type Err = RelayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "first" | "llm1" => Ok(ModelSlot::First),
            "second" | "llm2" => Ok(ModelSlot::Second),
            other => Err(RelayError::UnknownSlot(other.to_string())),
        }
    }
}

/// Static model table keyed by internal id.
pub fn model_table() -> BTreeMap<&'static str, ModelInfo> {
    ModelSlot::ALL
        .into_iter()
        .map(|slot| {
            let info = slot.info();
            (info.internal_id, info)
        })
        .collect()
}
