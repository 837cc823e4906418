//! # Domain Entities
//!
//! Registered states and the transitions that introduce or update them.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use shared_types::JsonMap;

/// A state held by the registry: identity, structural markers, payload.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisteredState {
    /// Stable identity.
    pub id: String,
    /// Structural markers (`isRoot`, ...).
    pub structure: JsonMap,
    /// Opaque payload; replaced wholesale on self-transitions.
    pub data: Value,
}

impl RegisteredState {
    /// Construct a root state.
    pub fn root(id: impl Into<String>, data: Value) -> Self {
        let mut structure = JsonMap::new();
        structure.insert("isRoot".to_string(), Value::Bool(true));
        Self {
            id: id.into(),
            structure,
            data,
        }
    }

    /// Construct a non-root state.
    pub fn node(id: impl Into<String>, data: Value) -> Self {
        Self {
            id: id.into(),
            structure: JsonMap::new(),
            data,
        }
    }

    /// Whether the structure declares this state a root.
    pub fn is_root(&self) -> bool {
        self.structure.get("isRoot") == Some(&Value::Bool(true))
    }
}

/// A proposed registry change.
///
/// `from = None` with a root `to` declares a new root; `from = Some(id)`
/// with `id == to.id` updates that state in place. Every other shape is
/// rejected.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transition {
    /// Predecessor declaration.
    pub from: Option<String>,
    /// The state after the transition.
    pub to: RegisteredState,
}

impl Transition {
    /// Declare a new root.
    pub fn declare_root(to: RegisteredState) -> Self {
        Self { from: None, to }
    }

    /// Update an existing state in place.
    pub fn self_update(to: RegisteredState) -> Self {
        Self {
            from: Some(to.id.clone()),
            to,
        }
    }
}

/// An accepted transition, as recorded in the ordered log.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AcceptedTransition {
    /// Position in the accept order; dense from 0.
    pub order_index: u64,
    /// Predecessor declaration of the accepted transition.
    pub from: Option<String>,
    /// Id of the state introduced or updated.
    pub to_id: String,
}
