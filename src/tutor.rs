//! Request and response types exchanged with the tutoring backend.
//!
//! The backend decides which algebraic step applies; this crate only
//! produces the request from a selection and reads the answer.

use crate::common::{Error, Result};
use crate::formula::ast::is_valid_path;
use crate::surface::SurfaceNode;
use serde::{Deserialize, Serialize};

/// A step request for the node the user selected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepRequest {
    pub expression_latex: String,
    pub selection_path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferred_primitive_id: Option<String>,
}

impl StepRequest {
    pub fn new(
        expression_latex: impl Into<String>,
        selection_path: impl Into<String>,
    ) -> Result<Self> {
        let request = Self {
            expression_latex: expression_latex.into(),
            selection_path: selection_path.into(),
            preferred_primitive_id: None,
        };
        request.validate()?;
        Ok(request)
    }

    /// Request targeting the AST node a surface node is linked to.
    ///
    /// Fails with [`Error::InvalidPath`] when the node carries no link.
    pub fn for_node(expression_latex: impl Into<String>, node: &SurfaceNode) -> Result<Self> {
        let path = node.ast_node_id.clone().ok_or_else(|| {
            Error::InvalidPath(format!("surface node {} is not linked to the expression", node.id))
        })?;
        Self::new(expression_latex, path)
    }

    pub fn with_preferred_primitive(mut self, id: impl Into<String>) -> Self {
        self.preferred_primitive_id = Some(id.into());
        self
    }

    /// Check that the selection is a well-formed structural path.
    ///
    /// Deserialized requests are not validated automatically.
    pub fn validate(&self) -> Result<()> {
        if is_valid_path(&self.selection_path) {
            Ok(())
        } else {
            Err(Error::InvalidPath(self.selection_path.clone()))
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// One alternative offered when several steps apply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepChoice {
    pub id: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum StepResponse {
    /// The step was applied and produced a new expression
    #[serde(rename_all = "camelCase")]
    Applied { expression_latex: String },
    /// The caller must pick one of several steps
    Choices { choices: Vec<StepChoice> },
    Error { message: String },
}

impl StepResponse {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// The new expression, for an applied step.
    pub fn expression(&self) -> Option<&str> {
        match self {
            StepResponse::Applied { expression_latex } => Some(expression_latex),
            _ => None,
        }
    }
}
