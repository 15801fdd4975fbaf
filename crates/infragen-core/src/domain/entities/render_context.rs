//! Data value handed to the template renderer.

use serde::Serialize;
use serde_json::Value;

use crate::domain::error::DomainError;

/// JSON-shaped value templates are rendered against.
///
/// Built once per run from the merged config so every template and the
/// `toJson`/`toYaml` helpers see the same structure.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderContext(Value);

impl RenderContext {
    /// Serialize `data` into a context. The top level must be an object so
    /// templates can reference fields by name.
    pub fn from_serialize<T: Serialize>(data: &T) -> Result<Self, DomainError> {
        let value = serde_json::to_value(data).map_err(|e| DomainError::Serialization {
            what: "render context",
            reason: e.to_string(),
        })?;
        if !value.is_object() {
            return Err(DomainError::InvalidRenderContext {
                reason: "top-level value must be a mapping".into(),
            });
        }
        Ok(Self(value))
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn into_value(self) -> Value {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn accepts_objects() {
        let ctx = RenderContext::from_serialize(&json!({"environment": "dev"})).unwrap();
        assert_eq!(ctx.as_value()["environment"], "dev");
    }

    #[test]
    fn rejects_scalars() {
        let err = RenderContext::from_serialize(&42).unwrap_err();
        assert!(matches!(err, DomainError::InvalidRenderContext { .. }));
    }
}
