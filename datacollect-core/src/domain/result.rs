use serde::{Deserialize, Serialize};

/// Per-element failure reported inside an otherwise successful response.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationError {
    /// Position of the offending item in the request payload.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub element_id: Option<i64>,
    pub message: String,
}

impl OperationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            ..Default::default()
        }
    }

    pub fn at_index(mut self, index: usize) -> Self {
        self.index = Some(index);
        self
    }

    pub fn for_element(mut self, element_id: i64) -> Self {
        self.element_id = Some(element_id);
        self
    }
}

/// Common accessors over results carrying a list of operation errors.
pub trait HasErrors {
    fn errors(&self) -> &[OperationError];

    fn is_success(&self) -> bool {
        self.errors().is_empty()
    }

    fn error_messages(&self) -> Vec<&str> {
        self.errors().iter().map(|e| e.message.as_str()).collect()
    }

    /// True when any error message contains `fragment`.
    fn has_error(&self, fragment: &str) -> bool {
        self.errors().iter().any(|e| e.message.contains(fragment))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateResult {
    #[serde(default)]
    pub created_ids: Vec<i64>,
    #[serde(default)]
    pub errors: Vec<OperationError>,
}

impl HasErrors for CreateResult {
    fn errors(&self) -> &[OperationError] {
        &self.errors
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateResult {
    #[serde(default)]
    pub updated_count: u64,
    #[serde(default)]
    pub errors: Vec<OperationError>,
}

impl HasErrors for UpdateResult {
    fn errors(&self) -> &[OperationError] {
        &self.errors
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteResult {
    #[serde(default)]
    pub deleted_count: u64,
    #[serde(default)]
    pub errors: Vec<OperationError>,
}

impl HasErrors for DeleteResult {
    fn errors(&self) -> &[OperationError] {
        &self.errors
    }
}

/// Error envelope returned with non-2xx statuses.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiErrorBody {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub errors: Vec<String>,
}

impl ApiErrorBody {
    /// Read an error body, treating anything that is not a non-empty
    /// envelope as one plain message.
    pub fn from_body(body: &str) -> Self {
        match serde_json::from_str::<ApiErrorBody>(body) {
            Ok(envelope) if !envelope.is_empty() => envelope,
            _ => ApiErrorBody {
                message: body.trim().to_string(),
                errors: Vec::new(),
            },
        }
    }

    pub fn is_empty(&self) -> bool {
        self.message.is_empty() && self.errors.is_empty()
    }

    /// The top-level message followed by every detail message.
    pub fn all_messages(&self) -> Vec<&str> {
        std::iter::once(self.message.as_str())
            .filter(|m| !m.is_empty())
            .chain(self.errors.iter().map(String::as_str))
            .collect()
    }

    pub fn mentions(&self, fragment: &str) -> bool {
        self.all_messages().iter().any(|m| m.contains(fragment))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_body_without_envelope_fields_keeps_raw_text() {
        let raw = r#"{"title":"Forbidden","detail":"Нет прав на измерение"}"#;

        let body = ApiErrorBody::from_body(raw);

        assert_eq!(body.message, raw);
        assert!(body.mentions("Нет прав"));
    }

    #[test]
    fn test_error_body_envelope_is_parsed() {
        let body = ApiErrorBody::from_body(r#"{"message":"Validation failed","errors":["a"]}"#);

        assert_eq!(body.message, "Validation failed");
        assert_eq!(body.errors, vec!["a".to_string()]);
    }

    #[test]
    fn test_has_error_matches_fragment() {
        let result = UpdateResult {
            updated_count: 1,
            errors: vec![OperationError::new(
                "Значение атрибута 'Код' должно быть уникальным",
            )
            .for_element(42)],
        };

        assert!(!result.is_success());
        assert!(result.has_error("должно быть уникальным"));
        assert!(!result.has_error("не найден"));
        assert_eq!(result.error_messages().len(), 1);
    }

    #[test]
    fn test_error_body_messages() {
        let body: ApiErrorBody = serde_json::from_str(
            r#"{"message": "Validation failed", "errors": ["Name is required"]}"#,
        )
        .unwrap();

        assert_eq!(body.all_messages(), vec!["Validation failed", "Name is required"]);
        assert!(body.mentions("required"));
    }
}
