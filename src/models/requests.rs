//! Request DTOs for the todo API
//!
//! Defines the structure of incoming HTTP request bodies.

use serde::{Deserialize, Deserializer};

use super::todo::{validate_title, NewTodo, TodoChanges};

/// Request body for POST /api/todos
///
/// # Fields
/// - `title`: Required, non-empty
/// - `description`: Optional, defaults to an empty string
/// - `completed`: Optional, defaults to false
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateTodoRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "present")]
    pub description: Option<Option<String>>,
    #[serde(default)]
    pub completed: Option<bool>,
}

impl CreateTodoRequest {
    /// Validates the request data
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        match &self.title {
            None => Some("Title is required".to_string()),
            Some(title) => validate_title(title),
        }
    }

    /// Converts into an insert, filling in defaults.
    ///
    /// Call [`validate`](Self::validate) first; a missing title becomes empty.
    pub fn into_new_todo(self) -> NewTodo {
        NewTodo {
            title: self.title.unwrap_or_default(),
            description: self.description.unwrap_or_else(|| Some(String::new())),
            completed: self.completed.unwrap_or(false),
        }
    }
}

/// Request body for PUT /api/todos/:id
///
/// Every field is optional; absent fields keep their stored value and unknown
/// fields are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateTodoRequest {
    #[serde(default, deserialize_with = "present")]
    pub title: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub description: Option<Option<String>>,
    #[serde(default)]
    pub completed: Option<bool>,
}

impl UpdateTodoRequest {
    /// Validates the request data
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        match &self.title {
            None => None,
            Some(None) => Some("Title cannot be null".to_string()),
            Some(Some(title)) => validate_title(title),
        }
    }

    pub fn into_changes(self) -> TodoChanges {
        TodoChanges {
            title: self.title.flatten(),
            description: self.description,
            completed: self.completed,
        }
    }
}

/// Marks a field that was present in the payload, even when it is `null`.
fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_request_defaults() {
        let req: CreateTodoRequest = serde_json::from_str(r#"{"title": "Buy milk"}"#).unwrap();
        assert!(req.validate().is_none());
        let new = req.into_new_todo();
        assert_eq!(new.title, "Buy milk");
        assert_eq!(new.description.as_deref(), Some(""));
        assert!(!new.completed);
    }

    #[test]
    fn test_create_request_explicit_null_description() {
        let req: CreateTodoRequest =
            serde_json::from_str(r#"{"title": "a", "description": null}"#).unwrap();
        assert_eq!(req.into_new_todo().description, None);
    }

    #[test]
    fn test_create_request_missing_title() {
        let req: CreateTodoRequest = serde_json::from_str(r#"{"description": "x"}"#).unwrap();
        assert!(req.validate().is_some());
    }

    #[test]
    fn test_create_request_empty_title() {
        let req: CreateTodoRequest = serde_json::from_str(r#"{"title": ""}"#).unwrap();
        assert!(req.validate().is_some());
    }

    #[test]
    fn test_update_request_tracks_presence() {
        let req: UpdateTodoRequest =
            serde_json::from_str(r#"{"completed": true, "priority": 3}"#).unwrap();
        assert!(req.validate().is_none());
        let changes = req.into_changes();
        assert_eq!(changes.completed, Some(true));
        assert!(changes.title.is_none());
        assert!(changes.description.is_none());
    }

    #[test]
    fn test_update_request_null_description_clears() {
        let req: UpdateTodoRequest = serde_json::from_str(r#"{"description": null}"#).unwrap();
        assert_eq!(req.into_changes().description, Some(None));
    }

    #[test]
    fn test_update_request_rejects_null_or_empty_title() {
        let req: UpdateTodoRequest = serde_json::from_str(r#"{"title": null}"#).unwrap();
        assert!(req.validate().is_some());
        let req: UpdateTodoRequest = serde_json::from_str(r#"{"title": ""}"#).unwrap();
        assert!(req.validate().is_some());
    }
}
