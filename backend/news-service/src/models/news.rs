//! News item models - stored document, API record and request payloads

use crate::error::{AppError, FieldError, Result};
use crate::models::patch::Patch;
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use utoipa::ToSchema;

/// A news item as persisted in the `news` collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsDocument {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub title: String,
    pub description: String,
    pub author: String,
}

/// A news item as returned to API clients. The identifier is always text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct News {
    #[serde(rename = "_id")]
    #[schema(example = "65f1c0d2a1b2c3d4e5f60718")]
    pub id: String,
    pub title: String,
    pub description: String,
    pub author: String,
}

impl From<NewsDocument> for News {
    fn from(doc: NewsDocument) -> Self {
        Self {
            id: doc.id.to_hex(),
            title: doc.title,
            description: doc.description,
            author: doc.author,
        }
    }
}

/// Payload of `POST /`.
#[derive(Debug, Clone, ToSchema)]
pub struct CreateNewsRequest {
    /// Assigned by the server; supplying it is a validation error.
    #[serde(rename = "_id")]
    #[schema(value_type = Option<String>, read_only)]
    pub id: Option<Value>,
    #[schema(example = "Wormhole discovered")]
    pub title: String,
    #[schema(example = "A wormhole was found in Jupiter's orbit")]
    pub description: String,
    #[schema(example = "NY Times")]
    pub author: String,
}

impl CreateNewsRequest {
    pub fn validate(&self) -> Result<()> {
        if self.id.is_some() {
            return Err(AppError::validation(
                "_id",
                "identifier is assigned by the server and must not be supplied",
            ));
        }
        Ok(())
    }

    /// Build the document to insert under a freshly generated identifier.
    pub fn into_document(self) -> NewsDocument {
        NewsDocument {
            id: ObjectId::new(),
            title: self.title,
            description: self.description,
            author: self.author,
        }
    }
}

/// Reads the members of a JSON object body; every offending member is
/// reported, each under its own name. Unknown members are ignored.
impl TryFrom<Map<String, Value>> for CreateNewsRequest {
    type Error = AppError;

    fn try_from(mut body: Map<String, Value>) -> Result<Self> {
        let mut errors = Vec::new();
        let id = body.remove("_id").filter(|v| !v.is_null());
        let title = required_string(&mut body, NewsField::Title, &mut errors);
        let description = required_string(&mut body, NewsField::Description, &mut errors);
        let author = required_string(&mut body, NewsField::Author, &mut errors);

        match (title, description, author) {
            (Some(title), Some(description), Some(author)) if errors.is_empty() => Ok(Self {
                id,
                title,
                description,
                author,
            }),
            _ => Err(AppError::Validation(errors)),
        }
    }
}

/// Payload of `PUT /{id}`. Every member may be omitted or `null`.
#[derive(Debug, Clone, Default, ToSchema)]
pub struct UpdateNewsRequest {
    #[schema(value_type = Option<String>)]
    pub title: Patch<String>,
    #[schema(value_type = Option<String>)]
    pub description: Patch<String>,
    #[schema(value_type = Option<String>)]
    pub author: Patch<String>,
}

impl UpdateNewsRequest {
    /// Collect the members that carry a value; `null` and omitted members are skipped.
    pub fn into_field_set(self) -> NewsFieldSet {
        let mut fields = NewsFieldSet::default();
        for (field, patch) in [
            (NewsField::Title, self.title),
            (NewsField::Description, self.description),
            (NewsField::Author, self.author),
        ] {
            if let Some(value) = patch.into_value() {
                fields.set(field, value);
            }
        }
        fields
    }
}

impl TryFrom<Map<String, Value>> for UpdateNewsRequest {
    type Error = AppError;

    fn try_from(mut body: Map<String, Value>) -> Result<Self> {
        let mut errors = Vec::new();
        let request = Self {
            title: patch_string(&mut body, NewsField::Title, &mut errors),
            description: patch_string(&mut body, NewsField::Description, &mut errors),
            author: patch_string(&mut body, NewsField::Author, &mut errors),
        };

        if errors.is_empty() {
            Ok(request)
        } else {
            Err(AppError::Validation(errors))
        }
    }
}

fn required_string(
    body: &mut Map<String, Value>,
    field: NewsField,
    errors: &mut Vec<FieldError>,
) -> Option<String> {
    match body.remove(field.as_str()) {
        Some(Value::String(value)) => Some(value),
        Some(other) => {
            errors.push(string_type_error(field, &other));
            None
        }
        None => {
            errors.push(FieldError::new(
                &["body", field.as_str()],
                "field required",
                "missing",
            ));
            None
        }
    }
}

fn patch_string(
    body: &mut Map<String, Value>,
    field: NewsField,
    errors: &mut Vec<FieldError>,
) -> Patch<String> {
    match body.remove(field.as_str()) {
        None => Patch::Absent,
        Some(Value::Null) => Patch::Null,
        Some(Value::String(value)) => Patch::Value(value),
        Some(other) => {
            errors.push(string_type_error(field, &other));
            Patch::Absent
        }
    }
}

fn string_type_error(field: NewsField, found: &Value) -> FieldError {
    let found = match found {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    };
    FieldError::new(
        &["body", field.as_str()],
        format!("expected a string, found {}", found),
        "string_type",
    )
}

/// Mutable fields of a news item
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NewsField {
    Title,
    Description,
    Author,
}

impl NewsField {
    pub fn as_str(&self) -> &'static str {
        match self {
            NewsField::Title => "title",
            NewsField::Description => "description",
            NewsField::Author => "author",
        }
    }
}

/// The set of field assignments issued by a partial update.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewsFieldSet {
    entries: Vec<(NewsField, String)>,
}

impl NewsFieldSet {
    pub fn set(&mut self, field: NewsField, value: impl Into<String>) {
        let value = value.into();
        match self.entries.iter_mut().find(|(f, _)| *f == field) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((field, value)),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (NewsField, &str)> {
        self.entries.iter().map(|(f, v)| (*f, v.as_str()))
    }

    /// Apply the assignments to a document, returning whether anything changed.
    pub fn apply_to(&self, doc: &mut NewsDocument) -> bool {
        let mut changed = false;
        for (field, value) in self.iter() {
            let slot = match field {
                NewsField::Title => &mut doc.title,
                NewsField::Description => &mut doc.description,
                NewsField::Author => &mut doc.author,
            };
            if slot.as_str() != value {
                *slot = value.to_string();
                changed = true;
            }
        }
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> NewsDocument {
        NewsDocument {
            id: ObjectId::new(),
            title: "A".into(),
            description: "B".into(),
            author: "C".into(),
        }
    }

    #[test]
    fn record_serializes_identifier_as_text() {
        let doc = sample();
        let hex = doc.id.to_hex();
        let json = serde_json::to_value(News::from(doc)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"_id": hex, "title": "A", "description": "B", "author": "C"})
        );
    }

    fn object(value: serde_json::Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            other => panic!("not an object: {other}"),
        }
    }

    fn field_errors(result: Result<impl std::fmt::Debug>) -> Vec<FieldError> {
        match result {
            Err(AppError::Validation(errors)) => errors,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn create_reads_object_members() {
        let req = CreateNewsRequest::try_from(object(serde_json::json!({
            "title": "A", "description": "B", "author": "C", "extra": 1
        })))
        .unwrap();
        assert_eq!(req.title, "A");
        assert_eq!(req.description, "B");
        assert_eq!(req.author, "C");
        assert!(req.validate().is_ok());
    }

    #[test]
    fn create_locates_every_bad_member() {
        let errors = field_errors(CreateNewsRequest::try_from(object(serde_json::json!({
            "title": 5, "description": null
        }))));
        let located: Vec<(Vec<String>, &str)> = errors
            .iter()
            .map(|e| (e.loc.clone(), e.kind.as_str()))
            .collect();
        assert_eq!(
            located,
            vec![
                (vec!["body".to_string(), "title".to_string()], "string_type"),
                (vec!["body".to_string(), "description".to_string()], "string_type"),
                (vec!["body".to_string(), "author".to_string()], "missing"),
            ]
        );
        assert_eq!(errors[0].msg, "expected a string, found number");
        assert_eq!(errors[1].msg, "expected a string, found null");
    }

    #[test]
    fn create_rejects_caller_identifier() {
        let req = CreateNewsRequest::try_from(object(serde_json::json!({
            "_id": "65f1c0d2a1b2c3d4e5f60718", "title": "A", "description": "B", "author": "C"
        })))
        .unwrap();
        assert!(matches!(req.validate(), Err(AppError::Validation(_))));

        let req = CreateNewsRequest::try_from(object(serde_json::json!({
            "_id": null, "title": "A", "description": "B", "author": "C"
        })))
        .unwrap();
        assert!(req.validate().is_ok());
    }

    #[test]
    fn create_assigns_distinct_identifiers() {
        let req = CreateNewsRequest {
            id: None,
            title: "A".into(),
            description: "B".into(),
            author: "C".into(),
        };
        let a = req.clone().into_document();
        let b = req.into_document();
        assert_ne!(a.id, b.id);
        assert_eq!(a.title, "A");
    }

    #[test]
    fn update_distinguishes_absent_null_and_value() {
        let req = UpdateNewsRequest::try_from(object(serde_json::json!({
            "title": "Z", "description": null
        })))
        .unwrap();
        assert_eq!(req.title, Patch::Value("Z".to_string()));
        assert_eq!(req.description, Patch::Null);
        assert_eq!(req.author, Patch::Absent);
    }

    #[test]
    fn update_locates_wrong_types() {
        let errors = field_errors(UpdateNewsRequest::try_from(object(serde_json::json!({
            "title": "Z", "author": ["x"]
        }))));
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].loc, vec!["body", "author"]);
        assert_eq!(errors[0].msg, "expected a string, found array");
    }

    #[test]
    fn field_set_keeps_only_values() {
        let req = UpdateNewsRequest {
            title: Patch::Value("Z".to_string()),
            description: Patch::Null,
            author: Patch::Absent,
        };
        let fields = req.into_field_set();
        assert_eq!(fields.len(), 1);
        assert_eq!(fields.iter().collect::<Vec<_>>(), vec![(NewsField::Title, "Z")]);
    }

    #[test]
    fn empty_update_yields_empty_field_set() {
        let req = UpdateNewsRequest::try_from(Map::new()).unwrap();
        assert!(req.into_field_set().is_empty());
    }

    #[test]
    fn apply_reports_changes() {
        let mut doc = sample();
        let mut fields = NewsFieldSet::default();
        fields.set(NewsField::Author, "C");
        assert!(!fields.apply_to(&mut doc));

        fields.set(NewsField::Author, "D");
        assert_eq!(fields.len(), 1);
        assert!(fields.apply_to(&mut doc));
        assert_eq!(doc.author, "D");
        assert_eq!(doc.title, "A");
    }
}
