//! Firestore-backed InterviewRepository implementation.
//!
//! Talks to the Firestore REST v1 API directly. Lookup operations keep
//! the tri-state contract of the repository trait: HTTP 404 maps to
//! `Ok(None)`, while transport and store failures surface as errors
//! instead of being collapsed into "not found".

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::{Value, json};

use prepcall_core::interview::{InterviewRecord, InterviewRepository};
use prepcall_core::{PrepcallError, Result};

const BASE_URL: &str = "https://firestore.googleapis.com/v1";
const COLLECTION_ID: &str = "interviews";

/// Repository over the Firestore REST API.
pub struct FirestoreInterviewRepository {
    client: Client,
    base_url: String,
    project_id: String,
    access_token: String,
}

impl FirestoreInterviewRepository {
    /// Creates a repository for the given project.
    pub fn new(project_id: impl Into<String>, access_token: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: BASE_URL.to_string(),
            project_id: project_id.into(),
            access_token: access_token.into(),
        }
    }

    /// Points the repository at a different API host.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn documents_url(&self) -> String {
        format!(
            "{}/projects/{}/databases/(default)/documents",
            self.base_url, self.project_id
        )
    }

    async fn run_query(&self, query: Value) -> Result<Vec<InterviewRecord>> {
        let response = self
            .client
            .post(format!("{}:runQuery", self.documents_url()))
            .bearer_auth(&self.access_token)
            .json(&json!({ "structuredQuery": query }))
            .send()
            .await
            .map_err(|err| {
                PrepcallError::upstream(format!("Firestore query request failed: {err}"))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read Firestore error body".to_string());
            tracing::warn!(%status, "Firestore query rejected");
            return Err(PrepcallError::data_access(format!(
                "Firestore query failed ({status}): {body}"
            )));
        }

        let rows: Vec<Value> = response.json().await.map_err(|err| {
            PrepcallError::data_access(format!("Failed to parse Firestore query response: {err}"))
        })?;

        let mut records = Vec::new();
        for row in rows {
            // runQuery streams one row per document plus trailing rows that
            // only carry a readTime.
            let Some(document) = row.get("document") else {
                continue;
            };
            records.push(decode_document(document)?);
        }
        Ok(records)
    }
}

#[async_trait]
impl InterviewRepository for FirestoreInterviewRepository {
    async fn create(&self, interview: &InterviewRecord) -> Result<String> {
        let response = self
            .client
            .post(format!("{}/{}", self.documents_url(), COLLECTION_ID))
            .bearer_auth(&self.access_token)
            .json(&encode_document(interview))
            .send()
            .await
            .map_err(|err| {
                PrepcallError::upstream(format!("Firestore create request failed: {err}"))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read Firestore error body".to_string());
            tracing::warn!(%status, "Firestore create rejected");
            return Err(PrepcallError::data_access(format!(
                "Firestore create failed ({status}): {body}"
            )));
        }

        let created: Value = response.json().await.map_err(|err| {
            PrepcallError::data_access(format!("Failed to parse Firestore create response: {err}"))
        })?;

        created
            .get("name")
            .and_then(Value::as_str)
            .map(document_id)
            .ok_or_else(|| {
                PrepcallError::data_access("Firestore create response carried no document name")
            })
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<InterviewRecord>> {
        let response = self
            .client
            .get(format!("{}/{}/{}", self.documents_url(), COLLECTION_ID, id))
            .bearer_auth(&self.access_token)
            .send()
            .await
            .map_err(|err| {
                PrepcallError::upstream(format!("Firestore get request failed: {err}"))
            })?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        if !response.status().is_success() {
            let status = response.status();
            return Err(PrepcallError::data_access(format!(
                "Firestore get failed ({status})"
            )));
        }

        let document: Value = response.json().await.map_err(|err| {
            PrepcallError::data_access(format!("Failed to parse Firestore document: {err}"))
        })?;

        decode_document(&document).map(Some)
    }

    async fn find_by_user(&self, user_id: &str) -> Result<Vec<InterviewRecord>> {
        self.run_query(json!({
            "from": [{ "collectionId": COLLECTION_ID }],
            "where": {
                "fieldFilter": {
                    "field": { "fieldPath": "userId" },
                    "op": "EQUAL",
                    "value": { "stringValue": user_id },
                }
            },
            "orderBy": [{
                "field": { "fieldPath": "createdAt" },
                "direction": "DESCENDING",
            }],
        }))
        .await
    }

    async fn find_latest(
        &self,
        excluding_user_id: &str,
        limit: usize,
    ) -> Result<Vec<InterviewRecord>> {
        // The inequality filter combined with ordering on createdAt relies
        // on the store's composite index for this collection.
        self.run_query(json!({
            "from": [{ "collectionId": COLLECTION_ID }],
            "where": {
                "compositeFilter": {
                    "op": "AND",
                    "filters": [
                        {
                            "fieldFilter": {
                                "field": { "fieldPath": "finalized" },
                                "op": "EQUAL",
                                "value": { "booleanValue": true },
                            }
                        },
                        {
                            "fieldFilter": {
                                "field": { "fieldPath": "userId" },
                                "op": "NOT_EQUAL",
                                "value": { "stringValue": excluding_user_id },
                            }
                        },
                    ],
                }
            },
            "orderBy": [{
                "field": { "fieldPath": "createdAt" },
                "direction": "DESCENDING",
            }],
            "limit": limit,
        }))
        .await
    }
}

/// Encodes a record into a Firestore document body.
fn encode_document(interview: &InterviewRecord) -> Value {
    json!({
        "fields": {
            "role": { "stringValue": interview.role },
            "type": { "stringValue": interview.interview_type },
            "level": { "stringValue": interview.level },
            "techStack": { "arrayValue": { "values": string_values(&interview.tech_stack) } },
            "questions": { "arrayValue": { "values": string_values(&interview.questions) } },
            "userId": { "stringValue": interview.user_id },
            "finalized": { "booleanValue": interview.finalized },
            "coverImage": { "stringValue": interview.cover_image },
            "createdAt": { "stringValue": interview.created_at },
        }
    })
}

fn string_values(values: &[String]) -> Vec<Value> {
    values
        .iter()
        .map(|value| json!({ "stringValue": value }))
        .collect()
}

/// Decodes a Firestore document into a record.
fn decode_document(document: &Value) -> Result<InterviewRecord> {
    let fields = document
        .get("fields")
        .and_then(Value::as_object)
        .ok_or_else(|| PrepcallError::data_access("Firestore document carried no fields"))?;

    Ok(InterviewRecord {
        id: document
            .get("name")
            .and_then(Value::as_str)
            .map(document_id),
        role: string_field(fields, "role")?,
        interview_type: string_field(fields, "type")?,
        level: string_field(fields, "level")?,
        tech_stack: string_array_field(fields, "techStack")?,
        questions: string_array_field(fields, "questions")?,
        user_id: string_field(fields, "userId")?,
        finalized: bool_field(fields, "finalized")?,
        cover_image: string_field(fields, "coverImage")?,
        created_at: string_field(fields, "createdAt")?,
    })
}

/// Extracts the document id from a full resource name.
fn document_id(name: &str) -> String {
    name.rsplit('/').next().unwrap_or(name).to_string()
}

fn string_field(fields: &serde_json::Map<String, Value>, key: &str) -> Result<String> {
    fields
        .get(key)
        .and_then(|value| value.get("stringValue"))
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| missing_field(key))
}

fn bool_field(fields: &serde_json::Map<String, Value>, key: &str) -> Result<bool> {
    fields
        .get(key)
        .and_then(|value| value.get("booleanValue"))
        .and_then(Value::as_bool)
        .ok_or_else(|| missing_field(key))
}

fn string_array_field(fields: &serde_json::Map<String, Value>, key: &str) -> Result<Vec<String>> {
    let values = fields
        .get(key)
        .and_then(|value| value.get("arrayValue"))
        .and_then(|value| value.get("values"))
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default();

    values
        .iter()
        .map(|value| {
            value
                .get("stringValue")
                .and_then(Value::as_str)
                .map(str::to_string)
                .ok_or_else(|| missing_field(key))
        })
        .collect()
}

fn missing_field(key: &str) -> PrepcallError {
    PrepcallError::data_access(format!("Firestore document is missing field '{key}'"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> InterviewRecord {
        InterviewRecord {
            id: None,
            role: "Backend Engineer".to_string(),
            interview_type: "technical".to_string(),
            level: "Senior".to_string(),
            tech_stack: vec!["rust".to_string(), "postgres".to_string()],
            questions: vec!["Why Rust?".to_string()],
            user_id: "u1".to_string(),
            finalized: true,
            cover_image: "/covers/reddit.png".to_string(),
            created_at: "2025-06-01T10:00:00Z".to_string(),
        }
    }

    #[test]
    fn documents_round_trip() {
        let mut encoded = encode_document(&record());
        encoded["name"] = Value::String(
            "projects/p/databases/(default)/documents/interviews/doc-42".to_string(),
        );

        let decoded = decode_document(&encoded).unwrap();
        assert_eq!(decoded.id.as_deref(), Some("doc-42"));
        assert_eq!(
            decoded,
            InterviewRecord {
                id: Some("doc-42".to_string()),
                ..record()
            }
        );
    }

    #[test]
    fn decode_rejects_documents_without_fields() {
        let err = decode_document(&json!({ "name": "x" })).unwrap_err();
        assert!(matches!(err, PrepcallError::DataAccess(_)));
    }

    #[test]
    fn document_id_takes_the_final_path_segment() {
        assert_eq!(
            document_id("projects/p/databases/(default)/documents/interviews/abc"),
            "abc"
        );
        assert_eq!(document_id("bare-id"), "bare-id");
    }
}
