//! Storefront FAQ entries.

use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;

use super::store::StoreApi;
use crate::http::{ApiError, RequestOptions};

const FAQS_PATH: &str = "/store/faqs/";

/// A question and answer shown on the storefront.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Faq {
    /// Assigned by the backend on creation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub question: String,
    pub answer: String,
}

impl Faq {
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            id: None,
            question: question.into(),
            answer: answer.into(),
        }
    }
}

fn faq_path(id: i64) -> String {
    format!("{FAQS_PATH}{id}/")
}

impl StoreApi {
    pub async fn list_faqs(&self) -> Result<Vec<Faq>, ApiError> {
        let options = RequestOptions::get().error_message("Failed to load FAQs");
        self.executor.execute_as(FAQS_PATH, options).await
    }

    pub async fn create_faq(&self, question: &str, answer: &str) -> Result<Faq, ApiError> {
        let options = RequestOptions::post()
            .json(json!({ "question": question.trim(), "answer": answer.trim() }))
            .error_message("Failed to create FAQ");
        let faq: Faq = self.executor.execute_as(FAQS_PATH, options).await?;
        info!(faq_id = ?faq.id, "FAQ created");
        Ok(faq)
    }

    pub async fn update_faq(&self, id: i64, question: &str, answer: &str) -> Result<Faq, ApiError> {
        let options = RequestOptions::put()
            .json(json!({ "question": question.trim(), "answer": answer.trim() }))
            .error_message("Failed to update FAQ");
        let faq = self.executor.execute_as(&faq_path(id), options).await?;
        info!(faq_id = id, "FAQ updated");
        Ok(faq)
    }

    pub async fn delete_faq(&self, id: i64) -> Result<(), ApiError> {
        let options = RequestOptions::delete().error_message("Failed to delete FAQ");
        self.executor.execute(&faq_path(id), options).await?;
        info!(faq_id = id, "FAQ deleted");
        Ok(())
    }
}
