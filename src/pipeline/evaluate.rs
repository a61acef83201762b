use anyhow::Result;
use serde::de::DeserializeOwned;
use tracing::{info, warn};

use crate::llm::{build_category_prompt, parse_category_response, OpenRouterClient, SYSTEM_PROMPT};
use crate::models::{
    Category, CategoryFailure, CategoryResult, CategoryResults, RubricPayload, SentimentPayload,
};

/// Evaluate one category over the full formatted transcript.
///
/// Transport failures surface as hard errors; unparseable model output is
/// recovered locally as a typed `Failure` the merger can still use.
pub async fn evaluate_category<T: DeserializeOwned>(
    client: &OpenRouterClient,
    category: Category,
    transcript_text: &str,
) -> Result<CategoryResult<T>> {
    let prompt = build_category_prompt(category, transcript_text);
    let raw = client.send_chat(SYSTEM_PROMPT, &prompt).await?;
    Ok(parse_category_response(category, &raw))
}

/// Run all three category evaluations over the transcript.
///
/// The categories are independent, so they are issued concurrently. One
/// category's hard failure degrades only that category's result; the other
/// two proceed untouched.
pub async fn evaluate_all(client: &OpenRouterClient, transcript_text: &str) -> CategoryResults {
    info!(
        "Evaluating transcript across {} categories with model {}",
        Category::ALL.len(),
        client.model()
    );

    let (sentiment, dear_man, fast) = tokio::join!(
        evaluate_category::<SentimentPayload>(client, Category::Sentiment, transcript_text),
        evaluate_category::<RubricPayload>(client, Category::DearMan, transcript_text),
        evaluate_category::<RubricPayload>(client, Category::Fast, transcript_text),
    );

    CategoryResults {
        sentiment: degrade(Category::Sentiment, sentiment),
        dear_man: degrade(Category::DearMan, dear_man),
        fast: degrade(Category::Fast, fast),
    }
}

fn degrade<T>(category: Category, result: Result<CategoryResult<T>>) -> CategoryResult<T> {
    match result {
        Ok(result) => result,
        Err(e) => {
            warn!("Evaluating {} failed: {:#}", category, e);
            CategoryResult::Failure(CategoryFailure::error_only(e.to_string()))
        }
    }
}
