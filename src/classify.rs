use std::{cmp::Ordering, time::Duration};

use serde::{Deserialize, Serialize};

pub const CANDIDATE_CATEGORIES: &[&str] = &[
    "Food & Dining",
    "Groceries",
    "Rent",
    "Utilities",
    "Transport",
    "Shopping",
    "Entertainment",
    "Health",
    "Education",
    "Travel",
    "Other",
];

pub const FALLBACK_CATEGORY: &str = "Other";

#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Classification {
    pub category: String,
    pub confidence: f64,
    pub all_predictions: Vec<Prediction>,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct Prediction {
    pub category: String,
    pub confidence: f64,
}

#[derive(Debug, Deserialize)]
pub struct ZeroShotResponse {
    pub labels: Vec<String>,
    pub scores: Vec<f64>,
}

pub fn fallback() -> Classification {
    Classification {
        category: FALLBACK_CATEGORY.to_string(),
        confidence: 0.0,
        all_predictions: Vec::new(),
    }
}

pub fn rank_predictions(response: ZeroShotResponse) -> Classification {
    let mut predictions: Vec<Prediction> = response
        .labels
        .into_iter()
        .zip(response.scores)
        .map(|(category, confidence)| Prediction {
            category,
            confidence,
        })
        .collect();

    predictions.sort_by(|a, b| {
        b.confidence
            .partial_cmp(&a.confidence)
            .unwrap_or(Ordering::Equal)
    });

    let Some(top) = predictions.first() else {
        return fallback();
    };

    let category = top.category.clone();
    let confidence = top.confidence;
    let all_predictions = predictions.into_iter().skip(1).take(3).collect();

    Classification {
        category,
        confidence,
        all_predictions,
    }
}

// A dead, slow or misbehaving classifier yields the fallback category,
// never an error.
pub async fn classify(
    base_url: &str,
    api_key: Option<&str>,
    timeout: Duration,
    description: &str,
) -> Classification {
    let client = match reqwest::Client::builder().timeout(timeout).build() {
        Ok(client) => client,
        Err(err) => {
            tracing::error!("Error building classifier HTTP client: {:#?}", err);
            return fallback();
        }
    };

    let body = serde_json::json!({
        "inputs": description,
        "parameters": { "candidate_labels": CANDIDATE_CATEGORIES },
    });

    let mut request = client.post(base_url).json(&body);
    if let Some(key) = api_key {
        request = request.bearer_auth(key);
    }

    let response = match request.send().await {
        Ok(response) => response,
        Err(err) => {
            tracing::error!("Error occurred in request to classifier API: {:#?}", err);
            return fallback();
        }
    };

    if !response.status().is_success() {
        tracing::error!(
            "Classifier API responded with status code {}",
            response.status()
        );
        return fallback();
    }

    match response.json::<ZeroShotResponse>().await {
        Ok(parsed) => rank_predictions(parsed),
        Err(err) => {
            tracing::error!(
                "Error occurred while deserialising classifier response: {:#?}",
                err
            );
            fallback()
        }
    }
}
