use std::time::Duration;

use reqwest::blocking::{Client, Response};
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;

use study_core::retry::retry_with_backoff;
use study_core::{
    CodingProblem, Difficulty, Error, MasteryLevel, MasteryStats, NewQuestion, ProblemGateway,
    ProblemStats, QuestionGateway, QuestionItem, Result, StudyStatus,
};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

const DAILY_RETRY_ATTEMPTS: u32 = 3;
const DAILY_RETRY_BACKOFF: Duration = Duration::from_secs(1);

// The backend caps the page size of the problem listing at 100
const PROBLEM_PAGE_LIMIT: usize = 100;

/// Blocking HTTP client for the study backend. Implements both gateway
/// traits against the backend's JSON routes.
pub struct ApiClient {
    http: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Result<Self> {
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(to_transport)?;

        Ok(ApiClient {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let response = self.http.get(self.url(path)).send().map_err(to_transport)?;
        let response = ensure_ok(response)?;
        response.json().map_err(to_transport)
    }

    fn send_json<B: serde::Serialize>(&self, method: Method, path: &str, body: &B) -> Result<()> {
        let response = self
            .http
            .request(method, self.url(path))
            .json(body)
            .send()
            .map_err(to_transport)?;
        ensure_ok(response).map(|_| ())
    }

    fn delete_path(&self, path: &str) -> Result<()> {
        let response = self
            .http
            .delete(self.url(path))
            .send()
            .map_err(to_transport)?;
        ensure_ok(response).map(|_| ())
    }
}

impl QuestionGateway for ApiClient {
    fn list_all(&self) -> Result<Vec<QuestionItem>> {
        self.get_json("/question/")
    }

    fn list_by_category(&self, category: &str) -> Result<Vec<QuestionItem>> {
        self.get_json(&format!("/question/{}", category))
    }

    fn list_categories(&self) -> Result<Vec<String>> {
        self.get_json("/question/categories")
    }

    fn mastery_stats(&self) -> Result<MasteryStats> {
        self.get_json("/question/mastery-stats")
    }

    fn create(&self, question: &NewQuestion) -> Result<()> {
        // Validation errors never reach the network layer
        question.validate()?;
        self.send_json(Method::POST, "/question/", question)
    }

    fn update(&self, id: i64, question: &NewQuestion) -> Result<()> {
        question.validate()?;
        self.send_json(Method::PUT, &format!("/question/{}", id), question)
    }

    fn update_mastery(&self, id: i64, level: MasteryLevel) -> Result<()> {
        self.send_json(
            Method::PUT,
            &format!("/question/{}/mastery", id),
            &json!({ "mastery_level": level }),
        )
    }

    fn delete(&self, id: i64) -> Result<()> {
        self.delete_path(&format!("/question/{}", id))
    }
}

/// Envelope for problem listings: `{"problems": [...], "total": n, ...}`
#[derive(Debug, Deserialize)]
struct ProblemListResponse {
    #[serde(default)]
    problems: Vec<CodingProblem>,
    #[serde(default)]
    total: usize,
}

impl ProblemGateway for ApiClient {
    fn list_all(&self) -> Result<Vec<CodingProblem>> {
        // The backend paginates this route; walk the pages until the full
        // set is local, then filter client-side.
        let mut problems = Vec::new();
        let mut page = 1usize;
        loop {
            let response: ProblemListResponse = self.get_json(&format!(
                "/api/coding/problems?page={}&limit={}",
                page, PROBLEM_PAGE_LIMIT
            ))?;
            let batch = response.problems.len();
            problems.extend(response.problems);
            if batch == 0 || problems.len() >= response.total {
                break;
            }
            page += 1;
        }
        Ok(problems)
    }

    fn list_by_source(&self, source: &str) -> Result<Vec<CodingProblem>> {
        let response: ProblemListResponse =
            self.get_json(&format!("/api/coding/problems/source/{}", source))?;
        Ok(response.problems)
    }

    fn list_by_difficulty(&self, difficulty: Difficulty) -> Result<Vec<CodingProblem>> {
        let response: ProblemListResponse = self.get_json(&format!(
            "/api/coding/problems/difficulty/{}",
            difficulty.bucket()
        ))?;
        Ok(response.problems)
    }

    fn daily(&self) -> Result<CodingProblem> {
        retry_with_backoff(DAILY_RETRY_ATTEMPTS, DAILY_RETRY_BACKOFF, || {
            self.get_json("/api/coding/daily")
        })
    }

    fn daily_history(&self) -> Result<Vec<CodingProblem>> {
        let response: ProblemListResponse = self.get_json("/api/coding/daily/history")?;
        Ok(response.problems)
    }

    fn random(&self) -> Result<CodingProblem> {
        self.get_json("/api/coding/random")
    }

    fn stats(&self) -> Result<ProblemStats> {
        self.get_json("/api/coding/stats")
    }

    fn update_study_status(&self, id: i64, status: StudyStatus) -> Result<()> {
        self.send_json(
            Method::PUT,
            &format!("/api/coding/problems/{}/study-status", id),
            &json!({ "study_status": status }),
        )
    }
}

fn ensure_ok(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().unwrap_or_default();
    Err(api_error(status, &body))
}

/// Map a non-2xx response to the error taxonomy, preferring the backend's
/// `{"error": ...}` message when the body carries one
fn api_error(status: StatusCode, body: &str) -> Error {
    let message = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| {
            value
                .get("error")
                .and_then(|e| e.as_str())
                .map(str::to_string)
        })
        .unwrap_or_else(|| format!("server returned {}", status));

    if status == StatusCode::NOT_FOUND {
        Error::NotFound(message)
    } else {
        Error::Transport(message)
    }
}

fn to_transport(err: reqwest::Error) -> Error {
    Error::Transport(err.to_string())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::panic)]

    use super::*;

    #[test]
    fn test_api_error_prefers_backend_message() {
        let err = api_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            r#"{"error": "insert failed"}"#,
        );
        assert_eq!(err, Error::Transport("insert failed".to_string()));
    }

    #[test]
    fn test_api_error_maps_404_to_not_found() {
        let err = api_error(
            StatusCode::NOT_FOUND,
            r#"{"error": "No daily problem found"}"#,
        );
        assert_eq!(err, Error::NotFound("No daily problem found".to_string()));
    }

    #[test]
    fn test_api_error_falls_back_to_status_line() {
        let err = api_error(StatusCode::BAD_GATEWAY, "<html>oops</html>");
        match err {
            Error::Transport(message) => assert!(message.contains("502")),
            other => panic!("expected transport error, got {:?}", other),
        }
    }

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let client = ApiClient::new("http://localhost:8080/").unwrap();
        assert_eq!(client.url("/question/"), "http://localhost:8080/question/");
    }
}
