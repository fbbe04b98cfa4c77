// HTTP client for the terminal swiper
//
// Fetches the catalog once at startup and reports decisions. Decisions are
// fire-and-forget: the post runs on its own task and failures only reach the
// log, so a slow or dead server never stalls the card animation.

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use tokio::task::JoinHandle;

use crate::store::{Action, Animal, NewAction, Species};

#[derive(Debug, Deserialize)]
struct AnimalsReply {
    success: bool,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    animals: Vec<Animal>,
}

#[derive(Debug, Deserialize)]
struct ActionReply {
    success: bool,
    #[serde(default)]
    message: Option<String>,
    action: Option<Action>,
}

#[derive(Debug, Clone)]
pub struct SwipeClient {
    http: reqwest::Client,
    base_url: String,
}

impl SwipeClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(10))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// GET /api/animals, optionally filtered by species
    pub async fn fetch_animals(&self, species: Option<Species>) -> Result<Vec<Animal>> {
        let mut request = self.http.get(format!("{}/api/animals", self.base_url));
        if let Some(species) = species {
            request = request.query(&[("species", species.as_str())]);
        }

        let reply: AnimalsReply = request
            .send()
            .await
            .context("Failed to reach server")?
            .json()
            .await
            .context("Failed to parse animal list")?;

        if !reply.success {
            bail!(
                "Server refused animal list: {}",
                reply.message.unwrap_or_default()
            );
        }
        Ok(reply.animals)
    }

    /// POST /api/actions and wait for the stored action
    pub async fn post_action(&self, action: &NewAction) -> Result<Action> {
        let reply: ActionReply = self
            .http
            .post(format!("{}/api/actions", self.base_url))
            .json(action)
            .send()
            .await
            .context("Failed to reach server")?
            .json()
            .await
            .context("Failed to parse action reply")?;

        match reply.action {
            Some(action) if reply.success => Ok(action),
            _ => bail!(
                "Server refused action: {}",
                reply.message.unwrap_or_default()
            ),
        }
    }

    /// Post on a background task; errors are logged and otherwise ignored
    pub fn post_action_detached(&self, action: NewAction) -> JoinHandle<()> {
        let client = self.clone();
        tokio::spawn(async move {
            match client.post_action(&action).await {
                Ok(stored) => tracing::debug!(
                    action_id = stored.id,
                    animal_id = stored.animal_id,
                    "Decision recorded: {}",
                    stored.action
                ),
                Err(e) => tracing::warn!(
                    animal_id = action.animal_id,
                    "Failed to record {}: {:#}",
                    action.action,
                    e
                ),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash() {
        let client = SwipeClient::new("http://127.0.0.1:3000/").unwrap();
        assert_eq!(client.base_url(), "http://127.0.0.1:3000");
    }

    #[tokio::test]
    async fn test_detached_post_swallows_errors() {
        // Nothing listens on port 9; the task must finish without panicking
        let client = SwipeClient::new("http://127.0.0.1:9").unwrap();
        let handle = client.post_action_detached(NewAction {
            animal_id: 1,
            action: crate::store::ActionKind::Adopt,
            user_id: 1,
        });
        assert!(handle.await.is_ok());
    }
}
