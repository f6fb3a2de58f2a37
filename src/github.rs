// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

/// GitHub REST implementation of [`RemoteSource`].
///
/// Requests go through an authenticated [`Octocrab`] client and are decoded
/// into the typed records from [`crate::model`]. Paginated endpoints are read
/// page by page until a short page is returned.
use octocrab::{Octocrab, service::middleware::retry::RetryConfig};
use serde::{Deserialize, de::DeserializeOwned};
use tracing::{debug, info};

use crate::{
    error::{Error, remote_error},
    model::{ContributorRecord, IssueRecord, LanguageHistogram, PullRequestRecord, RepositoryRecord},
    source::{PAGE_SIZE, RemoteSource}
};

const NO_CONTENT: u16 = 204;

#[derive(Debug, Deserialize)]
struct AuthenticatedUser {
    login: String
}

/// Remote source backed by the GitHub REST API.
#[derive(Debug, Clone)]
pub struct GitHubSource {
    client: Octocrab
}

impl GitHubSource {
    /// Builds a client authenticated with a personal access token.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] when the HTTP client cannot be built.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use profile_stats::GitHubSource;
    ///
    /// # fn example() -> Result<(), profile_stats::Error> {
    /// let source = GitHubSource::new("ghp_token")?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn new(token: &str) -> Result<Self, Error> {
        Self::build(token, None)
    }

    /// Builds a client against another API root, such as a GitHub Enterprise
    /// host.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] for an invalid URI or when the HTTP
    /// client cannot be built.
    pub fn with_base_uri(token: &str, base_uri: &str) -> Result<Self, Error> {
        Self::build(token, Some(base_uri))
    }

    fn build(token: &str, base_uri: Option<&str>) -> Result<Self, Error> {
        // octocrab retries 5xx and 429 responses by default; every failure here is final
        let mut builder = Octocrab::builder()
            .personal_token(token)
            .add_retry_config(RetryConfig::None);

        if let Some(base_uri) = base_uri {
            builder = builder
                .base_uri(base_uri)
                .map_err(|e| Error::configuration(format!("invalid API base URI {base_uri}: {e}")))?;
        }

        let client = builder
            .build()
            .map_err(|e| Error::configuration(format!("failed to initialize GitHub client: {e}")))?;

        Ok(Self::from_client(client))
    }

    /// Wraps an already configured client.
    pub fn from_client(client: Octocrab) -> Self {
        Self {
            client
        }
    }

    /// Performs a GET and decodes the JSON body. `None` means 204 No Content.
    async fn fetch_json<T>(&self, uri: String, context: &str) -> Result<Option<T>, Error>
    where
        T: DeserializeOwned + Send
    {
        let response = self
            .client
            ._get(uri)
            .await
            .map_err(|e| remote_error(context, e))?;
        let response = octocrab::map_github_error(response)
            .await
            .map_err(|e| remote_error(context, e))?;

        if response.status().as_u16() == NO_CONTENT {
            debug!("{} returned no content", context);
            return Ok(None);
        }

        let body = self
            .client
            .body_to_string(response)
            .await
            .map_err(|e| remote_error(context, e))?;

        serde_json::from_str(&body)
            .map(Some)
            .map_err(|e| Error::remote(context, None, format!("malformed payload: {e}")))
    }

    /// Reads every page of a list endpoint and concatenates the items.
    async fn fetch_all_pages<T>(
        &self,
        route: &str,
        query: &[(&str, &str)],
        context: &str
    ) -> Result<Vec<T>, Error>
    where
        T: DeserializeOwned + Send
    {
        let mut collected = Vec::new();
        let mut page = 1usize;

        loop {
            let uri = page_uri(route, query, page);
            let items: Vec<T> = self.fetch_json(uri, context).await?.unwrap_or_default();
            let count = items.len();
            debug!("{} page {} returned {} items", context, page, count);
            collected.extend(items);

            if count < PAGE_SIZE {
                break;
            }
            page += 1;
        }

        Ok(collected)
    }
}

fn page_uri(route: &str, query: &[(&str, &str)], page: usize) -> String {
    let mut uri = format!("{route}?per_page={PAGE_SIZE}&page={page}");
    for (key, value) in query {
        uri.push('&');
        uri.push_str(key);
        uri.push('=');
        uri.push_str(value);
    }
    uri
}

impl RemoteSource for GitHubSource {
    async fn authenticated_login(&self) -> Result<String, Error> {
        let context = "authenticated user";
        let user: AuthenticatedUser = self
            .fetch_json("/user".to_owned(), context)
            .await?
            .ok_or_else(|| Error::remote(context, Some(NO_CONTENT), "empty response"))?;
        info!("Authenticated as {}", user.login);
        Ok(user.login)
    }

    async fn owned_repositories(&self) -> Result<Vec<RepositoryRecord>, Error> {
        let repositories: Vec<RepositoryRecord> = self
            .fetch_all_pages(
                "/user/repos",
                &[
                    ("visibility", "public"),
                    ("affiliation", "owner"),
                    ("sort", "pushed"),
                    ("direction", "desc")
                ],
                "owned repositories"
            )
            .await?;
        info!("Fetched {} repositories", repositories.len());
        Ok(repositories)
    }

    async fn languages(&self, owner: &str, repo: &str) -> Result<LanguageHistogram, Error> {
        let context = format!("languages for {owner}/{repo}");
        let histogram = self
            .fetch_json(format!("/repos/{owner}/{repo}/languages"), &context)
            .await?
            .unwrap_or_default();
        Ok(histogram)
    }

    async fn open_pull_requests(
        &self,
        owner: &str,
        repo: &str
    ) -> Result<Vec<PullRequestRecord>, Error> {
        let context = format!("pull requests for {owner}/{repo}");
        self.fetch_all_pages(&format!("/repos/{owner}/{repo}/pulls"), &[("state", "open")], &context)
            .await
    }

    async fn open_issues(&self, owner: &str, repo: &str) -> Result<Vec<IssueRecord>, Error> {
        let context = format!("issues for {owner}/{repo}");
        self.fetch_all_pages(&format!("/repos/{owner}/{repo}/issues"), &[("state", "open")], &context)
            .await
    }

    async fn contributors(&self, owner: &str, repo: &str) -> Result<Vec<ContributorRecord>, Error> {
        let context = format!("contributors for {owner}/{repo}");
        self.fetch_all_pages(
            &format!("/repos/{owner}/{repo}/contributors"),
            &[("anon", "false")],
            &context
        )
        .await
    }
}
