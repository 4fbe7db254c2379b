//! Identity wrappers and API path helpers for the target repository.

use thiserror::Error;
use url::Url;

/// Validation failures for repository identifiers and branch names.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LocatorError {
    /// The repository owner segment was empty.
    #[error("repository owner must not be empty")]
    EmptyOwner,

    /// The repository name segment was empty.
    #[error("repository name must not be empty")]
    EmptyRepository,

    /// A branch name was empty.
    #[error("branch name must not be empty")]
    EmptyBranchName,

    /// The authentication token was missing or blank.
    #[error("personal access token is required")]
    MissingToken,

    /// A URL could not be parsed.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),
}

/// Repository owner wrapper to avoid stringly typed parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryOwner(String);

impl RepositoryOwner {
    /// Validates that the owner is non-empty.
    ///
    /// # Errors
    ///
    /// Returns [`LocatorError::EmptyOwner`] when the value is blank.
    pub fn new(value: &str) -> Result<Self, LocatorError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(LocatorError::EmptyOwner);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the owner value.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// Repository name wrapper to prevent parameter mix-ups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryName(String);

impl RepositoryName {
    /// Validates that the repository name is non-empty.
    ///
    /// # Errors
    ///
    /// Returns [`LocatorError::EmptyRepository`] when the value is blank.
    pub fn new(value: &str) -> Result<Self, LocatorError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(LocatorError::EmptyRepository);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the repository name.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// Branch name wrapper so that old and new branches cannot be swapped by
/// accident at call sites.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchName(String);

impl BranchName {
    /// Validates that the branch name is non-empty.
    ///
    /// # Errors
    ///
    /// Returns [`LocatorError::EmptyBranchName`] when the value is blank.
    pub fn new(value: &str) -> Result<Self, LocatorError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(LocatorError::EmptyBranchName);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the branch name.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl std::fmt::Display for BranchName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Personal access token wrapper enforcing presence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonalAccessToken(String);

impl PersonalAccessToken {
    /// Validates that the token is non-empty and trims whitespace.
    ///
    /// # Errors
    ///
    /// Returns [`LocatorError::MissingToken`] when the supplied string is
    /// blank.
    pub fn new(token: impl AsRef<str>) -> Result<Self, LocatorError> {
        let trimmed = token.as_ref().trim();
        if trimmed.is_empty() {
            return Err(LocatorError::MissingToken);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the token value.
    #[must_use]
    pub const fn value(&self) -> &str {
        self.0.as_str()
    }
}

impl AsRef<str> for PersonalAccessToken {
    fn as_ref(&self) -> &str {
        self.value()
    }
}

/// Derives the API base URL from a parsed host URL.
fn derive_api_base(parsed: &Url) -> Result<Url, LocatorError> {
    let host = parsed
        .host_str()
        .ok_or_else(|| LocatorError::InvalidUrl("URL must include a host".to_owned()))?;

    if host.eq_ignore_ascii_case("github.com") {
        return Url::parse("https://api.github.com")
            .map_err(|error| LocatorError::InvalidUrl(error.to_string()));
    }

    let authority = if host.contains(':') {
        format!("[{host}]")
    } else {
        host.to_owned()
    };
    let mut api_url = Url::parse(&format!("{scheme}://{authority}", scheme = parsed.scheme()))
        .map_err(|error| LocatorError::InvalidUrl(error.to_string()))?;
    api_url
        .set_port(parsed.port())
        .map_err(|()| LocatorError::InvalidUrl("invalid port".to_owned()))?;
    api_url.set_path("api/v3");
    Ok(api_url)
}

/// Identifies the repository under migration and carries its derived API
/// and web base URLs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryLocator {
    api_base: Url,
    web_base: Url,
    owner: RepositoryOwner,
    repository: RepositoryName,
}

impl RepositoryLocator {
    /// Creates a locator from owner and repository name strings, using
    /// `github.com` as the host.
    ///
    /// # Errors
    ///
    /// Returns [`LocatorError::EmptyOwner`] or
    /// [`LocatorError::EmptyRepository`] when either part is blank.
    pub fn from_owner_repo(owner: &str, repo: &str) -> Result<Self, LocatorError> {
        let validated_owner = RepositoryOwner::new(owner)?;
        let repository = RepositoryName::new(repo)?;
        let api_base = Url::parse("https://api.github.com")
            .map_err(|error| LocatorError::InvalidUrl(error.to_string()))?;
        let web_base = Url::parse("https://github.com")
            .map_err(|error| LocatorError::InvalidUrl(error.to_string()))?;

        Ok(Self {
            api_base,
            web_base,
            owner: validated_owner,
            repository,
        })
    }

    /// Creates a locator for a repository on the given host URL.
    ///
    /// `github.com` maps to the hosted API at `api.github.com`; any other
    /// host is treated as a GitHub Enterprise instance with the API rooted
    /// at `/api/v3`.
    ///
    /// # Errors
    ///
    /// Returns [`LocatorError::InvalidUrl`] when the base URL cannot be
    /// parsed, or an owner/repository error when either part is blank.
    pub fn for_host(base: &str, owner: &str, repo: &str) -> Result<Self, LocatorError> {
        let validated_owner = RepositoryOwner::new(owner)?;
        let repository = RepositoryName::new(repo)?;
        let web_base =
            Url::parse(base).map_err(|error| LocatorError::InvalidUrl(error.to_string()))?;
        let api_base = derive_api_base(&web_base)?;

        Ok(Self {
            api_base,
            web_base,
            owner: validated_owner,
            repository,
        })
    }

    /// API base URL for the repository host.
    #[must_use]
    pub const fn api_base(&self) -> &Url {
        &self.api_base
    }

    /// Repository owner.
    #[must_use]
    pub const fn owner(&self) -> &RepositoryOwner {
        &self.owner
    }

    /// Repository name.
    #[must_use]
    pub const fn repository(&self) -> &RepositoryName {
        &self.repository
    }

    /// `owner/name` slug used in log lines and search qualifiers.
    #[must_use]
    pub fn slug(&self) -> String {
        format!("{}/{}", self.owner.as_str(), self.repository.as_str())
    }

    /// User-facing URL of a file on the given branch.
    #[must_use]
    pub fn blob_url(&self, branch: &BranchName, path: &str) -> String {
        format!(
            "{}/{}/blob/{}/{}",
            self.web_base.as_str().trim_end_matches('/'),
            self.slug(),
            branch.as_str(),
            path
        )
    }

    /// Returns the API path for the repository itself.
    pub(crate) fn repo_path(&self) -> String {
        format!("/repos/{}", self.slug())
    }

    /// Returns the API path for a single branch.
    pub(crate) fn branch_path(&self, branch: &BranchName) -> String {
        format!("{}/branches/{}", self.repo_path(), branch.as_str())
    }

    /// Returns the API path for a branch's protection rule.
    pub(crate) fn protection_path(&self, branch: &BranchName) -> String {
        format!("{}/protection", self.branch_path(branch))
    }

    /// Returns the API path for the git ref backing a branch.
    pub(crate) fn ref_path(&self, branch: &BranchName) -> String {
        format!("{}/git/refs/heads/{}", self.repo_path(), branch.as_str())
    }

    /// Returns the API path for creating git refs.
    pub(crate) fn refs_path(&self) -> String {
        format!("{}/git/refs", self.repo_path())
    }

    /// Returns the API path for listing pull requests.
    pub(crate) fn pulls_path(&self) -> String {
        format!("{}/pulls", self.repo_path())
    }

    /// Returns the API path for a single pull request.
    pub(crate) fn pull_path(&self, number: u64) -> String {
        format!("{}/pulls/{number}", self.repo_path())
    }

    /// Returns the API path for creating issues.
    pub(crate) fn issues_path(&self) -> String {
        format!("{}/issues", self.repo_path())
    }

    /// Returns the API path for a collaborator's permission level.
    pub(crate) fn permission_path(&self, login: &str) -> String {
        format!("{}/collaborators/{login}/permission", self.repo_path())
    }
}
