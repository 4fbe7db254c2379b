//! Unit tests for the GitHub gateway layer.

use rstest::rstest;
use serde_json::json;

use super::locator::{BranchName, LocatorError, PersonalAccessToken, RepositoryLocator};
use super::models::{ApiBranch, ApiBranchProtection, ApiPermission, BranchProtection,
    PermissionLevel};

fn sample_locator() -> RepositoryLocator {
    RepositoryLocator::from_owner_repo("octo", "repo").expect("sample locator should build")
}

#[rstest]
fn locator_builds_api_paths() {
    let locator = sample_locator();
    let branch = BranchName::new("master").expect("branch name should validate");
    assert_eq!(locator.repo_path(), "/repos/octo/repo", "repo path");
    assert_eq!(
        locator.branch_path(&branch),
        "/repos/octo/repo/branches/master",
        "branch path"
    );
    assert_eq!(
        locator.protection_path(&branch),
        "/repos/octo/repo/branches/master/protection",
        "protection path"
    );
    assert_eq!(
        locator.ref_path(&branch),
        "/repos/octo/repo/git/refs/heads/master",
        "ref path"
    );
    assert_eq!(
        locator.permission_path("octocat"),
        "/repos/octo/repo/collaborators/octocat/permission",
        "permission path"
    );
}

#[rstest]
fn locator_builds_blob_urls_anchored_at_the_branch() {
    let locator = sample_locator();
    let branch = BranchName::new("main").expect("branch name should validate");
    assert_eq!(
        locator.blob_url(&branch, ".github/workflows/ci.yml"),
        "https://github.com/octo/repo/blob/main/.github/workflows/ci.yml",
        "blob url"
    );
}

#[rstest]
fn github_com_host_maps_to_the_hosted_api() {
    let locator = RepositoryLocator::for_host("https://github.com", "octo", "repo")
        .expect("hosted locator should build");
    assert_eq!(
        locator.api_base().as_str(),
        "https://api.github.com/",
        "hosted API base"
    );
}

#[rstest]
fn enterprise_host_roots_the_api_at_v3() {
    let locator = RepositoryLocator::for_host("http://ghe.example.com:8080", "octo", "repo")
        .expect("enterprise locator should build");
    assert_eq!(
        locator.api_base().as_str(),
        "http://ghe.example.com:8080/api/v3",
        "enterprise API base"
    );
}

#[rstest]
fn rejects_empty_owner() {
    let result = RepositoryLocator::from_owner_repo("", "repo");
    assert!(
        matches!(result, Err(LocatorError::EmptyOwner)),
        "expected EmptyOwner, got {result:?}"
    );
}

#[rstest]
fn rejects_empty_repository() {
    let result = RepositoryLocator::from_owner_repo("octo", "  ");
    assert!(
        matches!(result, Err(LocatorError::EmptyRepository)),
        "expected EmptyRepository, got {result:?}"
    );
}

#[rstest]
fn rejects_empty_branch_name() {
    let result = BranchName::new("");
    assert!(
        matches!(result, Err(LocatorError::EmptyBranchName)),
        "expected EmptyBranchName, got {result:?}"
    );
}

#[rstest]
fn rejects_blank_token() {
    let result = PersonalAccessToken::new("   ");
    assert!(
        matches!(result, Err(LocatorError::MissingToken)),
        "expected MissingToken, got {result:?}"
    );
}

#[rstest]
fn api_branch_deserialises_with_tip_commit() {
    let value = json!({
        "name": "master",
        "commit": { "sha": "4da4b22ac75d363d168ce109d51c80921cacebcb" }
    });

    let api: ApiBranch = serde_json::from_value(value).expect("ApiBranch should deserialise");
    let branch: super::models::Branch = api.into();
    assert_eq!(branch.name, "master", "name mismatch");
    assert_eq!(
        branch.tip_sha, "4da4b22ac75d363d168ce109d51c80921cacebcb",
        "tip mismatch"
    );
}

#[rstest]
fn api_permission_deserialises_known_levels() {
    let api: ApiPermission = serde_json::from_value(json!({ "permission": "admin" }))
        .expect("admin level should deserialise");
    assert_eq!(api.permission, PermissionLevel::Admin, "admin level");

    let api: ApiPermission = serde_json::from_value(json!({ "permission": "write" }))
        .expect("write level should deserialise");
    assert_eq!(api.permission, PermissionLevel::Write, "write level");
}

#[rstest]
fn api_permission_tolerates_unknown_levels() {
    let api: ApiPermission = serde_json::from_value(json!({ "permission": "superuser" }))
        .expect("unknown level should deserialise");
    assert_eq!(
        api.permission,
        PermissionLevel::Unrecognised,
        "unknown level should map to Unrecognised"
    );
}

/// The read shape GitHub returns for a fully configured protection rule.
fn full_protection_json() -> serde_json::Value {
    json!({
        "required_status_checks": {
            "strict": true,
            "contexts": ["ci/build", "ci/test"]
        },
        "enforce_admins": { "enabled": true },
        "required_pull_request_reviews": {
            "dismissal_restrictions": {
                "users": [{ "login": "octocat" }],
                "teams": [{ "slug": "maintainers" }]
            },
            "dismiss_stale_reviews": true,
            "require_code_owner_reviews": false,
            "required_approving_review_count": 2
        },
        "restrictions": {
            "users": [{ "login": "octocat" }],
            "teams": [{ "slug": "maintainers" }],
            "apps": [{ "slug": "ci-bot" }]
        },
        "required_signatures": { "enabled": true },
        "required_linear_history": { "enabled": true },
        "allow_force_pushes": { "enabled": false },
        "allow_deletions": { "enabled": false }
    })
}

#[rstest]
fn protection_read_shape_collapses_to_bare_identifiers() {
    let api: ApiBranchProtection = serde_json::from_value(full_protection_json())
        .expect("protection should deserialise");
    let rule: BranchProtection = api.into();

    let reviews = rule
        .required_pull_request_reviews
        .expect("reviews block should be present");
    let dismissal = reviews
        .dismissal_restrictions
        .expect("dismissal block should be present");
    assert_eq!(dismissal.users, vec!["octocat"], "dismissal users");
    assert_eq!(dismissal.teams, vec!["maintainers"], "dismissal teams");

    let restrictions = rule.restrictions.expect("restrictions should be present");
    assert_eq!(restrictions.apps, vec!["ci-bot"], "restriction apps");
    assert_eq!(rule.required_signatures, Some(true), "signatures flag");
    assert!(rule.enforce_admins, "admin enforcement");
}

#[rstest]
fn protection_read_shape_preserves_absence() {
    let api: ApiBranchProtection = serde_json::from_value(json!({
        "enforce_admins": { "enabled": false },
        "required_pull_request_reviews": {
            "dismiss_stale_reviews": false,
            "require_code_owner_reviews": true
        }
    }))
    .expect("sparse protection should deserialise");
    let rule: BranchProtection = api.into();

    assert!(rule.required_status_checks.is_none(), "no status checks");
    assert!(rule.restrictions.is_none(), "no restrictions");
    assert_eq!(rule.required_signatures, None, "signatures not exposed");

    let reviews = rule
        .required_pull_request_reviews
        .expect("reviews block should be present");
    assert!(
        reviews.dismissal_restrictions.is_none(),
        "no dismissal allow-list"
    );
    assert_eq!(
        reviews.required_approving_review_count, None,
        "approver count unset"
    );
}
