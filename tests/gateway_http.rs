//! HTTP-level gateway tests against a mock GitHub API server.

use rstest::rstest;
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use rebranch::{
    BranchName, GatewayError, Lookup, OctocrabRepositoryGateway, PersonalAccessToken,
    ProtectionStatus, RepositoryGateway, RepositoryLocator,
};

fn locator_for(server: &MockServer) -> RepositoryLocator {
    RepositoryLocator::for_host(&server.uri(), "octo", "widgets")
        .expect("mock-server locator should build")
}

fn gateway_for(locator: &RepositoryLocator) -> OctocrabRepositoryGateway {
    let token = PersonalAccessToken::new("ghp_testtoken").expect("token should validate");
    OctocrabRepositoryGateway::for_token(&token, locator).expect("gateway should build")
}

fn branch(name: &str) -> BranchName {
    BranchName::new(name).expect("branch name should validate")
}

fn github_error(message: &str, documentation_url: &str) -> serde_json::Value {
    json!({ "message": message, "documentation_url": documentation_url })
}

#[rstest]
#[tokio::test]
async fn missing_branch_reads_as_absent_not_as_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v3/repos/octo/widgets/branches/main"))
        .respond_with(ResponseTemplate::new(404).set_body_json(github_error(
            "Branch not found",
            "https://docs.github.com/rest/branches",
        )))
        .mount(&server)
        .await;
    let locator = locator_for(&server);
    let gateway = gateway_for(&locator);

    let lookup = gateway
        .branch(&locator, &branch("main"))
        .await
        .expect("a 404 is a valid lookup result");

    assert_eq!(lookup, Lookup::Absent, "missing branch should read absent");
}

#[rstest]
#[tokio::test]
async fn present_branch_reads_as_found_with_its_tip() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v3/repos/octo/widgets/branches/master"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "master",
            "commit": { "sha": "4da4b22ac75d363d168ce109d51c80921cacebcb" }
        })))
        .mount(&server)
        .await;
    let locator = locator_for(&server);
    let gateway = gateway_for(&locator);

    let lookup = gateway
        .branch(&locator, &branch("master"))
        .await
        .expect("branch read should succeed");

    match lookup {
        Lookup::Found(found) => {
            assert_eq!(found.name, "master", "name");
            assert_eq!(
                found.tip_sha, "4da4b22ac75d363d168ce109d51c80921cacebcb",
                "tip"
            );
        }
        Lookup::Absent => panic!("existing branch should be found"),
    }
}

#[rstest]
#[tokio::test]
async fn unprotected_branch_reads_as_unprotected_on_404() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v3/repos/octo/widgets/branches/master/protection"))
        .respond_with(ResponseTemplate::new(404).set_body_json(github_error(
            "Branch not protected",
            "https://docs.github.com/rest/branches/branch-protection",
        )))
        .mount(&server)
        .await;
    let locator = locator_for(&server);
    let gateway = gateway_for(&locator);

    let status = gateway
        .branch_protection(&locator, &branch("master"))
        .await
        .expect("a 404 on the protection route is a valid status");

    assert_eq!(status, ProtectionStatus::Unprotected, "protection status");
}

#[rstest]
#[tokio::test]
async fn plan_limited_protection_reads_as_unsupported() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v3/repos/octo/widgets/branches/master/protection"))
        .respond_with(ResponseTemplate::new(403).set_body_json(github_error(
            "Upgrade to GitHub Pro or make this repository public to enable this feature.",
            "https://docs.github.com/rest/branches/branch-protection",
        )))
        .mount(&server)
        .await;
    let locator = locator_for(&server);
    let gateway = gateway_for(&locator);

    let status = gateway
        .branch_protection(&locator, &branch("master"))
        .await
        .expect("a plan limitation is a valid status");

    assert_eq!(status, ProtectionStatus::Unsupported, "protection status");
}

#[rstest]
#[tokio::test]
async fn protection_rule_deserialises_from_the_wrapped_read_shape() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v3/repos/octo/widgets/branches/master/protection"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "required_status_checks": { "strict": true, "contexts": ["ci/build"] },
            "enforce_admins": { "enabled": true },
            "required_pull_request_reviews": {
                "dismiss_stale_reviews": true,
                "require_code_owner_reviews": false,
                "required_approving_review_count": 2
            },
            "required_linear_history": { "enabled": true },
            "allow_force_pushes": { "enabled": false },
            "allow_deletions": { "enabled": false }
        })))
        .mount(&server)
        .await;
    let locator = locator_for(&server);
    let gateway = gateway_for(&locator);

    let status = gateway
        .branch_protection(&locator, &branch("master"))
        .await
        .expect("protection read should succeed");

    let ProtectionStatus::Protected(rule) = status else {
        panic!("protected branch should report its rule, got {status:?}");
    };
    assert!(rule.enforce_admins, "enabled wrapper should unwrap");
    assert!(rule.required_linear_history, "linear history");
    let reviews = rule
        .required_pull_request_reviews
        .expect("reviews should be present");
    assert_eq!(
        reviews.required_approving_review_count,
        Some(2),
        "approver count"
    );
    assert!(
        reviews.dismissal_restrictions.is_none(),
        "no allow-list in the source rule"
    );
}

#[rstest]
#[tokio::test]
async fn collaborator_permission_decodes_the_level() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(
            "/api/v3/repos/octo/widgets/collaborators/octocat/permission",
        ))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "permission": "admin" })),
        )
        .mount(&server)
        .await;
    let locator = locator_for(&server);
    let gateway = gateway_for(&locator);

    let level = gateway
        .collaborator_permission(&locator, "octocat")
        .await
        .expect("permission read should succeed");

    assert_eq!(level, rebranch::github::PermissionLevel::Admin, "level");
}

#[rstest]
#[tokio::test]
async fn rate_limit_responses_map_to_the_rate_limited_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v3/repos/octo/widgets"))
        .respond_with(ResponseTemplate::new(403).set_body_json(github_error(
            "API rate limit exceeded for user",
            "https://docs.github.com/rest/overview/rate-limits-for-the-rest-api",
        )))
        .mount(&server)
        .await;
    let locator = locator_for(&server);
    let gateway = gateway_for(&locator);

    let error = gateway
        .repository(&locator)
        .await
        .expect_err("a throttled read should fail");

    assert!(
        matches!(error, GatewayError::RateLimited { .. }),
        "throttling should map to RateLimited, got {error:?}"
    );
}

#[rstest]
#[tokio::test]
async fn retarget_patches_the_pull_request_base() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/api/v3/repos/octo/widgets/pulls/41"))
        .and(body_partial_json(json!({ "base": "main" })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "number": 41, "base": { "ref": "main" } })),
        )
        .expect(1)
        .mount(&server)
        .await;
    let locator = locator_for(&server);
    let gateway = gateway_for(&locator);

    gateway
        .retarget_pull_request(&locator, 41, &branch("main"))
        .await
        .expect("retarget should succeed");
}

#[rstest]
#[tokio::test]
async fn pull_request_listing_filters_by_base_and_state() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v3/repos/octo/widgets/pulls"))
        .and(query_param("state", "open"))
        .and(query_param("base", "master"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "number": 41, "base": { "ref": "master" } },
            { "number": 42, "base": { "ref": "master" } }
        ])))
        .mount(&server)
        .await;
    let locator = locator_for(&server);
    let gateway = gateway_for(&locator);

    let page = gateway
        .open_pull_requests_first_page(&locator, &branch("master"))
        .await
        .expect("listing should succeed");

    let numbers: Vec<u64> = page.iter().map(|pull| pull.number).collect();
    assert_eq!(numbers, vec![41, 42], "listed pull request numbers");
}

#[rstest]
#[tokio::test]
async fn branch_deletion_accepts_an_empty_204() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/v3/repos/octo/widgets/git/refs/heads/master"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;
    let locator = locator_for(&server);
    let gateway = gateway_for(&locator);

    gateway
        .delete_branch(&locator, &branch("master"))
        .await
        .expect("an empty 204 is a successful deletion");
}
