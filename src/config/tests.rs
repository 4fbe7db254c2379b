//! Unit tests for configuration resolution.

use rstest::rstest;

use super::{ConfigError, RebranchConfig};

fn base_config() -> RebranchConfig {
    RebranchConfig {
        owner: Some("octo".to_owned()),
        repo: Some("repo".to_owned()),
        token: Some("ghp_example".to_owned()),
        ..RebranchConfig::default()
    }
}

#[rstest]
fn defaults_to_master_and_main() {
    let migration = base_config()
        .migration()
        .expect("defaults should satisfy the invariants");
    assert_eq!(migration.old_branch().as_str(), "master", "old default");
    assert_eq!(migration.new_branch().as_str(), "main", "new default");
}

#[rstest]
fn defaults_to_simulation_with_issues_enabled() {
    let migration = base_config()
        .migration()
        .expect("defaults should satisfy the invariants");
    assert!(!migration.execute(), "execute should default off");
    assert!(!migration.force(), "force should default off");
    assert!(migration.open_issues(), "issues should default on");
    assert!(
        migration.platform_specific_steps(),
        "platform steps should default on"
    );
}

#[rstest]
fn skip_switches_invert_into_policy_flags() {
    let config = RebranchConfig {
        skip_issues: true,
        skip_platform_steps: true,
        ..base_config()
    };
    let migration = config
        .migration()
        .expect("skip switches should satisfy the invariants");
    assert!(!migration.open_issues(), "skip_issues should disable issues");
    assert!(
        !migration.platform_specific_steps(),
        "skip_platform_steps should disable platform steps"
    );
}

#[rstest]
fn rejects_matching_branch_names() {
    let config = RebranchConfig {
        old_branch: Some("main".to_owned()),
        new_branch: Some("main".to_owned()),
        ..base_config()
    };
    let result = config.migration();
    assert!(
        matches!(result, Err(ConfigError::Invariant(_))),
        "expected invariant violation, got {result:?}"
    );
}

#[rstest]
fn rejects_blank_branch_name() {
    let config = RebranchConfig {
        old_branch: Some("  ".to_owned()),
        ..base_config()
    };
    let result = config.migration();
    assert!(
        matches!(result, Err(ConfigError::Invariant(_))),
        "expected invariant violation for blank name, got {result:?}"
    );
}

#[rstest]
fn enterprise_host_feeds_the_locator() {
    let config = RebranchConfig {
        host: Some("https://ghe.example.com".to_owned()),
        ..base_config()
    };
    let locator = config.locator().expect("enterprise host should resolve");
    assert_eq!(
        locator.api_base().as_str(),
        "https://ghe.example.com/api/v3",
        "API base should root at /api/v3"
    );
}

#[rstest]
fn missing_owner_is_reported() {
    let config = RebranchConfig {
        owner: None,
        ..base_config()
    };
    let result = config.locator();
    assert!(
        matches!(result, Err(ConfigError::MissingOwner)),
        "expected MissingOwner, got {result:?}"
    );
}

#[rstest]
fn missing_repo_is_reported() {
    let config = RebranchConfig {
        repo: None,
        ..base_config()
    };
    let result = config.locator();
    assert!(
        matches!(result, Err(ConfigError::MissingRepo)),
        "expected MissingRepo, got {result:?}"
    );
}

#[rstest]
fn explicit_token_wins_without_consulting_the_environment() {
    let token = base_config()
        .resolve_token()
        .expect("explicit token should resolve");
    assert_eq!(token.value(), "ghp_example", "token mismatch");
}
