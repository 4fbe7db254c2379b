//! Unit tests for the migration pipeline.

mod report;

use crate::github::{
    Branch, Identity, Lookup, MockRepositoryGateway, PermissionLevel, RepositoryInfo,
    RepositoryLocator,
};

use super::config::MigrationConfig;

pub(super) const OLD_TIP: &str = "4da4b22ac75d363d168ce109d51c80921cacebcb";

pub(super) fn locator() -> RepositoryLocator {
    RepositoryLocator::from_owner_repo("octo", "widgets").expect("test locator should build")
}

/// Policy for a simulation run with issue creation disabled, so unit tests
/// can mock the gateway narrowly.
pub(super) fn dry_run_config() -> MigrationConfig {
    MigrationConfig::new("master", "main", true, false, false, false)
        .expect("dry-run config should validate")
}

/// Policy for an execute run with issue creation disabled.
pub(super) fn execute_config() -> MigrationConfig {
    MigrationConfig::new("master", "main", true, true, false, false)
        .expect("execute config should validate")
}

/// Stubs the precondition reads: the repository exists, `master` is present
/// at [`OLD_TIP`], `main` is absent, and the caller is an administrator.
pub(super) fn stub_passing_preconditions(gateway: &mut MockRepositoryGateway) {
    gateway.expect_repository().returning(|_| {
        Ok(RepositoryInfo {
            full_name: "octo/widgets".to_owned(),
            default_branch: "master".to_owned(),
        })
    });
    gateway.expect_branch().returning(|_, name| {
        if name.as_str() == "master" {
            Ok(Lookup::Found(Branch {
                name: "master".to_owned(),
                tip_sha: OLD_TIP.to_owned(),
            }))
        } else {
            Ok(Lookup::Absent)
        }
    });
    gateway.expect_authenticated_identity().returning(|| {
        Ok(Identity {
            login: "octocat".to_owned(),
        })
    });
    gateway
        .expect_collaborator_permission()
        .returning(|_, _| Ok(PermissionLevel::Admin));
}
