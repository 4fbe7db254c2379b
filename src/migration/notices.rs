//! Generated notices: advisory issue content and local follow-up
//! instructions, rendered through minijinja.

use minijinja::{Environment, context};

use crate::github::{BranchName, RepositoryLocator};

use super::report::MigrationError;

/// Label attached to every advisory issue.
pub const ISSUE_LABEL: &str = "branch-migration";

/// Deployment-config filename searched for during follow-up.
pub const DEPLOYMENT_CONFIG_FILENAME: &str = "vercel.json";

/// Title of the deployment-configuration advisory issue.
pub const DEPLOYMENT_ISSUE_TITLE: &str = "Update deployment configuration";

/// Title of the build-configuration advisory issue.
pub const BUILD_ISSUE_TITLE: &str = "Update build configuration";

const CHECKLIST_BODY: &str = "\
The default branch of this repository has moved from `{{ old }}` to `{{ new }}`.

The following files may still reference `{{ old }}` and should be reviewed:

{% for item in items -%}
- [ ] [{{ item.path }}]({{ item.url }})
{% endfor %}";

const BUILD_BODY: &str = "\
The default branch of this repository has moved from `{{ old }}` to `{{ new }}`.

Build tooling often pins the branch name outside the repository itself. Check
CI pipelines, scheduled jobs, and release scripts for references to
`{{ old }}` and point them at `{{ new }}`.";

const FOLLOW_UP_BODY: &str = "\
Local clones still track `{{ old }}`. To update a clone, run:

    git branch -m {{ old }} {{ new }}
    git fetch origin
    git branch -u origin/{{ new }} {{ new }}
    git remote set-head origin -a";

fn render(template: &str, ctx: minijinja::Value) -> Result<String, MigrationError> {
    let env = Environment::new();
    env.render_str(template, ctx)
        .map_err(|error| MigrationError::Template {
            message: error.to_string(),
        })
}

/// Title of the old-branch-references advisory issue.
#[must_use]
pub fn references_issue_title(old: &BranchName) -> String {
    format!("Check references to `{old}`")
}

/// Renders a checklist body linking each affected path at the new branch.
///
/// # Errors
///
/// Returns [`MigrationError::Template`] when rendering fails.
pub fn checklist_body(
    locator: &RepositoryLocator,
    old: &BranchName,
    new: &BranchName,
    paths: &[String],
) -> Result<String, MigrationError> {
    let items: Vec<minijinja::Value> = paths
        .iter()
        .map(|path| context! { path => path, url => locator.blob_url(new, path) })
        .collect();

    render(
        CHECKLIST_BODY,
        context! { old => old.as_str(), new => new.as_str(), items => items },
    )
}

/// Renders the general build-configuration issue body.
///
/// # Errors
///
/// Returns [`MigrationError::Template`] when rendering fails.
pub fn build_issue_body(old: &BranchName, new: &BranchName) -> Result<String, MigrationError> {
    render(
        BUILD_BODY,
        context! { old => old.as_str(), new => new.as_str() },
    )
}

/// Renders the local follow-up instructions printed after a successful
/// execute run. The commands are guidance for the operator, never executed
/// by this tool.
///
/// # Errors
///
/// Returns [`MigrationError::Template`] when rendering fails.
pub fn follow_up_instructions(
    old: &BranchName,
    new: &BranchName,
) -> Result<String, MigrationError> {
    render(
        FOLLOW_UP_BODY,
        context! { old => old.as_str(), new => new.as_str() },
    )
}
