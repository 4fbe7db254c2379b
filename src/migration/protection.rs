//! Pure transformation from a read-shaped protection rule to the
//! write-shaped creation payload.

use crate::github::models::{
    BranchProtection, ProtectionUpdate, RequiredPullRequestReviews, ReviewsUpdate,
};

/// Minimum approving reviews written when the source rule leaves the count
/// unset or zero.
const DEFAULT_APPROVING_REVIEWS: u8 = 1;

/// Maps a fetched protection rule to the payload written to the new branch.
///
/// Optional blocks carry through only when the source had them. The
/// dismissal allow-list in particular must stay absent when the source rule
/// has none; serialising an explicit empty value configures a different
/// state on the target platform.
#[must_use]
pub fn creation_payload(rule: &BranchProtection) -> ProtectionUpdate {
    ProtectionUpdate {
        required_status_checks: rule.required_status_checks.clone(),
        // GitHub distinguishes `true` from "unset"; `false` must be written
        // as the null sentinel, not as an explicit false.
        enforce_admins: rule.enforce_admins.then_some(true),
        required_pull_request_reviews: rule
            .required_pull_request_reviews
            .as_ref()
            .map(reviews_payload),
        restrictions: rule.restrictions.clone(),
        required_linear_history: rule.required_linear_history,
        allow_force_pushes: rule.allow_force_pushes,
        allow_deletions: rule.allow_deletions,
        required_signatures: rule.required_signatures,
    }
}

fn reviews_payload(reviews: &RequiredPullRequestReviews) -> ReviewsUpdate {
    ReviewsUpdate {
        dismissal_restrictions: reviews.dismissal_restrictions.clone(),
        dismiss_stale_reviews: reviews.dismiss_stale_reviews,
        require_code_owner_reviews: reviews.require_code_owner_reviews,
        required_approving_review_count: reviews
            .required_approving_review_count
            .filter(|count| *count > 0)
            .unwrap_or(DEFAULT_APPROVING_REVIEWS),
    }
}
