//! Directory seeding.

use tracing::info;

use docshare_core::config::SeedConfig;
use docshare_core::result::AppResult;

use crate::store::Directory;

/// How many seed entries are present after seeding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedSummary {
    pub users: usize,
    pub categories: usize,
    pub courses: usize,
}

/// Insert configured users, categories and courses that do not exist yet.
/// Running it twice leaves the directory unchanged.
pub async fn seed_directory<D>(directory: &D, seed: &SeedConfig) -> AppResult<SeedSummary>
where
    D: Directory + ?Sized,
{
    let mut summary = SeedSummary::default();

    for user in &seed.users {
        directory
            .ensure_user(&user.username, user.full_name.as_deref())
            .await?;
        summary.users += 1;
    }
    for category in &seed.categories {
        directory
            .ensure_category(&category.name, category.description.as_deref())
            .await?;
        summary.categories += 1;
    }
    for course in &seed.courses {
        directory
            .ensure_course(&course.code, &course.name, course.description.as_deref())
            .await?;
        summary.courses += 1;
    }

    info!(
        users = summary.users,
        categories = summary.categories,
        courses = summary.courses,
        "Directory seed applied"
    );
    Ok(summary)
}
