use super::error::UserError;
use super::models::{NewUser, User};
use super::repository::UserRepository;
use fake::faker::company::en::CompanyName;
use fake::Fake;
use tracing::info;

/// Fill an empty repository with `count` fake users so the benchmark routes
/// have something to return. A non-empty repository is left untouched.
pub async fn seed_users(repo: &dyn UserRepository, count: usize) -> Result<usize, UserError> {
    if count == 0 {
        return Ok(0);
    }

    let existing = repo.count().await?;
    if existing > 0 {
        info!("Skipping seed, {} users already present", existing);
        return Ok(0);
    }

    for _ in 0..count {
        let req = NewUser {
            company: CompanyName().fake(),
            amount: (1..10_000i64).fake(),
        };
        repo.save(User::new(req.company.clone(), req.final_quote()))
            .await?;
    }

    info!("Seeded {} users", count);
    Ok(count)
}
