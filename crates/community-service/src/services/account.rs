//! Account service
//!
//! Profile reads and updates.

use community_core::{DomainError, Snowflake};
use tracing::{info, instrument};

use crate::dto::{AccountResponse, CurrentAccountResponse, GroupResponse, UpdateProfileRequest};

use super::auth::non_empty;
use super::context::ServiceContext;
use super::error::ServiceResult;

pub struct AccountService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> AccountService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    #[instrument(skip(self))]
    pub async fn me(&self, account_id: Snowflake) -> ServiceResult<CurrentAccountResponse> {
        let account = self
            .ctx
            .account_repo()
            .find_by_id(account_id)
            .await?
            .ok_or(DomainError::AccountNotFound(account_id))?;
        Ok(CurrentAccountResponse::from(&account))
    }

    #[instrument(skip(self))]
    pub async fn get_account(&self, account_id: Snowflake) -> ServiceResult<AccountResponse> {
        let account = self
            .ctx
            .account_repo()
            .find_by_id(account_id)
            .await?
            .ok_or(DomainError::AccountNotFound(account_id))?;
        Ok(AccountResponse::from(&account))
    }

    /// Update profile fields. Absent fields are kept, blank ones cleared.
    #[instrument(skip(self, request))]
    pub async fn update_profile(
        &self,
        account_id: Snowflake,
        request: UpdateProfileRequest,
    ) -> ServiceResult<CurrentAccountResponse> {
        let mut account = self
            .ctx
            .account_repo()
            .find_by_id(account_id)
            .await?
            .ok_or(DomainError::AccountNotFound(account_id))?;

        if request.first_name.is_some() || request.last_name.is_some() {
            let first_name = match request.first_name {
                Some(value) => non_empty(Some(value)),
                None => account.first_name.clone(),
            };
            let last_name = match request.last_name {
                Some(value) => non_empty(Some(value)),
                None => account.last_name.clone(),
            };
            account.set_names(first_name, last_name);
        }

        if request.phone_number.is_some() || request.current_city.is_some() {
            let phone_number = match request.phone_number {
                Some(value) => non_empty(Some(value)),
                None => account.phone_number.clone(),
            };
            let current_city = match request.current_city {
                Some(value) => non_empty(Some(value)),
                None => account.current_city.clone(),
            };
            account.set_contact(phone_number, current_city);
        }

        if let Some(bio) = request.bio {
            account.set_bio(non_empty(Some(bio)));
        }

        self.ctx.account_repo().update(&account).await?;

        info!(account_id = %account_id, "Profile updated");

        Ok(CurrentAccountResponse::from(&account))
    }

    /// Groups where the account holds an approved membership
    #[instrument(skip(self))]
    pub async fn my_groups(&self, account_id: Snowflake) -> ServiceResult<Vec<GroupResponse>> {
        let groups = self.ctx.group_repo().find_by_member(account_id).await?;
        Ok(groups.iter().map(GroupResponse::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::testing::TestWorld;
    use community_core::entities::Privacy;

    #[tokio::test]
    async fn test_update_profile_keeps_absent_fields() {
        let world = TestWorld::new();
        let ada = world.account("ada").await;
        let accounts = AccountService::new(&world.ctx);

        accounts
            .update_profile(
                ada,
                UpdateProfileRequest {
                    first_name: Some("Ada".to_string()),
                    bio: Some("Counting engines".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let updated = accounts
            .update_profile(
                ada,
                UpdateProfileRequest {
                    last_name: Some("Lovelace".to_string()),
                    bio: Some(String::new()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.first_name.as_deref(), Some("Ada"));
        assert_eq!(updated.last_name.as_deref(), Some("Lovelace"));
        assert_eq!(updated.bio, None);

        let public = accounts.get_account(ada).await.unwrap();
        assert_eq!(public.full_name.as_deref(), Some("Ada Lovelace"));
    }

    #[tokio::test]
    async fn test_unknown_account() {
        let world = TestWorld::new();
        let err = AccountService::new(&world.ctx)
            .me(Snowflake::new(404))
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), 404);
    }

    #[tokio::test]
    async fn test_my_groups_excludes_pending() {
        let world = TestWorld::new();
        let owner = world.account("owner").await;
        let ada = world.account("ada").await;
        let joined = world.group(owner, Privacy::Public).await;
        let requested = world.group(owner, Privacy::Private).await;
        world.member(joined, ada).await;
        world.pending(requested, ada).await;

        let groups = AccountService::new(&world.ctx).my_groups(ada).await.unwrap();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].id, joined.to_string());
    }
}
