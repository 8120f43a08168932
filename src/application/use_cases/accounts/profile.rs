use uuid::Uuid;

use crate::application::ports::listing_repository::ListingRepository;
use crate::application::ports::user_repository::UserRepository;
use crate::domain::listings::listing::Listing;
use crate::domain::users::user::User;

#[derive(Debug, Clone)]
pub struct Profile {
    pub user: User,
    pub listings: Vec<Listing>,
}

pub struct GetProfile<'a, U, L>
where
    U: UserRepository + ?Sized,
    L: ListingRepository + ?Sized,
{
    pub users: &'a U,
    pub listings: &'a L,
}

impl<'a, U, L> GetProfile<'a, U, L>
where
    U: UserRepository + ?Sized,
    L: ListingRepository + ?Sized,
{
    pub async fn execute(&self, user_id: Uuid) -> anyhow::Result<Option<Profile>> {
        let Some(user) = self.users.find_by_id(user_id).await? else {
            return Ok(None);
        };
        let listings = self.listings.list_for_author(user_id).await?;
        Ok(Some(Profile { user, listings }))
    }
}
