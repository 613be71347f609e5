// Admin dashboard controller: the dual fetch and local-state reconciliation

use crate::models::{Listing, User};
use crate::supabase::{ListingStore, StoreError};

/// The admin view's data, loaded with an all-or-nothing join and mutated
/// only after the remote store confirms each operation.
#[derive(Debug)]
pub struct DashboardController {
    pub listings: Vec<Listing>,
    pub users: Vec<User>,
}

impl DashboardController {
    /// Fetches listings and users with both requests in flight at once.
    /// Either failure yields the error; no partial result escapes.
    pub async fn load<S: ListingStore + ?Sized>(store: &S) -> Result<Self, StoreError> {
        let (listings, users) = futures::try_join!(store.fetch_all(), store.fetch_users())?;
        Ok(DashboardController { listings, users })
    }

    /// Deletes remotely, then drops the matching row from local state.
    pub async fn delete_listing<S: ListingStore + ?Sized>(
        &mut self,
        store: &S,
        id: &str,
    ) -> Result<(), StoreError> {
        store.delete_by_id(id).await?;
        self.listings.retain(|listing| listing.id != id);
        Ok(())
    }

    pub async fn delete_user<S: ListingStore + ?Sized>(
        &mut self,
        store: &S,
        id: &str,
    ) -> Result<(), StoreError> {
        store.delete_user(id).await?;
        self.users.retain(|user| user.id != id);
        Ok(())
    }

    /// Pushes an update to the store. When the store returns the updated
    /// record, only the matching local row is replaced; when the id no
    /// longer exists the store answers with nothing, local state stays
    /// untouched, and the caller gets Ok(None) to report.
    pub async fn apply_update<S: ListingStore + ?Sized>(
        &mut self,
        store: &S,
        listing: &Listing,
    ) -> Result<Option<Listing>, StoreError> {
        match store.update(listing).await? {
            Some(updated) => {
                if let Some(slot) = self.listings.iter_mut().find(|l| l.id == updated.id) {
                    *slot = updated.clone();
                }
                Ok(Some(updated))
            }
            None => Ok(None),
        }
    }
}
