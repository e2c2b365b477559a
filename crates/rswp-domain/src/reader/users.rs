//! User reads.

use std::collections::HashMap;

use rswp_storage::{ContentStore, UserQuery};

use crate::error::DomainResult;
use crate::iter::IdIterator;
use crate::records::{keys, User};

use super::ContentReader;

impl<S: ContentStore> ContentReader<S> {
    /// Fetches users with their avatar URLs derived.
    pub async fn get_users(&self, ids: &[i64]) -> DomainResult<Vec<User>> {
        self.resolve_batch(keys::USER, ids, |missing| async move {
            let users = self.store.get_users(&missing).await?;
            Ok(users
                .into_iter()
                .map(|user| (user.id, User::assemble(user)))
                .collect::<HashMap<_, _>>())
        })
        .await
    }

    /// Runs a user query and returns an iterator over the matching ids.
    pub async fn query_users(&self, query: &UserQuery) -> DomainResult<IdIterator> {
        Ok(IdIterator::new(self.store.query_users(query).await?))
    }
}
