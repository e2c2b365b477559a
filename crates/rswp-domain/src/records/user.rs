//! User records.

use md5::{Digest, Md5};
use serde::{Deserialize, Serialize};

/// A user with their derived avatar URL.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(flatten)]
    pub user: rswp_storage::User,
    pub avatar: String,
}

impl User {
    pub fn assemble(user: rswp_storage::User) -> Self {
        let avatar = gravatar_url(&user.email);
        Self { user, avatar }
    }
}

/// The Gravatar URL for an email address: the hex MD5 of the trimmed,
/// lowercased address.
pub fn gravatar_url(email: &str) -> String {
    let mut hasher = Md5::new();
    hasher.update(email.trim().to_lowercase().as_bytes());
    format!(
        "https://secure.gravatar.com/avatar/{}",
        hex::encode(hasher.finalize())
    )
}
