// File: chanbot-core/src/platforms/twitch/requests/users.rs

use serde::Deserialize;
use crate::Error;
use crate::platforms::twitch::client::TwitchHelixClient;

/// Response from "Get Users".
#[derive(Debug, Deserialize)]
pub struct UsersResponse {
    pub data: Vec<UserData>,
}

#[derive(Debug, Deserialize)]
pub struct UserData {
    pub id: String,
    pub login: String,
    pub display_name: String,
}

impl TwitchHelixClient {
    /// Looks a user up by login. `None` if no such account exists.
    pub async fn fetch_user_by_login(&self, login: &str) -> Result<Option<UserData>, Error> {
        let parsed: UsersResponse = self.get_json("users", &[("login", login)]).await?;
        Ok(parsed.data.into_iter().next())
    }
}
