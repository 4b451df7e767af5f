use serde::{Deserialize, Serialize};
use skyrank_graph::{AccountRef, Profile};

/// `app.bsky.actor.defs#profileView` as returned inside follow listings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileView {
    pub did: String,
    pub handle: String,
    #[serde(default)]
    pub display_name: Option<String>,
}

impl From<ProfileView> for AccountRef {
    fn from(v: ProfileView) -> Self {
        AccountRef::new(v.did, v.handle, v.display_name.as_deref())
    }
}

/// `app.bsky.actor.defs#profileViewDetailed`, trimmed to what ranking needs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileViewDetailed {
    pub did: String,
    pub handle: String,
    #[serde(default)]
    pub display_name: Option<String>,
    pub followers_count: u64,
}

impl From<ProfileViewDetailed> for Profile {
    fn from(v: ProfileViewDetailed) -> Self {
        Profile {
            account: AccountRef::new(v.did, v.handle, v.display_name.as_deref()),
            followers_count: v.followers_count,
        }
    }
}

/// Response of `app.bsky.graph.getFollows`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetFollowsResponse {
    pub follows: Vec<ProfileView>,
    #[serde(default)]
    pub cursor: Option<String>,
}

/// Response of `app.bsky.actor.getProfiles`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetProfilesResponse {
    pub profiles: Vec<ProfileViewDetailed>,
}
