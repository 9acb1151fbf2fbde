//! Spotify Web API catalog, authenticated with the client-credentials flow

use std::{
    sync::Mutex,
    time::{Duration, Instant},
};

use log::{debug, info};
use serde::{Deserialize, de::DeserializeOwned};
use serde_json::Value;

use crate::catalog::{CatalogProvider, TrackRecord, error::CatalogError};

const TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
const API_URL: &str = "https://api.spotify.com/v1";
const ALBUM_PAGE_SIZE: usize = 50;

/// Tokens are refreshed this long before they actually expire
const TOKEN_EXPIRY_MARGIN: Duration = Duration::from_secs(30);

#[derive(Debug, Clone)]
pub struct Credentials {
    pub client_id: String,
    pub client_secret: String,
}

struct AccessToken {
    value: String,
    expires_at: Instant,
}

impl AccessToken {
    fn issued_at(now: Instant, value: String, expires_in: u64) -> Self {
        Self {
            value,
            expires_at: now + Duration::from_secs(expires_in).saturating_sub(TOKEN_EXPIRY_MARGIN),
        }
    }

    fn is_fresh_at(&self, now: Instant) -> bool {
        self.expires_at > now
    }
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: u64,
}

#[derive(Deserialize)]
struct AlbumTracksPage {
    items: Vec<AlbumTrackEntry>,
    next: Option<String>,
}

#[derive(Deserialize)]
struct AlbumTrackEntry {
    id: String,
}

#[derive(Deserialize)]
struct PlaylistInfo {
    name: String,
}

#[derive(Deserialize)]
struct PlaylistTracksPage {
    items: Vec<PlaylistEntry>,
}

#[derive(Deserialize)]
struct PlaylistEntry {
    track: Option<Value>,
}

pub struct SpotifyClient {
    agent: ureq::Agent,
    credentials: Credentials,
    token: Mutex<Option<AccessToken>>,
}

impl SpotifyClient {
    pub fn new(credentials: Credentials, timeout: Duration) -> Self {
        let agent = ureq::AgentBuilder::new().timeout(timeout).build();
        Self {
            agent,
            credentials,
            token: Mutex::new(None),
        }
    }

    fn request_token(&self) -> Result<AccessToken, CatalogError> {
        debug!("requesting spotify access token");
        let response = self
            .agent
            .post(TOKEN_URL)
            .send_form(&[
                ("grant_type", "client_credentials"),
                ("client_id", self.credentials.client_id.as_str()),
                ("client_secret", self.credentials.client_secret.as_str()),
            ])
            .map_err(|e| match e {
                ureq::Error::Status(code, _) => CatalogError::Auth(format!(
                    "token endpoint answered {code}, check credentials"
                )),
                other => CatalogError::from(other),
            })?;
        let token: TokenResponse = response.into_json()?;

        Ok(AccessToken::issued_at(
            Instant::now(),
            token.access_token,
            token.expires_in,
        ))
    }

    fn bearer(&self) -> Result<String, CatalogError> {
        let mut cached = self
            .token
            .lock()
            .map_err(|e| CatalogError::Auth(format!("token cache unavailable: {e}")))?;

        match cached.as_ref() {
            Some(token) if token.is_fresh_at(Instant::now()) => Ok(token.value.clone()),
            _ => {
                let token = self.request_token()?;
                let value = token.value.clone();
                *cached = Some(token);
                Ok(value)
            }
        }
    }

    fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<T, CatalogError> {
        let mut request = self
            .agent
            .get(url)
            .set("Authorization", &format!("Bearer {}", self.bearer()?));
        for (key, value) in query {
            request = request.query(key, value);
        }
        debug!("GET {url} {query:?}");
        Ok(request.call()?.into_json()?)
    }
}

/// Follows album track pages until the API reports no `next` page.
///
/// `fetch_page` receives the offset of the page to load.
fn collect_album_ids(
    mut fetch_page: impl FnMut(usize) -> Result<AlbumTracksPage, CatalogError>,
) -> Result<Vec<String>, CatalogError> {
    let mut ids = Vec::new();
    loop {
        let page = fetch_page(ids.len())?;
        let received = page.items.len();
        ids.extend(page.items.into_iter().map(|entry| entry.id));

        if page.next.is_none() || received == 0 {
            return Ok(ids);
        }
    }
}

/// Converts raw playlist entries into track records.
///
/// Removed tracks come back as `null`, podcast episodes have no album. Both are skipped.
fn playlist_records(page: PlaylistTracksPage) -> Vec<Option<TrackRecord>> {
    page.items
        .into_iter()
        .map(|entry| entry.track.and_then(|track| serde_json::from_value(track).ok()))
        .collect()
}

impl CatalogProvider for SpotifyClient {
    fn track(&self, id: &str) -> Result<TrackRecord, CatalogError> {
        self.get_json(&format!("{API_URL}/tracks/{id}"), &[])
    }

    fn album_track_ids(&self, id: &str) -> Result<Vec<String>, CatalogError> {
        let url = format!("{API_URL}/albums/{id}/tracks");
        let ids = collect_album_ids(|offset| {
            self.get_json(
                &url,
                &[
                    ("limit", ALBUM_PAGE_SIZE.to_string()),
                    ("offset", offset.to_string()),
                ],
            )
        })?;
        info!("album {id} has {} tracks", ids.len());
        Ok(ids)
    }

    fn playlist_name(&self, id: &str) -> Result<String, CatalogError> {
        let info: PlaylistInfo = self.get_json(
            &format!("{API_URL}/playlists/{id}"),
            &[("fields", "name".to_string())],
        )?;
        Ok(info.name)
    }

    fn playlist_page(
        &self,
        id: &str,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<Option<TrackRecord>>, CatalogError> {
        let page: PlaylistTracksPage = self.get_json(
            &format!("{API_URL}/playlists/{id}/tracks"),
            &[("offset", offset.to_string()), ("limit", limit.to_string())],
        )?;
        Ok(playlist_records(page))
    }
}
