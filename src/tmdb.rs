use std::{num::NonZeroU32, sync::Arc};

use governor::{
    Quota, RateLimiter,
    clock::DefaultClock,
    state::{InMemoryState, NotKeyed},
};
use jiff::civil::Date;
use serde::Deserialize;

use crate::{
    error::{AppError, AppResult},
    models::{CandidateMovie, NewMovie},
};

pub struct TmdbClient {
    client: reqwest::Client,
    access_token: String,
    base_url: String,
    image_base_url: String,
    limiter: Arc<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>,
}

impl TmdbClient {
    pub fn new(
        client: reqwest::Client,
        access_token: String,
        base_url: String,
        image_base_url: String,
        rps: u32,
    ) -> Self {
        if access_token.trim().is_empty() {
            tracing::warn!("Using sample TMDB data - no TMDB_ACCESS_TOKEN provided");
        }

        let limiter = Arc::new(RateLimiter::direct(Quota::per_second(
            NonZeroU32::new(rps).unwrap_or(NonZeroU32::MIN),
        )));
        Self { client, access_token, base_url, image_base_url, limiter }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), path)
    }

    fn is_offline(&self) -> bool {
        self.access_token.trim().is_empty()
    }

    pub async fn search_movies(&self, title: &str) -> AppResult<Vec<CandidateMovie>> {
        if self.is_offline() {
            return Ok(vec![sample_candidate()]);
        }

        self.limiter.until_ready().await;

        let resp: SearchResponse = self
            .client
            .get(self.url("search/movie"))
            .bearer_auth(&self.access_token)
            .query(&[("query", title)])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        tracing::debug!(query = %title, results = resp.results.len(), "catalog search");
        Ok(resp.results)
    }

    pub async fn movie_details(&self, external_id: i32) -> AppResult<NewMovie> {
        let details = if self.is_offline() {
            tracing::debug!(external_id, "no access token, serving sample details");
            sample_details()
        } else {
            self.limiter.until_ready().await;

            self.client
                .get(self.url(&format!("movie/{external_id}")))
                .bearer_auth(&self.access_token)
                .send()
                .await?
                .error_for_status()?
                .json::<MovieDetailsResponse>()
                .await?
        };

        details.into_new_movie(&self.image_base_url)
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    results: Vec<CandidateMovie>,
}

#[derive(Debug, Deserialize)]
struct MovieDetailsResponse {
    title: String,
    #[serde(default)]
    overview: Option<String>,
    #[serde(default)]
    release_date: Option<String>,
    #[serde(default)]
    poster_path: Option<String>,
}

impl MovieDetailsResponse {
    fn into_new_movie(self, image_base_url: &str) -> AppResult<NewMovie> {
        let poster_path = non_blank(self.poster_path).ok_or_else(|| {
            AppError::MalformedExternalData(format!("\"{}\" has no poster path", self.title))
        })?;
        let release_date = non_blank(self.release_date).ok_or_else(|| {
            AppError::MalformedExternalData(format!("\"{}\" has no release date", self.title))
        })?;
        let date: Date = release_date.parse()?;

        Ok(NewMovie {
            year: i32::from(date.year()),
            description: self.overview.unwrap_or_default(),
            img_url: format!("{}{}", image_base_url.trim_end_matches('/'), poster_path),
            title: self.title,
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

fn sample_candidate() -> CandidateMovie {
    CandidateMovie {
        id: 550,
        title: "Fight Club".to_string(),
        release_date: Some("1999-10-15".to_string()),
        overview: Some("An insomniac office worker and a soap maker form an underground fight club.".to_string()),
    }
}

fn sample_details() -> MovieDetailsResponse {
    MovieDetailsResponse {
        title: "Fight Club".to_string(),
        overview: Some("An insomniac office worker and a soap maker form an underground fight club.".to_string()),
        release_date: Some("1999-10-15".to_string()),
        poster_path: Some("/pB8BM7pdSp6B6Ih7QZ4DrQ3PmJK.jpg".to_string()),
    }
}
