/*
 * Responsibility
 * - Movie request/response DTOs
 */
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::repos::{MovieChanges, MovieRow, NewMovie};

#[derive(Debug, Deserialize)]
pub struct CreateMovieRequest {
    pub title: Option<String>,
    pub release_date: Option<String>,
}

impl CreateMovieRequest {
    pub fn into_new_movie(self) -> Result<NewMovie, &'static str> {
        let title = self.title.unwrap_or_default();
        if title.trim().is_empty() {
            return Err("title is required");
        }
        let release_date = self
            .release_date
            .as_deref()
            .ok_or("release_date is required")
            .and_then(parse_release_date)?;

        Ok(NewMovie {
            title: title.trim().to_string(),
            release_date,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct PatchMovieRequest {
    pub id: Option<i64>,
    pub title: Option<String>,
    pub release_date: Option<String>,
}

impl PatchMovieRequest {
    pub fn into_changes(self) -> Result<MovieChanges, &'static str> {
        if let Some(title) = &self.title
            && title.trim().is_empty()
        {
            return Err("title cannot be empty");
        }
        let release_date = self
            .release_date
            .as_deref()
            .map(parse_release_date)
            .transpose()?;

        Ok(MovieChanges {
            title: self.title.map(|t| t.trim().to_string()),
            release_date,
        })
    }
}

/// Accepts `YYYY-MM-DD` or `YYYY-MM-DDTHH:MM:SS`.
fn parse_release_date(raw: &str) -> Result<NaiveDateTime, &'static str> {
    let raw = raw.trim();
    if let Ok(at) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S") {
        return Ok(at);
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .ok_or("release_date must be YYYY-MM-DD or YYYY-MM-DDTHH:MM:SS")
}

#[derive(Debug, Serialize)]
pub struct MovieListResponse {
    pub success: bool,
    pub movies: Vec<MovieRow>,
}

#[derive(Debug, Serialize)]
pub struct MoviePatchedResponse {
    pub success: bool,
    pub movie: MovieRow,
}

#[derive(Debug, Serialize)]
pub struct MovieDeletedResponse {
    pub success: bool,
    pub deleted: MovieRow,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn release_date_accepts_date_or_datetime() {
        let date = parse_release_date("2019-07-26").expect("date");
        assert_eq!(date.to_string(), "2019-07-26 00:00:00");

        let datetime = parse_release_date("2019-07-26T18:30:00").expect("datetime");
        assert_eq!(datetime.to_string(), "2019-07-26 18:30:00");

        assert!(parse_release_date("26/07/2019").is_err());
    }

    #[test]
    fn create_requires_title_and_date() {
        let missing_date = CreateMovieRequest {
            title: Some("Heat".into()),
            release_date: None,
        };
        assert_eq!(
            missing_date.into_new_movie().unwrap_err(),
            "release_date is required"
        );

        let missing_title = CreateMovieRequest {
            title: None,
            release_date: Some("1995-12-15".into()),
        };
        assert_eq!(missing_title.into_new_movie().unwrap_err(), "title is required");
    }
}
