use serde::Deserialize;

/// Width of the `review` column.
pub const MAX_REVIEW_CHARS: usize = 250;

pub use crate::entities::movie::Model as Movie;

/// A catalog search hit offered on the selection page.
#[derive(Clone, Debug, Deserialize)]
pub struct CandidateMovie {
    pub id: i32,
    pub title: String,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
}

impl CandidateMovie {
    pub fn release_year(&self) -> Option<&str> {
        self.release_date.as_deref().and_then(|d| d.split('-').next()).filter(|y| !y.is_empty())
    }
}

/// Everything needed to insert a movie, taken from the catalog's detail record.
#[derive(Clone, Debug, PartialEq)]
pub struct NewMovie {
    pub title: String,
    pub year: i32,
    pub description: String,
    pub img_url: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct AddForm {
    #[serde(default)]
    pub title: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct IdQuery {
    #[serde(default)]
    pub id: Option<String>,
}

impl IdQuery {
    pub fn value(&self) -> Option<&str> {
        self.id.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct EditForm {
    #[serde(default)]
    pub rating: String,
    #[serde(default)]
    pub review: String,
}

#[derive(Debug, Default, PartialEq)]
pub struct EditErrors {
    pub rating: Option<&'static str>,
    pub review: Option<&'static str>,
}

impl EditForm {
    pub fn validate(&self) -> Result<(f64, String), EditErrors> {
        let mut errors = EditErrors::default();

        let rating = if self.rating.trim().is_empty() {
            errors.rating = Some("A rating is required.");
            None
        } else {
            let parsed = parse_rating(&self.rating);
            if parsed.is_none() {
                errors.rating = Some("Enter the rating as a number, e.g. 7.5.");
            }
            parsed
        };

        let review = self.review.trim();
        if review.is_empty() {
            errors.review = Some("A review is required.");
        } else if review.chars().count() > MAX_REVIEW_CHARS {
            errors.review = Some("Keep the review to 250 characters.");
        }

        match rating {
            Some(rating) if errors == EditErrors::default() => Ok((rating, review.to_string())),
            _ => Err(errors),
        }
    }
}

/// Accepts `digits`, `digits.digits` or `.digits` that fit a finite `f64`.
/// No range is enforced.
pub fn parse_rating(raw: &str) -> Option<f64> {
    let raw = raw.trim();
    let digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    let valid = match raw.split_once('.') {
        None => digits(raw),
        Some((whole, frac)) => digits(frac) && (whole.is_empty() || digits(whole)),
    };
    if !valid {
        return None;
    }
    raw.parse().ok().filter(|r: &f64| r.is_finite())
}
