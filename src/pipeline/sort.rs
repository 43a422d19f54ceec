//! Review ordering.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::{AppError, Result};
use crate::models::Review;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Earlier or lower first
    #[default]
    Asc,
    Desc,
}

impl FromStr for SortOrder {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            other => Err(AppError::validation(format!("unknown sort order '{other}'"))),
        }
    }
}

/// Which review dimension a rating sort uses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RatingCategory {
    #[default]
    Clarity,
    Feasibility,
    Availability,
}

impl RatingCategory {
    pub fn value(&self, review: &Review) -> u8 {
        match self {
            Self::Clarity => review.rating_clarity,
            Self::Feasibility => review.rating_feasibility,
            Self::Availability => review.rating_availability,
        }
    }
}

impl FromStr for RatingCategory {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "clarity" => Ok(Self::Clarity),
            "feasibility" => Ok(Self::Feasibility),
            "availability" => Ok(Self::Availability),
            other => Err(AppError::validation(format!(
                "unknown rating category '{other}'"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortCriteria {
    #[default]
    Date,
    Rating(RatingCategory),
}

/// A review ordering: criteria plus direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReviewSort {
    pub criteria: SortCriteria,
    pub order: SortOrder,
}

impl ReviewSort {
    pub fn new(criteria: SortCriteria, order: SortOrder) -> Self {
        Self { criteria, order }
    }

    /// Build from the textual form used by the CLI: `date|rating`,
    /// `asc|desc`, and for ratings `clarity|feasibility|availability`
    /// (clarity when omitted).
    pub fn parse(criteria: &str, order: &str, category: Option<&str>) -> Result<Self> {
        let order = order.parse()?;
        let criteria = match criteria.trim().to_lowercase().as_str() {
            "date" => SortCriteria::Date,
            "rating" => SortCriteria::Rating(match category {
                Some(c) => c.parse()?,
                None => RatingCategory::default(),
            }),
            other => {
                return Err(AppError::validation(format!(
                    "unknown sort criteria '{other}'"
                )));
            }
        };
        Ok(Self { criteria, order })
    }

    fn compare(&self, a: &Review, b: &Review) -> Ordering {
        let ord = match self.criteria {
            SortCriteria::Date => a.created_at.cmp(&b.created_at),
            SortCriteria::Rating(category) => category.value(a).cmp(&category.value(b)),
        };
        match self.order {
            SortOrder::Asc => ord,
            SortOrder::Desc => ord.reverse(),
        }
    }

    /// Stable in-place sort; equal keys keep their relative order.
    pub fn apply(&self, reviews: &mut [Review]) {
        reviews.sort_by(|a, b| self.compare(a, b));
    }
}

impl fmt::Display for ReviewSort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let order = match self.order {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        };
        match self.criteria {
            SortCriteria::Date => write!(f, "date {order}"),
            SortCriteria::Rating(c) => write!(f, "{c:?} rating {order}"),
        }
    }
}

/// Reviews as fetched and as displayed.
///
/// By default every sort starts from the fetch order, so the result depends
/// only on the chosen sort. With `compound` set, each sort starts from the
/// currently displayed order instead and ties keep whatever order the
/// previous sort left them in.
#[derive(Debug, Clone, Default)]
pub struct ReviewList {
    pristine: Vec<Review>,
    displayed: Vec<Review>,
    active: Option<ReviewSort>,
    compound: bool,
}

impl ReviewList {
    pub fn new(compound: bool) -> Self {
        Self {
            compound,
            ..Self::default()
        }
    }

    /// Replace the contents after a fetch, re-applying the active sort.
    pub fn replace(&mut self, reviews: Vec<Review>) {
        self.displayed = reviews.clone();
        self.pristine = reviews;
        if let Some(sort) = self.active {
            sort.apply(&mut self.displayed);
        }
    }

    pub fn apply_sort(&mut self, sort: ReviewSort) {
        if !self.compound {
            self.displayed = self.pristine.clone();
        }
        sort.apply(&mut self.displayed);
        self.active = Some(sort);
        log::debug!("Sorted {} reviews by {}", self.displayed.len(), sort);
    }

    pub fn displayed(&self) -> &[Review] {
        &self.displayed
    }

    pub fn active_sort(&self) -> Option<ReviewSort> {
        self.active
    }
}
