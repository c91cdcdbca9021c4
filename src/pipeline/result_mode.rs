//! Result-selection semantics for ranked candidate lists.
//!
//! The vector index hands back a large ranked pool; a result mode decides
//! which part of it the user actually wants. The mode is a closed set so
//! that a corrupted or hand-edited pipeline file fails loudly instead of
//! silently falling back to a default.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::backend::ScoredHit;

use super::params::{count_param, float_param, text_param, ParamBag};
use super::PipelineError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultMode {
    TopN,
    LastN,
    SimilarityRange,
}

impl fmt::Display for ResultMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TopN => write!(f, "top_n"),
            Self::LastN => write!(f, "last_n"),
            Self::SimilarityRange => write!(f, "similarity_range"),
        }
    }
}

impl FromStr for ResultMode {
    type Err = PipelineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "top_n" => Ok(Self::TopN),
            "last_n" => Ok(Self::LastN),
            "similarity_range" => Ok(Self::SimilarityRange),
            other => Err(PipelineError::InvalidParam {
                param: "result_mode".to_string(),
                problem: format!(
                    "'{other}' is not one of top_n, last_n, similarity_range"
                ),
            }),
        }
    }
}

/// A result mode together with its validated mode parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ResultSelection {
    /// First N of the ranked list.
    TopN(usize),
    /// Last N of the ranked list, unchanged order. The pool is ranked by
    /// descending similarity, so this is deliberately the weakest tail.
    LastN(usize),
    /// All candidates whose similarity lies in `[min, max]`, inclusive.
    SimilarityRange { min: f32, max: f32 },
}

impl ResultSelection {
    /// Read the mode and its parameters from an operator parameter bag.
    /// A missing mode means `top_n`; an unknown mode string is an error.
    pub fn from_params(bag: &ParamBag) -> Result<Self, PipelineError> {
        let mode = match text_param(bag, "result_mode") {
            "" => ResultMode::TopN,
            raw => raw.parse()?,
        };

        Ok(match mode {
            ResultMode::TopN => Self::TopN(count_param(bag, "n_results", 100)),
            ResultMode::LastN => Self::LastN(count_param(bag, "n_results", 100)),
            ResultMode::SimilarityRange => Self::SimilarityRange {
                min: float_param(bag, "similarity_min", 0.0) as f32,
                max: float_param(bag, "similarity_max", 1.0) as f32,
            },
        })
    }

    /// Narrow a ranked candidate list. Never panics on short lists; an
    /// inverted similarity range just selects nothing.
    pub fn apply(&self, mut hits: Vec<ScoredHit>) -> Vec<ScoredHit> {
        match *self {
            Self::TopN(n) => {
                hits.truncate(n);
                hits
            }
            Self::LastN(n) => {
                if n >= hits.len() {
                    hits
                } else {
                    hits.split_off(hits.len() - n)
                }
            }
            Self::SimilarityRange { min, max } => {
                hits.retain(|hit| hit.similarity >= min && hit.similarity <= max);
                hits
            }
        }
    }
}
