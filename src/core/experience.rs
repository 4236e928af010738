//! Years-of-experience figures shown on the site.
//!
//! Every function takes "today" explicitly; the `*_now` style wrappers read
//! the local clock at the call site. Nothing is cached, so a long-running
//! server picks up each anniversary without a restart.

use chrono::{Datelike, Local};
use serde::{Deserialize, Serialize};

/// Career start: 2014-11-26.
pub const CAREER_START_YEAR: i32 = 2014;
pub const CAREER_START_MONTH: u32 = 11;
pub const CAREER_START_DAY: u32 = 26;

/// 起算日前的實習期（六個月）
pub const INTERNSHIP_OFFSET_YEARS: f64 = 0.5;

/// Whole years between the career start and `today`.
///
/// The count only moves on the anniversary itself. Dates before the start
/// yield the absolute difference instead of a negative number.
pub fn calculate_experience_at<D: Datelike>(today: &D) -> u32 {
    let years_diff = today.year() - CAREER_START_YEAR;
    let months_diff = today.month() as i32 - CAREER_START_MONTH as i32;
    let days_diff = today.day() as i32 - CAREER_START_DAY as i32;

    let mut total_years = years_diff;
    if months_diff < 0 || (months_diff == 0 && days_diff < 0) {
        total_years -= 1;
    }

    total_years.unsigned_abs()
}

pub fn calculate_experience() -> u32 {
    calculate_experience_at(&Local::now().date_naive())
}

pub fn total_experience_at<D: Datelike>(today: &D) -> f64 {
    f64::from(calculate_experience_at(today)) + INTERNSHIP_OFFSET_YEARS
}

pub fn total_experience() -> f64 {
    total_experience_at(&Local::now().date_naive())
}

pub fn experience_text_at<D: Datelike>(today: &D) -> String {
    format!("{}+ Years", calculate_experience_at(today))
}

pub fn experience_text() -> String {
    experience_text_at(&Local::now().date_naive())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperienceSummary {
    pub years: u32,
    pub total: f64,
    pub text: String,
}

impl ExperienceSummary {
    pub fn at<D: Datelike>(today: &D) -> Self {
        Self {
            years: calculate_experience_at(today),
            total: total_experience_at(today),
            text: experience_text_at(today),
        }
    }

    pub fn now() -> Self {
        Self::at(&Local::now().date_naive())
    }
}
