use chrono::{Local, NaiveDate};

/// 提供「今天」的日期；測試時可替換成固定日期
pub trait Clock: Send + Sync {
    fn today(&self) -> NaiveDate;
}

/// Reads the local calendar date at call time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

pub trait SiteSettings: Send + Sync {
    fn site_url(&self) -> &str;
    fn source_template(&self) -> &str;
    fn permalink_template(&self) -> &str;
    fn directory_indexes(&self) -> bool;
}
