//! Client-side page slicing.
//!
//! The upstream API returns the whole collection unpaged, so every list fetch slices the full
//! result locally. Out-of-range pages yield an empty slice rather than an error.

use std::fmt;
use std::num::{NonZeroU32, NonZeroUsize};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A 1-indexed page number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PageNumber(NonZeroU32);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PageNumberError {
    #[error("page numbers start at 1")]
    Zero,
    #[error("invalid page number `{0}`")]
    Invalid(String),
}

impl PageNumber {
    pub const FIRST: Self = Self(NonZeroU32::MIN);

    pub fn new(page: u32) -> Result<Self, PageNumberError> {
        NonZeroU32::new(page).map(Self).ok_or(PageNumberError::Zero)
    }

    pub fn get(self) -> u32 {
        self.0.get()
    }

    /// The following page, saturating at `u32::MAX`.
    pub fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }

    /// The preceding page, never below [`PageNumber::FIRST`].
    pub fn previous(self) -> Self {
        Self::new(self.get() - 1).unwrap_or(Self::FIRST)
    }

    /// Zero-based index of the first item on this page.
    fn start_index(self, page_size: NonZeroUsize) -> usize {
        usize::try_from(self.get() - 1)
            .unwrap_or(usize::MAX)
            .saturating_mul(page_size.get())
    }
}

impl Default for PageNumber {
    fn default() -> Self {
        Self::FIRST
    }
}

impl fmt::Display for PageNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for PageNumber {
    type Err = PageNumberError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let page: u32 = s
            .trim()
            .parse()
            .map_err(|_parse| PageNumberError::Invalid(s.to_owned()))?;
        Self::new(page)
    }
}

impl TryFrom<u32> for PageNumber {
    type Error = PageNumberError;

    fn try_from(page: u32) -> Result<Self, Self::Error> {
        Self::new(page)
    }
}

/// One page cut from a larger ordered collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageSlice<T> {
    pub items: Vec<T>,
    /// `ceil(len / page_size)`, never less than 1.
    pub total_pages: u32,
}

/// Number of pages needed for `len` items; an empty collection still has one page.
pub fn total_pages(len: usize, page_size: NonZeroUsize) -> u32 {
    let pages = len.div_ceil(page_size.get()).max(1);
    u32::try_from(pages).unwrap_or(u32::MAX)
}

/// Cuts `page` out of `all`.
pub fn slice<T: Clone>(all: &[T], page: PageNumber, page_size: NonZeroUsize) -> PageSlice<T> {
    let items = all
        .iter()
        .skip(page.start_index(page_size))
        .take(page_size.get())
        .cloned()
        .collect();

    PageSlice {
        items,
        total_pages: total_pages(all.len(), page_size),
    }
}
