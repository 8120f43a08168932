//! Page arithmetic for listing pages.
//!
//! Lookups never fail: a missing or malformed page number falls back to the
//! first page, and numbers outside `1..=num_pages` clamp to the last page.

#[derive(Clone, Copy, Debug)]
pub struct Paginator {
    count: i64,
    per_page: i64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Page {
    pub number: i64,
    pub num_pages: i64,
    pub count: i64,
    pub per_page: i64,
}

enum PageNumber {
    Number(i64),
    /// An integer too large for `i64`.
    OutOfRange,
    Invalid,
}

fn parse_page_number(raw: &str) -> PageNumber {
    if let Ok(n) = raw.parse::<i64>() {
        return PageNumber::Number(n);
    }
    let digits = raw
        .strip_prefix('-')
        .or_else(|| raw.strip_prefix('+'))
        .unwrap_or(raw);
    if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) {
        PageNumber::OutOfRange
    } else {
        PageNumber::Invalid
    }
}

impl Paginator {
    pub fn new(count: i64, per_page: i64) -> Self {
        Self {
            count: count.max(0),
            per_page: per_page.max(1),
        }
    }

    /// An empty result set still has one (empty) page.
    pub fn num_pages(&self) -> i64 {
        if self.count == 0 {
            1
        } else {
            (self.count + self.per_page - 1) / self.per_page
        }
    }

    pub fn get_page(&self, raw: Option<&str>) -> Page {
        let num_pages = self.num_pages();
        let number = match raw.map(str::trim).map(parse_page_number) {
            None | Some(PageNumber::Invalid) => 1,
            Some(PageNumber::OutOfRange) => num_pages,
            Some(PageNumber::Number(n)) if n < 1 || n > num_pages => num_pages,
            Some(PageNumber::Number(n)) => n,
        };
        Page {
            number,
            num_pages,
            count: self.count,
            per_page: self.per_page,
        }
    }
}

impl Page {
    pub fn offset(&self) -> i64 {
        (self.number - 1) * self.per_page
    }

    pub fn limit(&self) -> i64 {
        self.per_page
    }

    pub fn has_next(&self) -> bool {
        self.number < self.num_pages
    }

    pub fn has_previous(&self) -> bool {
        self.number > 1
    }

    pub fn next_page_number(&self) -> Option<i64> {
        self.has_next().then_some(self.number + 1)
    }

    pub fn previous_page_number(&self) -> Option<i64> {
        self.has_previous().then_some(self.number - 1)
    }

    /// 1-based index of the first item on this page (0 when empty).
    pub fn start_index(&self) -> i64 {
        if self.count == 0 { 0 } else { self.offset() + 1 }
    }

    pub fn end_index(&self) -> i64 {
        if self.number == self.num_pages {
            self.count
        } else {
            self.number * self.per_page
        }
    }
}
