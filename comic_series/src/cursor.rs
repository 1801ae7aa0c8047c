//! Navigation cursor: the current position inside a series.

use chrono::NaiveDate;

pub const ISO_DATE_FORMAT: &str = "%Y-%m-%d";

/// Outcome of a single `next`/`prev` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Moved,
    /// Already at a bound; nothing changed.
    Unchanged,
    /// The next date would be in the future.
    NoFutureContent,
}

/// Position in a date-templated series. `current` never passes today.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateCursor {
    current: NaiveDate,
    earliest: Option<NaiveDate>,
}

impl DateCursor {
    pub fn new(today: NaiveDate, earliest: Option<NaiveDate>) -> Self {
        Self {
            current: today,
            earliest,
        }
    }

    pub fn current(&self) -> NaiveDate {
        self.current
    }

    pub fn next(&mut self, today: NaiveDate) -> Step {
        match self.current.succ_opt() {
            Some(candidate) if candidate <= today => {
                self.current = candidate;
                Step::Moved
            }
            _ => Step::NoFutureContent,
        }
    }

    pub fn prev(&mut self) -> Step {
        if let Some(earliest) = self.earliest {
            if self.current <= earliest {
                return Step::Unchanged;
            }
        }
        match self.current.pred_opt() {
            Some(date) => {
                self.current = date;
                Step::Moved
            }
            None => Step::Unchanged,
        }
    }

    pub fn iso(&self) -> String {
        self.current.format(ISO_DATE_FORMAT).to_string()
    }
}

/// Position in a listed series: `index < len` whenever `len > 0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexCursor {
    index: Option<usize>,
    len: usize,
}

impl IndexCursor {
    pub fn new(len: usize) -> Self {
        Self {
            index: (len > 0).then_some(0),
            len,
        }
    }

    pub fn index(&self) -> Option<usize> {
        self.index
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn next(&mut self) -> Step {
        match self.index {
            Some(i) if i + 1 < self.len => {
                self.index = Some(i + 1);
                Step::Moved
            }
            _ => Step::Unchanged,
        }
    }

    pub fn prev(&mut self) -> Step {
        match self.index {
            Some(i) if i > 0 => {
                self.index = Some(i - 1);
                Step::Moved
            }
            _ => Step::Unchanged,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NavigationCursor {
    /// No series selected, or its image list is not known yet.
    #[default]
    Empty,
    Date(DateCursor),
    Index(IndexCursor),
}

impl NavigationCursor {
    pub fn is_positioned(&self) -> bool {
        match self {
            NavigationCursor::Empty => false,
            NavigationCursor::Date(_) => true,
            NavigationCursor::Index(cursor) => !cursor.is_empty(),
        }
    }

    pub fn next(&mut self, today: NaiveDate) -> Step {
        match self {
            NavigationCursor::Empty => Step::Unchanged,
            NavigationCursor::Date(cursor) => cursor.next(today),
            NavigationCursor::Index(cursor) => cursor.next(),
        }
    }

    pub fn prev(&mut self) -> Step {
        match self {
            NavigationCursor::Empty => Step::Unchanged,
            NavigationCursor::Date(cursor) => cursor.prev(),
            NavigationCursor::Index(cursor) => cursor.prev(),
        }
    }

    /// Date text, or `index+1/len` for listed series.
    pub fn position_label(&self) -> Option<String> {
        match self {
            NavigationCursor::Empty => None,
            NavigationCursor::Date(cursor) => Some(cursor.iso()),
            NavigationCursor::Index(cursor) => cursor
                .index()
                .map(|i| format!("{}/{}", i + 1, cursor.len())),
        }
    }
}
