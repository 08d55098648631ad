//! Abstractions for offset pagination.

/// Maximum allowed size of a single [`Page`].
pub const MAX_PAGE_SIZE: u32 = 100;

/// Pagination arguments.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Arguments {
    /// Number of the requested page, starting from `1`.
    page: u32,

    /// Maximum number of items on the requested page.
    page_size: u32,
}

impl Arguments {
    /// Creates a new [`Arguments`].
    ///
    /// Missing `page` means the first one, and missing `page_size` falls back
    /// to the `default` one.
    ///
    /// [`None`] is returned if the `page` is zero or the `page_size` is out of
    /// `1..=`[`MAX_PAGE_SIZE`] range.
    #[must_use]
    pub fn new(
        page: Option<u32>,
        page_size: Option<u32>,
        default: u32,
    ) -> Option<Self> {
        let page = page.unwrap_or(1);
        let page_size = page_size.unwrap_or(default);

        (page >= 1 && (1..=MAX_PAGE_SIZE).contains(&page_size))
            .then_some(Self { page, page_size })
    }

    /// Returns the number of the requested page.
    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    /// Returns the maximum number of items on the requested page.
    #[must_use]
    pub const fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Returns number of items to skip before the requested page.
    #[must_use]
    pub fn offset(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.page_size)
    }

    /// Returns number of items to take for the requested page.
    #[must_use]
    pub fn limit(&self) -> u64 {
        u64::from(self.page_size)
    }

    /// Applies these [`Arguments`] to the provided sorted `items`.
    pub fn apply<T>(
        &self,
        items: impl IntoIterator<Item = T>,
    ) -> impl Iterator<Item = T> {
        let offset = usize::try_from(self.offset()).unwrap_or(usize::MAX);
        let limit = usize::try_from(self.limit()).unwrap_or(usize::MAX);
        items.into_iter().skip(offset).take(limit)
    }
}

/// A page of items.
#[derive(Clone, Debug)]
pub struct Page<T> {
    /// Items on this [`Page`].
    pub items: Vec<T>,

    /// Total number of items matching the request, before paginating.
    pub total_count: u64,

    /// [`Arguments`] this [`Page`] was requested with.
    pub arguments: Arguments,
}

impl<T> Page<T> {
    /// Creates a new [`Page`] out of the provided `items`.
    #[must_use]
    pub fn new(
        arguments: Arguments,
        items: impl IntoIterator<Item = impl Into<T>>,
        total_count: u64,
    ) -> Self {
        Self {
            items: items.into_iter().map(Into::into).collect(),
            total_count,
            arguments,
        }
    }

    /// Returns the total number of pages.
    #[must_use]
    pub fn total_pages(&self) -> u64 {
        self.total_count.div_ceil(self.arguments.limit())
    }
}

/// Pagination selector.
#[derive(Clone, Debug)]
pub struct Selector<F, S> {
    /// Pagination [`Arguments`].
    pub arguments: Arguments,

    /// Filter being applied before paginating.
    pub filter: F,

    /// Sorting being applied before paginating.
    pub sort: S,
}

/// Order of items.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Order {
    /// Ascending order.
    Ascending,

    /// Descending order.
    Descending,
}

impl Order {
    /// Creates a new [`Order`] out of the provided `ascending` flag.
    #[must_use]
    pub const fn ascending(ascending: bool) -> Self {
        if ascending {
            Self::Ascending
        } else {
            Self::Descending
        }
    }

    /// Applies this [`Order`] to the provided ascending [`Ordering`].
    ///
    /// [`Ordering`]: std::cmp::Ordering
    #[must_use]
    pub fn apply(self, ord: std::cmp::Ordering) -> std::cmp::Ordering {
        match self {
            Self::Ascending => ord,
            Self::Descending => ord.reverse(),
        }
    }

    #[cfg(feature = "postgres")]
    /// Returns SQL keyword representing this [`Order`].
    #[must_use]
    pub const fn sql(&self) -> &'static str {
        match self {
            Self::Ascending => "ASC",
            Self::Descending => "DESC",
        }
    }
}
