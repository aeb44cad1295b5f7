use url::Url;

/// Link to the following page of a result set, `None` at the end of the chain.
pub type PageCursor = Option<Url>;

/// Everything pulled out of one rendered page.
#[derive(Debug, Clone, PartialEq)]
pub struct PageExtract<T> {
    pub records: Vec<T>,
    pub next: PageCursor,
    /// Containers that were found but lacked a mandatory field.
    pub dropped: usize,
}

impl<T> PageExtract<T> {
    pub fn new(records: Vec<T>, next: PageCursor) -> Self {
        PageExtract {
            records,
            next,
            dropped: 0,
        }
    }
}
