use crate::client::{ListRequest, ParameterStore};
use crate::error::{Result, StoreError};
use crate::param::RawParameter;

/// Drives `list_by_path` across every page of a listing.
pub struct PaginatedLister<'a, S: ?Sized> {
    store: &'a S,
    page_size: Option<usize>,
}

impl<'a, S: ParameterStore + ?Sized> PaginatedLister<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self {
            store,
            page_size: None,
        }
    }

    #[must_use]
    pub fn with_page_size(mut self, page_size: Option<usize>) -> Self {
        self.page_size = page_size;
        self
    }

    /// Fetch all pages under `path`, concatenated in the order the store returned them.
    ///
    /// Pages are requested one after another until a page comes back without a
    /// continuation token. Any page failure aborts the listing; nothing partial is returned.
    pub async fn list_all(
        &self,
        path: &str,
        recursive: bool,
        decrypt: bool,
    ) -> Result<Vec<RawParameter>> {
        let mut request = ListRequest {
            path: path.to_string(),
            recursive,
            with_decryption: decrypt,
            next_token: None,
            max_results: self.page_size,
        };
        let mut entries = Vec::new();
        let mut pages = 0usize;

        loop {
            let page = self
                .store
                .list_by_path(&request)
                .await
                .map_err(|err| StoreError::list_failure(path, err))?;
            pages += 1;
            log::debug!(
                "Page {pages} of {path}: {} parameters, more={}",
                page.parameters.len(),
                page.next_token.is_some()
            );
            entries.extend(page.parameters);

            match page.next_token {
                Some(token) => request.next_token = Some(token),
                None => break,
            }
        }

        log::debug!("Listed {} parameters under {path} in {pages} pages", entries.len());
        Ok(entries)
    }
}
