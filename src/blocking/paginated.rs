//! Iterator over paginated list endpoints for the blocking client.

use std::collections::VecDeque;
use std::marker::PhantomData;
use std::sync::Arc;

use reqwest::Method;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::client::envelope::Body;
use crate::client::paginated::select_items;
use crate::client::{PageLinks, RequestSpec};
use crate::{Error, Result};

use super::http::ClientInner;

enum Cursor {
    Start {
        url: String,
        query: Vec<(String, String)>,
    },
    Next(String),
    Done,
}

/// A lazy iterator over every item of a paginated endpoint.
///
/// Each page is fetched only when the previous one is drained; stopping
/// iteration early fetches nothing further.
///
/// # Example
///
/// ```no_run
/// use teamspace_rs::blocking::TeamSpaceClient;
/// use teamspace_rs::{Credential, Room};
///
/// # fn example() -> teamspace_rs::Result<()> {
/// let client = TeamSpaceClient::new(Credential::from_env()?)?;
/// for room in client.paginate::<Room, ()>("/rooms", None, None) {
///     println!("{}", room?.title);
/// }
/// # Ok(())
/// # }
/// ```
pub struct Paginated<T> {
    inner: Arc<ClientInner>,
    cursor: Cursor,
    item_field: Option<String>,
    buffered: VecDeque<Value>,
    deferred_error: Option<Error>,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Paginated<T> {
    pub(crate) fn new(
        inner: Arc<ClientInner>,
        path: &str,
        query: Vec<(String, String)>,
        item_field: Option<String>,
    ) -> Self {
        let url = inner.url_for(path);
        Self {
            inner,
            cursor: Cursor::Start { url, query },
            item_field,
            buffered: VecDeque::new(),
            deferred_error: None,
            _marker: PhantomData,
        }
    }

    pub(crate) fn failing(inner: Arc<ClientInner>, error: Error) -> Self {
        Self {
            inner,
            cursor: Cursor::Done,
            item_field: None,
            buffered: VecDeque::new(),
            deferred_error: Some(error),
            _marker: PhantomData,
        }
    }

    /// Fetch one page and record the cursor for the one after it.
    fn fetch(&mut self, url: String, query: Vec<(String, String)>) -> Result<()> {
        let spec = RequestSpec::new(Method::GET, url).with_query(query);
        let envelope = self.inner.execute(&spec)?;

        self.cursor = match PageLinks::from_headers(&envelope.headers).next {
            Some(next) => Cursor::Next(next),
            None => Cursor::Done,
        };

        let map = match envelope.body {
            Body::Json(Value::Object(map)) => map,
            Body::Json(_) => {
                return Err(Error::Pagination(
                    "page response was not a JSON object".to_string(),
                ))
            }
            _ => {
                return Err(Error::Pagination(
                    "page response body was not JSON".to_string(),
                ))
            }
        };

        self.buffered = select_items(map, self.item_field.as_deref())?.into();
        Ok(())
    }
}

impl<T> Iterator for Paginated<T>
where
    T: DeserializeOwned,
{
    type Item = Result<T>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(error) = self.deferred_error.take() {
            return Some(Err(error));
        }

        loop {
            if let Some(raw) = self.buffered.pop_front() {
                return match serde_json::from_value(raw) {
                    Ok(item) => Some(Ok(item)),
                    Err(e) => {
                        self.cursor = Cursor::Done;
                        self.buffered.clear();
                        Some(Err(Error::Json(e)))
                    }
                };
            }

            match std::mem::replace(&mut self.cursor, Cursor::Done) {
                Cursor::Start { url, query } => {
                    if let Err(e) = self.fetch(url, query) {
                        self.cursor = Cursor::Done;
                        return Some(Err(e));
                    }
                }
                Cursor::Next(url) => {
                    if let Err(e) = self.fetch(url, Vec::new()) {
                        self.cursor = Cursor::Done;
                        return Some(Err(e));
                    }
                }
                Cursor::Done => return None,
            }
        }
    }
}
