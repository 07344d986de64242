//! Paginated stream for lazy iteration over list endpoints.
//!
//! List responses carry an RFC 5988 `Link` header whose `next` relation is
//! the cursor for the following page. [`PaginatedStream`] follows that
//! cursor lazily: a page is fetched only when the consumer has drained the
//! previous one and asks for more.

use std::collections::VecDeque;
use std::future::Future;
use std::marker::PhantomData;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use futures_util::Stream;
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use super::envelope::Body;
use super::http::{ClientInner, RequestSpec};
use super::link::PageLinks;
use crate::{Error, Result};

/// Type alias for a boxed future used internally.
type BoxFuture<'a, T> = Pin<Box<dyn std::future::Future<Output = T> + Send + 'a>>;

/// One fetched page: raw items plus the cursor for the page after it.
pub(crate) struct FetchedPage {
    pub(crate) items: Vec<Value>,
    pub(crate) next: Option<String>,
}

enum Cursor {
    /// First request: the caller's URL and query parameters.
    Start {
        url: String,
        query: Vec<(String, String)>,
    },
    /// Follow-up request: the server-supplied `next` URL, used verbatim.
    /// The original query parameters are never re-applied to it.
    Next(String),
    Done,
}

/// A stream that lazily fetches pages from a paginated endpoint and
/// yields individual deserialized items.
///
/// Dropping the stream (or simply not polling it) after a partial read
/// fetches nothing further; pages within one stream arrive strictly in
/// server order.
///
/// # Example
///
/// ```no_run
/// use futures_util::StreamExt;
///
/// # async fn example(client: teamspace_rs::TeamSpaceClient) -> teamspace_rs::Result<()> {
/// let mut stream = client.rooms().list_stream(None);
///
/// while let Some(result) = stream.next().await {
///     let room = result?;
///     println!("{}", room.title);
/// }
/// # Ok(())
/// # }
/// ```
pub struct PaginatedStream<T> {
    inner: Arc<ClientInner>,
    cursor: Cursor,
    item_field: Option<String>,
    buffered: VecDeque<Value>,
    pending: Option<BoxFuture<'static, Result<FetchedPage>>>,
    /// Error produced while building the stream, yielded on first poll.
    deferred_error: Option<Error>,
    _marker: PhantomData<fn() -> T>,
}

impl<T> PaginatedStream<T> {
    /// Start a stream at `path` with the given first-request query.
    ///
    /// `item_field` names the JSON field holding the item array; `None`
    /// falls back to a field named `items`, then to the first array-valued
    /// field in server key order.
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
            pending: None,
            deferred_error: None,
            _marker: PhantomData,
        }
    }

    /// A stream that yields `error` once and ends, for failures detected
    /// before the first request could be described.
    pub(crate) fn failing(inner: Arc<ClientInner>, error: Error) -> Self {
        Self {
            inner,
            cursor: Cursor::Done,
            item_field: None,
            buffered: VecDeque::new(),
            pending: None,
            deferred_error: Some(error),
            _marker: PhantomData,
        }
    }
}

impl<T> Stream for PaginatedStream<T>
where
    T: DeserializeOwned,
{
    type Item = Result<T>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = &mut *self;

        if let Some(error) = this.deferred_error.take() {
            return Poll::Ready(Some(Err(error)));
        }

        loop {
            // Drain the current page before touching the network.
            if let Some(raw) = this.buffered.pop_front() {
                return match serde_json::from_value(raw) {
                    Ok(item) => Poll::Ready(Some(Ok(item))),
                    Err(e) => {
                        this.cursor = Cursor::Done;
                        this.buffered.clear();
                        Poll::Ready(Some(Err(Error::Json(e))))
                    }
                };
            }

            if let Some(fut) = this.pending.as_mut() {
                match fut.as_mut().poll(cx) {
                    Poll::Ready(Ok(page)) => {
                        this.pending = None;
                        this.cursor = match page.next {
                            Some(url) => Cursor::Next(url),
                            None => Cursor::Done,
                        };
                        this.buffered = page.items.into();
                        if this.buffered.is_empty() && matches!(this.cursor, Cursor::Done) {
                            return Poll::Ready(None);
                        }
                        // Empty page with a next link: keep following.
                        continue;
                    }
                    Poll::Ready(Err(e)) => {
                        this.pending = None;
                        this.cursor = Cursor::Done;
                        return Poll::Ready(Some(Err(e)));
                    }
                    Poll::Pending => return Poll::Pending,
                }
            }

            match std::mem::replace(&mut this.cursor, Cursor::Done) {
                Cursor::Start { url, query } => {
                    let inner = this.inner.clone();
                    let field = this.item_field.clone();
                    this.pending = Some(Box::pin(async move {
                        fetch_page(inner, url, query, field).await
                    }));
                }
                Cursor::Next(url) => {
                    let inner = this.inner.clone();
                    let field = this.item_field.clone();
                    this.pending = Some(Box::pin(async move {
                        fetch_page(inner, url, Vec::new(), field).await
                    }));
                }
                Cursor::Done => return Poll::Ready(None),
            }
        }
    }
}

/// Fetch one page through the session's retry policy and gate.
async fn fetch_page(
    inner: Arc<ClientInner>,
    url: String,
    query: Vec<(String, String)>,
    item_field: Option<String>,
) -> Result<FetchedPage> {
    let spec = RequestSpec::new(Method::GET, url).with_query(query);
    let envelope = inner.execute(&spec).await?;

    let next = PageLinks::from_headers(&envelope.headers).next;

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

    let items = select_items(map, item_field.as_deref())?;
    Ok(FetchedPage { items, next })
}

/// Pick the field holding the page's item array.
///
/// Precedence: the caller-specified field, a field literally named
/// `items`, then the first array-valued field in the object's key order.
/// The last fallback exists for compatibility with endpoints that name
/// their array after the resource; callers that know the field name
/// should pass it explicitly.
pub(crate) fn select_items(
    mut map: Map<String, Value>,
    item_field: Option<&str>,
) -> Result<Vec<Value>> {
    let key = match item_field {
        Some(field) => field.to_string(),
        None if map.contains_key("items") => "items".to_string(),
        None => map
            .iter()
            .find(|(_, v)| v.is_array())
            .map(|(k, _)| k.clone())
            .ok_or_else(|| {
                Error::Pagination("no array-valued field in page response".to_string())
            })?,
    };

    match map.remove(&key) {
        Some(Value::Array(items)) => Ok(items),
        Some(_) => Err(Error::Pagination(format!(
            "field `{}` is not an array",
            key
        ))),
        None => Err(Error::Pagination(format!(
            "field `{}` missing from page response",
            key
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn obj(json: &str) -> Map<String, Value> {
        match serde_json::from_str(json).unwrap() {
            Value::Object(map) => map,
            _ => panic!("fixture must be an object"),
        }
    }

    #[test]
    fn test_select_explicit_field() {
        let map = obj(r#"{"items": [1], "rooms": [2, 3]}"#);
        let items = select_items(map, Some("rooms")).unwrap();
        assert_eq!(items.len(), 2);
    }

    #[test]
    fn test_select_prefers_items_key() {
        let map = obj(r#"{"rooms": [2, 3], "items": [1]}"#);
        let items = select_items(map, None).unwrap();
        assert_eq!(items, vec![Value::from(1)]);
    }

    #[test]
    fn test_select_first_array_field_in_key_order() {
        // No `items` key: the first array-valued field wins, in the
        // order the server sent the keys.
        let map = obj(r#"{"total": 3, "zeta": [1, 2], "alpha": [9]}"#);
        let items = select_items(map, None).unwrap();
        assert_eq!(items.len(), 2);
    }

    #[test]
    fn test_select_explicit_field_not_array() {
        let map = obj(r#"{"rooms": "nope"}"#);
        assert!(matches!(
            select_items(map, Some("rooms")),
            Err(Error::Pagination(_))
        ));
    }

    #[test]
    fn test_select_explicit_field_missing() {
        let map = obj(r#"{"rooms": []}"#);
        assert!(matches!(
            select_items(map, Some("messages")),
            Err(Error::Pagination(_))
        ));
    }

    #[test]
    fn test_select_no_array_anywhere() {
        let map = obj(r#"{"total": 3}"#);
        assert!(matches!(select_items(map, None), Err(Error::Pagination(_))));
    }
}
