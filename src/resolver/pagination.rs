use crate::error::{ResolveError, UpstreamError};
use crate::proto::{PageRequest, PageResponse, QueryValidatorsResponse};
use crate::resolver::common::execute;
use crate::upstream::QueryChannel;
use futures::stream::{self, Stream, TryStreamExt};
use prost::Message;

/// Response message carrying one page of a cursor-paginated listing.
pub trait Paged: Message + Default + Send + Sized {
    fn page(&self) -> Option<&PageResponse>;

    fn item_count(&self) -> usize;

    /// Appends the items of `next` after our own and takes over its cursor.
    fn absorb(&mut self, next: Self);
}

impl Paged for QueryValidatorsResponse {
    fn page(&self) -> Option<&PageResponse> {
        self.pagination.as_ref()
    }

    fn item_count(&self) -> usize {
        self.validators.len()
    }

    fn absorb(&mut self, next: Self) {
        let total = reported_total(self).max(reported_total(&next));
        self.validators.extend(next.validators);
        self.pagination = Some(PageResponse {
            next_key: next.pagination.map(|page| page.next_key).unwrap_or_default(),
            total,
        });
    }
}

fn reported_total<P: Paged>(page: &P) -> u64 {
    page.page().map(|page| page.total).unwrap_or_default()
}

struct Cursor {
    next_key: Option<Vec<u8>>,
    collected: usize,
    total: u64,
    finished: bool,
}

impl Cursor {
    fn start() -> Self {
        Self {
            next_key: None,
            collected: 0,
            total: 0,
            finished: false,
        }
    }

    fn page_request(&self) -> PageRequest {
        match &self.next_key {
            // only the first page is asked to count, key-based pages report 0
            None => PageRequest {
                count_total: true,
                ..Default::default()
            },
            Some(key) => PageRequest {
                key: key.clone(),
                ..Default::default()
            },
        }
    }

    fn advance<P: Paged>(self, method: &str, page: &P) -> Result<Self, ResolveError> {
        let collected = self.collected + page.item_count();
        let total = self.total.max(reported_total(page));
        let next_key = page
            .page()
            .map(|page| page.next_key.clone())
            .filter(|key| !key.is_empty());
        let finished = collected as u64 >= total;

        if !finished && next_key.is_none() {
            return Err(ResolveError::AbciQuery(UpstreamError::Query {
                path: method.to_string(),
                message: format!("pagination ended after {} of {} items", collected, total),
            }));
        }

        Ok(Self {
            next_key,
            collected,
            total,
            finished,
        })
    }
}

/// Lazily fetches pages of `method`, one query per pulled item, until the
/// collected item count reaches the total reported by the node.
pub fn pages<'a, Req, Resp>(
    channel: &'a dyn QueryChannel,
    method: &'static str,
    request: fn(PageRequest) -> Req,
) -> impl Stream<Item = Result<Resp, ResolveError>> + Send + 'a
where
    Req: Message + Send + 'a,
    Resp: Paged + 'a,
{
    stream::try_unfold(Cursor::start(), move |cursor| async move {
        if cursor.finished {
            return Ok(None);
        }

        let query = request(cursor.page_request());
        let page = execute::<Req, Resp>(channel, method, &query).await?;
        let cursor = cursor.advance(method, &page)?;
        tracing::debug!(
            "{}: collected {} of {} items",
            method,
            cursor.collected,
            cursor.total
        );

        Ok(Some((page, cursor)))
    })
}

/// Folds all pages into one response, in upstream order.
pub async fn accumulate<P, S>(pages: S) -> Result<P, ResolveError>
where
    P: Paged,
    S: Stream<Item = Result<P, ResolveError>>,
{
    let merged = pages
        .try_fold(None, |merged: Option<P>, page| async move {
            Ok::<_, ResolveError>(Some(match merged {
                None => page,
                Some(mut merged) => {
                    merged.absorb(page);
                    merged
                }
            }))
        })
        .await?;

    Ok(merged.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::proto::Validator;

    fn page(names: &[&str], next_key: &[u8], total: u64) -> QueryValidatorsResponse {
        QueryValidatorsResponse {
            validators: names
                .iter()
                .map(|name| Validator {
                    operator_address: name.to_string(),
                    ..Default::default()
                })
                .collect(),
            pagination: Some(PageResponse {
                next_key: next_key.to_vec(),
                total,
            }),
        }
    }

    #[actix_web::test]
    async fn accumulate_keeps_order_and_reported_total() {
        let pages = stream::iter(vec![
            Ok(page(&["a", "b"], b"k1", 4)),
            Ok(page(&["c"], b"k2", 0)),
            Ok(page(&["d"], b"", 0)),
        ]);

        let merged: QueryValidatorsResponse = accumulate(pages).await.unwrap();
        let names = merged
            .validators
            .iter()
            .map(|v| v.operator_address.as_str())
            .collect::<Vec<_>>();
        assert_eq!(names, vec!["a", "b", "c", "d"]);
        assert_eq!(
            merged.pagination,
            Some(PageResponse {
                next_key: Vec::new(),
                total: 4
            })
        );
    }

    #[test]
    fn cursor_stops_when_total_reached() {
        let cursor = Cursor::start()
            .advance("/m", &page(&["a", "b"], b"k1", 2))
            .unwrap();
        assert!(cursor.finished);
    }

    #[test]
    fn cursor_rejects_truncated_listing() {
        let err = Cursor::start()
            .advance("/m", &page(&["a"], b"", 3))
            .err()
            .unwrap();
        assert!(matches!(err, ResolveError::AbciQuery(_)));
    }

    #[test]
    fn first_page_counts_total() {
        let cursor = Cursor::start();
        assert!(cursor.page_request().count_total);

        let cursor = cursor.advance("/m", &page(&["a"], b"k1", 2)).unwrap();
        let request = cursor.page_request();
        assert_eq!(request.key, b"k1".to_vec());
        assert!(!request.count_total);
    }
}
