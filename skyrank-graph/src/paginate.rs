//! Cursor pagination over remote listings.
use crate::model::AccountRef;
use crate::source::{FollowGraphSource, Page};
use skyrank_common::{Result, SkyrankError};
use std::collections::HashSet;
use std::future::Future;

/// Drain a cursor-paginated listing.
///
/// `fetch_page` is called with `None` first and then with each continuation
/// token until a page arrives without one. Items are returned in page order.
/// The first error aborts the whole listing, and a continuation token that
/// was already sent is rejected as malformed.
pub async fn fetch_all<T, F, Fut>(mut fetch_page: F) -> Result<Vec<T>>
where
    F: FnMut(Option<String>) -> Fut,
    Fut: Future<Output = Result<Page<T>>>,
{
    let mut items = Vec::new();
    let mut cursor: Option<String> = None;
    let mut sent = HashSet::new();
    let mut pages = 0usize;

    loop {
        let page = fetch_page(cursor.take()).await?;
        pages += 1;
        items.extend(page.items);

        match page.cursor {
            Some(next) if !sent.insert(next.clone()) => {
                return Err(SkyrankError::Malformed(format!(
                    "pagination cursor {next:?} repeated after page {pages}"
                )));
            }
            Some(next) => cursor = Some(next),
            None => break,
        }
    }

    tracing::trace!(pages, items = items.len(), "paginate.done");
    Ok(items)
}

/// The complete follow-set of `actor`, requested `page_size` at a time.
pub async fn fetch_all_follows<S>(
    source: &S,
    actor: &str,
    page_size: u32,
) -> Result<Vec<AccountRef>>
where
    S: FollowGraphSource + ?Sized,
{
    fetch_all(|cursor| async move {
        source
            .list_follows(actor, page_size, cursor.as_deref())
            .await
    })
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    fn pages(sizes: &[usize]) -> Vec<Page<usize>> {
        let mut next = 0usize;
        let last = sizes.len().saturating_sub(1);
        sizes
            .iter()
            .enumerate()
            .map(|(i, &n)| {
                let items: Vec<usize> = (next..next + n).collect();
                next += n;
                Page {
                    items,
                    cursor: (i != last).then(|| format!("c{}", i + 1)),
                }
            })
            .collect()
    }

    #[tokio::test]
    async fn concatenates_pages_in_order() {
        let served = RefCell::new(pages(&[100, 100, 42]).into_iter());
        let seen = RefCell::new(Vec::new());

        let items = fetch_all(|cursor| {
            seen.borrow_mut().push(cursor);
            let page = served.borrow_mut().next().unwrap();
            async move { Ok::<_, SkyrankError>(page) }
        })
        .await
        .unwrap();

        assert_eq!(items.len(), 242);
        assert_eq!(items, (0..242).collect::<Vec<_>>());
        assert_eq!(
            seen.into_inner(),
            vec![None, Some("c1".to_string()), Some("c2".to_string())]
        );
    }

    #[tokio::test]
    async fn single_page_without_cursor() {
        let items = fetch_all(|_| async { Ok::<_, SkyrankError>(Page::last(vec!["only"])) })
            .await
            .unwrap();
        assert_eq!(items, vec!["only"]);
    }

    #[tokio::test]
    async fn error_on_later_page_aborts() {
        let mut calls = 0;
        let res: Result<Vec<u8>> = fetch_all(|_| {
            calls += 1;
            let n = calls;
            async move {
                if n == 1 {
                    Ok(Page {
                        items: vec![1],
                        cursor: Some("next".into()),
                    })
                } else {
                    Err(SkyrankError::Remote("boom".into()))
                }
            }
        })
        .await;
        assert!(matches!(res, Err(SkyrankError::Remote(_))));
        assert_eq!(calls, 2);
    }

    #[tokio::test]
    async fn repeated_cursor_is_rejected() {
        let res: Result<Vec<u8>> = fetch_all(|_| async {
            Ok(Page {
                items: vec![],
                cursor: Some("stuck".into()),
            })
        })
        .await;
        assert!(matches!(res, Err(SkyrankError::Malformed(_))));
    }

    #[tokio::test]
    async fn cursor_cycle_is_rejected() {
        let mut calls = 0usize;
        let res: Result<Vec<usize>> = fetch_all(|_| {
            calls += 1;
            let page = Page {
                items: vec![calls],
                cursor: Some(if calls % 2 == 1 { "A" } else { "B" }.to_string()),
            };
            async move { Ok(page) }
        })
        .await;

        let err = res.unwrap_err();
        assert!(matches!(err, SkyrankError::Malformed(ref m) if m.contains("\"A\"")), "{err}");
        assert_eq!(calls, 3);
    }
}
