//! Query pagination helper.
//!
//! Every list endpoint serves fixed-size pages of ten items. The helper
//! counts the collection first, clamps the requested page into range, then
//! fetches just that slice.

use quill_common::{AppError, AppResult, PAGE_SIZE, Page, PageRequest};
use sea_orm::{ConnectionTrait, EntityTrait, FromQueryResult, PaginatorTrait, Select};

/// Fetch one page of an ordered query.
///
/// Out-of-range page numbers degrade to the nearest valid page: zero and
/// missing resolve to the first page, anything past the end resolves to
/// the last. An empty result set yields a single empty page.
pub async fn fetch_page<C, E>(
    db: &C,
    query: Select<E>,
    request: PageRequest,
) -> AppResult<Page<E::Model>>
where
    C: ConnectionTrait,
    E: EntityTrait,
    E::Model: FromQueryResult + Sized + Send + Sync,
{
    let paginator = query.paginate(db, PAGE_SIZE);

    let totals = paginator
        .num_items_and_pages()
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

    let page = request.clamp(totals.number_of_pages);

    let items = paginator
        .fetch_page(page - 1)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

    Ok(Page::new(
        items,
        page,
        totals.number_of_items,
        totals.number_of_pages,
    ))
}
