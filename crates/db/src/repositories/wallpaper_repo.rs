//! Repository for the `wallpapers` table.
//!
//! Owns slug allocation, resolution labelling on write, the filtered gallery
//! listing, and the atomic download counter.

use std::collections::HashSet;

use flicker_core::listing::{ListingFilter, SortKey};
use flicker_core::naming::{base_slug, unique_slug};
use flicker_core::resolution::{resolution_label, ResolutionFilter};
use sqlx::postgres::PgArguments;
use sqlx::query::QueryAs;
use sqlx::{PgPool, Postgres};

use crate::models::wallpaper::{CreateWallpaper, ListingSummary, UpdateWallpaper, Wallpaper};

/// Column list for `wallpapers` queries.
const COLUMNS: &str = "\
    id, title, slug, storage_id, view_link, download_link, mime_type, \
    width, height, size_bytes, category, resolution_label, downloads, \
    is_featured, tags, device, created_at, updated_at";

/// Unique constraint on `wallpapers.slug`.
const SLUG_CONSTRAINT: &str = "uq_wallpapers_slug";

/// Unique constraint on `wallpapers.storage_id`.
const STORAGE_ID_CONSTRAINT: &str = "uq_wallpapers_storage_id";

/// How many times an insert is retried after losing a slug race.
const MAX_SLUG_ATTEMPTS: usize = 5;

/// Listing predicate shared by [`WallpaperRepo::list`] and
/// [`WallpaperRepo::summarize`]. Binds `$1..$7` in the order of
/// [`FilterBinds::apply`].
const FILTER_CLAUSE: &str = "\
    ($1::TEXT IS NULL OR title ILIKE $1 OR category ILIKE $1 OR tags ILIKE $1) \
    AND ($2::TEXT IS NULL OR LOWER(category) = LOWER($2)) \
    AND ($3::INTEGER IS NULL OR width >= $3 OR height >= $4::INTEGER) \
    AND ($5::TEXT IS NULL OR LOWER(resolution_label) = LOWER($5)) \
    AND ($6::TEXT IS NULL OR device = $6) \
    AND ($7::BOOLEAN = FALSE OR is_featured)";

/// Owned bind values for [`FILTER_CLAUSE`].
#[derive(Debug, Default)]
struct FilterBinds {
    pattern: Option<String>,
    category: Option<String>,
    min_width: Option<i32>,
    min_height: Option<i32>,
    label: Option<String>,
    device: Option<String>,
    featured_only: bool,
}

impl FilterBinds {
    fn new(filter: &ListingFilter) -> Self {
        let (min_width, min_height, label) = match &filter.resolution {
            Some(ResolutionFilter::AtLeast { width, height }) => {
                (Some(*width), Some(*height), None)
            }
            Some(ResolutionFilter::Label(label)) => (None, None, Some(label.clone())),
            None => (None, None, None),
        };
        Self {
            pattern: filter.query_pattern(),
            category: filter.category.clone(),
            min_width,
            min_height,
            label,
            device: filter.device.clone(),
            featured_only: filter.featured_only(),
        }
    }

    fn apply<'q, O>(
        self,
        query: QueryAs<'q, Postgres, O, PgArguments>,
    ) -> QueryAs<'q, Postgres, O, PgArguments> {
        query
            .bind(self.pattern)
            .bind(self.category)
            .bind(self.min_width)
            .bind(self.min_height)
            .bind(self.label)
            .bind(self.device)
            .bind(self.featured_only)
    }
}

fn order_clause(sort: SortKey) -> &'static str {
    match sort {
        SortKey::Downloads => "downloads DESC, id DESC",
        SortKey::Date | SortKey::Featured => "created_at DESC, id DESC",
    }
}

fn violates_unique(err: &sqlx::Error, constraint: &str) -> bool {
    match err {
        sqlx::Error::Database(db_err) => {
            db_err.code().as_deref() == Some("23505") && db_err.constraint() == Some(constraint)
        }
        _ => false,
    }
}

fn is_slug_conflict(err: &sqlx::Error) -> bool {
    violates_unique(err, SLUG_CONSTRAINT)
}

/// Whether `err` is an insert clashing with a record that already owns the
/// same remote asset.
pub fn is_storage_id_conflict(err: &sqlx::Error) -> bool {
    violates_unique(err, STORAGE_ID_CONSTRAINT)
}

/// Provides all queries against `wallpapers`.
pub struct WallpaperRepo;

impl WallpaperRepo {
    // -----------------------------------------------------------------------
    // Create
    // -----------------------------------------------------------------------

    /// Insert a wallpaper, allocating a unique slug from its title and
    /// computing the resolution label from its dimensions.
    ///
    /// Two concurrent inserts may pick the same slug; the loser retries with
    /// a fresh view of the taken slugs.
    pub async fn create(pool: &PgPool, input: &CreateWallpaper) -> Result<Wallpaper, sqlx::Error> {
        let base = base_slug(&input.title);
        let label = resolution_label(input.width, input.height).unwrap_or_default();

        let query = format!(
            "INSERT INTO wallpapers (\
                title, slug, storage_id, view_link, download_link, mime_type, \
                width, height, size_bytes, category, resolution_label, \
                is_featured, tags, device\
             ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14) \
             RETURNING {COLUMNS}"
        );

        let mut attempt = 1;
        loop {
            let taken = Self::taken_slugs(pool, &base).await?;
            let slug = unique_slug(&base, &taken);

            let result = sqlx::query_as::<_, Wallpaper>(&query)
                .bind(&input.title)
                .bind(&slug)
                .bind(&input.storage_id)
                .bind(&input.view_link)
                .bind(&input.download_link)
                .bind(&input.mime_type)
                .bind(input.width)
                .bind(input.height)
                .bind(input.size_bytes)
                .bind(&input.category)
                .bind(&label)
                .bind(input.is_featured)
                .bind(&input.tags)
                .bind(&input.device)
                .fetch_one(pool)
                .await;

            match result {
                Err(err) if attempt < MAX_SLUG_ATTEMPTS && is_slug_conflict(&err) => {
                    tracing::debug!(slug = %slug, attempt, "Slug taken concurrently, retrying");
                    attempt += 1;
                }
                other => return other,
            }
        }
    }

    /// Slugs already used by `base` or its `base-N` variants.
    async fn taken_slugs(pool: &PgPool, base: &str) -> Result<HashSet<String>, sqlx::Error> {
        // Slugs only contain [a-z0-9_-]; `_` is the one LIKE metacharacter.
        let pattern = format!("{}-%", base.replace('_', "\\_"));
        let rows: Vec<(String,)> =
            sqlx::query_as("SELECT slug FROM wallpapers WHERE slug = $1 OR slug LIKE $2")
                .bind(base)
                .bind(pattern)
                .fetch_all(pool)
                .await?;
        Ok(rows.into_iter().map(|(slug,)| slug).collect())
    }

    // -----------------------------------------------------------------------
    // Read
    // -----------------------------------------------------------------------

    /// Find a wallpaper by its slug.
    pub async fn find_by_slug(pool: &PgPool, slug: &str) -> Result<Option<Wallpaper>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM wallpapers WHERE slug = $1");
        sqlx::query_as::<_, Wallpaper>(&query)
            .bind(slug)
            .fetch_optional(pool)
            .await
    }

    /// One page of the filtered gallery listing.
    pub async fn list(
        pool: &PgPool,
        filter: &ListingFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Wallpaper>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM wallpapers \
             WHERE {FILTER_CLAUSE} \
             ORDER BY {order} \
             LIMIT $8 OFFSET $9",
            order = order_clause(filter.sort),
        );
        FilterBinds::new(filter)
            .apply(sqlx::query_as::<_, Wallpaper>(&query))
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Count and total file size over the full filtered listing.
    pub async fn summarize(
        pool: &PgPool,
        filter: &ListingFilter,
    ) -> Result<ListingSummary, sqlx::Error> {
        let query = format!(
            "SELECT COUNT(*) AS total, SUM(size_bytes)::BIGINT AS total_size_bytes \
             FROM wallpapers WHERE {FILTER_CLAUSE}"
        );
        FilterBinds::new(filter)
            .apply(sqlx::query_as::<_, ListingSummary>(&query))
            .fetch_one(pool)
            .await
    }

    /// Most downloaded wallpapers in `category`, excluding `exclude_slug`.
    pub async fn related(
        pool: &PgPool,
        category: &str,
        exclude_slug: &str,
        limit: i64,
    ) -> Result<Vec<Wallpaper>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM wallpapers \
             WHERE category = $1 AND slug <> $2 \
             ORDER BY downloads DESC, id DESC \
             LIMIT $3"
        );
        sqlx::query_as::<_, Wallpaper>(&query)
            .bind(category)
            .bind(exclude_slug)
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    /// Every wallpaper, newest first. Used for the sitemap.
    pub async fn list_all(pool: &PgPool) -> Result<Vec<Wallpaper>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM wallpapers ORDER BY created_at DESC, id DESC");
        sqlx::query_as::<_, Wallpaper>(&query).fetch_all(pool).await
    }

    // -----------------------------------------------------------------------
    // Update
    // -----------------------------------------------------------------------

    /// Atomically add one to the download counter.
    ///
    /// Returns the updated row, or `None` if the slug does not exist.
    pub async fn increment_downloads(
        pool: &PgPool,
        slug: &str,
    ) -> Result<Option<Wallpaper>, sqlx::Error> {
        let query = format!(
            "UPDATE wallpapers SET downloads = downloads + 1 \
             WHERE slug = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Wallpaper>(&query)
            .bind(slug)
            .fetch_optional(pool)
            .await
    }

    /// Apply a staff edit. The slug never changes; the resolution label is
    /// recomputed from the merged dimensions.
    pub async fn update(
        pool: &PgPool,
        slug: &str,
        input: &UpdateWallpaper,
    ) -> Result<Option<Wallpaper>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let select = format!("SELECT {COLUMNS} FROM wallpapers WHERE slug = $1 FOR UPDATE");
        let Some(current) = sqlx::query_as::<_, Wallpaper>(&select)
            .bind(slug)
            .fetch_optional(&mut *tx)
            .await?
        else {
            return Ok(None);
        };

        let width = input.width.or(current.width);
        let height = input.height.or(current.height);
        let label = resolution_label(width, height).unwrap_or_default();

        let query = format!(
            "UPDATE wallpapers SET \
                title = COALESCE($2, title), \
                category = COALESCE($3, category), \
                tags = COALESCE($4, tags), \
                device = COALESCE($5, device), \
                is_featured = COALESCE($6, is_featured), \
                width = $7, \
                height = $8, \
                resolution_label = $9 \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        let updated = sqlx::query_as::<_, Wallpaper>(&query)
            .bind(current.id)
            .bind(input.title.as_deref())
            .bind(input.category.as_deref())
            .bind(input.tags.as_deref())
            .bind(input.device.as_deref())
            .bind(input.is_featured)
            .bind(width)
            .bind(height)
            .bind(&label)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(Some(updated))
    }

    // -----------------------------------------------------------------------
    // Delete
    // -----------------------------------------------------------------------

    /// Delete a wallpaper by slug, returning the removed row.
    pub async fn delete(pool: &PgPool, slug: &str) -> Result<Option<Wallpaper>, sqlx::Error> {
        let query = format!("DELETE FROM wallpapers WHERE slug = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, Wallpaper>(&query)
            .bind(slug)
            .fetch_optional(pool)
            .await
    }
}
