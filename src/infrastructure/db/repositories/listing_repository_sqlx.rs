use async_trait::async_trait;
use sqlx::Row;
use sqlx::postgres::PgRow;
use uuid::Uuid;

use crate::application::ports::listing_repository::{
    ListingRepository, ListingUpdate, UpdatedListing,
};
use crate::domain::listings::listing::{AdditionalImage, Listing, ListingFields};
use crate::infrastructure::db::{PgPool, escape_like};

const LISTING_SELECT: &str = r#"SELECT l.id, l.rubric_id, r.name AS rubric_name, l.title, l.content, l.price,
       l.contacts, l.image, l.author_id, l.is_active, l.created_at
FROM listings l
JOIN rubrics r ON r.id = l.rubric_id"#;

pub struct SqlxListingRepository {
    pub pool: PgPool,
}

impl SqlxListingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn fetch_one_in<'e, E>(executor: E, id: i64) -> anyhow::Result<Option<Listing>>
    where
        E: sqlx::PgExecutor<'e>,
    {
        let sql = format!("{LISTING_SELECT} WHERE l.id = $1");
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(row.as_ref().map(map_listing))
    }
}

fn map_listing(r: &PgRow) -> Listing {
    Listing {
        id: r.get("id"),
        rubric_id: r.get("rubric_id"),
        rubric_name: r.get("rubric_name"),
        title: r.get("title"),
        content: r.get("content"),
        price: r.get("price"),
        contacts: r.get("contacts"),
        image: r.get("image"),
        author_id: r.get("author_id"),
        is_active: r.get("is_active"),
        created_at: r.get("created_at"),
    }
}

fn keyword_pattern(keyword: Option<&str>) -> Option<String> {
    keyword
        .filter(|k| !k.is_empty())
        .map(|k| format!("%{}%", escape_like(k)))
}

#[async_trait]
impl ListingRepository for SqlxListingRepository {
    async fn list_latest_active(&self, limit: i64) -> anyhow::Result<Vec<Listing>> {
        let sql = format!(
            "{LISTING_SELECT} WHERE l.is_active ORDER BY l.created_at DESC, l.id DESC LIMIT $1"
        );
        let rows = sqlx::query(&sql)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.iter().map(map_listing).collect())
    }

    async fn count_active_in_rubric(
        &self,
        rubric_id: i64,
        keyword: Option<&str>,
    ) -> anyhow::Result<i64> {
        let count = sqlx::query_scalar::<_, i64>(
            r#"SELECT COUNT(*) FROM listings
               WHERE is_active AND rubric_id = $1
                 AND ($2::text IS NULL OR title ILIKE $2 ESCAPE '\' OR content ILIKE $2 ESCAPE '\')"#,
        )
        .bind(rubric_id)
        .bind(keyword_pattern(keyword))
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }

    async fn list_active_in_rubric(
        &self,
        rubric_id: i64,
        keyword: Option<&str>,
        offset: i64,
        limit: i64,
    ) -> anyhow::Result<Vec<Listing>> {
        let sql = format!(
            r#"{LISTING_SELECT}
               WHERE l.is_active AND l.rubric_id = $1
                 AND ($2::text IS NULL OR l.title ILIKE $2 ESCAPE '\' OR l.content ILIKE $2 ESCAPE '\')
               ORDER BY l.created_at DESC, l.id DESC
               OFFSET $3 LIMIT $4"#
        );
        let rows = sqlx::query(&sql)
            .bind(rubric_id)
            .bind(keyword_pattern(keyword))
            .bind(offset)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.iter().map(map_listing).collect())
    }

    async fn list_for_author(&self, author_id: Uuid) -> anyhow::Result<Vec<Listing>> {
        let sql = format!("{LISTING_SELECT} WHERE l.author_id = $1 ORDER BY l.created_at DESC, l.id DESC");
        let rows = sqlx::query(&sql)
            .bind(author_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.iter().map(map_listing).collect())
    }

    async fn get_by_id(&self, id: i64) -> anyhow::Result<Option<Listing>> {
        Self::fetch_one_in(&self.pool, id).await
    }

    async fn get_owned(&self, id: i64, author_id: Uuid) -> anyhow::Result<Option<Listing>> {
        let sql = format!("{LISTING_SELECT} WHERE l.id = $1 AND l.author_id = $2");
        let row = sqlx::query(&sql)
            .bind(id)
            .bind(author_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.as_ref().map(map_listing))
    }

    async fn list_images(&self, listing_id: i64) -> anyhow::Result<Vec<AdditionalImage>> {
        let rows = sqlx::query(
            "SELECT id, listing_id, image FROM additional_images WHERE listing_id = $1 ORDER BY id",
        )
        .bind(listing_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows
            .into_iter()
            .map(|r| AdditionalImage {
                id: r.get("id"),
                listing_id: r.get("listing_id"),
                image: r.get("image"),
            })
            .collect())
    }

    async fn create(
        &self,
        author_id: Uuid,
        fields: &ListingFields,
        image: Option<&str>,
        extra_images: &[String],
    ) -> anyhow::Result<Listing> {
        let mut tx = self.pool.begin().await?;
        let id: i64 = sqlx::query_scalar(
            r#"INSERT INTO listings (rubric_id, title, content, price, contacts, image, author_id, is_active)
               VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
               RETURNING id"#,
        )
        .bind(fields.rubric_id)
        .bind(&fields.title)
        .bind(&fields.content)
        .bind(fields.price)
        .bind(&fields.contacts)
        .bind(image)
        .bind(author_id)
        .bind(fields.is_active)
        .fetch_one(&mut *tx)
        .await?;
        for path in extra_images {
            sqlx::query("INSERT INTO additional_images (listing_id, image) VALUES ($1, $2)")
                .bind(id)
                .bind(path)
                .execute(&mut *tx)
                .await?;
        }
        let listing = Self::fetch_one_in(&mut *tx, id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("listing vanished after insert"))?;
        tx.commit().await?;
        Ok(listing)
    }

    async fn update_owned(
        &self,
        id: i64,
        author_id: Uuid,
        update: &ListingUpdate,
    ) -> anyhow::Result<Option<UpdatedListing>> {
        let mut tx = self.pool.begin().await?;
        let current: Option<Option<String>> = sqlx::query_scalar(
            "SELECT image FROM listings WHERE id = $1 AND author_id = $2 FOR UPDATE",
        )
        .bind(id)
        .bind(author_id)
        .fetch_optional(&mut *tx)
        .await?;
        let Some(previous_image) = current else {
            return Ok(None);
        };

        let mut orphaned_paths = Vec::new();
        let fields = &update.fields;
        match &update.image {
            None => {
                sqlx::query(
                    r#"UPDATE listings SET rubric_id = $1, title = $2, content = $3, price = $4,
                           contacts = $5, is_active = $6
                       WHERE id = $7"#,
                )
                .bind(fields.rubric_id)
                .bind(&fields.title)
                .bind(&fields.content)
                .bind(fields.price)
                .bind(&fields.contacts)
                .bind(fields.is_active)
                .bind(id)
                .execute(&mut *tx)
                .await?;
            }
            Some(new_image) => {
                sqlx::query(
                    r#"UPDATE listings SET rubric_id = $1, title = $2, content = $3, price = $4,
                           contacts = $5, is_active = $6, image = $7
                       WHERE id = $8"#,
                )
                .bind(fields.rubric_id)
                .bind(&fields.title)
                .bind(&fields.content)
                .bind(fields.price)
                .bind(&fields.contacts)
                .bind(fields.is_active)
                .bind(new_image.as_deref())
                .bind(id)
                .execute(&mut *tx)
                .await?;
                if let Some(old) = previous_image {
                    if new_image.as_deref() != Some(old.as_str()) {
                        orphaned_paths.push(old);
                    }
                }
            }
        }

        if !update.remove_image_ids.is_empty() {
            let removed: Vec<String> = sqlx::query_scalar(
                "DELETE FROM additional_images WHERE listing_id = $1 AND id = ANY($2) RETURNING image",
            )
            .bind(id)
            .bind(&update.remove_image_ids)
            .fetch_all(&mut *tx)
            .await?;
            orphaned_paths.extend(removed);
        }
        for path in &update.add_images {
            sqlx::query("INSERT INTO additional_images (listing_id, image) VALUES ($1, $2)")
                .bind(id)
                .bind(path)
                .execute(&mut *tx)
                .await?;
        }

        let listing = Self::fetch_one_in(&mut *tx, id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("listing vanished during update"))?;
        tx.commit().await?;
        Ok(Some(UpdatedListing {
            listing,
            orphaned_paths,
        }))
    }

    async fn delete_owned(&self, id: i64, author_id: Uuid) -> anyhow::Result<Option<Vec<String>>> {
        let mut tx = self.pool.begin().await?;
        let extra: Vec<String> =
            sqlx::query_scalar("SELECT image FROM additional_images WHERE listing_id = $1")
                .bind(id)
                .fetch_all(&mut *tx)
                .await?;
        let main: Option<Option<String>> = sqlx::query_scalar(
            "DELETE FROM listings WHERE id = $1 AND author_id = $2 RETURNING image",
        )
        .bind(id)
        .bind(author_id)
        .fetch_optional(&mut *tx)
        .await?;
        let Some(main) = main else {
            return Ok(None);
        };
        tx.commit().await?;
        let mut paths: Vec<String> = main.into_iter().collect();
        paths.extend(extra);
        Ok(Some(paths))
    }

    async fn image_paths_for_author(&self, author_id: Uuid) -> anyhow::Result<Vec<String>> {
        let paths: Vec<String> = sqlx::query_scalar(
            r#"SELECT image FROM listings WHERE author_id = $1 AND image IS NOT NULL
               UNION ALL
               SELECT ai.image FROM additional_images ai
               JOIN listings l ON l.id = ai.listing_id
               WHERE l.author_id = $1"#,
        )
        .bind(author_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(paths)
    }
}
