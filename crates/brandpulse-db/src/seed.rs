use brandpulse_core::BrandSeed;
use sqlx::PgPool;

use crate::DbError;

/// Upsert brands from the seed file into the database.
///
/// Returns the number of brands processed (inserted or updated).
/// All upserts run inside a single transaction; if any operation fails
/// the entire batch is rolled back.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if any database operation fails.
pub async fn seed_brands(pool: &PgPool, brands: &[BrandSeed]) -> Result<usize, DbError> {
    let mut tx = pool.begin().await?;
    let mut count = 0usize;

    for brand in brands {
        sqlx::query(
            "INSERT INTO brands (name, notification_email, twitter_handle, is_active) \
             VALUES ($1, $2, $3, true) \
             ON CONFLICT ((LOWER(name))) DO UPDATE SET \
                 notification_email = EXCLUDED.notification_email, \
                 twitter_handle = EXCLUDED.twitter_handle, \
                 is_active = true, \
                 updated_at = NOW()",
        )
        .bind(brand.name.trim())
        .bind(&brand.notification_email)
        .bind(&brand.twitter_handle)
        .execute(&mut *tx)
        .await?;

        count += 1;
    }

    tx.commit().await?;
    Ok(count)
}
