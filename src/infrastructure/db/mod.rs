use sqlx::{Pool, Postgres};

pub type PgPool = Pool<Postgres>;

pub async fn connect_pool(database_url: &str) -> anyhow::Result<PgPool> {
    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(10)
        .connect(database_url)
        .await?;
    Ok(pool)
}

pub async fn migrate(pool: &PgPool) -> anyhow::Result<()> {
    // Uses compile-time embedded migrations under ./migrations
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

/// Escapes LIKE wildcards so user input only ever matches literally.
pub fn escape_like(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}

pub mod repositories;

#[cfg(test)]
mod tests {
    use super::escape_like;

    #[test]
    fn escapes_wildcards() {
        assert_eq!(escape_like("50% off_now\\"), "50\\% off\\_now\\\\");
        assert_eq!(escape_like("plain"), "plain");
    }
}
