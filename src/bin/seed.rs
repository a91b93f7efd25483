use axum_storefront_api::{
    config::AppConfig,
    db::{create_orm_conn, run_migrations},
    services::auth_service::hash_password,
    stock,
};
use sqlx::PgPool;

struct SeedVariant {
    name: &'static str,
    color: Option<&'static str>,
    sizes: &'static [(&'static str, i32)],
}

struct SeedProduct {
    name: &'static str,
    description: &'static str,
    price: i64,
    category: &'static str,
    sub_category: &'static str,
    variants: &'static [SeedVariant],
}

const CATALOG: &[SeedProduct] = &[
    SeedProduct {
        name: "Ferris Hoodie",
        description: "Warm hoodie for Rustaceans",
        price: 550_000,
        category: "Apparel",
        sub_category: "Hoodies",
        variants: &[
            SeedVariant {
                name: "Orange",
                color: Some("#f74c00"),
                sizes: &[("S", 5), ("M", 12), ("L", 8)],
            },
            SeedVariant {
                name: "Black",
                color: Some("#000000"),
                sizes: &[("M", 6), ("XL", 3)],
            },
        ],
    },
    SeedProduct {
        name: "Crab T-Shirt",
        description: "Cotton tee with a small crab",
        price: 180_000,
        category: "Apparel",
        sub_category: "T-Shirts",
        variants: &[SeedVariant {
            name: "White",
            color: Some("#ffffff"),
            sizes: &[("S", 10), ("M", 20), ("L", 15)],
        }],
    },
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    let orm = create_orm_conn(&config.database_url).await?;
    run_migrations(&orm).await?;
    let pool = orm.get_postgres_connection_pool();

    let admin_id = ensure_user(pool, "admin@example.com", "Admin", "admin1234", true).await?;
    let user_id = ensure_user(pool, "user@example.com", "Customer", "user12345", false).await?;
    ensure_category(pool, &config.fallback_category).await?;

    for product in CATALOG {
        let category_id = ensure_category(pool, product.category).await?;
        let sub_category_id = ensure_sub_category(pool, category_id, product.sub_category).await?;
        let Some(product_id) = insert_product(pool, product, category_id, sub_category_id).await?
        else {
            println!("Product {} already present, skipped", product.name);
            continue;
        };

        for variant in product.variants {
            let variant_id = insert_variant(pool, product_id, variant).await?;
            let (_, totals) = stock::propagate_from_variant(&orm, variant_id).await?;
            println!(
                "Seeded {} / {} (product quantity now {})",
                product.name, variant.name, totals.quantity
            );
        }
    }

    println!("Seed completed. Admin ID: {admin_id}, User ID: {user_id}");
    Ok(())
}

async fn ensure_user(
    pool: &PgPool,
    email: &str,
    name: &str,
    password: &str,
    is_admin: bool,
) -> anyhow::Result<i32> {
    let password_hash = hash_password(password)?;

    let (id,): (i32,) = sqlx::query_as(
        r#"
        INSERT INTO users (email, name, password_hash, is_admin)
        VALUES ($1, $2, $3, $4)
        ON CONFLICT (email) DO UPDATE SET is_admin = EXCLUDED.is_admin
        RETURNING id
        "#,
    )
    .bind(email)
    .bind(name)
    .bind(password_hash)
    .bind(is_admin)
    .fetch_one(pool)
    .await?;

    println!("Ensured user {email} (admin={is_admin})");
    Ok(id)
}

async fn ensure_category(pool: &PgPool, name: &str) -> anyhow::Result<i32> {
    let (id,): (i32,) = sqlx::query_as(
        r#"
        INSERT INTO categories (name)
        VALUES ($1)
        ON CONFLICT (name) DO UPDATE SET name = EXCLUDED.name
        RETURNING id
        "#,
    )
    .bind(name)
    .fetch_one(pool)
    .await?;
    Ok(id)
}

async fn ensure_sub_category(pool: &PgPool, category_id: i32, name: &str) -> anyhow::Result<i32> {
    let (id,): (i32,) = sqlx::query_as(
        r#"
        INSERT INTO sub_categories (category_id, name)
        VALUES ($1, $2)
        ON CONFLICT (category_id, name) DO UPDATE SET name = EXCLUDED.name
        RETURNING id
        "#,
    )
    .bind(category_id)
    .bind(name)
    .fetch_one(pool)
    .await?;
    Ok(id)
}

/// Product names carry no unique constraint, so an existing name means the seed already ran.
async fn insert_product(
    pool: &PgPool,
    product: &SeedProduct,
    category_id: i32,
    sub_category_id: i32,
) -> anyhow::Result<Option<i32>> {
    let existing: Option<(i32,)> = sqlx::query_as("SELECT id FROM products WHERE name = $1")
        .bind(product.name)
        .fetch_optional(pool)
        .await?;
    if existing.is_some() {
        return Ok(None);
    }

    let (id,): (i32,) = sqlx::query_as(
        r#"
        INSERT INTO products (name, description, price, category_id, sub_category_id, single_size)
        VALUES ($1, $2, $3, $4, $5, FALSE)
        RETURNING id
        "#,
    )
    .bind(product.name)
    .bind(product.description)
    .bind(product.price)
    .bind(category_id)
    .bind(sub_category_id)
    .fetch_one(pool)
    .await?;
    Ok(Some(id))
}

async fn insert_variant(pool: &PgPool, product_id: i32, variant: &SeedVariant) -> anyhow::Result<i32> {
    let (variant_id,): (i32,) = sqlx::query_as(
        r#"
        INSERT INTO product_variants (product_id, name, color, single_size)
        VALUES ($1, $2, $3, FALSE)
        RETURNING id
        "#,
    )
    .bind(product_id)
    .bind(variant.name)
    .bind(variant.color)
    .fetch_one(pool)
    .await?;

    for (label, quantity) in variant.sizes {
        sqlx::query("INSERT INTO sizes (variant_id, label, quantity) VALUES ($1, $2, $3)")
            .bind(variant_id)
            .bind(*label)
            .bind(*quantity)
            .execute(pool)
            .await?;
    }
    Ok(variant_id)
}
