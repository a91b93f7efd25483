use axum_storefront_api::{
    db::{create_orm_conn, run_migrations},
    dto::{
        auth::RegisterRequest,
        cart::AddToCartRequest,
        categories::CreateCategoryRequest,
        orders::{CheckoutRequest, UpdateOrderStatusRequest},
        products::CreateProductRequest,
        sizes::{CreateSizeRequest, UpdateSizeRequest},
        variants::CreateVariantRequest,
    },
    entity::Products,
    middleware::auth::AuthUser,
    services::{
        auth_service, cart_service, category_service, order_service, product_service,
        size_service, variant_service,
    },
    state::AppState,
};
use sea_orm::{ConnectionTrait, EntityTrait, Statement};

const FALLBACK: &str = "Uncategorized";

// Catalog -> cart -> checkout -> cancel against a real database.
#[tokio::test]
async fn quantities_roll_up_through_catalog_and_orders() -> anyhow::Result<()> {
    let database_url = match std::env::var("TEST_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
    {
        Ok(url) => url,
        Err(_) => {
            eprintln!("Skipping test: set TEST_DATABASE_URL or DATABASE_URL to run the stock flow.");
            return Ok(());
        }
    };

    let state = setup_state(&database_url).await?;
    let admin = AuthUser {
        user_id: 0,
        is_admin: true,
    };

    let customer = auth_service::register_user(
        &state,
        RegisterRequest {
            email: "buyer@example.com".into(),
            name: "Buyer".into(),
            password: "correct horse".into(),
        },
    )
    .await?
    .data
    .expect("registered user");
    let buyer = AuthUser {
        user_id: customer.id,
        is_admin: false,
    };

    let shoes = category_service::create_category(
        &state,
        &admin,
        CreateCategoryRequest {
            name: "Shoes".into(),
            description: None,
        },
    )
    .await?
    .data
    .expect("category");

    let product = product_service::create_product(
        &state,
        &admin,
        CreateProductRequest {
            name: "Runner".into(),
            description: Some("Light running shoe".into()),
            price: 1_000,
            category_id: Some(shoes.id),
            sub_category_id: None,
            single_size: false,
            quantity: None,
        },
    )
    .await?
    .data
    .expect("product");
    assert_eq!(product.quantity, 0);

    let variant = variant_service::create_variant(
        &state,
        &admin,
        CreateVariantRequest {
            product_id: product.id,
            name: "Blue".into(),
            color: Some("blue".into()),
            price: None,
            single_size: false,
            quantity: None,
        },
    )
    .await?
    .data
    .expect("variant")
    .variant;

    let small = add_size(&state, &admin, variant.id, "S", 3).await?;
    let medium = add_size(&state, &admin, variant.id, "M", 4).await?;
    assert_eq!(product_quantity(&state, product.id).await?, 7);

    let write = size_service::update_size(
        &state,
        &admin,
        medium,
        UpdateSizeRequest {
            label: None,
            quantity: Some(10),
        },
    )
    .await?
    .data
    .expect("size write");
    assert_eq!(write.totals.variant_quantity, Some(13));
    assert_eq!(write.totals.product_quantity, 13);

    size_service::set_size_archived(&state, &admin, small, true).await?;
    assert_eq!(product_quantity(&state, product.id).await?, 10);

    cart_service::add_to_cart(
        &state,
        &buyer,
        AddToCartRequest {
            product_id: product.id,
            variant_id: Some(variant.id),
            size_id: Some(medium),
            quantity: 2,
        },
    )
    .await?;
    let placed = order_service::checkout(&state, &buyer, CheckoutRequest::default())
        .await?
        .data
        .expect("order");
    assert_eq!(placed.order.total_amount, 2_000);
    assert!(placed.order.invoice_number.starts_with("INV-"));
    assert_eq!(product_quantity(&state, product.id).await?, 8);

    let cart = cart_service::get_cart(&state, &buyer).await?.data.expect("cart");
    assert!(cart.items.is_empty());

    order_service::update_order_status(
        &state,
        &admin,
        placed.order.id,
        UpdateOrderStatusRequest {
            status: "cancelled".into(),
        },
    )
    .await?;
    assert_eq!(product_quantity(&state, product.id).await?, 10);

    let deleted = category_service::delete_category(&state, &admin, shoes.id)
        .await?
        .data
        .expect("deleted category");
    assert_eq!(deleted.reassigned_products, 1);
    let moved = Products::find_by_id(product.id)
        .one(state.orm.as_ref())
        .await?
        .expect("product still present");
    assert_eq!(moved.category_id, Some(deleted.fallback_category_id));

    Ok(())
}

async fn setup_state(database_url: &str) -> anyhow::Result<AppState> {
    let orm = create_orm_conn(database_url).await?;
    run_migrations(&orm).await?;
    orm.execute(Statement::from_string(
        orm.get_database_backend(),
        "TRUNCATE TABLE package_items, packages, reviews, sales, order_items, orders, promo_codes, \
         cart_items, carts, product_images, inventories, sizes, product_variants, products, \
         sub_categories, categories, users RESTART IDENTITY CASCADE",
    ))
    .await?;
    Ok(AppState::new(orm, FALLBACK))
}

async fn add_size(
    state: &AppState,
    admin: &AuthUser,
    variant_id: i32,
    label: &str,
    quantity: i32,
) -> anyhow::Result<i32> {
    let write = size_service::create_size(
        state,
        admin,
        CreateSizeRequest {
            variant_id,
            label: label.into(),
            quantity,
        },
    )
    .await?
    .data
    .expect("size write");
    Ok(write.size.id)
}

async fn product_quantity(state: &AppState, id: i32) -> anyhow::Result<i32> {
    let product = Products::find_by_id(id)
        .one(state.orm.as_ref())
        .await?
        .expect("product");
    Ok(product.quantity)
}
