use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{
        auth::{LoginRequest, LoginResponse, RegisterRequest},
        cart::{AddToCartRequest, CartWithItems, UpdateCartItemRequest},
        categories::{
            CategoryDeleted, CategoryList, CreateCategoryRequest, CreateSubCategoryRequest,
            SubCategoryList, UpdateCategoryRequest, UpdateSubCategoryRequest,
        },
        images::{CreateImageRequest, ImageList, UpdateImageRequest},
        inventory::{CreateInventoryRequest, InventoryList, InventoryWrite, UpdateInventoryRequest},
        orders::{CheckoutRequest, OrderList, OrderWithItems, UpdateOrderStatusRequest},
        packages::{
            CreatePackageRequest, PackageItemRequest, PackageList, PackageWithItems,
            UpdatePackageRequest,
        },
        products::{
            CreateProductRequest, ProductDetail, ProductList, StockTotals, UpdateProductRequest,
            VariantDetail,
        },
        promo_codes::{CreatePromoCodeRequest, PromoCodeList, UpdatePromoCodeRequest},
        reviews::{CreateReviewRequest, ReviewList, UpdateReviewRequest},
        sales::{CreateSaleRequest, SaleList, UpdateSaleRequest},
        sizes::{CreateSizeRequest, SizeList, SizeWrite, UpdateSizeRequest},
        users::{UpdateUserRequest, UserList},
        variants::{CreateVariantRequest, UpdateVariantRequest, VariantList, VariantWrite},
    },
    models::{
        Cart, CartItem, Category, Inventory, Order, OrderItem, Package, PackageItem, Product,
        ProductImage, ProductVariant, PromoCode, Review, Sale, Size, SubCategory, User,
    },
    response::Meta,
    routes::{
        auth, cart, categories, health, images, inventory, orders, packages, params, products,
        promo_codes, reviews, sales, sizes, sub_categories, users, variants,
    },
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        auth::register,
        auth::login,
        users::list_users,
        users::get_user,
        users::update_user,
        users::delete_user,
        users::archive_user,
        users::unarchive_user,
        categories::list_categories,
        categories::get_category,
        categories::create_category,
        categories::update_category,
        categories::delete_category,
        categories::archive_category,
        categories::unarchive_category,
        sub_categories::list_sub_categories,
        sub_categories::get_sub_category,
        sub_categories::create_sub_category,
        sub_categories::update_sub_category,
        sub_categories::delete_sub_category,
        sub_categories::archive_sub_category,
        sub_categories::unarchive_sub_category,
        products::list_products,
        products::get_product,
        products::create_product,
        products::update_product,
        products::delete_product,
        products::archive_product,
        products::unarchive_product,
        variants::list_variants,
        variants::get_variant,
        variants::create_variant,
        variants::update_variant,
        variants::delete_variant,
        variants::archive_variant,
        variants::unarchive_variant,
        sizes::list_sizes,
        sizes::get_size,
        sizes::create_size,
        sizes::update_size,
        sizes::delete_size,
        sizes::archive_size,
        sizes::unarchive_size,
        inventory::list_inventory,
        inventory::get_inventory,
        inventory::create_inventory,
        inventory::update_inventory,
        inventory::delete_inventory,
        inventory::archive_inventory,
        inventory::unarchive_inventory,
        images::list_images,
        images::get_image,
        images::create_image,
        images::update_image,
        images::delete_image,
        images::archive_image,
        images::unarchive_image,
        cart::get_cart,
        cart::add_to_cart,
        cart::update_cart_item,
        cart::remove_from_cart,
        cart::clear_cart,
        orders::list_orders,
        orders::checkout,
        orders::get_order,
        orders::update_order_status,
        orders::archive_order,
        orders::unarchive_order,
        orders::delete_order,
        reviews::list_reviews,
        reviews::get_review,
        reviews::create_review,
        reviews::update_review,
        reviews::delete_review,
        reviews::archive_review,
        reviews::unarchive_review,
        sales::list_sales,
        sales::get_sale,
        sales::create_sale,
        sales::update_sale,
        sales::delete_sale,
        sales::archive_sale,
        sales::unarchive_sale,
        promo_codes::list_promo_codes,
        promo_codes::validate_promo_code,
        promo_codes::get_promo_code,
        promo_codes::create_promo_code,
        promo_codes::update_promo_code,
        promo_codes::delete_promo_code,
        promo_codes::archive_promo_code,
        promo_codes::unarchive_promo_code,
        packages::list_packages,
        packages::get_package,
        packages::create_package,
        packages::update_package,
        packages::delete_package,
        packages::archive_package,
        packages::unarchive_package
    ),
    components(
        schemas(
            User,
            Category,
            SubCategory,
            Product,
            ProductVariant,
            Size,
            Inventory,
            ProductImage,
            Cart,
            CartItem,
            Order,
            OrderItem,
            Review,
            Sale,
            PromoCode,
            Package,
            PackageItem,
            RegisterRequest,
            LoginRequest,
            LoginResponse,
            UpdateUserRequest,
            UserList,
            CreateCategoryRequest,
            UpdateCategoryRequest,
            CategoryList,
            CategoryDeleted,
            CreateSubCategoryRequest,
            UpdateSubCategoryRequest,
            SubCategoryList,
            CreateProductRequest,
            UpdateProductRequest,
            ProductList,
            ProductDetail,
            VariantDetail,
            StockTotals,
            CreateVariantRequest,
            UpdateVariantRequest,
            VariantList,
            VariantWrite,
            CreateSizeRequest,
            UpdateSizeRequest,
            SizeList,
            SizeWrite,
            CreateInventoryRequest,
            UpdateInventoryRequest,
            InventoryList,
            InventoryWrite,
            CreateImageRequest,
            UpdateImageRequest,
            ImageList,
            AddToCartRequest,
            UpdateCartItemRequest,
            CartWithItems,
            CheckoutRequest,
            UpdateOrderStatusRequest,
            OrderList,
            OrderWithItems,
            CreateReviewRequest,
            UpdateReviewRequest,
            ReviewList,
            CreateSaleRequest,
            UpdateSaleRequest,
            SaleList,
            CreatePromoCodeRequest,
            UpdatePromoCodeRequest,
            PromoCodeList,
            PackageItemRequest,
            CreatePackageRequest,
            UpdatePackageRequest,
            PackageList,
            PackageWithItems,
            params::ListQuery,
            params::ProductQuery,
            params::ChildListQuery,
            params::OrderListQuery,
            params::SortOrder,
            params::ProductSortBy,
            health::HealthData,
            Meta
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Auth", description = "Registration and login"),
        (name = "Users", description = "User accounts"),
        (name = "Categories", description = "Product categories"),
        (name = "Sub-categories", description = "Sub-categories within a category"),
        (name = "Products", description = "Products and their rolled-up quantity"),
        (name = "Variants", description = "Product variants"),
        (name = "Sizes", description = "Sizes of multi-size variants"),
        (name = "Inventory", description = "Per-location stock of single-size variants"),
        (name = "Images", description = "Product images"),
        (name = "Cart", description = "Shopping cart"),
        (name = "Orders", description = "Checkout and orders"),
        (name = "Reviews", description = "Product reviews"),
        (name = "Sales", description = "Timed discounts"),
        (name = "Promo codes", description = "Checkout promo codes"),
        (name = "Packages", description = "Product bundles"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
