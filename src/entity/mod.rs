pub mod cart_items;
pub mod carts;
pub mod categories;
pub mod inventories;
pub mod order_items;
pub mod orders;
pub mod package_items;
pub mod packages;
pub mod product_images;
pub mod product_variants;
pub mod products;
pub mod promo_codes;
pub mod reviews;
pub mod sales;
pub mod sizes;
pub mod sub_categories;
pub mod users;

pub use cart_items::Entity as CartItems;
pub use carts::Entity as Carts;
pub use categories::Entity as Categories;
pub use inventories::Entity as Inventories;
pub use order_items::Entity as OrderItems;
pub use orders::Entity as Orders;
pub use package_items::Entity as PackageItems;
pub use packages::Entity as Packages;
pub use product_images::Entity as ProductImages;
pub use product_variants::Entity as ProductVariants;
pub use products::Entity as Products;
pub use promo_codes::Entity as PromoCodes;
pub use reviews::Entity as Reviews;
pub use sales::Entity as Sales;
pub use sizes::Entity as Sizes;
pub use sub_categories::Entity as SubCategories;
pub use users::Entity as Users;
