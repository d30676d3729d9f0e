pub mod cart_service;
pub mod subscription_service;
pub mod wishlist_service;
