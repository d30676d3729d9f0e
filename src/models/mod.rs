// ============================================================================
// MODELS - MODULE PRINCIPAL
// ============================================================================
//
// Description:
//   Point d'entrée pour tous les modèles de données.
//   Chaque modèle correspond à une table PostgreSQL avec SeaORM.
//
// Liste des modules:
//   - users : Comptes utilisateurs (email unique normalisé + hash)
//   - products : Catalogue produits
//   - carts / cart_items : Panier (1 par utilisateur, 1 ligne par produit)
//   - wishlists / wishlist_items : Wishlist (même structure, sans quantité)
//   - subscriptions : Abonnements newsletter (1 par email)
//   - contact_messages : Messages de contact (append-only)
//   - dto : Data Transfer Objects pour les réponses API
//
// Points d'attention:
//   - Tous les modèles utilisent SeaORM (pas de SQL brut)
//   - Les contraintes UNIQUE (users.email, carts.user_id, wishlists.user_id,
//     subscriptions.email, (cart_id, product_id), (wishlist_id, product_id))
//     sont l'autorité en cas de race sur la première insertion
//
// ============================================================================

pub mod carts;
pub mod cart_items;
pub mod contact_messages;
pub mod dto;
pub mod products;
pub mod subscriptions;
pub mod users;
pub mod wishlists;
pub mod wishlist_items;
