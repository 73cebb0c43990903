mod cart;
mod favorite;
mod ingredient;
mod recipe;
mod recipe_ingredient;
mod recipe_tag;
mod subscription;
mod tag;
mod user;

use sqlx_migrator::vec_box;

pub struct Migration;

sqlx_migrator::sqlite_migration!(
    Migration,
    "recipebox",
    "m0001",
    vec_box![],
    vec_box![
        user::CreateTable,
        user::CreateUk1,
        user::CreateUk2,
        subscription::CreateTable,
        subscription::CreateIdx1,
        ingredient::CreateTable,
        ingredient::CreateUk1,
        tag::CreateTable,
        tag::CreateUk1,
        tag::CreateUk2,
        tag::CreateUk3,
        recipe::CreateTable,
        recipe::CreateIdx1,
        recipe::CreateIdx2,
        recipe_ingredient::CreateTable,
        recipe_ingredient::CreateIdx1,
        recipe_tag::CreateTable,
        recipe_tag::CreateIdx1,
        favorite::CreateTable,
        favorite::CreateIdx1,
        cart::CreateTable,
        cart::CreateIdx1,
    ]
);
