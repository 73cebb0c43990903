use sea_query::{
    ColumnDef, Index, IndexCreateStatement, IndexDropStatement, Table, TableCreateStatement,
    TableDropStatement,
};

use crate::table::Tag;

pub struct CreateTable;

fn create_table() -> TableCreateStatement {
    Table::create()
        .table(Tag::Table)
        .col(
            ColumnDef::new(Tag::Id)
                .string()
                .not_null()
                .string_len(26)
                .primary_key(),
        )
        .col(ColumnDef::new(Tag::Name).string().not_null().string_len(200))
        .col(ColumnDef::new(Tag::Slug).string().not_null().string_len(200))
        .col(ColumnDef::new(Tag::Color).string().not_null().string_len(7))
        .to_owned()
}

fn drop_table() -> TableDropStatement {
    Table::drop().table(Tag::Table).to_owned()
}

sqlite_operation!(CreateTable, create_table(), drop_table());

pub struct CreateUk1;

fn create_uk_1() -> IndexCreateStatement {
    Index::create()
        .name("uk_tag_name")
        .table(Tag::Table)
        .unique()
        .col(Tag::Name)
        .to_owned()
}

fn drop_uk_1() -> IndexDropStatement {
    Index::drop().name("uk_tag_name").table(Tag::Table).to_owned()
}

sqlite_operation!(CreateUk1, create_uk_1(), drop_uk_1());

pub struct CreateUk2;

fn create_uk_2() -> IndexCreateStatement {
    Index::create()
        .name("uk_tag_slug")
        .table(Tag::Table)
        .unique()
        .col(Tag::Slug)
        .to_owned()
}

fn drop_uk_2() -> IndexDropStatement {
    Index::drop().name("uk_tag_slug").table(Tag::Table).to_owned()
}

sqlite_operation!(CreateUk2, create_uk_2(), drop_uk_2());

pub struct CreateUk3;

fn create_uk_3() -> IndexCreateStatement {
    Index::create()
        .name("uk_tag_color")
        .table(Tag::Table)
        .unique()
        .col(Tag::Color)
        .to_owned()
}

fn drop_uk_3() -> IndexDropStatement {
    Index::drop().name("uk_tag_color").table(Tag::Table).to_owned()
}

sqlite_operation!(CreateUk3, create_uk_3(), drop_uk_3());
