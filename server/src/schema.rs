//! Diesel table definitions.

diesel::table! {
    users (id) {
        id -> Int8,
        username -> Varchar,
        password_hash -> Varchar,
        create_date -> Nullable<Timestamptz>,
    }
}
