//! users — registered accounts.
//!
//! The row type deliberately does not derive Serialize: the password
//! hash must never end up in a response body.

use chrono::{DateTime, Utc};
use diesel::prelude::*;

use crate::schema::users;

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub password_hash: String,
    pub create_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = users)]
pub struct NewUser {
    pub username: String,
    pub password_hash: String,
}
