use lazy_static::lazy_static;
use rusqlite_migration::{Migrations, M};

lazy_static! {
    pub static ref MIGRATIONS: Migrations<'static> = Migrations::new(vec![M::up(
        r#"
        CREATE TABLE notes (
            id INTEGER PRIMARY KEY AUTOINCREMENT NOT NULL,

            title TEXT NOT NULL,
            body TEXT,
            user_id INTEGER NOT NULL,

            created_on DATETIME NOT NULL,
            updated_on DATETIME NOT NULL
        );

        CREATE INDEX notes_user_id_idx ON notes (user_id);
        "#
    )]);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn migrations_are_valid() {
        assert!(MIGRATIONS.validate().is_ok());
    }
}
