/// Name of the unique constraint on `urls.alias`.
pub const ALIAS_UNIQUE_CONSTRAINT: &str = "urls_alias_key";

/// Returns true when `e` is a unique violation of the alias constraint.
///
/// A unique violation without a constraint name is also treated as an alias
/// conflict, since `urls` carries no other unique column besides its identity key.
pub fn is_unique_violation_on_alias(e: &sqlx::Error) -> bool {
    let Some(db_err) = e.as_database_error() else {
        return false;
    };

    if !db_err.is_unique_violation() {
        return false;
    }

    matches!(db_err.constraint(), Some(ALIAS_UNIQUE_CONSTRAINT) | None)
}
