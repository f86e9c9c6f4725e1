//! Shared Diesel error mapping for the roster repositories.
//!
//! Every repository port error carries the same three variants, so mapping
//! is written once against [`RepositoryError`]. Each port error also
//! converts from `diesel::result::Error` and [`PoolError`], which lets
//! adapters propagate with `?` and transactions use the port error as their
//! error type.

use tracing::debug;

use crate::domain::ports::{
    GroupRepositoryError, MemberRepositoryError, OfficerRepositoryError, OwnerRepositoryError,
    PersonRepositoryError, StateLogRepositoryError, UserAccountRepositoryError,
};

use super::pool::PoolError;

/// Constructors shared by repository port errors.
pub trait RepositoryError: Sized {
    /// Connectivity failure.
    fn connection(message: String) -> Self;
    /// Query failure.
    fn query(message: String) -> Self;
    /// Unique-key race.
    fn conflict(message: String) -> Self;
}

macro_rules! impl_repository_error {
    ($($name:ident),+ $(,)?) => {
        $(
            impl RepositoryError for $name {
                fn connection(message: String) -> Self {
                    $name::connection(message)
                }

                fn query(message: String) -> Self {
                    $name::query(message)
                }

                fn conflict(message: String) -> Self {
                    $name::conflict(message)
                }
            }

            impl From<diesel::result::Error> for $name {
                fn from(error: diesel::result::Error) -> Self {
                    map_diesel_error(error)
                }
            }

            impl From<PoolError> for $name {
                fn from(error: PoolError) -> Self {
                    map_pool_error(error)
                }
            }
        )+
    };
}

impl_repository_error!(
    GroupRepositoryError,
    PersonRepositoryError,
    MemberRepositoryError,
    OfficerRepositoryError,
    UserAccountRepositoryError,
    OwnerRepositoryError,
    StateLogRepositoryError,
);

/// Map pool errors onto the repository's connection variant.
pub fn map_pool_error<E: RepositoryError>(error: PoolError) -> E {
    let message = match error {
        PoolError::Checkout { message } | PoolError::Build { message } => message,
    };
    E::connection(message)
}

/// Map Diesel errors onto connection, conflict or query variants.
pub fn map_diesel_error<E: RepositoryError>(error: diesel::result::Error) -> E {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::NotFound => E::query("record not found".to_owned()),
        DieselError::QueryBuilderError(_) => E::query("database query error".to_owned()),
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            E::connection("database connection error".to_owned())
        }
        DieselError::DatabaseError(
            DatabaseErrorKind::UniqueViolation | DatabaseErrorKind::SerializationFailure,
            info,
        ) => E::conflict(
            info.constraint_name()
                .unwrap_or("unique constraint")
                .to_owned(),
        ),
        DieselError::DatabaseError(_, _) => E::query("database error".to_owned()),
        _ => E::query("database error".to_owned()),
    }
}

/// Map a stored integer code back onto its enumeration.
pub fn decode<T, E: RepositoryError>(
    code: i32,
    column: &'static str,
    from_code: impl FnOnce(i32) -> Option<T>,
) -> Result<T, E> {
    from_code(code).ok_or_else(|| E::query(format!("unknown {column} code {code}")))
}

/// Map an optional stored code back onto its enumeration.
pub fn decode_optional<T, E: RepositoryError>(
    code: Option<i32>,
    column: &'static str,
    from_code: impl FnOnce(i32) -> Option<T>,
) -> Result<Option<T>, E> {
    code.map(|value| decode(value, column, from_code)).transpose()
}

#[cfg(test)]
mod tests {
    use diesel::result::{DatabaseErrorInformation, DatabaseErrorKind, Error as DieselError};
    use rstest::rstest;

    use super::*;
    use crate::domain::{ErrorCode, Status};

    struct Info(&'static str);

    impl DatabaseErrorInformation for Info {
        fn message(&self) -> &str {
            "duplicate key value violates unique constraint"
        }
        fn details(&self) -> Option<&str> {
            None
        }
        fn hint(&self) -> Option<&str> {
            None
        }
        fn table_name(&self) -> Option<&str> {
            None
        }
        fn column_name(&self) -> Option<&str> {
            None
        }
        fn constraint_name(&self) -> Option<&str> {
            Some(self.0)
        }
        fn statement_position(&self) -> Option<i32> {
            None
        }
    }

    #[rstest]
    fn unique_violations_become_conflicts() {
        let error = DieselError::DatabaseError(
            DatabaseErrorKind::UniqueViolation,
            Box::new(Info("groups_bhs_id_kind_key")),
        );
        let mapped: GroupRepositoryError = map_diesel_error(error);
        assert_eq!(mapped, GroupRepositoryError::conflict("groups_bhs_id_kind_key"));
        let domain: crate::domain::Error = mapped.into();
        assert_eq!(domain.code(), ErrorCode::Conflict);
    }

    #[rstest]
    fn closed_connections_become_connection_errors() {
        let error = DieselError::DatabaseError(
            DatabaseErrorKind::ClosedConnection,
            Box::new(Info("none")),
        );
        let mapped: PersonRepositoryError = map_diesel_error(error);
        assert!(matches!(mapped, PersonRepositoryError::Connection { .. }));
    }

    #[rstest]
    fn pool_errors_become_connection_errors() {
        let mapped: MemberRepositoryError = map_pool_error(PoolError::checkout("timed out"));
        assert_eq!(mapped, MemberRepositoryError::connection("timed out"));
    }

    #[rstest]
    fn unknown_codes_are_query_errors() {
        let decoded: Result<Status, OfficerRepositoryError> =
            decode(99, "status", Status::from_code);
        assert!(matches!(decoded, Err(OfficerRepositoryError::Query { .. })));
        let decoded: Result<Option<Status>, OfficerRepositoryError> =
            decode_optional(None, "status", Status::from_code);
        assert_eq!(decoded, Ok(None));
    }
}
