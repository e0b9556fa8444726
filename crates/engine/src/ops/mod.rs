use chrono::{DateTime, Utc};
use sea_orm::DatabaseConnection;

use crate::{EngineError, Money, ResultEngine, SplitInput, SplitType};

mod access;
mod expenses;
mod groups;
mod loaders;
mod summary;
mod users;

/// Run a block inside a DB transaction, committing on success and rolling back on error.
macro_rules! with_tx {
    ($self:expr, |$tx:ident| $body:expr) => {{
        let $tx = $self.database.begin().await?;
        let result = $body;
        match result {
            Ok(value) => {
                $tx.commit().await?;
                Ok(value)
            }
            Err(err) => Err(err),
        }
    }};
}

pub(crate) use with_tx;

#[derive(Debug)]
pub struct Engine {
    database: DatabaseConnection,
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }
}

/// Input of [`Engine::new_expense`].
///
/// When `participants` is `None` the expense is split among every group
/// member.
#[derive(Clone, Debug)]
pub struct NewExpense {
    pub group_id: String,
    pub description: String,
    pub amount: Money,
    pub split_type: SplitType,
    pub participants: Option<Vec<SplitInput>>,
    pub notes: Option<String>,
    pub occurred_at: Option<DateTime<Utc>>,
}

fn normalize_required_name(value: &str, label: &str) -> ResultEngine<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(EngineError::InvalidInput(format!("{label} must not be empty")));
    }
    Ok(trimmed.to_string())
}

fn normalize_optional_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
}

/// The builder for `Engine`
#[derive(Default)]
pub struct EngineBuilder {
    database: DatabaseConnection,
}

impl EngineBuilder {
    /// Pass the required database
    pub fn database(mut self, db: DatabaseConnection) -> EngineBuilder {
        self.database = db;
        self
    }

    /// Construct `Engine`
    pub async fn build(self) -> ResultEngine<Engine> {
        Ok(Engine {
            database: self.database,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_name_is_trimmed() {
        assert_eq!(normalize_required_name("  Trip ", "group name").unwrap(), "Trip");
        assert_eq!(
            normalize_required_name("   ", "group name").unwrap_err(),
            EngineError::InvalidInput("group name must not be empty".to_string())
        );
    }

    #[test]
    fn optional_text_drops_blank() {
        assert_eq!(normalize_optional_text(Some("  ")), None);
        assert_eq!(normalize_optional_text(Some(" hi ")), Some("hi".to_string()));
        assert_eq!(normalize_optional_text(None), None);
    }
}
