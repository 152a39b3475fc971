//! Declarative test builder.
//!
//! The builder pattern allows chaining table and fixture configuration, with all
//! operations queued and executed during the final `build()` call.

use sea_orm::{sea_query::TableCreateStatement, EntityTrait, Schema};

use crate::{error::TestError, referral_table_statements, TestContext};

/// Builder for declarative test initialization.
pub struct TestBuilder {
    tables: Vec<TableCreateStatement>,
    include_referral_tables: bool,

    ranks: Vec<(String, i64)>,              // (title, required_points)
    users: Vec<(String, Option<String>)>,   // (username, referred_by)
}

impl Default for TestBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TestBuilder {
    /// Create a new TestBuilder with no tables or fixtures configured.
    pub fn new() -> Self {
        Self {
            tables: Vec::new(),
            include_referral_tables: false,
            ranks: Vec::new(),
            users: Vec::new(),
        }
    }

    /// Add every table used by the referral engine.
    ///
    /// Creates UplinkRank, UplinkPackage, UplinkUser, UplinkPackageRequest and
    /// UplinkEarning in foreign-key order.
    pub fn with_referral_tables(mut self) -> Self {
        self.include_referral_tables = true;
        self
    }

    /// Add a custom entity table to the test database.
    ///
    /// Chain multiple calls to add multiple tables; they are created in call order
    /// after the referral tables (if requested).
    ///
    /// # Example
    ///
    /// ```no_run
    /// use uplink_test_utils::TestBuilder;
    /// use entity::prelude::*;
    ///
    /// # async fn example() -> Result<(), uplink_test_utils::TestError> {
    /// let test = TestBuilder::new()
    ///     .with_table(UplinkRank)
    ///     .build()
    ///     .await?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn with_table<E: EntityTrait>(mut self, entity: E) -> Self {
        let schema = Schema::new(sea_orm::DbBackend::Sqlite);
        self.tables.push(schema.create_table_from_entity(entity));
        self
    }

    /// Insert a rank into the ladder during `build()`.
    pub fn with_rank(mut self, title: impl Into<String>, required_points: i64) -> Self {
        self.ranks.push((title.into(), required_points));
        self
    }

    /// Insert the standard three tier ladder (Consultant, Manager, Director).
    pub fn with_standard_ladder(self) -> Self {
        use crate::constant::{CONSULTANT_RANK, DIRECTOR_RANK, MANAGER_RANK};

        self.with_rank(CONSULTANT_RANK.0, CONSULTANT_RANK.1)
            .with_rank(MANAGER_RANK.0, MANAGER_RANK.1)
            .with_rank(DIRECTOR_RANK.0, DIRECTOR_RANK.1)
    }

    /// Insert an unranked user during `build()`.
    ///
    /// Users are inserted in call order; `referred_by` is stored verbatim so it may
    /// name a user that is never inserted.
    pub fn with_user(mut self, username: impl Into<String>, referred_by: Option<&str>) -> Self {
        self.users
            .push((username.into(), referred_by.map(str::to_string)));
        self
    }

    /// Build the test context by creating all configured tables and fixtures.
    ///
    /// # Returns
    /// - `Ok(TestContext)` - Fully configured test environment ready for use
    /// - `Err(TestError::DbErr)` - Table creation or fixture insertion failed
    pub async fn build(self) -> Result<TestContext, TestError> {
        let setup = TestContext::new().await?;

        let mut all_tables = Vec::new();
        if self.include_referral_tables {
            all_tables.extend(referral_table_statements());
        }
        all_tables.extend(self.tables);
        setup.with_tables(all_tables).await?;

        for (title, required_points) in self.ranks {
            setup.rank().insert_rank(&title, required_points).await?;
        }

        for (username, referred_by) in self.users {
            setup
                .user()
                .insert_user(&username, referred_by.as_deref())
                .await?;
        }

        Ok(setup)
    }
}
