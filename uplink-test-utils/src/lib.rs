pub mod builder;
pub mod constant;
pub mod context;
pub mod error;
pub mod fixtures;
pub mod model;

pub use builder::TestBuilder;
pub use context::TestContext;
pub use error::TestError;

pub mod prelude {
    pub use crate::{
        constant::{CONSULTANT_RANK, DIRECTOR_RANK, MANAGER_RANK},
        test_setup_with_referral_tables, test_setup_with_tables, TestBuilder, TestContext,
        TestError,
    };
}

/// Creates the referral engine tables in foreign-key order.
///
/// Ranks and packages must exist before users reference them, and users and
/// requests before earnings reference them.
pub fn referral_table_statements() -> Vec<sea_orm::sea_query::TableCreateStatement> {
    let schema = sea_orm::Schema::new(sea_orm::DbBackend::Sqlite);

    vec![
        schema.create_table_from_entity(entity::prelude::UplinkRank),
        schema.create_table_from_entity(entity::prelude::UplinkPackage),
        schema.create_table_from_entity(entity::prelude::UplinkUser),
        schema.create_table_from_entity(entity::prelude::UplinkPackageRequest),
        schema.create_table_from_entity(entity::prelude::UplinkEarning),
    ]
}

#[macro_export]
macro_rules! test_setup_with_tables {
    // Pattern 1: No entities provided
    () => {{
        TestContext::new().await
    }};

    // Pattern 2: Entities provided
    ($($entity:expr),+ $(,)?) => {{
        async {
            let setup = TestContext::new().await?;

            let schema = sea_orm::Schema::new(sea_orm::DbBackend::Sqlite);
            let stmts = vec![
                $(schema.create_table_from_entity($entity),)+
            ];
            setup.with_tables(stmts).await?;

            Ok::<_, $crate::error::TestError>(setup)
        }.await
    }};
}

#[macro_export]
macro_rules! test_setup_with_referral_tables {
    () => {{
        async {
            let setup = TestContext::new().await?;
            setup
                .with_tables($crate::referral_table_statements())
                .await?;

            Ok::<_, $crate::error::TestError>(setup)
        }
        .await
    }};
}
